use crate::config::MIN_DURATION_SECS;
use crate::error::ApiError;
use crate::models::{ChannelRecord, VideoRecord};
use crate::services::key_pool::KeyPool;
use crate::services::youtube_api::{ChannelItem, VideoItem, VideoPlatform};
use crate::utils::{parse_count, parse_iso8601_duration, published_date};
use log::{error, warn};
use thiserror::Error;

/// Why a fetched video did not make it into the ranking.
#[derive(Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("unparseable duration '{0}'")]
    BadDuration(String),
    #[error("duration too short ({0:.1}s)")]
    TooShort(f64),
}

/// Turns a raw video resource into a record, enforcing the long-form minimum.
pub fn validate_video(video_id: &str, item: VideoItem) -> Result<VideoRecord, Rejection> {
    let raw_duration = item
        .content_details
        .and_then(|d| d.duration)
        .ok_or(Rejection::MissingField("duration"))?;
    let duration_secs = parse_iso8601_duration(&raw_duration)
        .ok_or_else(|| Rejection::BadDuration(raw_duration.clone()))?;
    if duration_secs < MIN_DURATION_SECS {
        return Err(Rejection::TooShort(duration_secs));
    }

    let snippet = item.snippet.ok_or(Rejection::MissingField("snippet"))?;
    let published_date =
        published_date(&snippet.published_at).ok_or(Rejection::MissingField("publishedAt"))?;
    let thumbnail_url = snippet
        .thumbnails
        .best_url()
        .ok_or(Rejection::MissingField("thumbnail"))?
        .to_string();
    let view_count = parse_count(item.statistics.as_ref().and_then(|s| s.view_count.as_deref()));

    Ok(VideoRecord {
        video_id: video_id.to_string(),
        title: snippet.title,
        published_date,
        view_count,
        thumbnail_url,
        duration_secs,
    })
}

/// Fetches and validates one video. Never fails: anything that goes wrong is
/// logged and the video is skipped.
///
/// Quota errors rotate through the pool; each key is tried at most once for
/// this video.
pub async fn fetch_video(
    api: &dyn VideoPlatform,
    pool: &mut KeyPool,
    video_id: &str,
) -> Option<VideoRecord> {
    let mut attempt = pool.attempt();
    loop {
        let Some(key) = attempt.next_key() else {
            error!(
                "Skipping video {video_id}: all {} API keys exceeded their quota",
                attempt.tried()
            );
            return None;
        };

        match api.video(&key, video_id).await {
            Ok(Some(item)) => {
                return match validate_video(video_id, item) {
                    Ok(record) => Some(record),
                    Err(reason) => {
                        warn!("Skipping video {video_id}: {reason}");
                        None
                    }
                };
            }
            Ok(None) | Err(ApiError::NotFound) => {
                warn!("Video not found: {video_id}");
                return None;
            }
            Err(ApiError::QuotaExceeded) => {
                warn!("Switching API key: quota exceeded while fetching video {video_id}");
                attempt.quota_exceeded();
            }
            Err(e) => {
                error!("Failed to fetch video {video_id}: {e}");
                return None;
            }
        }
    }
}

pub fn channel_record(channel_id: &str, item: ChannelItem) -> Option<ChannelRecord> {
    let snippet = item.snippet?;
    Some(ChannelRecord {
        channel_id: channel_id.to_string(),
        channel_name: snippet.title,
        subscriber_count: parse_count(
            item.statistics
                .as_ref()
                .and_then(|s| s.subscriber_count.as_deref()),
        ),
    })
}

/// Single attempt with the current key; a channel lookup does not rotate.
pub async fn fetch_channel(
    api: &dyn VideoPlatform,
    pool: &KeyPool,
    channel_id: &str,
) -> Option<ChannelRecord> {
    match api.channel(pool.current_key(), channel_id).await {
        Ok(Some(item)) => {
            let record = channel_record(channel_id, item);
            if record.is_none() {
                warn!("Channel {channel_id} has no snippet");
            }
            record
        }
        Ok(None) | Err(ApiError::NotFound) => {
            warn!("Channel not found: {channel_id}");
            None
        }
        Err(e) => {
            error!("Failed to fetch channel {channel_id}: {e}");
            None
        }
    }
}
