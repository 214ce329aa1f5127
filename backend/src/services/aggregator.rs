use crate::config::{LONG_FORM_RATIO, MIN_DURATION_SECS};
use crate::models::{ChannelAggregate, ChannelRecord, SearchHit, VideoRecord};
use crate::services::details::{fetch_channel, fetch_video};
use crate::services::key_pool::KeyPool;
use crate::services::youtube_api::VideoPlatform;
use indexmap::IndexMap;
use log::{info, warn};

/// Channel id -> video ids in traversal order, channels in order of first sighting.
pub type ChannelVideos = IndexMap<String, Vec<String>>;

/// Files search hits under their channel. Repeated video ids are kept.
pub fn group_by_channel(videos: &mut ChannelVideos, hits: impl IntoIterator<Item = SearchHit>) {
    for hit in hits {
        videos.entry(hit.channel_id).or_default().push(hit.video_id);
    }
}

/// Applies the long-form filter and rolls the channel's valid videos up.
///
/// `valid` must be in fetch order; its first element becomes the representative.
pub fn summarize_channel(
    genre: &str,
    channel: ChannelRecord,
    valid: Vec<VideoRecord>,
) -> Option<ChannelAggregate> {
    let long_form = valid
        .iter()
        .filter(|v| v.duration_secs >= MIN_DURATION_SECS)
        .count();

    // fetch_video already drops videos under the minimum, so with its current
    // filter this never rejects a channel.
    if (long_form as f64) < valid.len() as f64 * LONG_FORM_RATIO {
        warn!(
            "Excluding channel {}: long-form ratio {long_form}/{} below {LONG_FORM_RATIO}",
            channel.channel_id,
            valid.len()
        );
        return None;
    }

    let representative = valid.first()?.clone();
    let rolling_view_total = valid.iter().map(|v| v.view_count).sum();

    Some(ChannelAggregate {
        genre: genre.to_string(),
        tier: channel.tier(),
        channel,
        rolling_view_total,
        representative,
        valid_video_count: valid.len(),
        long_form_video_count: long_form,
    })
}

pub async fn aggregate_channel(
    api: &dyn VideoPlatform,
    pool: &mut KeyPool,
    genre: &str,
    channel_id: &str,
    video_ids: &[String],
) -> Option<ChannelAggregate> {
    info!(
        "Channel {channel_id}: {} candidate videos",
        video_ids.len()
    );

    let channel = fetch_channel(api, pool, channel_id).await?;

    let mut valid = Vec::with_capacity(video_ids.len());
    for video_id in video_ids {
        if let Some(record) = fetch_video(api, pool, video_id).await {
            valid.push(record);
        }
    }
    info!(
        "Channel {channel_id}: valid {} / {} (skipped {})",
        valid.len(),
        video_ids.len(),
        video_ids.len() - valid.len()
    );

    if valid.is_empty() {
        warn!("Dropping channel {channel_id}: no valid videos");
        return None;
    }
    summarize_channel(genre, channel, valid)
}
