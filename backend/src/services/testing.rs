//! In-memory `VideoPlatform` that replays queued responses and records calls.

use crate::error::ApiError;
use crate::models::SearchHit;
use crate::services::youtube_api::{
    ChannelItem, ChannelSnippet, ChannelStatistics, ContentDetails, SearchPage, SearchRequest,
    Thumbnail, Thumbnails, VideoItem, VideoPlatform, VideoSnippet, VideoStatistics,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: &'static str,
    pub key: String,
    /// Query plus page token for searches, the id otherwise.
    pub target: String,
}

type Queue<T> = Mutex<HashMap<String, VecDeque<Result<T, ApiError>>>>;

#[derive(Default)]
pub struct ScriptedPlatform {
    searches: Queue<SearchPage>,
    videos: Queue<Option<VideoItem>>,
    channels: Queue<Option<ChannelItem>>,
    calls: Mutex<Vec<Call>>,
}

fn push<T>(queue: &Queue<T>, id: &str, response: Result<T, ApiError>) {
    queue
        .lock()
        .unwrap()
        .entry(id.to_string())
        .or_default()
        .push_back(response);
}

fn pop<T>(queue: &Queue<T>, id: &str, fallback: T) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .get_mut(id)
        .and_then(VecDeque::pop_front)
        .unwrap_or(Ok(fallback))
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(self, query: &str, response: Result<SearchPage, ApiError>) -> Self {
        push(&self.searches, query, response);
        self
    }

    pub fn on_video(self, video_id: &str, response: Result<Option<VideoItem>, ApiError>) -> Self {
        push(&self.videos, video_id, response);
        self
    }

    pub fn on_channel(
        self,
        channel_id: &str,
        response: Result<Option<ChannelItem>, ApiError>,
    ) -> Self {
        push(&self.channels, channel_id, response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    fn record(&self, endpoint: &'static str, key: &str, target: String) {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            key: key.to_string(),
            target,
        });
    }
}

#[async_trait]
impl VideoPlatform for ScriptedPlatform {
    async fn search(&self, api_key: &str, request: &SearchRequest) -> Result<SearchPage, ApiError> {
        let token = request.page_token.clone().unwrap_or_default();
        self.record("search", api_key, format!("{}#{}", request.query, token));
        pop(&self.searches, &request.query, SearchPage::default())
    }

    async fn video(&self, api_key: &str, video_id: &str) -> Result<Option<VideoItem>, ApiError> {
        self.record("videos", api_key, video_id.to_string());
        pop(&self.videos, video_id, None)
    }

    async fn channel(
        &self,
        api_key: &str,
        channel_id: &str,
    ) -> Result<Option<ChannelItem>, ApiError> {
        self.record("channels", api_key, channel_id.to_string());
        pop(&self.channels, channel_id, None)
    }
}

pub fn page(hits: &[(&str, &str)], next_page_token: Option<&str>) -> Result<SearchPage, ApiError> {
    Ok(SearchPage {
        hits: hits
            .iter()
            .map(|(video_id, channel_id)| SearchHit {
                video_id: video_id.to_string(),
                channel_id: channel_id.to_string(),
            })
            .collect(),
        next_page_token: next_page_token.map(str::to_string),
    })
}

pub fn video(video_id: &str, duration_secs: u32, views: u64) -> Result<Option<VideoItem>, ApiError> {
    Ok(Some(VideoItem {
        id: video_id.to_string(),
        snippet: Some(VideoSnippet {
            title: format!("Video {video_id}"),
            published_at: "2024-03-20T10:00:00Z".to_string(),
            thumbnails: Thumbnails {
                high: Some(Thumbnail {
                    url: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
                }),
                ..Thumbnails::default()
            },
        }),
        statistics: Some(VideoStatistics {
            view_count: Some(views.to_string()),
        }),
        content_details: Some(ContentDetails {
            duration: Some(format!("PT{duration_secs}S")),
        }),
    }))
}

pub fn channel(
    channel_id: &str,
    name: &str,
    subscribers: u64,
) -> Result<Option<ChannelItem>, ApiError> {
    Ok(Some(ChannelItem {
        id: channel_id.to_string(),
        snippet: Some(ChannelSnippet {
            title: name.to_string(),
        }),
        statistics: Some(ChannelStatistics {
            subscriber_count: Some(subscribers.to_string()),
        }),
    }))
}

pub fn quota() -> Result<Option<VideoItem>, ApiError> {
    Err(ApiError::QuotaExceeded)
}
