use crate::error::ApiError;
use crate::models::SearchHit;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// One page request against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub published_after: String,
    pub published_before: String,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub next_page_token: Option<String>,
}

/// The three YouTube Data API calls the ranking needs.
///
/// Implementations classify failures into [`ApiError`] before returning, so
/// callers never look at status codes or error bodies themselves.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    async fn search(&self, api_key: &str, request: &SearchRequest) -> Result<SearchPage, ApiError>;

    /// `Ok(None)` when the id does not resolve to a video.
    async fn video(&self, api_key: &str, video_id: &str) -> Result<Option<VideoItem>, ApiError>;

    /// `Ok(None)` when the id does not resolve to a channel.
    async fn channel(&self, api_key: &str, channel_id: &str)
        -> Result<Option<ChannelItem>, ApiError>;
}

// YouTube API response structures
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    pub fn best_url(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub snippet: Option<ChannelSnippet>,
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Maps a failed response onto the closed set of outcomes.
pub fn classify_error(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let quota_reason = parsed
        .as_ref()
        .map(|e| e.error.errors.iter().any(|d| d.reason == "quotaExceeded"))
        .unwrap_or(false);

    match status {
        403 if quota_reason => ApiError::QuotaExceeded,
        404 => ApiError::NotFound,
        _ => ApiError::Other {
            status,
            message: parsed
                .map(|e| e.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| body.trim().to_string()),
        },
    }
}

/// `VideoPlatform` backed by the public YouTube Data API v3.
pub struct YouTubeClient {
    http: Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str) -> Self {
        YouTubeClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint URL with `params` followed by the `key` parameter.
    fn request_url(
        &self,
        endpoint: &str,
        api_key: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, ApiError> {
        // Documentation: https://developers.google.com/youtube/v3/docs
        let url = Url::parse_with_params(
            &format!("{}/{}", self.base_url, endpoint),
            params.iter().copied().chain([("key", api_key)]),
        )?;
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        api_key: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.request_url(endpoint, api_key, params)?;
        debug!("GET {}/{} {:?}", self.base_url, endpoint, params);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";
const CHANNEL_PARTS: &str = "snippet,statistics";

/// Query parameters for one search page, newest uploads first.
/// `pageToken` is only sent for pages after the first.
fn search_params<'a>(
    request: &'a SearchRequest,
    page_size: &'a str,
) -> Vec<(&'static str, &'a str)> {
    let mut params = vec![
        ("part", "id,snippet"),
        ("q", request.query.as_str()),
        ("type", "video"),
        ("order", "date"),
        ("maxResults", page_size),
        ("publishedAfter", request.published_after.as_str()),
        ("publishedBefore", request.published_before.as_str()),
    ];
    if let Some(token) = &request.page_token {
        params.push(("pageToken", token.as_str()));
    }
    params
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search(&self, api_key: &str, request: &SearchRequest) -> Result<SearchPage, ApiError> {
        let page_size = crate::config::SEARCH_PAGE_SIZE.to_string();
        let params = search_params(request, &page_size);

        let response: SearchListResponse = self.get("search", api_key, &params).await?;
        let hits = response
            .items
            .into_iter()
            .filter_map(|item| {
                Some(SearchHit {
                    video_id: item.id.video_id?,
                    channel_id: item.snippet?.channel_id?,
                })
            })
            .collect();

        Ok(SearchPage {
            hits,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video(&self, api_key: &str, video_id: &str) -> Result<Option<VideoItem>, ApiError> {
        let params = [("part", VIDEO_PARTS), ("id", video_id)];
        let response: ListResponse<VideoItem> = self.get("videos", api_key, &params).await?;
        Ok(response.items.into_iter().next())
    }

    async fn channel(
        &self,
        api_key: &str,
        channel_id: &str,
    ) -> Result<Option<ChannelItem>, ApiError> {
        let params = [("part", CHANNEL_PARTS), ("id", channel_id)];
        let response: ListResponse<ChannelItem> = self.get("channels", api_key, &params).await?;
        Ok(response.items.into_iter().next())
    }
}
