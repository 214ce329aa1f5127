use crate::error::ApiError;
use crate::models::SearchHit;
use crate::services::key_pool::KeyPool;
use crate::services::youtube_api::{SearchRequest, VideoPlatform};
use crate::utils::search_window;
use chrono::{DateTime, Utc};
use log::{error, info, warn};

/// Walks the search result pages for one keyword, newest first.
pub struct SearchTraversal {
    request: SearchRequest,
    finished: bool,
    pages: usize,
}

impl SearchTraversal {
    pub fn new(keyword: &str, now: DateTime<Utc>) -> Self {
        let (published_after, published_before) = search_window(now);
        SearchTraversal {
            request: SearchRequest {
                query: keyword.to_string(),
                published_after,
                published_before,
                page_token: None,
            },
            finished: false,
            pages: 0,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetches the next page of hits, or `Ok(None)` once the endpoint stops
    /// handing out page tokens.
    ///
    /// A quota error rotates the key and re-requests the same page. Any other
    /// error ends the traversal.
    pub async fn next_page(
        &mut self,
        api: &dyn VideoPlatform,
        pool: &mut KeyPool,
    ) -> Result<Option<Vec<SearchHit>>, ApiError> {
        if self.finished {
            return Ok(None);
        }

        let mut attempt = pool.attempt();
        let page = loop {
            let Some(key) = attempt.next_key() else {
                self.finished = true;
                return Err(ApiError::KeysExhausted);
            };
            match api.search(&key, &self.request).await {
                Ok(page) => break page,
                Err(ApiError::QuotaExceeded) => {
                    warn!(
                        "Switching API key: quota exceeded while searching '{}'",
                        self.request.query
                    );
                    attempt.quota_exceeded();
                }
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }
        };

        self.pages += 1;
        match page.next_page_token {
            Some(token) => self.request.page_token = Some(token),
            None => self.finished = true,
        }
        Ok(Some(page.hits))
    }
}

/// Hits gathered for one keyword. `aborted` is set when the traversal stopped
/// early; hits from pages fetched before that point are kept.
#[derive(Debug, Default)]
pub struct KeywordHits {
    pub hits: Vec<SearchHit>,
    pub aborted: Option<ApiError>,
}

pub async fn search_keyword(
    api: &dyn VideoPlatform,
    pool: &mut KeyPool,
    keyword: &str,
    now: DateTime<Utc>,
) -> KeywordHits {
    info!("Searching keyword: {keyword}");

    let mut traversal = SearchTraversal::new(keyword, now);
    let mut result = KeywordHits::default();

    loop {
        match traversal.next_page(api, pool).await {
            Ok(Some(batch)) => result.hits.extend(batch),
            Ok(None) => break,
            Err(e) => {
                error!(
                    "Search for '{keyword}' aborted after {} pages: {e}",
                    traversal.pages_fetched()
                );
                result.aborted = Some(e);
                break;
            }
        }
    }

    info!(
        "Keyword '{keyword}': {} hits over {} pages",
        result.hits.len(),
        traversal.pages_fetched()
    );
    result
}
