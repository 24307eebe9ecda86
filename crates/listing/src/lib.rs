pub mod api;
pub mod cache;
pub mod logic;
pub mod structs;

use crate::api::{ListingFetcher, RedditFetcher};
use crate::cache::ResponseCache;
use std::sync::Arc;

pub use structs::{ListingBody, ListingError, ListingRequest, ListingResponse, Period, Sorting};

pub type ListingCache = ResponseCache<ListingResponse>;

/// リスティング取得クライアント
///
/// 失敗はすべて `ListingResponse::Failure` として返し、呼び出し元に panic やエラーを伝播しない。
pub struct ListingClient<F = RedditFetcher> {
    fetcher: F,
    cache: Arc<ListingCache>,
    base_url: String,
}

impl ListingClient<RedditFetcher> {
    pub fn reddit(client: reqwest::Client, cache: Arc<ListingCache>, base_url: &str) -> Self {
        Self::new(RedditFetcher::new(client), cache, base_url)
    }
}

impl<F: ListingFetcher> ListingClient<F> {
    pub fn new(fetcher: F, cache: Arc<ListingCache>, base_url: &str) -> Self {
        Self {
            fetcher,
            cache,
            base_url: base_url.to_string(),
        }
    }

    pub async fn get_listing(&self, r: &ListingRequest) -> ListingResponse {
        let Some(url) = logic::build_listing_url(&self.base_url, r) else {
            tracing::warn!("Listing request without subreddit or username");
            return ListingResponse::failure(ListingError::InvalidRequest);
        };

        if let Some(cached) = self.cache.get(&url) {
            tracing::debug!("[cache] Listing hit for {}", url);
            return cached;
        }
        tracing::debug!("[cache] Listing miss for {}", url);

        let response = self.make_request(&url).await;
        if response.is_success() {
            self.cache.set(&url, response.clone());
        }
        response
    }

    async fn make_request(&self, url: &str) -> ListingResponse {
        tracing::info!("Fetching: {}", url);

        let res = match self.fetcher.fetch(url).await {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("Listing fetch failed: {:#}", e);
                return transport_failure(e);
            }
        };

        if !res.is_success() {
            tracing::warn!("Upstream returned {} for {}", res.status, url);
            let body = serde_json::from_str(&res.body)
                .unwrap_or_else(|_| serde_json::Value::String(res.body.clone()));
            return ListingResponse::failure(ListingError::Upstream {
                status: res.status,
                body,
            });
        }

        match logic::parse_listing(&res.body) {
            Ok((posts, after)) => ListingResponse::Success {
                has_more: after.is_some(),
                posts,
                after,
            },
            Err(e) => {
                tracing::error!("Listing parse failed: {:#}", e);
                transport_failure(e)
            }
        }
    }
}

fn transport_failure(cause: anyhow::Error) -> ListingResponse {
    ListingResponse::failure(ListingError::Transport {
        message: "Failed to fetch listing".to_string(),
        cause: format!("{:#}", cause),
    })
}
