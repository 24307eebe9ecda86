use history::VisitedSubs;
use listing::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_MS};
use listing::{ListingCache, ListingClient, Period, Sorting};
use media_proxy::api::MediaFetcher;
use media_proxy::{HttpMediaFetcher, DEFAULT_USER_AGENT};
use serde::Deserialize;
use std::sync::Arc;

/// `/api/reddit` や各ページが受け付けるクエリ
///
/// `sorting` / `t` / `limit` は文字列のまま受け、空や解釈できない値はデフォルトに落とす。
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(rename = "subReddit")]
    pub sub_reddit: Option<String>,
    pub username: Option<String>,
    pub sorting: Option<String>,
    pub limit: Option<String>,
    pub t: Option<String>,
    pub after: Option<String>,
}

impl ListingQuery {
    pub fn into_request(self, default_sorting: Sorting) -> listing::ListingRequest {
        listing::ListingRequest {
            sorting: self
                .sorting
                .as_deref()
                .and_then(Sorting::from_param)
                .unwrap_or(default_sorting),
            limit: self
                .limit
                .as_deref()
                .and_then(|l| l.trim().parse::<u32>().ok())
                .filter(|l| *l > 0),
            username: self.username,
            sub_reddit: self.sub_reddit,
            t: self
                .t
                .as_deref()
                .and_then(Period::from_param)
                .unwrap_or_default(),
            after: self.after,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// 設定
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub reddit_base_url: String,
    pub listing_cache_ttl_ms: i64,
    pub listing_cache_capacity: usize,
    /// None なら履歴を永続化しない
    pub history_db_url: Option<String>,
    pub proxy_user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            reddit_base_url: listing::logic::DEFAULT_BASE_URL.to_string(),
            listing_cache_ttl_ms: DEFAULT_TTL_MS,
            listing_cache_capacity: DEFAULT_CAPACITY,
            history_db_url: Some("sqlite:data/history.db".to_string()),
            proxy_user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// 環境変数から読み込む。未設定や解釈できない値はデフォルトのまま
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let reddit_base_url = lookup("REDDIT_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.reddit_base_url);
        let listing_cache_ttl_ms = lookup("LISTING_CACHE_TTL_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.listing_cache_ttl_ms);
        let listing_cache_capacity = lookup("LISTING_CACHE_CAPACITY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.listing_cache_capacity);
        // 空文字を明示した場合は永続化を無効にする
        let history_db_url = match lookup("HISTORY_DB_URL") {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url),
            None => defaults.history_db_url,
        };
        let proxy_user_agent = lookup("PROXY_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.proxy_user_agent);

        Self {
            port,
            reddit_base_url,
            listing_cache_ttl_ms,
            listing_cache_capacity,
            history_db_url,
            proxy_user_agent,
        }
    }
}

// ---------------------------------------------------------------------------
// 状態
// ---------------------------------------------------------------------------

pub type SharedState = AppState;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub listing: Arc<ListingClient>,
    pub media_fetcher: Arc<dyn MediaFetcher>,
    pub history: Arc<VisitedSubs>,
}

impl AppState {
    /// キャッシュとクライアントを設定どおりに組み立てる
    pub fn new(config: AppConfig, http_client: reqwest::Client, history: VisitedSubs) -> Self {
        let cache = Arc::new(ListingCache::new(
            chrono::Duration::milliseconds(config.listing_cache_ttl_ms),
            config.listing_cache_capacity,
        ));
        let listing =
            ListingClient::reddit(http_client.clone(), cache, &config.reddit_base_url);
        let media_fetcher = HttpMediaFetcher::new(http_client, &config.proxy_user_agent);

        Self {
            config,
            listing: Arc::new(listing),
            media_fetcher: Arc::new(media_fetcher),
            history: Arc::new(history),
        }
    }

    /// 画像取得だけを差し替える (テスト用)
    pub fn with_media_fetcher(mut self, fetcher: Arc<dyn MediaFetcher>) -> Self {
        self.media_fetcher = fetcher;
        self
    }
}
