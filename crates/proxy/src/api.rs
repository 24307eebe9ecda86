use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "beeld-reddit-client/1.0";

/// プロキシ先から受け取ったメディア
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait::async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedMedia>;
}

pub struct HttpMediaFetcher {
    client: Client,
    user_agent: String,
}

impl HttpMediaFetcher {
    pub fn new(client: Client, user_agent: &str) -> Self {
        Self {
            client,
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedMedia> {
        let res = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .context("Media request failed")?;

        let status = res.status();
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // エラー時は本文を読まない
        let body = if status.is_success() {
            res.bytes()
                .await
                .context("Failed to read media body")?
                .to_vec()
        } else {
            Vec::new()
        };

        Ok(FetchedMedia {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}
