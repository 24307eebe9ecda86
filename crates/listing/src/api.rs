use anyhow::{Context, Result};
use beeld_core::RawPost;
use reqwest::Client;
use serde::Deserialize;

/// 上流リスティングのレスポンス (`data.children[].data`, `data.after`)
#[derive(Debug, Deserialize)]
pub struct ListingEnvelope {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

/// 子要素ごとに後から解釈できるよう、本体は生の JSON のまま受ける
#[derive(Debug, Deserialize)]
pub struct Thing {
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Thing {
    pub fn into_raw_post(self) -> serde_json::Result<RawPost> {
        serde_json::from_value(self.data)
    }
}

/// 上流から受け取った生のレスポンス
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: String,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse>;
}

pub struct RedditFetcher {
    client: Client,
}

impl RedditFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ListingFetcher for RedditFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("Listing request failed")?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .context("Failed to read listing response body")?;

        Ok(FetchedResponse { status, body })
    }
}
