pub mod storage;

use anyhow::{Context, Result};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

pub use storage::{KeyValueStorage, MemoryStorage, NoopStorage, SqliteStorage};

pub const STORAGE_KEY: &str = "beeld.reddit.visitedSubs";
pub const MAX_ITEMS: usize = 8;

static SUB_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitedSub {
    pub sub: String,
    /// 訪問時刻 (UNIX ミリ秒)
    #[serde(rename = "visitedAt")]
    pub visited_at: i64,
}

/// subreddit 名を正規化する
///
/// 前後の空白、先頭の `/r/` (大文字小文字を区別しない)、前後のスラッシュを取り除く。
pub fn normalize_sub(value: &str) -> String {
    let regex = SUB_PREFIX_REGEX.get_or_init(|| Regex::new(r"(?i)^/r/").unwrap());
    let trimmed = value.trim();
    let without_prefix = regex.replace(trimmed, "");
    without_prefix
        .trim_start_matches('/')
        .trim_end_matches('/')
        .to_string()
}

/// 保存済みの JSON から履歴を復元する
///
/// 形が不正なエントリだけを捨て、全体の読み込みは失敗させない。
pub fn parse_stored(raw: &str) -> Vec<VisitedSub> {
    let Ok(serde_json::Value::Array(entries)) = serde_json::from_str::<serde_json::Value>(raw)
    else {
        tracing::warn!("Stored history is not a JSON array, starting empty");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let sub = entry.get("sub")?.as_str()?;
            let visited_at = entry.get("visitedAt")?;
            let visited_at = visited_at
                .as_i64()
                .or_else(|| visited_at.as_f64().map(|f| f as i64))?;
            Some(VisitedSub {
                sub: normalize_sub(sub),
                visited_at,
            })
        })
        .filter(|item| !item.sub.is_empty())
        .take(MAX_ITEMS)
        .collect()
}

fn same_sub(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// 最近訪れた subreddit の履歴 (新しい順, 最大 `MAX_ITEMS` 件)
pub struct VisitedSubs {
    storage: Arc<dyn KeyValueStorage>,
    items: RwLock<Vec<VisitedSub>>,
}

impl VisitedSubs {
    /// ストレージから履歴を読み込む。読み込めなければ空で始める
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let items = match storage.get(STORAGE_KEY).await {
            Ok(Some(raw)) => parse_stored(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read visited subs: {:#}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} visited subs", items.len());

        Self {
            storage,
            items: RwLock::new(items),
        }
    }

    pub async fn list(&self) -> Vec<VisitedSub> {
        self.items.read().await.clone()
    }

    pub async fn add(&self, raw_sub: &str) -> Result<()> {
        self.add_at(raw_sub, Utc::now().timestamp_millis()).await
    }

    /// 指定した訪問時刻で履歴の先頭に追加する (同名の既存エントリは置き換える)
    pub async fn add_at(&self, raw_sub: &str, visited_at: i64) -> Result<()> {
        let sub = normalize_sub(raw_sub);
        if sub.is_empty() {
            return Ok(());
        }

        // 保存に成功したときだけメモリ上の履歴を差し替える
        let mut items = self.items.write().await;
        let mut next: Vec<VisitedSub> = items
            .iter()
            .filter(|item| !same_sub(&item.sub, &sub))
            .cloned()
            .collect();
        next.insert(0, VisitedSub { sub, visited_at });
        next.truncate(MAX_ITEMS);

        self.persist(&next).await?;
        *items = next;
        Ok(())
    }

    pub async fn remove(&self, raw_sub: &str) -> Result<()> {
        let sub = normalize_sub(raw_sub);
        if sub.is_empty() {
            return Ok(());
        }

        let mut items = self.items.write().await;
        let next: Vec<VisitedSub> = items
            .iter()
            .filter(|item| !same_sub(&item.sub, &sub))
            .cloned()
            .collect();

        self.persist(&next).await?;
        *items = next;
        Ok(())
    }

    async fn persist(&self, items: &[VisitedSub]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage
            .set(STORAGE_KEY, &json)
            .await
            .context("Failed to persist visited subs")
    }
}
