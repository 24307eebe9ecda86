//! メモリ上のレスポンスキャッシュ
//!
//! - キー       : 組み立て済みの上流リクエスト URL
//! - 値         : `CacheEntry` (レスポンス, 作成時刻, TTL)
//! - 失効判定   : get 時に `created_at + ttl` を過ぎていれば削除して None (遅延削除)
//! - 容量超過   : set 時に期限切れを掃除し、それでも満杯なら最も古いエントリを捨てる
//!
//! get / set はそれぞれ 1 回のロックの中で完結する。
//! 同じキーへの同時ミスは両方が上流を叩き、後から書いた方が残る。

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// デフォルトの TTL (60 秒)
pub const DEFAULT_TTL_MS: i64 = 60_000;

/// デフォルトの最大エントリ数
pub const DEFAULT_CAPACITY: usize = 500;

// ---------------------------------------------------------------------------
// 時刻の注入
// ---------------------------------------------------------------------------

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ---------------------------------------------------------------------------
// ResponseCache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub response: V,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > self.ttl
    }
}

pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // 中身は単純な HashMap なので、panic で汚染されていてもそのまま使う
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 有効なエントリがあれば複製して返す。期限切れならその場で削除する
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                tracing::debug!("[cache] Expired entry evicted: {}", key);
                None
            }
            Some(entry) => Some(entry.response.clone()),
            None => None,
        }
    }

    pub fn set(&self, key: &str, response: V) {
        let now = self.clock.now();
        let mut entries = self.lock();

        if !entries.contains_key(key) && entries.len() >= self.capacity {
            entries.retain(|_, e| !e.is_expired(now));

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.created_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                response,
                created_at: now,
                ttl: self.ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_TTL_MS), DEFAULT_CAPACITY)
    }
}

/// テスト用の手動で進める時計
#[cfg(test)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Arc<Self> {
        use chrono::TimeZone;
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 2, 21, 12, 0, 0).unwrap()),
        })
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
