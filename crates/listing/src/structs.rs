use beeld_core::Post;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sorting {
    Hot,
    #[default]
    Top,
    New,
    Rising,
    Best,
}

impl Sorting {
    /// クエリ文字列の値を解釈する。空や未知の値は None
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "top" => Some(Self::Top),
            "new" => Some(Self::New),
            "rising" => Some(Self::Rising),
            "best" => Some(Self::Best),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Top => "top",
            Self::New => "new",
            Self::Rising => "rising",
            Self::Best => "best",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Hour,
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl Period {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

/// リスティング取得リクエスト
///
/// `sub_reddit` と `username` のどちらかが必須。両方ある場合は `sub_reddit` を使う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    pub sorting: Sorting,
    pub limit: Option<u32>,
    pub username: Option<String>,
    pub sub_reddit: Option<String>,
    pub t: Period,
    pub after: Option<String>,
}

impl ListingRequest {
    pub fn subreddit(name: impl Into<String>) -> Self {
        Self {
            sub_reddit: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self {
            username: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingError {
    /// subreddit も username も指定されていない
    InvalidRequest,
    /// 上流が 2xx 以外を返した (本文はそのまま保持)
    Upstream {
        status: u16,
        body: serde_json::Value,
    },
    /// 通信失敗やレスポンスの解釈失敗
    Transport { message: String, cause: String },
}

impl ListingError {
    /// 画面に出すためのメッセージ
    pub fn message(&self) -> String {
        match self {
            Self::InvalidRequest => "need a username or subreddit".to_string(),
            Self::Upstream { status, body } => body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Upstream returned status {}", status)),
            Self::Transport { message, .. } => message.clone(),
        }
    }
}

impl std::fmt::Display for ListingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { message, cause } => write!(f, "{}: {}", message, cause),
            other => f.write_str(&other.message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingResponse {
    Success {
        posts: Vec<Post>,
        after: Option<String>,
        has_more: bool,
    },
    Failure {
        error: ListingError,
    },
}

impl ListingResponse {
    pub fn failure(error: ListingError) -> Self {
        Self::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// `/api/reddit` が返す JSON 本体
#[derive(Debug, Serialize, Deserialize)]
pub struct ListingBody {
    pub posts: Vec<Post>,
    pub after: Option<String>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
    pub error: Option<String>,
}
