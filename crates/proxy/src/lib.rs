//! Reddit CDN の画像・動画を中継するプロキシ
//!
//! 許可リストにあるホスト以外へのリクエストは、外部に出す前に拒否する
//! (任意の URL を中継するオープンリレーにしないため)。

pub mod api;

use crate::api::MediaFetcher;
use url::Url;

pub use api::{FetchedMedia, HttpMediaFetcher, DEFAULT_USER_AGENT};

pub const CACHE_CONTROL: &str = "public, max-age=86400, stale-while-revalidate=604800";

const ALLOWED_HOSTS: &[&str] = &["i.redd.it", "preview.redd.it"];
const TRUSTED_CDN_MARKER: &str = "redditmedia.com";

#[derive(Debug)]
pub enum ProxyError {
    MissingUrl,
    InvalidUrl(String),
    DisallowedHost(String),
    /// 上流が 2xx 以外を返した
    Upstream { status: u16, status_text: String },
    UnsupportedContentType(Option<String>),
    EmptyBody,
    Fetch(anyhow::Error),
}

impl ProxyError {
    /// HTTP ステータスコード
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingUrl
            | Self::InvalidUrl(_)
            | Self::DisallowedHost(_)
            | Self::UnsupportedContentType(_) => 400,
            Self::Upstream { status, .. } => *status,
            Self::EmptyBody => 404,
            Self::Fetch(_) => 500,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingUrl => "Missing image URL parameter".to_string(),
            Self::InvalidUrl(_) | Self::DisallowedHost(_) => {
                "Invalid image URL - only Reddit CDN URLs are allowed".to_string()
            }
            Self::Upstream { status_text, .. } => {
                format!("Failed to fetch image: {}", status_text)
            }
            Self::UnsupportedContentType(_) => {
                "URL does not point to a valid image or video".to_string()
            }
            Self::EmptyBody => "Image not found or empty".to_string(),
            Self::Fetch(_) => "Failed to proxy image request".to_string(),
        }
    }
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "{}: {:#}", self.message(), e),
            other => f.write_str(&other.message()),
        }
    }
}

/// 中継に成功したメディア
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedMedia {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// 許可リストに載っている URL か
pub fn is_allowed(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };

    (url.scheme() == "https" && ALLOWED_HOSTS.contains(&host)) || host.contains(TRUSTED_CDN_MARKER)
}

fn is_media_content_type(content_type: &str) -> bool {
    let lower = content_type.trim().to_ascii_lowercase();
    lower.starts_with("image/") || lower.starts_with("video/")
}

/// 許可リストを確認してから URL を解析する
pub fn validate_url(raw: Option<&str>) -> Result<Url, ProxyError> {
    let raw = raw
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ProxyError::MissingUrl)?;

    let url = Url::parse(raw).map_err(|_| ProxyError::InvalidUrl(raw.to_string()))?;
    if !is_allowed(&url) {
        tracing::warn!("Rejected proxy request for disallowed URL: {}", raw);
        return Err(ProxyError::DisallowedHost(raw.to_string()));
    }

    Ok(url)
}

pub async fn proxy_media<F: MediaFetcher + ?Sized>(
    fetcher: &F,
    raw_url: Option<&str>,
) -> Result<ProxiedMedia, ProxyError> {
    let url = validate_url(raw_url)?;

    let media = fetcher.fetch(&url).await.map_err(|e| {
        tracing::error!("Error fetching image: {:#}", e);
        ProxyError::Fetch(e)
    })?;

    if !(200..300).contains(&media.status) {
        tracing::error!(
            "Failed to fetch image: {} {}",
            media.status,
            media.status_text
        );
        return Err(ProxyError::Upstream {
            status: media.status,
            status_text: media.status_text,
        });
    }

    let content_type = match media.content_type {
        Some(ct) if is_media_content_type(&ct) => ct,
        other => {
            tracing::error!("Invalid content type: {:?}", other);
            return Err(ProxyError::UnsupportedContentType(other));
        }
    };

    if media.body.is_empty() {
        tracing::error!("Empty response from image URL: {}", url);
        return Err(ProxyError::EmptyBody);
    }

    Ok(ProxiedMedia {
        content_type,
        body: media.body,
    })
}
