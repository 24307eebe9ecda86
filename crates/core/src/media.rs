//! 投稿の表示用 URL を決める
//!
//! Reddit の CDN は CORS ヘッダーを返さないことがあるため、
//! 該当するホストの URL は自前の画像プロキシ (`/api/image`) 経由に書き換える。

use crate::{ImageSource, Post, PostKind};
use url::Url;

pub const PROXY_PATH: &str = "/api/image";

const PROXIED_PREFIXES: &[&str] = &["https://i.redd.it/", "https://preview.redd.it/"];
const THUMBNAIL_HOST_MARKER: &str = ".thumbs.redditmedia.com";

/// URL ではない特殊なサムネイル値
const SPECIAL_THUMBNAILS: &[&str] = &["nsfw", "spoiler", "self", "default", "image"];

/// ギャラリー投稿の先頭画像の URL を返す
///
/// 取得できない場合はサムネイルにフォールバックする。
/// `s.u` に残っている HTML エンティティの名残 (`amp;`) は取り除く。
pub fn gallery_image_url(post: &Post) -> String {
    let PostKind::Gallery {
        media_metadata,
        gallery_data,
        ..
    } = &post.kind
    else {
        return post.thumbnail().to_string();
    };

    let (Some(metadata), Some(first)) = (
        media_metadata.as_ref(),
        gallery_data.as_ref().and_then(|g| g.items.first()),
    ) else {
        return post.thumbnail().to_string();
    };

    metadata
        .get(&first.media_id)
        .and_then(|m| m.s.as_ref())
        .and_then(|s| s.u.as_deref())
        .map(|u| u.replace("amp;", ""))
        .unwrap_or_else(|| post.thumbnail().to_string())
}

pub fn needs_proxy(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    PROXIED_PREFIXES.iter().any(|p| url.starts_with(p)) || url.contains(THUMBNAIL_HOST_MARKER)
}

/// プロキシ対象なら `/api/image?url=...` に書き換える
pub fn proxied_image_url(url: &str) -> String {
    if !needs_proxy(url) {
        return url.to_string();
    }

    match Url::parse(url) {
        Ok(_) => format!("{}?url={}", PROXY_PATH, urlencoding::encode(url)),
        Err(e) => {
            tracing::warn!("Invalid URL for proxy: {} ({})", url, e);
            url.to_string()
        }
    }
}

/// 画面に表示する URL を返す (表示できないものは空文字)
pub fn display_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if SPECIAL_THUMBNAILS.contains(&url) {
        tracing::debug!("Special thumbnail value skipped: {}", url);
        return String::new();
    }

    if let Err(e) = Url::parse(url) {
        tracing::warn!("display_url called with invalid URL format: {} ({})", url, e);
        return String::new();
    }

    proxied_image_url(url)
}

/// 投稿種別ごとに最適な画像 URL を選び、表示用に解決する
pub fn post_display_url(post: &Post) -> String {
    match &post.kind {
        PostKind::Gallery { .. } => display_url(&gallery_image_url(post)),
        PostKind::Image { .. } => display_url(&post.base.url),
        _ => display_url(post.thumbnail()),
    }
}

pub fn has_media_content(post: &Post) -> bool {
    matches!(
        post.kind,
        PostKind::Embed { .. } | PostKind::Image { .. } | PostKind::Gallery { .. }
    )
}

pub fn image_dimensions(post: &Post) -> Option<ImageSource> {
    match &post.kind {
        PostKind::Image { preview, .. } => preview
            .images
            .first()
            .map(|i| i.source)
            .filter(ImageSource::has_dimensions),
        _ => None,
    }
}

pub fn author_url(post: &Post) -> String {
    format!("/u/{}", post.base.author)
}

pub fn post_url(post: &Post) -> String {
    format!("https://old.reddit.com{}", post.base.permalink)
}
