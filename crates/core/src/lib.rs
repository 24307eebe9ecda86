pub mod media;
pub mod normalize;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub use normalize::normalize;

/// `null` を型のデフォルト値として受ける
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 上流 API から返ってくる投稿の生データ
///
/// どのフィールドも欠けている (あるいは `null` の) 可能性があるので、すべて `default` で受ける。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub selftext: Option<String>,
    pub post_hint: Option<String>,
    pub is_gallery: Option<bool>,
    pub preview: Option<Preview>,
    pub secure_media_embed: Option<RawMediaEmbed>,
    pub media_metadata: Option<HashMap<String, MediaMetadata>>,
    pub gallery_data: Option<GalleryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMediaEmbed {
    pub media_domain_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<PreviewImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ImageSource,
}

/// 幅・高さが欠けていれば 0 になる
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSource {
    pub width: u32,
    pub height: u32,
}

impl ImageSource {
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// ギャラリー画像ごとのメタデータ (`media_metadata` の値)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    pub status: Option<String>,
    /// エンコード種別 (例: "Image", "AnimatedImage")
    pub e: Option<String>,
    /// MIME タイプ
    pub m: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub p: Vec<MediaSource>,
    pub s: Option<MediaSource>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSource {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub u: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub media_id: String,
    #[serde(default)]
    pub id: u64,
}

/// 正規化済みの投稿
///
/// 共通フィールドは `base` に、種別ごとのフィールドは `kind` に入る。
/// JSON では両方がフラットに展開され、`type` が判別子になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(flatten)]
    pub kind: PostKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostBase {
    pub author: String,
    pub domain: String,
    pub id: String,
    pub name: String,
    pub permalink: String,
    pub subreddit: String,
    pub thumbnail: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEmbed {
    pub media_domain_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostKind {
    Embed {
        post_hint: String,
        secure_media_embed: MediaEmbed,
    },
    Image {
        post_hint: String,
        preview: Preview,
    },
    Gallery {
        is_gallery: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        preview: Option<Preview>,
        #[serde(skip_serializing_if = "Option::is_none")]
        media_metadata: Option<HashMap<String, MediaMetadata>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        gallery_data: Option<GalleryData>,
    },
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        selftext: Option<String>,
    },
    Link,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embed { .. } => "embed",
            Self::Image { .. } => "image",
            Self::Gallery { .. } => "gallery",
            Self::Text { .. } => "text",
            Self::Link => "link",
        }
    }
}

impl Post {
    pub fn thumbnail(&self) -> &str {
        &self.base.thumbnail
    }

    pub fn is_gallery(&self) -> bool {
        matches!(self.kind, PostKind::Gallery { .. })
    }
}
