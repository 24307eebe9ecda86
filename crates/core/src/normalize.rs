//! 上流の投稿データを `Post` に正規化する
//!
//! 判定は `RULES` の並び順どおりに行い、最初に `Some` を返したルールが勝つ。
//! どのルールにも当てはまらなければ Link として扱う。

use crate::{MediaEmbed, Post, PostBase, PostKind, RawPost};

type Rule = fn(&RawPost) -> Option<PostKind>;

/// 判定ルール (優先度順)
pub const RULES: &[(&str, Rule)] = &[
    ("embed", embed_rule),
    ("image", image_rule),
    ("gallery", gallery_rule),
    ("text", text_rule),
];

pub fn normalize(raw: RawPost) -> Post {
    let kind = RULES
        .iter()
        .find_map(|(_, rule)| rule(&raw))
        .unwrap_or(PostKind::Link);

    Post {
        base: PostBase {
            author: raw.author,
            domain: raw.domain,
            id: raw.id,
            name: raw.name,
            permalink: raw.permalink,
            subreddit: raw.subreddit,
            thumbnail: raw.thumbnail,
            title: raw.title,
            url: raw.url,
        },
        kind,
    }
}

fn embed_rule(raw: &RawPost) -> Option<PostKind> {
    if raw.post_hint.as_deref() != Some("rich:video") {
        return None;
    }
    let media_domain_url = raw
        .secure_media_embed
        .as_ref()
        .and_then(|e| e.media_domain_url.as_deref())
        .filter(|u| !u.is_empty())?;

    Some(PostKind::Embed {
        post_hint: "rich:video".to_string(),
        secure_media_embed: MediaEmbed {
            media_domain_url: media_domain_url.to_string(),
        },
    })
}

fn image_rule(raw: &RawPost) -> Option<PostKind> {
    if raw.post_hint.as_deref() != Some("image") {
        return None;
    }
    // 先頭画像に寸法がなければ画像投稿とはみなさない
    let preview = raw
        .preview
        .as_ref()
        .filter(|p| p.images.first().is_some_and(|i| i.source.has_dimensions()))?;

    Some(PostKind::Image {
        post_hint: "image".to_string(),
        preview: preview.clone(),
    })
}

fn gallery_rule(raw: &RawPost) -> Option<PostKind> {
    if raw.is_gallery != Some(true) {
        return None;
    }

    tracing::debug!(
        id = %raw.id,
        has_media_metadata = raw.media_metadata.is_some(),
        has_gallery_data = raw.gallery_data.is_some(),
        gallery_items_count = raw.gallery_data.as_ref().map_or(0, |g| g.items.len()),
        media_metadata_keys = ?raw.media_metadata.as_ref().map(|m| m.keys().collect::<Vec<_>>()),
        "Gallery post detected"
    );

    Some(PostKind::Gallery {
        is_gallery: true,
        preview: raw.preview.clone(),
        media_metadata: raw.media_metadata.clone(),
        gallery_data: raw.gallery_data.clone(),
    })
}

fn text_rule(raw: &RawPost) -> Option<PostKind> {
    let is_self_domain = raw.domain == format!("self.{}", raw.subreddit);
    let is_comments_url = raw
        .url
        .contains(&format!("/r/{}/comments/", raw.subreddit));

    if !is_self_domain && !is_comments_url {
        return None;
    }

    Some(PostKind::Text {
        selftext: raw.selftext.clone(),
    })
}
