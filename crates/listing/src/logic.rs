use crate::api::ListingEnvelope;
use crate::structs::ListingRequest;
use anyhow::{Context, Result};
use beeld_core::Post;
use url::form_urlencoded;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// 上流リスティングの URL を組み立てる
///
/// subreddit も username もなければ None。
/// 例: `https://www.reddit.com/r/pics/top.json?limit=30&t=week&after=t3_abc`
pub fn build_listing_url(base_url: &str, r: &ListingRequest) -> Option<String> {
    let list_type = if let Some(sub) = non_empty(&r.sub_reddit) {
        format!("r/{}", sub)
    } else if let Some(user) = non_empty(&r.username) {
        format!("user/{}/submitted", user)
    } else {
        return None;
    };

    let mut params = form_urlencoded::Serializer::new(String::new());
    params.append_pair("limit", &r.limit().to_string());
    params.append_pair("t", r.t.as_str());
    if let Some(after) = non_empty(&r.after) {
        params.append_pair("after", after);
    }

    Some(format!(
        "{}/{}/{}.json?{}",
        base_url.trim_end_matches('/'),
        list_type,
        r.sorting.as_str(),
        params.finish()
    ))
}

/// 成功レスポンスの本文を投稿リストと次ページカーソルに変換する
pub fn parse_listing(body: &str) -> Result<(Vec<Post>, Option<String>)> {
    let envelope: ListingEnvelope =
        serde_json::from_str(body).context("Failed to parse listing response")?;

    let posts = envelope
        .data
        .children
        .into_iter()
        .enumerate()
        .filter_map(|(index, child)| match child.into_raw_post() {
            Ok(raw) => Some(beeld_core::normalize(raw)),
            // 1 件の不正な子要素でページ全体を失敗させない
            Err(e) => {
                tracing::warn!("Skipping malformed listing child #{}: {}", index, e);
                None
            }
        })
        .collect();
    let after = envelope.data.after.filter(|a| !a.is_empty());

    Ok((posts, after))
}
