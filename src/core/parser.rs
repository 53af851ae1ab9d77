//! 微博搜尋結果頁的解析。
//!
//! `data.cards` 中只處理 `card_type == 9` 的貼文卡片，其餘（廣告、橫幅等）直接略過。
//! 欄位缺漏一律落回預設值，集中在 [`decode_post`] 處理。

use crate::domain::model::{AuthorTier, PostRecord};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::LazyLock;

/// 貼文卡片的 `card_type`
pub const POST_CARD_TYPE: i64 = 9;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<]+?>").expect("tag pattern is a valid regex"));

#[derive(Debug, Default, Deserialize)]
struct RawUser {
    #[serde(default, deserialize_with = "lenient")]
    screen_name: String,
    #[serde(default, deserialize_with = "lenient")]
    verified: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawPic {
    #[serde(default, deserialize_with = "lenient")]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    user: RawUser,
    #[serde(default, deserialize_with = "lenient")]
    text: String,
    #[serde(default, deserialize_with = "lenient")]
    created_at: String,
    #[serde(default, deserialize_with = "lenient_count")]
    reposts_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    comments_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    attitudes_count: u64,
    #[serde(default, deserialize_with = "lenient_pics")]
    pics: Vec<RawPic>,
}

/// `null` 或型別不符的欄位落回預設值，不讓整則貼文解碼失敗
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// 逐張圖片解碼；壞掉的項目保留為空字串佔位
fn lenient_pics<'de, D>(deserializer: D) -> std::result::Result<Vec<RawPic>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Value> = lenient(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| RawPic::deserialize(item).unwrap_or_default())
        .collect())
}

/// 計數欄位可能是整數、數字字串或 "100万+" 之類的顯示文字，後者記為 0
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// 移除 `<...>` 標籤，不做其他正規化（HTML 實體保持原樣）
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// 把一個 `mblog` 物件解碼成貼文。無法解碼時回傳 `None`。
pub fn decode_post(mblog: &Value) -> Option<PostRecord> {
    let raw: RawPost = match RawPost::deserialize(mblog) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("Skipping undecodable post payload: {}", e);
            return None;
        }
    };

    let user = raw.user;
    let image_urls = raw.pics.into_iter().map(|pic| pic.url).collect();

    Some(PostRecord {
        author_name: user.screen_name,
        author_tier: AuthorTier::from_verified(user.verified),
        body_text: strip_tags(&raw.text),
        published_at: raw.created_at,
        repost_count: raw.reposts_count,
        comment_count: raw.comments_count,
        like_count: raw.attitudes_count,
        image_urls,
    })
}

fn is_post_card(card: &Value) -> bool {
    card.get("card_type").and_then(Value::as_i64) == Some(POST_CARD_TYPE)
}

/// 空物件、`null` 與缺漏都視為沒有貼文內容
fn post_payload(card: &Value) -> Option<&Value> {
    card.get("mblog")
        .filter(|mblog| mblog.as_object().is_some_and(|map| !map.is_empty()))
}

/// 解析一頁。缺少 `data.cards` 時回傳 `None`，與「有卡片但沒有貼文」區分。
pub fn decode_page(doc: &Value) -> Option<Vec<PostRecord>> {
    let cards = doc.get("data")?.get("cards")?.as_array()?;

    let records = cards
        .iter()
        .filter(|card| is_post_card(card))
        .filter_map(post_payload)
        .filter_map(decode_post)
        .collect();

    Some(records)
}

/// 解析一頁；任何結構問題都只會得到空清單
pub fn parse_page(doc: Option<&Value>) -> Vec<PostRecord> {
    doc.and_then(decode_page).unwrap_or_default()
}
