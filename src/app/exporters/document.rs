use crate::domain::model::PostRecord;
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// 以四格縮排輸出 JSON 陣列，非 ASCII 文字原樣保留
pub fn render(records: &[PostRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AuthorTier;

    fn sample() -> Vec<PostRecord> {
        vec![
            PostRecord {
                author_name: "南理工小助手".to_string(),
                author_tier: AuthorTier::Verified,
                body_text: "#南京理工大学# 春天来了".to_string(),
                published_at: "03-07".to_string(),
                repost_count: 5,
                comment_count: 12,
                like_count: 230,
                image_urls: vec![
                    "https://wx1.sinaimg.cn/orj360/a.jpg".to_string(),
                    "https://wx2.sinaimg.cn/orj360/b.jpg".to_string(),
                ],
            },
            PostRecord {
                author_name: "路人".to_string(),
                author_tier: AuthorTier::Standard,
                body_text: "hello".to_string(),
                published_at: "刚刚".to_string(),
                repost_count: 0,
                comment_count: 0,
                like_count: 0,
                image_urls: vec![],
            },
        ]
    }

    #[test]
    fn test_render_reads_back_identically() {
        let records = sample();

        let bytes = render(&records).unwrap();
        let decoded: Vec<PostRecord> = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded, records);
    }

    #[test]
    fn test_render_keeps_non_ascii_and_indents() {
        let bytes = render(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("南理工小助手"));
        assert!(!text.contains("\\u"));
        assert!(text.contains("\n    {\n        \"author_name\""));
        assert!(text.contains("\"author_tier\": \"verified\""));
    }

    #[test]
    fn test_image_urls_stay_an_array() {
        let bytes = render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value[0]["image_urls"].as_array().unwrap().len(), 2);
        assert_eq!(value[1]["image_urls"], serde_json::json!([]));
    }
}
