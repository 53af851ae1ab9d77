use serde::{Deserialize, Serialize};

/// 作者類型，由使用者的認證旗標決定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorTier {
    Verified,
    Standard,
}

impl AuthorTier {
    pub fn from_verified(verified: bool) -> Self {
        if verified {
            AuthorTier::Verified
        } else {
            AuthorTier::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorTier::Verified => "verified",
            AuthorTier::Standard => "standard",
        }
    }
}

/// 一則微博貼文。欄位順序即輸出欄位順序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub author_name: String,
    pub author_tier: AuthorTier,
    pub body_text: String,
    pub published_at: String,
    pub repost_count: u64,
    pub comment_count: u64,
    pub like_count: u64,
    pub image_urls: Vec<String>,
}

impl PostRecord {
    /// 表頭標籤，與 JSON 鍵一致
    pub const FIELD_LABELS: [&'static str; 8] = [
        "author_name",
        "author_tier",
        "body_text",
        "published_at",
        "repost_count",
        "comment_count",
        "like_count",
        "image_urls",
    ];

    /// 圖片清單壓平成單一儲存格，一行一個 URL
    pub fn image_cell(&self) -> String {
        self.image_urls.join("\n")
    }
}

/// 分頁迴圈的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Running,
    /// 頁面結構正常但沒有任何貼文
    StoppedEmpty,
    /// 回應缺少 `data.cards`
    StoppedNoData,
    StoppedFetchFailure,
    /// 已達頁數上限
    Done,
}

impl ScrapeState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScrapeState::Running)
    }
}

/// 一次抓取的結果：累積的貼文與終止原因
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub records: Vec<PostRecord>,
    pub state: ScrapeState,
    pub pages_fetched: u32,
}

/// 一個已序列化、待寫入的輸出檔
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub record_count: usize,
    pub files: Vec<RenderedFile>,
}
