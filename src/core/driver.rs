use crate::core::parser::decode_page;
use crate::core::PageSource;
use crate::domain::model::{PostRecord, ScrapeReport, ScrapeState};
use std::time::Duration;

/// 分頁迴圈：從第 1 頁開始抓取，直到空頁、無資料、抓取失敗或達到頁數上限。
///
/// 累積的貼文只由這個結構持有，依抓取順序排列。
pub struct TopicScraper<'a, P: PageSource + ?Sized> {
    source: &'a P,
    page_delay: Duration,
    records: Vec<PostRecord>,
    pages_fetched: u32,
    state: ScrapeState,
}

impl<'a, P: PageSource + ?Sized> TopicScraper<'a, P> {
    pub fn new(source: &'a P, page_delay: Duration) -> Self {
        Self {
            source,
            page_delay,
            records: Vec::new(),
            pages_fetched: 0,
            state: ScrapeState::Running,
        }
    }

    pub fn records(&self) -> &[PostRecord] {
        &self.records
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub async fn run(&mut self, max_pages: u32) -> ScrapeState {
        let mut page = 1;

        while !self.state.is_terminal() {
            if page > max_pages {
                self.state = ScrapeState::Done;
                break;
            }

            if page > 1 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            self.state = self.scrape_page(page).await;
            page += 1;
        }

        self.state
    }

    async fn scrape_page(&mut self, page: u32) -> ScrapeState {
        tracing::info!("📄 Fetching page {}...", page);
        self.pages_fetched += 1;

        let doc = match self.source.fetch_page(page).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("❌ Failed to fetch page {}: {}", page, e);
                return ScrapeState::StoppedFetchFailure;
            }
        };

        match decode_page(&doc) {
            None => {
                tracing::info!("📭 Page {} has no card data", page);
                ScrapeState::StoppedNoData
            }
            Some(posts) if posts.is_empty() => {
                tracing::info!("📭 Page {} has no posts", page);
                ScrapeState::StoppedEmpty
            }
            Some(posts) => {
                tracing::info!("✅ Page {} scraped, got {} posts", page, posts.len());
                self.records.extend(posts);
                ScrapeState::Running
            }
        }
    }

    pub fn into_report(self) -> ScrapeReport {
        ScrapeReport {
            records: self.records,
            state: self.state,
            pages_fetched: self.pages_fetched,
        }
    }
}
