use crate::core::Pipeline;
use crate::domain::model::ScrapeState;
use crate::utils::error::Result;

/// 一次執行的摘要
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub record_count: usize,
    pub pages_fetched: u32,
    pub final_state: ScrapeState,
    pub written_files: Vec<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 抓取後只有在累積到資料時才寫檔；任何終止狀態都以已累積的資料為最終結果
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting topic scrape...");

        let report = self.pipeline.extract().await?;

        if report.records.is_empty() {
            tracing::warn!(
                "⚠️ No data retrieved ({} requests, stopped in {:?}); nothing written",
                report.pages_fetched,
                report.state
            );
            return Ok(RunSummary {
                record_count: 0,
                pages_fetched: report.pages_fetched,
                final_state: report.state,
                written_files: Vec::new(),
            });
        }

        let rendered = self.pipeline.transform(&report).await?;
        let written_files = self.pipeline.load(rendered).await?;

        tracing::info!("📊 Scraped {} posts in total", report.records.len());

        Ok(RunSummary {
            record_count: report.records.len(),
            pages_fetched: report.pages_fetched,
            final_state: report.state,
            written_files,
        })
    }
}
