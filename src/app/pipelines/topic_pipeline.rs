use crate::app::exporters::ExportFormat;
use crate::core::driver::TopicScraper;
use crate::core::fetcher::HttpPageSource;
use crate::core::{ConfigProvider, PageSource, Pipeline, Storage};
use crate::domain::model::{RenderedFile, RenderedOutput, ScrapeReport};
use crate::utils::error::Result;
use std::path::Path;

/// 微博話題管道：分頁抓取 → 序列化 → 寫檔
pub struct TopicPipeline<S: Storage, C: ConfigProvider, P: PageSource = HttpPageSource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: P,
}

impl<S: Storage, C: ConfigProvider> TopicPipeline<S, C, HttpPageSource> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let source = HttpPageSource::from_config(&config)?;
        Ok(Self {
            storage,
            config,
            source,
        })
    }
}

impl<S: Storage, C: ConfigProvider, P: PageSource> TopicPipeline<S, C, P> {
    pub fn with_source(storage: S, config: C, source: P) -> Self {
        Self {
            storage,
            config,
            source,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: PageSource> Pipeline for TopicPipeline<S, C, P> {
    async fn extract(&self) -> Result<ScrapeReport> {
        tracing::info!(
            "🚀 Scraping up to {} pages from: {}",
            self.config.max_pages(),
            self.config.api_endpoint()
        );

        let mut scraper = TopicScraper::new(&self.source, self.config.page_delay());
        let state = scraper.run(self.config.max_pages()).await;
        let report = scraper.into_report();

        tracing::debug!(
            "Scrape stopped in state {:?} after {} requests",
            state,
            report.pages_fetched
        );
        Ok(report)
    }

    async fn transform(&self, report: &ScrapeReport) -> Result<RenderedOutput> {
        let mut files = Vec::new();

        for name in self.config.output_formats() {
            let format: ExportFormat = name.parse()?;
            let bytes = format.render(&report.records)?;
            tracing::debug!("Rendered {} output ({} bytes)", format, bytes.len());

            files.push(RenderedFile {
                filename: self.config.output_filename(format.as_str()),
                bytes,
            });
        }

        Ok(RenderedOutput {
            record_count: report.records.len(),
            files,
        })
    }

    async fn load(&self, output: RenderedOutput) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for file in output.files {
            self.storage.write_file(&file.filename, &file.bytes).await?;

            let full_path = Path::new(self.config.output_path())
                .join(&file.filename)
                .display()
                .to_string();
            tracing::info!("💾 Data saved to {}", full_path);
            written.push(full_path);
        }

        Ok(written)
    }
}
