use crate::domain::model::{RenderedOutput, ScrapeReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn container_id(&self) -> &str;
    fn page_type(&self) -> &str;
    fn referer(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn extra_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
    fn request_timeout(&self) -> Option<Duration> {
        None
    }
    fn max_pages(&self) -> u32;
    fn page_delay(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// 指定格式的輸出檔名
    fn output_filename(&self, format: &str) -> String;
}

/// 一頁搜尋結果的來源
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ScrapeReport>;
    async fn transform(&self, report: &ScrapeReport) -> Result<RenderedOutput>;
    async fn load(&self, output: RenderedOutput) -> Result<Vec<String>>;
}
