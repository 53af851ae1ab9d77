pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::fetcher::{
    DEFAULT_API_ENDPOINT, DEFAULT_CONTAINER_ID, DEFAULT_PAGE_TYPE, DEFAULT_REFERER,
    DEFAULT_USER_AGENT,
};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_MAX_PAGES: u32 = 5;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2000;
pub const DEFAULT_JSON_FILE: &str = "weibo_data.json";
pub const DEFAULT_XLSX_FILE: &str = "weibo_data.xlsx";
pub const DEFAULT_CSV_FILE: &str = "weibo_data.csv";

/// 沒有明確設定檔名時的預設值
pub fn default_filename(format: &str) -> String {
    match format {
        "json" => DEFAULT_JSON_FILE.to_string(),
        "xlsx" => DEFAULT_XLSX_FILE.to_string(),
        "csv" => DEFAULT_CSV_FILE.to_string(),
        other => format!("weibo_data.{}", other),
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "weibo-topic-scraper")]
#[command(about = "Scrape posts of a Weibo topic search into JSON and XLSX files")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = DEFAULT_CONTAINER_ID)]
    pub container_id: String,

    #[arg(long, default_value = DEFAULT_PAGE_TYPE)]
    pub page_type: String,

    #[arg(long, default_value = DEFAULT_REFERER)]
    pub referer: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS, help = "Pause between page requests")]
    pub page_delay_ms: u64,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_values = ["json", "xlsx"])]
    pub formats: Vec<String>,

    #[arg(long, default_value = DEFAULT_JSON_FILE)]
    pub json_file: String,

    #[arg(long, default_value = DEFAULT_XLSX_FILE)]
    pub xlsx_file: String,

    #[arg(long, default_value = DEFAULT_CSV_FILE)]
    pub csv_file: String,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn page_type(&self) -> &str {
        &self.page_type
    }

    fn referer(&self) -> &str {
        &self.referer
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn output_filename(&self, format: &str) -> String {
        match format {
            "json" => self.json_file.clone(),
            "xlsx" => self.xlsx_file.clone(),
            "csv" => self.csv_file.clone(),
            other => default_filename(other),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_non_empty_string("container_id", &self.container_id)?;
        validation::validate_positive_number("max_pages", self.max_pages, 1)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        for format in &self.formats {
            validation::validate_path(&format!("{}_file", format), &self.output_filename(format))?;
        }
        Ok(())
    }
}
