pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use app::exporters::ExportFormat;
pub use app::pipelines::topic_pipeline::TopicPipeline;
pub use core::{
    driver::TopicScraper,
    etl::{EtlEngine, RunSummary},
    fetcher::HttpPageSource,
    parser::parse_page,
};
pub use domain::model::{AuthorTier, PostRecord, ScrapeReport, ScrapeState};
pub use utils::error::{Result, ScrapeError};
