pub mod driver;
pub mod etl;
pub mod fetcher;
pub mod parser;

pub use crate::domain::model::{PostRecord, ScrapeReport, ScrapeState};
pub use crate::domain::ports::{ConfigProvider, PageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
