use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP request returned status {status}")]
    HttpStatusError { status: u16 },

    #[error("Workbook archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，用於日誌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Output,
    Configuration,
    Data,
}

impl ScrapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::ApiError(_) | ScrapeError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            ScrapeError::ZipError(_) | ScrapeError::CsvError(_) | ScrapeError::IoError(_) => {
                ErrorCategory::Output
            }
            ScrapeError::ConfigError { .. }
            | ScrapeError::ConfigValidationError { .. }
            | ScrapeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScrapeError::SerializationError(_) | ScrapeError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("無法取得微博資料: {}", self),
            ErrorCategory::Output => format!("無法寫入輸出檔案: {}", self),
            ErrorCategory::Configuration => format!("配置錯誤: {}", self),
            ErrorCategory::Data => format!("資料處理失敗: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
