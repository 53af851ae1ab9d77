use crate::core::{ConfigProvider, PageSource};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};

pub const DEFAULT_API_ENDPOINT: &str = "https://m.weibo.cn/api/container/getIndex";
pub const DEFAULT_CONTAINER_ID: &str = "100103type=1&q=#南京理工大学#";
pub const DEFAULT_PAGE_TYPE: &str = "searchall";
pub const DEFAULT_REFERER: &str = "https://m.weibo.cn/search?containerid=100103type%3D1%26q%3D%23%E5%8D%97%E4%BA%AC%E7%90%86%E5%B7%A5%E5%A4%A7%E5%AD%A6%23";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_2_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.0.3 Mobile/15E148 Safari/604.1";

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

/// 以固定查詢參數與行動版瀏覽器標頭請求搜尋 API
pub struct HttpPageSource {
    client: Client,
    endpoint: String,
    container_id: String,
    page_type: String,
}

impl HttpPageSource {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("User-Agent", config.user_agent())?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(REFERER, header_value("Referer", config.referer())?);
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );

        for (key, value) in config.extra_headers() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ScrapeError::InvalidConfigValueError {
                    field: "source.headers".to_string(),
                    value: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, header_value(&key, &value)?);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.api_endpoint().to_string(),
            container_id: config.container_id().to_string(),
            page_type: config.page_type().to_string(),
        })
    }

    async fn request(&self, page: u32) -> Result<serde_json::Value> {
        let page_param = page.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("containerid", self.container_id.as_str()),
                ("page_type", self.page_type.as_str()),
                ("page", page_param.as_str()),
            ])
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(ScrapeError::HttpStatusError {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ScrapeError::InvalidConfigValueError {
        field: name.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32) -> Result<serde_json::Value> {
        tracing::debug!("GET {} page={}", self.endpoint, page);
        self.request(page).await
    }
}
