use crate::config::PrintfulSettings;
use crate::domain::model::MockupPayload;
use crate::domain::ports::{ApiFailure, ApiResult, MockupApi};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed client for the Printful mockup generator.
#[derive(Clone)]
pub struct PrintfulClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for PrintfulClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintfulClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"***")
            .finish()
    }
}

impl PrintfulClient {
    pub fn new(settings: &PrintfulSettings) -> Result<Self> {
        let base_url =
            Url::parse(&settings.base_url).map_err(|e| RelayError::InvalidConfigValueError {
                field: "printful.base_url".to_string(),
                value: settings.base_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            })?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        // 未設定時沿用 reqwest 的預設（不逾時）
        if let Some(timeout) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build().map_err(|e| RelayError::ConfigError {
            message: format!("Failed to build HTTP client: {}", error_chain(&e)),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
        })
    }

    /// 在 base URL 後面加上路徑片段，片段會被正確編碼
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, ApiFailure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiFailure::Local {
                reason: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult {
        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        tracing::debug!("📡 Printful API response status: {}", status);

        let body = response.bytes().await.map_err(classify)?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(ApiFailure::Remote {
                status: status.as_u16(),
                body: body.to_vec(),
            })
        }
    }
}

#[async_trait]
impl MockupApi for PrintfulClient {
    async fn create_task(&self, product_id: &str, payload: &MockupPayload) -> ApiResult {
        let url = self.endpoint(&["mockup-generator", "create-task", product_id])?;
        tracing::debug!("📡 Making API request to: POST {}", url);

        let request = self.authorized(self.client.post(url)).json(payload);
        self.execute(request).await
    }

    async fn get_task(&self, task_key: &str) -> ApiResult {
        let url = self.endpoint(&["mockup-generator", "task"])?;
        tracing::debug!("📡 Making API request to: GET {}", url);

        let request = self
            .authorized(self.client.get(url))
            .query(&[("task_key", task_key)]);
        self.execute(request).await
    }
}

/// 建立請求失敗歸為 Local，其餘（連線、逾時、讀取回應失敗）都是沒有收到回應
fn classify(err: reqwest::Error) -> ApiFailure {
    let reason = error_chain(&err);
    if err.is_builder() {
        ApiFailure::Local { reason }
    } else {
        ApiFailure::NoResponse { reason }
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
