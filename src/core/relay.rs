use crate::core::normalizer::{normalize, RelayOperation};
use crate::core::payload::MockupTemplate;
use crate::domain::model::{MockupRequest, TaskStatusQuery};
use crate::domain::ports::MockupApi;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::validate_required_field;

pub const IMAGE_URL_REQUIRED: &str = "Image URL is required";
pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";
pub const TASK_KEY_REQUIRED: &str = "Task key is required";

/// 檢查請求並轉送到 mockup API；沒有可變狀態，所有連線共用一個實例
pub struct MockupRelay<A: MockupApi> {
    api: A,
    template: MockupTemplate,
}

impl<A: MockupApi> MockupRelay<A> {
    pub fn new(api: A, template: MockupTemplate) -> Self {
        Self { api, template }
    }

    /// 建立 mockup 任務，成功時回傳外部 API 的原始回應
    pub async fn create_task(&self, request: &MockupRequest) -> Result<Vec<u8>> {
        let image_url = validate_required_field(request.image_url.as_deref(), IMAGE_URL_REQUIRED)
            .inspect_err(|_| tracing::warn!("Image URL is missing in the request body"))?;

        let product_id = request
            .product_id
            .as_ref()
            .and_then(|id| id.as_identifier())
            .ok_or_else(|| {
                tracing::warn!("Product ID is missing in the request body");
                RelayError::validation(PRODUCT_ID_REQUIRED)
            })?;

        let payload = self.template.build_payload(image_url);
        tracing::debug!(
            product_id = %product_id,
            "📤 Payload to Printful: {}",
            serde_json::to_string(&payload)?
        );

        let body = self
            .api
            .create_task(&product_id, &payload)
            .await
            .map_err(|failure| normalize(RelayOperation::CreateTask, failure))?;

        tracing::debug!(
            "📥 Printful API response: {}",
            String::from_utf8_lossy(&body)
        );
        Ok(body)
    }

    /// 查詢任務狀態
    pub async fn get_task(&self, query: &TaskStatusQuery) -> Result<Vec<u8>> {
        let task_key = validate_required_field(query.task_key.as_deref(), TASK_KEY_REQUIRED)
            .inspect_err(|_| tracing::warn!("Task key is missing in the request query"))?;

        tracing::info!("🔎 Fetching task status for task_key: {}", task_key);

        let body = self
            .api
            .get_task(task_key)
            .await
            .map_err(|failure| normalize(RelayOperation::GetTask, failure))?;

        tracing::debug!(
            "📥 Printful API task status response: {}",
            String::from_utf8_lossy(&body)
        );
        Ok(body)
    }
}
