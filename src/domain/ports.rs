use crate::domain::model::MockupPayload;
use async_trait::async_trait;

/// Why an outbound call did not produce a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// 遠端有回應，但狀態碼不是 2xx
    Remote { status: u16, body: Vec<u8> },
    /// 請求已送出但沒有收到完整回應（連線失敗、逾時）
    NoResponse { reason: String },
    /// 請求本身無法建立或送出
    Local { reason: String },
}

/// Raw response body on success, relayed to the caller untouched.
pub type ApiResult = std::result::Result<Vec<u8>, ApiFailure>;

#[async_trait]
pub trait MockupApi: Send + Sync {
    async fn create_task(&self, product_id: &str, payload: &MockupPayload) -> ApiResult;
    async fn get_task(&self, task_key: &str) -> ApiResult;
}
