use crate::domain::ports::ApiFailure;
use crate::utils::error::RelayError;

/// The two relayed operations. Each has its own remote-error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOperation {
    CreateTask,
    GetTask,
}

impl RelayOperation {
    pub fn name(&self) -> &'static str {
        match self {
            RelayOperation::CreateTask => "create_task",
            RelayOperation::GetTask => "get_task",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            RelayOperation::CreateTask => "Failed to create mockup task",
            RelayOperation::GetTask => "Failed to get task status",
        }
    }
}

/// 將外部 API 的失敗轉成統一的 `RelayError`，並留下診斷紀錄
pub fn normalize(operation: RelayOperation, failure: ApiFailure) -> RelayError {
    match failure {
        ApiFailure::Remote { status, body } => {
            let details = parse_details(&body);
            tracing::error!(
                operation = operation.name(),
                status,
                "❌ Printful API error: {}",
                details
            );
            RelayError::RemoteError {
                message: operation.failure_message().to_string(),
                status,
                details,
            }
        }
        ApiFailure::NoResponse { reason } => {
            tracing::error!(
                operation = operation.name(),
                "❌ No response from Printful API: {}",
                reason
            );
            RelayError::NoResponse { reason }
        }
        ApiFailure::Local { reason } => {
            tracing::error!(operation = operation.name(), "❌ Error: {}", reason);
            RelayError::LocalFailure { details: reason }
        }
    }
}

/// 遠端回應能解析成 JSON 就原樣保留，否則以文字保留
fn parse_details(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(body).into_owned()))
}
