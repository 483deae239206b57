pub mod normalizer;
pub mod payload;
pub mod relay;

pub use crate::domain::model::{MockupPayload, MockupRequest, TaskStatusQuery};
pub use crate::domain::ports::{ApiFailure, ApiResult, MockupApi};
pub use crate::utils::error::Result;
