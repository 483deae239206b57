use crate::utils::error::{RelayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> RelayError {
    RelayError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 上游 API 位址：必須是帶主機名稱的 http(s) URL，後面才能接路徑片段
pub fn validate_api_base_url(field_name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| invalid(field_name, value, format!("Not an absolute URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            value,
            format!("Upstream API must be reached over http or https, got {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field_name, value, "Upstream API URL has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            value,
            "Upstream API URL must not carry a query or fragment",
        ));
    }
    Ok(())
}

/// 前端目錄只檢查字串本身，目錄不存在時由靜態檔案服務回 404
pub fn validate_static_dir(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Frontend directory is not set"));
    }
    if value.contains('\0') {
        return Err(invalid(
            field_name,
            value.escape_default(),
            "Frontend directory contains a NUL byte",
        ));
    }
    Ok(())
}

pub fn validate_timeout_seconds(field_name: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(invalid(
            field_name,
            seconds,
            "Timeout must be at least one second; leave it unset for no timeout",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// 請求欄位檢查：缺少或空字串都視為未提供
pub fn validate_required_field<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RelayError::validation(message)),
    }
}
