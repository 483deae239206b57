use bytes::Bytes;
use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, CONTENT_LENGTH, CONTENT_TYPE,
    VARY,
};
use http::StatusCode;
use http_body_util::Full;

use crate::utils::error::{ErrorBody, RelayError};

pub type HttpResponse = http::Response<Full<Bytes>>;

const JSON: &str = "application/json";
const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub fn with_body(status: StatusCode, content_type: &str, body: Bytes) -> HttpResponse {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    response
}

pub fn json(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, JSON, body.into())
}

pub fn error_body(status: StatusCode, body: &ErrorBody) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => json(status, bytes),
        Err(e) => {
            tracing::error!("Failed to serialize error body: {}", e);
            with_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain; charset=utf-8",
                Bytes::from_static(b"Internal Server Error"),
            )
        }
    }
}

pub fn error(err: &RelayError) -> HttpResponse {
    error_body(err.status_code(), &err.to_body())
}

pub fn not_found() -> HttpResponse {
    error_body(StatusCode::NOT_FOUND, &ErrorBody::new("Not Found"))
}

/// 允許任何來源讀取回應
pub fn apply_cors(response: &mut HttpResponse) {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

/// `OPTIONS` 預檢：允許常用方法，並回傳請求要求的標頭
pub fn preflight(request_headers: &HeaderMap) -> HttpResponse {
    let mut response = http::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;

    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    if let Some(requested) = request_headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        headers.insert(VARY, HeaderValue::from_static("Access-Control-Request-Headers"));
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = error(&RelayError::validation("Image URL is required"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error":"Image URL is required"}"#);
    }

    #[test]
    fn test_preflight_echoes_requested_headers() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        );

        let mut response = preflight(&request_headers);
        apply_cors(&mut response);

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
    }
}
