use anyhow::Result;
use httpmock::prelude::*;
use mockup_relay::config::PrintfulSettings;
use mockup_relay::{App, MockupRelay, MockupTemplate, PrintfulClient, Server, StaticFiles};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct RunningRelay {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<mockup_relay::Result<()>>,
    _static_dir: TempDir,
}

impl RunningRelay {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await??;
        Ok(())
    }
}

/// 啟動一個指向指定上游的 relay，監聽隨機埠
async fn start_relay(upstream_base_url: String) -> Result<RunningRelay> {
    let static_dir = TempDir::new()?;
    std::fs::write(
        static_dir.path().join("index.html"),
        "<html><body>mockup relay</body></html>",
    )?;

    let client = PrintfulClient::new(&PrintfulSettings {
        base_url: upstream_base_url,
        api_key: "relay-test-key".to_string(),
        timeout_seconds: Some(5),
    })?;
    let relay = MockupRelay::new(client, MockupTemplate::default());
    let app = App::new(relay, StaticFiles::new(static_dir.path()))?;

    let server = Server::bind("127.0.0.1:0").await?;
    let addr = server.local_addr()?;
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve_with_shutdown(app, async move {
        let _ = rx.await;
    }));

    Ok(RunningRelay {
        addr,
        shutdown: Some(tx),
        handle,
        _static_dir: static_dir,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_task_end_to_end() -> Result<()> {
    let upstream = MockServer::start();
    let create_mock = upstream.mock(|when, then| {
        when.method(POST)
            .path("/mockup-generator/create-task/71")
            .header("authorization", "Bearer relay-test-key");
        then.status(200)
            .json_body(json!({ "code": 200, "result": { "task_key": "gt-42", "status": "pending" } }));
    });

    let relay = start_relay(upstream.base_url()).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(relay.url("/create-task"))
        .json(&json!({ "imageUrl": "https://x/y.png", "productId": "71" }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let body: Value = response.json().await?;
    assert_eq!(body["result"]["task_key"], "gt-42");
    create_mock.assert();

    relay.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_identical_requests_are_not_deduplicated() -> Result<()> {
    let upstream = MockServer::start();
    let create_mock = upstream.mock(|when, then| {
        when.method(POST).path("/mockup-generator/create-task/71");
        then.status(200).json_body(json!({ "code": 200 }));
    });

    let relay = start_relay(upstream.base_url()).await?;
    let client = reqwest::Client::new();
    let request = json!({ "imageUrl": "https://x/y.png", "productId": 71 });

    for _ in 0..2 {
        let response = client
            .post(relay.url("/create-task"))
            .json(&request)
            .send()
            .await?;
        assert_eq!(response.status(), 200);
    }

    create_mock.assert_hits(2);
    relay.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_validation_errors_never_reach_upstream() -> Result<()> {
    let upstream = MockServer::start();
    let any_mock = upstream.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    let relay = start_relay(upstream.base_url()).await?;
    let client = reqwest::Client::new();

    let cases = [
        (json!({ "productId": "71" }), "Image URL is required"),
        (json!({ "imageUrl": "", "productId": "71" }), "Image URL is required"),
        (json!({}), "Image URL is required"),
        (json!({ "imageUrl": "https://x/y.png" }), "Product ID is required"),
        (json!({ "imageUrl": "https://x/y.png", "productId": "" }), "Product ID is required"),
    ];
    for (request, expected) in cases {
        let response = client
            .post(relay.url("/create-task"))
            .json(&request)
            .send()
            .await?;
        assert_eq!(response.status(), 400, "request {}", request);
        let body: Value = response.json().await?;
        assert_eq!(body, json!({ "error": expected }));
    }

    let response = client.get(relay.url("/api/get-task")).send().await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "Task key is required" }));

    any_mock.assert_hits(0);
    relay.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_error_is_relayed_under_details() -> Result<()> {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET)
            .path("/mockup-generator/task")
            .query_param("task_key", "gt-404");
        then.status(404)
            .json_body(json!({ "code": 404, "result": "Task not found" }));
    });

    let relay = start_relay(upstream.base_url()).await?;
    let response = reqwest::get(relay.url("/api/get-task?task_key=gt-404")).await?;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(
        body,
        json!({
            "error": "Failed to get task status",
            "details": { "code": 404, "result": "Task not found" }
        })
    );

    relay.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_upstream_reports_no_response() -> Result<()> {
    let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let relay = start_relay(format!("http://127.0.0.1:{}", port)).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(relay.url("/create-task"))
        .json(&json!({ "imageUrl": "https://x/y.png", "productId": 71 }))
        .send()
        .await?;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "No response from Printful API" }));
    assert!(body.get("details").is_none());

    relay.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_frontend_fallback_and_unknown_routes() -> Result<()> {
    let upstream = MockServer::start();
    let relay = start_relay(upstream.base_url()).await?;
    let client = reqwest::Client::new();

    let page = client.get(relay.url("/gallery/42")).send().await?;
    assert_eq!(page.status(), 200);
    assert!(page.text().await?.contains("mockup relay"));

    let missing = client.delete(relay.url("/create-task")).send().await?;
    assert_eq!(missing.status(), 404);

    let preflight = client
        .request(reqwest::Method::OPTIONS, relay.url("/create-task"))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await?;
    assert_eq!(preflight.status(), 204);
    assert_eq!(
        preflight.headers()["access-control-allow-headers"],
        "content-type"
    );

    relay.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_oversized_body_is_rejected_before_upstream() -> Result<()> {
    let upstream = MockServer::start();
    let any_mock = upstream.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!({ "code": 200 }));
    });

    let relay = start_relay(upstream.base_url()).await?;
    let client = reqwest::Client::new();

    // 合法 JSON，但大小超過 100 KiB
    let padding = "a".repeat(mockup_relay::server::MAX_BODY_BYTES + 1024);
    let response = client
        .post(relay.url("/create-task"))
        .header("content-type", "application/json")
        .body(json!({ "imageUrl": padding, "productId": 71 }).to_string())
        .send()
        .await?;

    assert_eq!(response.status(), 413);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "Request body too large" }));

    // 上限以內的 body 照常轉送
    let response = reqwest::Client::new()
        .post(relay.url("/create-task"))
        .json(&json!({ "imageUrl": "a".repeat(1024), "productId": 71 }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    any_mock.assert_hits(1);
    relay.stop().await
}
