use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::Instrument;

use crate::core::relay::MockupRelay;
use crate::domain::model::{MockupRequest, TaskStatusQuery};
use crate::domain::ports::MockupApi;
use crate::server::response::{self, HttpResponse};
use crate::server::static_files::StaticFiles;
use crate::utils::error::{RelayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    CreateTask,
    GetTask,
    Frontend,
}

/// relay 端點加上前端靜態檔案
pub struct App<A: MockupApi> {
    relay: MockupRelay<A>,
    static_files: StaticFiles,
    routes: HashMap<Method, MatchitRouter<Route>>,
}

impl<A: MockupApi> App<A> {
    pub fn new(relay: MockupRelay<A>, static_files: StaticFiles) -> Result<Self> {
        let mut app = Self {
            relay,
            static_files,
            routes: HashMap::new(),
        };
        app.add(Method::POST, "/create-task", Route::CreateTask)?;
        app.add(Method::GET, "/api/get-task", Route::GetTask)?;
        app.add(Method::GET, "/", Route::Frontend)?;
        app.add(Method::GET, "/{*path}", Route::Frontend)?;
        Ok(app)
    }

    fn add(&mut self, method: Method, path: &str, route: Route) -> Result<()> {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .map_err(|e| RelayError::ConfigError {
                message: format!("invalid route `{}`: {}", path, e),
            })
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<Route> {
        // HEAD 與 GET 共用路由
        let tree = if *method == Method::HEAD {
            self.routes.get(&Method::GET)
        } else {
            self.routes.get(method)
        }?;
        tree.at(path).ok().map(|matched| *matched.value)
    }

    /// 處理一個已讀完 body 的請求，所有錯誤都轉成回應
    pub async fn handle(&self, request: http::Request<Bytes>) -> HttpResponse {
        let started = Instant::now();
        let span = tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path()
        );

        async move {
            tracing::info!("--> Incoming request");
            tracing::debug!(
                headers = ?request.headers(),
                body = %String::from_utf8_lossy(request.body()),
                "Request details"
            );

            let mut response = self.route(request).await;
            response::apply_cors(&mut response);

            tracing::info!(
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "<-- Response sent"
            );
            response
        }
        .instrument(span)
        .await
    }

    async fn route(&self, request: http::Request<Bytes>) -> HttpResponse {
        if *request.method() == Method::OPTIONS {
            return response::preflight(request.headers());
        }

        match self.lookup(request.method(), request.uri().path()) {
            Some(Route::CreateTask) => self.create_task(request.body()).await,
            Some(Route::GetTask) => self.get_task(request.uri().query()).await,
            Some(Route::Frontend) => self.static_files.serve(request.uri().path()).await,
            None => response::not_found(),
        }
    }

    async fn create_task(&self, body: &[u8]) -> HttpResponse {
        let result = match parse_mockup_request(body) {
            Ok(request) => self.relay.create_task(&request).await,
            Err(e) => Err(e),
        };
        relay_response(result)
    }

    async fn get_task(&self, query: Option<&str>) -> HttpResponse {
        let query = TaskStatusQuery::from_query(query);
        relay_response(self.relay.get_task(&query).await)
    }
}

/// 空的 body 視為 `{}`，交給後續的欄位檢查處理
fn parse_mockup_request(body: &[u8]) -> Result<MockupRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MockupRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Malformed request body: {}", e);
        RelayError::validation(format!("Invalid JSON body: {}", e))
    })
}

fn relay_response(result: Result<Vec<u8>>) -> HttpResponse {
    match result {
        Ok(body) => response::json(StatusCode::OK, body),
        Err(e) => response::error(&e),
    }
}
