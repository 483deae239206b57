pub mod app;
pub mod response;
pub mod static_files;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{error, info, warn};

pub use app::App;
pub use static_files::StaticFiles;

use crate::domain::ports::MockupApi;
use crate::utils::error::{ErrorBody, Result};

/// 請求 body 上限，與一般 JSON body parser 的預設值相同
pub const MAX_BODY_BYTES: usize = 100 * 1024;

pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// 綁定監聽埠，埠號 0 代表由系統挑選
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 持續服務直到收到 SIGTERM 或 Ctrl-C
    pub async fn serve<A: MockupApi + 'static>(self, app: App<A>) -> Result<()> {
        self.serve_with_shutdown(app, shutdown_signal()).await
    }

    /// 持續服務直到 `signal` 完成，之後等待進行中的連線結束
    pub async fn serve_with_shutdown<A, F>(self, app: App<A>, signal: F) -> Result<()>
    where
        A: MockupApi + 'static,
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        let app = Arc::new(app);
        let builder = ConnBuilder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();

        info!(addr = %addr, "🚀 Server is running");

        tokio::pin!(signal);

        loop {
            tokio::select! {
                biased;

                () = &mut signal => {
                    info!("Shutdown signal received, draining connections");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let app = Arc::clone(&app);
                    let svc = service_fn(move |req| {
                        let app = Arc::clone(&app);
                        async move { dispatch(app, req).await }
                    });

                    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), svc);
                    let conn = graceful.watch(conn.into_owned());

                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            warn!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }
            }
        }

        graceful.shutdown().await;
        info!("Server stopped");
        Ok(())
    }
}

/// 讀完 body（有上限）後交給 App；錯誤一律轉成回應，不會傳回 hyper
async fn dispatch<A: MockupApi>(
    app: Arc<App<A>>,
    req: hyper::Request<Incoming>,
) -> std::result::Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let mut response = if e.downcast_ref::<LengthLimitError>().is_some() {
                warn!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    limit = MAX_BODY_BYTES,
                    "Request body exceeds limit"
                );
                response::error_body(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    &ErrorBody::new(BODY_TOO_LARGE_MESSAGE),
                )
            } else {
                warn!("Failed to read request body: {e}");
                response::error_body(
                    StatusCode::BAD_REQUEST,
                    &ErrorBody::new("Failed to read request body"),
                )
            };
            response::apply_cors(&mut response);
            return Ok(response);
        }
    };

    Ok(app.handle(http::Request::from_parts(parts, body)).await)
}

/// 第一個 SIGTERM 或 Ctrl-C 到達時完成；無法安裝的 handler 不會觸發
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
}
