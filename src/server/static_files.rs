use std::path::{Path, PathBuf};

use bytes::Bytes;
use http::StatusCode;
use percent_encoding::percent_decode_str;

use crate::server::response::{self, HttpResponse};

pub const INDEX_FILE: &str = "index.html";

/// 前端靜態檔案；找不到對應檔案時一律回傳 `index.html`
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn serve(&self, request_path: &str) -> HttpResponse {
        if let Some(path) = self.resolve(request_path).await {
            match file_response(&path).await {
                Ok(response) => return response,
                Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        let index = self.root.join(INDEX_FILE);
        match file_response(&index).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Frontend entry document {} unavailable: {}", index.display(), e);
                response::not_found()
            }
        }
    }

    /// 將 URL 路徑對應到 root 底下的檔案；含 `..` 的路徑一律不對應
    async fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_str(request_path).decode_utf8().ok()?;

        let mut path = self.root.clone();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains('\\') || s.contains('\0') => return None,
                s => path.push(s),
            }
        }

        let metadata = tokio::fs::metadata(&path).await.ok()?;
        if metadata.is_file() {
            return Some(path);
        }
        if metadata.is_dir() {
            let index = path.join(INDEX_FILE);
            let index_metadata = tokio::fs::metadata(&index).await.ok()?;
            return index_metadata.is_file().then_some(index);
        }
        None
    }
}

async fn file_response(path: &Path) -> std::io::Result<HttpResponse> {
    let contents = tokio::fs::read(path).await?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(response::with_body(
        StatusCode::OK,
        mime.as_ref(),
        Bytes::from(contents),
    ))
}
