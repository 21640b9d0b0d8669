//! Shared test harness: a router over a throwaway upload folder

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use csvscope_web::store::FileStore;
use csvscope_web::{build_router, build_router_with_limit, AppState};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "----csvscope-test-boundary";

pub struct TestApp {
    pub store: FileStore,
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        Self {
            router: build_router(AppState::new(store.clone())),
            store,
            _dir: dir,
        }
    }

    pub fn with_limit(max_upload_bytes: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        Self {
            router: build_router_with_limit(AppState::new(store.clone()), max_upload_bytes),
            store,
            _dir: dir,
        }
    }

    /// Router over a folder that does not exist, so every listing fails
    pub fn with_missing_folder() -> Self {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("gone"));
        Self {
            router: build_router(AppState::new(store.clone())),
            store,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn upload(&self, filename: &str, content: &str) -> (StatusCode, String) {
        self.post_multipart(multipart_file("file", filename, content.as_bytes()))
            .await
    }

    pub async fn post_multipart(&self, body: Vec<u8>) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn analyse(&self, selected_file: Option<&str>) -> (StatusCode, String) {
        let body = match selected_file {
            Some(name) => format!("selected_file={}", form_encode(name)),
            None => String::new(),
        };
        let request = Request::builder()
            .method("POST")
            .uri("/analyse")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

/// One-part multipart body with a file field
pub fn multipart_file(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n",
        b = BOUNDARY,
        field = field,
        filename = filename
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// One-part multipart body with a plain text field
pub fn multipart_text(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        value = value
    )
    .into_bytes()
}

/// Percent-encode everything except unreserved characters
pub fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// The statistics table of an analyse page
pub fn summary_section(html: &str) -> &str {
    let start = html
        .find("table-bordered")
        .expect("statistics table missing");
    let end = html[start..].find("</table>").unwrap() + start;
    &html[start..end]
}

/// The preview table of an analyse page
pub fn preview_section(html: &str) -> &str {
    let start = html.find("table-striped").expect("preview table missing");
    let end = html[start..].find("</table>").unwrap() + start;
    &html[start..end]
}
