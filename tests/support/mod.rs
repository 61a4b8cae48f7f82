//! Router harness: a fresh database, upload dir and audit log per test, plus a tiny cookie store.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use climbwall::config::Config;
use climbwall::router::{ClimbState, climbwall_router};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@climbwall.local";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const BOUNDARY: &str = "climbwall-test-boundary";

pub struct TestApp {
    pub dir: TempDir,
    pub state: ClimbState,
    pub router: Router,
    cookies: BTreeMap<String, String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cfg = Config {
            database_url: Some(format!("sqlite:{}", dir.path().join("app.sqlite").display())),
            upload_dir: dir.path().join("uploads"),
            audit_log_path: dir.path().join("logs.txt"),
            seed_sample_routes: false,
            ..Config::default()
        };
        tweak(&mut cfg);

        let state = ClimbState::from_config(&cfg).await.expect("state");
        let router = climbwall_router(state.clone());
        Self {
            dir,
            state,
            router,
            cookies: BTreeMap::new(),
        }
    }

    pub fn upload_file(&self, url: &str) -> PathBuf {
        self.state
            .routes
            .assets()
            .owned_path(url)
            .expect("url under upload prefix")
    }

    pub fn audit_log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("logs.txt")).unwrap_or_default()
    }

    pub fn forget_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let req = self.request("GET", uri).body(Body::empty()).expect("request");
        self.send(req).await
    }

    pub async fn post_form(&mut self, uri: &str, pairs: &[(&str, &str)]) -> TestResponse {
        let body = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let req = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request");
        self.send(req).await
    }

    pub async fn post_multipart(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> TestResponse {
        let req = self
            .request("POST", uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .expect("request");
        self.send(req).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    pub async fn login_admin(&mut self) {
        let resp = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.location.as_deref(), Some("/admin"));
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.expect("request failed");
        self.absorb_cookies(&resp);

        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            location,
            body,
        }
    }

    fn absorb_cookies(&mut self, resp: &Response<Body>) {
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let expired = raw.to_ascii_lowercase().contains("max-age=0");
            if value.is_empty() || expired {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect()
}
