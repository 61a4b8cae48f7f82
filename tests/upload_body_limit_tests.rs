mod support;

use axum::http::StatusCode;
use support::TestApp;

#[tokio::test]
async fn admin_add_returns_413_for_oversized_upload() {
    let mut app = TestApp::with_config(|cfg| cfg.max_upload_bytes = 64 * 1024).await;
    app.login_admin().await;

    let oversized = vec![b'a'; 256 * 1024];
    let resp = app
        .post_multipart(
            "/admin/add",
            &[("name", "Huge"), ("grade", "7a"), ("type", "lina"), ("sector", "Sector D")],
            Some(("huge.png", oversized.as_slice())),
        )
        .await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.get("/routes").await.body["routes"].as_array().unwrap().is_empty());
    assert!(!app.dir.path().join("uploads").exists());
}
