mod common;

use std::process::Stdio;
use std::time::Duration;

use axum::{Json, Router, routing::{get, post}};
use common::spawn_server;
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

async fn slow_reply(Json(_body): Json<Value>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    Json(json!({"success": true, "response": "REPLY-TEXT"}))
}

fn backend() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "ai_handler": "available"})) }),
        )
        .route("/api/query", post(slow_reply))
}

#[tokio::test]
async fn piped_input_waits_for_replies_before_exiting() {
    let url = spawn_server(backend()).await;

    let mut child = Command::new(env!("CARGO_BIN_EXE_air-quality-console"))
        .env("AIR_QUALITY_BACKEND_URL", &url)
        .env("AIR_QUALITY_SAMPLE_DELAY_MS", "60000")
        .env("AIR_QUALITY_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"hello\n").await.unwrap();
    drop(stdin);

    let output = tokio::time::timeout(Duration::from_secs(30), child.wait_with_output())
        .await
        .expect("console did not exit after stdin closed")
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("you> hello"), "stdout: {stdout}");
    assert!(stdout.contains("assistant> REPLY-TEXT"), "stdout: {stdout}");
    assert!(!stdout.contains("💡"), "hint should not fire before exit: {stdout}");
}
