#![cfg(feature = "server")]

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{config_for, sse_body};
use gtm_relay::config::RelayConfig;
use gtm_relay::models::ProviderKey;
use gtm_relay::server::{serve, ServeHandle};

async fn start(config: Arc<RelayConfig>) -> (ServeHandle, String) {
    let handle = serve(config, "127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/chat", handle.local_addr());
    (handle, url)
}

fn chat_body(provider: &str, model: &str) -> Value {
    json!({
        "provider": provider,
        "model": model,
        "messages": [
            {"role": "system", "content": "You are a GTM strategist."},
            {"role": "user", "content": "hi"}
        ]
    })
}

#[tokio::test]
async fn streams_upstream_bytes_unchanged() {
    let upstream = MockServer::start().await;
    let sse = sse_body(&["A", "B"]);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test-qwen"))
        .and(body_partial_json(json!({
            "model": "qwen-turbo",
            "stream": true,
            "max_tokens": 4000,
            "temperature": 0.7,
            "messages": [
                {"role": "system", "content": "You are a GTM strategist."},
                {"role": "user", "content": "hi"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse.clone(), "text/event-stream"))
        .expect(1)
        .mount(&upstream)
        .await;

    let (handle, url) = start(config_for(&upstream.uri())).await;
    let resp = reqwest::Client::new()
        .post(&url)
        .json(&chat_body("QWEN", "qwen-turbo"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/event-stream");
    assert_eq!(resp.headers()["cache-control"], "no-cache");
    assert_eq!(resp.text().await.unwrap(), sse);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn caller_overrides_reach_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"max_tokens": 64, "temperature": 0.1})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body(&[]), "text/event-stream"))
        .expect(1)
        .mount(&upstream)
        .await;

    let (handle, url) = start(config_for(&upstream.uri())).await;
    let mut body = chat_body("deepseek", "deepseek-chat");
    body["maxTokens"] = json!(64);
    body["temperature"] = json!(0.1);
    let resp = reqwest::Client::new().post(&url).json(&body).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn non_post_is_405_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let (handle, url) = start(config_for(&upstream.uri())).await;
    let resp = reqwest::Client::new().get(&url).send().await.unwrap();

    assert_eq!(resp.status(), 405);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method not allowed"}));
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_provider_is_400() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let (handle, url) = start(config_for(&upstream.uri())).await;
    let resp = reqwest::Client::new()
        .post(&url)
        .json(&chat_body("OPENAI", "gpt-4o"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid provider", "message": "OPENAI"}));
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn missing_key_is_400_naming_provider() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let config = RelayConfig::new()
        .with_api_key(ProviderKey::Qwen, "sk-only-qwen")
        .with_base_url(ProviderKey::Glm, upstream.uri());
    let (handle, url) = start(Arc::new(config)).await;
    let resp = reqwest::Client::new()
        .post(&url)
        .json(&chat_body("GLM", "glm-4"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "API key for GLM not configured"}));
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn upstream_error_passes_status_and_raw_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&upstream)
        .await;

    let (handle, url) = start(config_for(&upstream.uri())).await;
    let resp = reqwest::Client::new()
        .post(&url)
        .json(&chat_body("MOONSHOT", "moonshot-v1-128k"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "AI API error: 500", "details": "upstream exploded"})
    );
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_400() {
    let upstream = MockServer::start().await;
    let (handle, url) = start(config_for(&upstream.uri())).await;

    let resp = reqwest::Client::new()
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request");

    let resp = reqwest::Client::new()
        .post(&url)
        .json(&json!({
            "provider": "QWEN",
            "model": "qwen-turbo",
            "messages": [{"role": "tool", "content": "x"}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn health_reports_ok() {
    let (handle, _) = start(Arc::new(RelayConfig::new())).await;
    let url = format!("http://{}/api/health", handle.local_addr());

    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn preflight_is_answered_with_cors_headers() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let (handle, url) = start(config_for(&upstream.uri())).await;
    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, &url)
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let methods = resp.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"), "allowed methods: {methods}");
    let headers = resp.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(headers.contains("content-type"), "allowed headers: {headers}");
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn cross_origin_responses_carry_allow_origin() {
    let (handle, _) = start(Arc::new(RelayConfig::new())).await;
    let url = format!("http://{}/api/health", handle.local_addr());

    let resp = reqwest::Client::new()
        .get(&url)
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn internal_fault_is_500_and_server_keeps_serving() {
    // Nothing listens on this port once the listener is dropped.
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_base = format!("http://{}", closed.local_addr().unwrap());
    drop(closed);

    let (handle, url) = start(config_for(&dead_base)).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .post(&url)
            .json(&chat_body("QWEN", "qwen-turbo"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Internal server error");
        let message = body["message"].as_str().unwrap_or_default();
        assert!(message.starts_with("Network error"), "message: {message}");
    }

    let health = format!("http://{}/api/health", handle.local_addr());
    assert_eq!(client.get(&health).send().await.unwrap().status(), 200);
    handle.shutdown().await.unwrap();
}

/// Upstream that streams one SSE event, then holds the connection open and
/// reports when the peer closes it.
async fn hanging_upstream() -> (String, tokio::sync::oneshot::Receiver<()>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        let body_start = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "relay closed before sending a request");
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&request[..body_start]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while request.len() < body_start + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "relay closed mid-request");
            request.extend_from_slice(&buf[..n]);
        }

        let event = "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\n";
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n{:x}\r\n{event}\r\n",
            event.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();

        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = closed_tx.send(());
    });

    (base, closed_rx)
}

#[tokio::test]
async fn client_disconnect_releases_upstream() {
    let (base, upstream_closed) = hanging_upstream().await;
    let (handle, url) = start(config_for(&base)).await;

    let mut resp = reqwest::Client::new()
        .post(&url)
        .json(&chat_body("QWEN", "qwen-turbo"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let first = resp.chunk().await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&first).contains("\"A\""));

    drop(resp);

    tokio::time::timeout(std::time::Duration::from_secs(5), upstream_closed)
        .await
        .expect("upstream connection was not released")
        .unwrap();

    let health = format!("http://{}/api/health", handle.local_addr());
    assert_eq!(reqwest::get(&health).await.unwrap().status(), 200);
    handle.shutdown().await.unwrap();
}
