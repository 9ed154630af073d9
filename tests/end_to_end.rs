//! Full-stack test over a real listener with graceful shutdown.

use call_server::config::ProxyConfig;
use call_server::http::HttpServer;
use call_server::lifecycle::Shutdown;
use call_server::Envelope;
use serde_json::json;
use std::time::Duration;

mod common;
use common::MockUpstream;

#[tokio::test]
async fn test_serves_all_verbs_and_shuts_down() {
    let upstream = MockUpstream::start(200, r#"{"ok":true}"#).await;

    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream.base_url();

    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let proxy_addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let endpoint = format!("http://{}/api/call-server", proxy_addr);

    let res = client.get(&endpoint).send().await.expect("Proxy unreachable");
    assert_eq!(res.status(), 200);
    let envelope: Envelope = res.json().await.unwrap();
    assert_eq!(envelope, Envelope::success("GET request successful", json!({"ok": true})));

    let res = client.post(&endpoint).json(&json!({"a": 1})).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.put(&endpoint).json(&json!({"id": "abc"})).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let envelope: Envelope = res.json().await.unwrap();
    assert_eq!(envelope, Envelope::failure("Invalid ID"));

    let res = client.delete(&endpoint).query(&[("id", "42")]).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let seen: Vec<_> = upstream
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path, r.query))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("GET".to_string(), "/api/data".to_string(), None),
            ("POST".to_string(), "/api/data".to_string(), None),
            ("DELETE".to_string(), "/api/data".to_string(), Some("id=42".to_string())),
        ]
    );

    drop(client);
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
