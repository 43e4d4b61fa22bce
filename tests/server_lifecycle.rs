//! End-to-end serving over TCP and graceful shutdown.

use std::time::Duration;

use edge_relay::{HttpServer, RelayConfig, Shutdown};

mod common;

use common::{relay_uri, FakeReply, FakeUpstream};

#[tokio::test]
async fn serves_until_shutdown() {
    let upstream = FakeUpstream::new(|request| {
        FakeReply::Respond(200, format!("fetched {}", request.url.path()))
    });
    let server = HttpServer::with_upstream(RelayConfig::default(), upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{addr}{}", relay_uri("https://example.com/news.rss")))
        .send()
        .await
        .expect("relay unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.text().await.unwrap(), "fetched /news.rss");

    let res = client.get(format!("http://{addr}/api/rss-proxy")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"missing_url"}"#);

    drop(client);
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn default_server_builds_reqwest_client() {
    let server = HttpServer::new(RelayConfig::default()).expect("server builds");
    assert_eq!(server.config().fetch.timeout_ms, 12_000);
}
