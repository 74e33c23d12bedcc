//! HttpConfigSource against a local warp server.

use greenthumb_remote_config::{ConfigSource, FetchError, HttpConfigSource};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;
use warp::http::StatusCode;
use warp::Filter;

/// Spawn `routes` on an ephemeral port; must be called inside a runtime
fn serve<F, R>(routes: F) -> SocketAddr
where
    F: Filter<Extract = (R,), Error = warp::Rejection> + Clone + Send + Sync + 'static,
    R: warp::Reply,
{
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn fetches_entries_from_document() {
    let route = warp::path("config").map(|| {
        warp::reply::json(&serde_json::json!({
            "entries": { "plant_description": "pro", "banner": "spring" }
        }))
    });
    let addr = serve(route);

    let source =
        HttpConfigSource::new(&format!("http://{addr}/config"), Duration::from_secs(5)).unwrap();
    let values = source.fetch_values().await.unwrap();

    assert_eq!(values.get("plant_description").map(String::as_str), Some("pro"));
    assert_eq!(values.len(), 2);
}

#[test]
fn endpoint_is_parsed_and_invalid_urls_rejected() {
    let source = HttpConfigSource::new("http://127.0.0.1:8080/config", Duration::from_secs(5))
        .unwrap();
    assert_eq!(source.endpoint().path(), "/config");
    assert_eq!(source.endpoint().port(), Some(8080));

    assert!(HttpConfigSource::new("not a url", Duration::from_secs(5)).is_err());
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let route = warp::path("config").map(|| {
        warp::reply::with_status("unavailable", StatusCode::SERVICE_UNAVAILABLE)
    });
    let addr = serve(route);

    let source =
        HttpConfigSource::new(&format!("http://{addr}/config"), Duration::from_secs(5)).unwrap();
    let err = source.fetch_values().await.unwrap_err();

    assert_eq!(err, FetchError::Status(503));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let route = warp::path("config").map(|| "definitely not json");
    let addr = serve(route);

    let source =
        HttpConfigSource::new(&format!("http://{addr}/config"), Duration::from_secs(5)).unwrap();
    let err = source.fetch_values().await.unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn slow_server_times_out() {
    let route = warp::path("config").and_then(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, Infallible>(warp::reply::json(&serde_json::json!({ "entries": {} })))
    });
    let addr = serve(route);

    let source =
        HttpConfigSource::new(&format!("http://{addr}/config"), Duration::from_millis(200))
            .unwrap();
    let err = source.fetch_values().await.unwrap_err();

    assert_eq!(err, FetchError::Timeout(Duration::from_millis(200)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Bind and immediately drop a listener so the port is very likely closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let source =
        HttpConfigSource::new(&format!("http://{addr}/config"), Duration::from_secs(2)).unwrap();
    let err = source.fetch_values().await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
}
