//! End-to-end tests over a real socket.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use segment_router::http::X_REQUEST_ID;
use segment_router::{BoxError, Flow, PathPattern, Router};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_serves_registered_routes() {
    let dispatcher = Router::new()
        .get(PathPattern::new(["/users", ":id"]).unwrap(), |_req, params| async move {
            Ok(format!("user {}", params.get("id").unwrap_or_default()))
        })
        .get(PathPattern::new(["/files", "**"]).unwrap(), |_req, _params| async {
            Ok("file")
        })
        .build();
    let server = common::start_server(dispatcher).await;
    let client = client();

    let res = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    assert_eq!(res.text().await.unwrap(), "user 42");

    let res = client.get(server.url("/files/a/b/c")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "file");

    let res = client.get(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_short_circuit_over_http() {
    let dispatcher = Router::new()
        .use_middleware(PathPattern::parse("/admin/**").unwrap(), |req, _params| async move {
            if req.headers().contains_key("authorization") {
                Ok(Flow::Continue(req))
            } else {
                Ok(Flow::Respond(StatusCode::UNAUTHORIZED.into_response()))
            }
        })
        .get(PathPattern::parse("/admin/panel").unwrap(), |_req, _params| async {
            Ok("panel")
        })
        .build();
    let server = common::start_server(dispatcher).await;
    let client = client();

    let res = client.get(server.url("/admin/panel")).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(server.url("/admin/panel"))
        .header("authorization", "Bearer x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "panel");
}

#[tokio::test]
async fn test_handler_failure_is_500() {
    let dispatcher = Router::new()
        .post(PathPattern::parse("/jobs").unwrap(), |_req, _params| async {
            Err::<&str, BoxError>("queue unavailable".into())
        })
        .build();
    let server = common::start_server(dispatcher).await;

    let res = client().post(server.url("/jobs")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "");
}
