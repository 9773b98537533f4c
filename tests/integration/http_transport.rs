//! Integration tests for the HTTP transport against a local one-shot server

use super::test_utils::{config_for, serve_once};
use serde_json::Value;
use warden::error::ClientError;
use warden::{Context, Query, Session};

#[tokio::test]
async fn test_http_submit_posts_request_and_decodes_token() {
    let (url, server) = serve_once("200 OK", r#"{"token":"tok-http","url":"ignored"}"#).await;
    let session = Session::open(config_for("alice", &url)).unwrap();

    let mut context = Context::new();
    context.purpose("investigation").put("clearance", 2).unwrap();
    let query = Query::new(session, "file://data/report.csv", &context).unwrap();

    let response = query.execute().await.unwrap();
    assert_eq!(response.token(), "tok-http");

    let captured = server.await.unwrap();
    assert!(captured
        .request_line
        .starts_with("POST /registerDataRequest"));

    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["userId"], "alice");
    assert_eq!(body["resourceId"], "file://data/report.csv");
    assert_eq!(body["context"]["purpose"], "investigation");
    assert_eq!(body["context"]["clearance"], "2");
}

#[tokio::test]
async fn test_http_error_status_is_surfaced() {
    let (url, server) = serve_once("403 Forbidden", r#"{"error":"denied"}"#).await;
    let session = Session::open(config_for("mallory", &url)).unwrap();
    let query = Query::new(session, "file://secret", &Context::new()).unwrap();

    match query.execute().await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("denied"));
        }
        other => panic!("expected status error, got {:?}", other.map(|r| r.token().to_string())),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_http_undecodable_body_is_decode_error() {
    let (url, server) = serve_once("200 OK", r#"{"not_a_token":true}"#).await;
    let session = Session::open(config_for("alice", &url)).unwrap();
    let query = Query::new(session, "file://x", &Context::new()).unwrap();

    let err = query.execute().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
    assert!(err.is_remote());
    server.await.unwrap();
}
