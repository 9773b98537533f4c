//! Integration tests for the context -> query -> completion flow

use super::test_utils::{session_over, StaticTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::timeout;
use warden::error::ClientError;
use warden::event::CompletionEvent;
use warden::{CompletionChannel, Context, Query};

#[tokio::test]
async fn test_purpose_tagged_request_completes() {
    let mut context = Context::new();
    context.purpose("investigation");

    let transport = StaticTransport::token("tok-123");
    let session = session_over(Arc::clone(&transport));
    let query = Query::new(session, "file://data/report.csv", &context).unwrap();

    let channel = CompletionChannel::new();
    let (tx, mut rx) = unbounded_channel();
    channel
        .subscribe_fn(move |event: &CompletionEvent| {
            tx.send(event.clone())?;
            Ok(())
        })
        .unwrap();

    let response = query.execute().await.unwrap();
    assert_eq!(response.token(), "tok-123");

    {
        let sent = transport.requests.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, "alice");
        assert_eq!(sent[0].resource_id, "file://data/report.csv");
        assert_eq!(
            sent[0].context.get("purpose").map(String::as_str),
            Some("investigation")
        );
    }

    assert_eq!(channel.publish(response.token()).unwrap(), 1);

    let event = timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.token(), "tok-123");

    // Exactly once
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_context_changes_after_construction_are_not_sent() {
    let mut context = Context::new();
    context.purpose("audit").put("case", "c-1").unwrap();

    let transport = StaticTransport::token("tok");
    let query = Query::new(session_over(Arc::clone(&transport)), "file://x", &context).unwrap();

    context.purpose("something else");
    context.put("case", "c-2").unwrap();
    context.put("extra", true).unwrap();

    query.execute().await.unwrap();

    let sent = transport.requests.lock();
    assert_eq!(sent[0].context.len(), 2);
    assert_eq!(sent[0].context["purpose"], "audit");
    assert_eq!(sent[0].context["case"], "c-1");
}

#[tokio::test]
async fn test_remote_failure_is_carried_in_future() {
    let query = Query::new(
        session_over(StaticTransport::unreachable()),
        "file://x",
        &Context::new(),
    )
    .unwrap();

    // execute itself never fails; the failure arrives with the outcome
    let pending = query.execute();
    let err = pending.await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_wait_for_completion_of_response_token() {
    let query = Query::new(
        session_over(StaticTransport::token("tok-wait")),
        "file://x",
        &Context::new(),
    )
    .unwrap();
    let response = query.execute().await.unwrap();

    let channel = CompletionChannel::new();
    let waiter = channel.wait_for(response.token());

    let producer = channel.clone();
    tokio::spawn(async move {
        producer.publish("unrelated").unwrap();
        producer.publish("tok-wait").unwrap();
    });

    let event = timeout(Duration::from_secs(5), waiter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.token(), "tok-wait");
}

#[tokio::test]
async fn test_session_query_helper() {
    let session = session_over(StaticTransport::token("tok-s"));
    let mut context = Context::new();
    context.purpose("audit");

    let query = session.query("file://y", &context).unwrap();
    assert_eq!(query.resource_id(), "file://y");
    assert_eq!(query.context(), &context);
    assert!(session.query("", &context).is_err());
}
