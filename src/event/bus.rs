//! In-process completion bus.
//!
//! Every subscriber owns an unbounded queue. `publish` only enqueues, so it never
//! waits on a handler. Handler subscribers are drained by their own tokio task,
//! which keeps running when the handler errors or panics. Events are not kept:
//! a subscriber only sees what is published after it registers.

use super::events::CompletionEvent;
use crate::error::{ClientError, HandlerError};
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Receives completion events
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn on_complete(&self, event: &CompletionEvent) -> Result<(), HandlerError>;
}

/// Adapts a plain closure into a [`CompletionHandler`].
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> CompletionHandler for FnHandler<F>
where
    F: Fn(&CompletionEvent) -> Result<(), HandlerError> + Send + Sync,
{
    async fn on_complete(&self, event: &CompletionEvent) -> Result<(), HandlerError> {
        (self.0)(event)
    }
}

#[derive(Default)]
struct ChannelInner {
    subscribers: RwLock<HashMap<u64, UnboundedSender<CompletionEvent>>>,
    next_id: AtomicU64,
    failures: AtomicU64,
}

impl ChannelInner {
    fn register(&self) -> (u64, UnboundedReceiver<CompletionEvent>) {
        let (sender, receiver) = unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().insert(id, sender);
        (id, receiver)
    }
}

/// Publish/subscribe bus for completion events
#[derive(Clone, Default)]
pub struct CompletionChannel {
    inner: Arc<ChannelInner>,
}

impl CompletionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce that the stream for `token` is exhausted.
    ///
    /// Returns the number of subscribers the event was queued for.
    pub fn publish(&self, token: impl Into<String>) -> Result<usize, ClientError> {
        let event = CompletionEvent::new(token)?;

        let mut delivered = 0usize;
        let mut closed = Vec::new();
        {
            let subscribers = self.inner.subscribers.read();
            for (id, sender) in subscribers.iter() {
                if sender.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    closed.push(*id);
                }
            }
        }
        if !closed.is_empty() {
            let mut subscribers = self.inner.subscribers.write();
            for id in closed {
                subscribers.remove(&id);
            }
        }

        debug!(token = %event.token(), subscribers = delivered, "Published completion event");
        Ok(delivered)
    }

    /// Register `handler`; it is called once per published event, in publish order.
    ///
    /// Requires a tokio runtime to host the subscriber task.
    pub fn subscribe<H>(&self, handler: H) -> Result<Subscription, ClientError>
    where
        H: CompletionHandler + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        let (id, mut receiver) = self.inner.register();
        let inner = Arc::downgrade(&self.inner);

        runtime.spawn(async move {
            while let Some(event) = receiver.recv().await {
                let outcome = AssertUnwindSafe(handler.on_complete(&event))
                    .catch_unwind()
                    .await;
                let failure = match outcome {
                    Ok(Ok(())) => continue,
                    Ok(Err(e)) => e.to_string(),
                    Err(_) => "handler panicked".to_string(),
                };
                if let Some(inner) = inner.upgrade() {
                    inner.failures.fetch_add(1, Ordering::Relaxed);
                }
                warn!(
                    subscriber = id,
                    token = %event.token(),
                    error = %failure,
                    "Completion subscriber failed"
                );
            }
        });

        Ok(Subscription {
            id,
            channel: Arc::downgrade(&self.inner),
        })
    }

    /// Register a closure handler.
    pub fn subscribe_fn<F>(&self, handler: F) -> Result<Subscription, ClientError>
    where
        F: Fn(&CompletionEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe(FnHandler(handler))
    }

    /// Register a queue the caller drains itself. Dropping the receiver unsubscribes.
    pub fn subscribe_channel(&self) -> (Subscription, UnboundedReceiver<CompletionEvent>) {
        let (id, receiver) = self.inner.register();
        let subscription = Subscription {
            id,
            channel: Arc::downgrade(&self.inner),
        };
        (subscription, receiver)
    }

    /// Resolve with the first event published for `token` after this call.
    ///
    /// The subscriber is registered before this returns, so a publish that
    /// happens before the future is first polled is not missed.
    pub fn wait_for(
        &self,
        token: impl Into<String>,
    ) -> impl Future<Output = Option<CompletionEvent>> + Send + 'static {
        let token = token.into();
        let (subscription, mut receiver) = self.subscribe_channel();
        async move {
            let mut found = None;
            while let Some(event) = receiver.recv().await {
                if event.token() == token {
                    found = Some(event);
                    break;
                }
            }
            subscription.unsubscribe();
            found
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Handler errors and panics seen so far.
    pub fn failure_count(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for CompletionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionChannel")
            .field("subscribers", &self.subscriber_count())
            .field("failures", &self.failure_count())
            .finish()
    }
}

/// Registration handle. Dropping it leaves the subscriber registered.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    channel: Weak<ChannelInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        match self.channel.upgrade() {
            Some(inner) => inner.subscribers.write().remove(&self.id).is_some(),
            None => false,
        }
    }
}
