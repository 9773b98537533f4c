//! Query submission
//!
//! A [`Query`] binds a session, a resource identifier and a private copy of a
//! [`Context`]. [`Query::execute`] hands the request to the session's transport on
//! the tokio runtime and returns a [`PendingResponse`] straight away; the caller
//! awaits it to get either the token-bearing [`QueryResponse`] or the failure.

use crate::context::Context;
use crate::error::ClientError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

pub mod request;
pub mod session;
pub mod transport;

pub use request::{flatten_context, AsyncRequest, AsyncResponse, TypedPayload};
pub use session::Session;
pub use transport::{HttpTransport, Transport};

/// A single submittable (session, resource id, context) unit
#[derive(Debug, Clone)]
pub struct Query {
    session: Arc<Session>,
    resource_id: String,
    context: Context,
}

impl Query {
    /// Create a query. The context is copied; later changes to the caller's
    /// context do not reach this query.
    pub fn new(
        session: Arc<Session>,
        resource_id: impl Into<String>,
        context: &Context,
    ) -> Result<Self, ClientError> {
        let resource_id = resource_id.into();
        if resource_id.is_empty() {
            return Err(ClientError::NullArgument("query"));
        }
        Ok(Self {
            session,
            resource_id,
            context: context.clone(),
        })
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Build the request this query submits.
    pub fn request(&self) -> AsyncRequest {
        AsyncRequest::new(
            self.session.config().user_id(),
            self.resource_id.as_str(),
            &self.context,
        )
    }

    /// Submit the query without blocking. Each call is an independent request.
    pub fn execute(&self) -> PendingResponse {
        let request = self.request();
        debug!(
            user_id = %request.user_id,
            resource_id = %request.resource_id,
            context_keys = request.context.len(),
            "Executing query"
        );

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return PendingResponse::failed(ClientError::NoRuntime),
        };

        let session = Arc::clone(&self.session);
        let task = handle.spawn(async move {
            let endpoint = session.endpoint();
            let response = session
                .transport()
                .submit(&endpoint, &request)
                .await
                .map_err(|e| {
                    debug!(endpoint = %endpoint, error = %e, "Query submission failed");
                    e
                })?;
            if response.token.is_empty() {
                return Err(ClientError::Decode(
                    "response carried an empty token".to_string(),
                ));
            }
            Ok(QueryResponse::new(session, response))
        });

        PendingResponse::spawned(task)
    }
}

/// Builder that reports whichever required part is missing
#[derive(Debug, Default)]
pub struct QueryBuilder {
    session: Option<Arc<Session>>,
    resource_id: Option<String>,
    context: Option<Context>,
}

impl QueryBuilder {
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn context(mut self, context: &Context) -> Self {
        self.context = Some(context.clone());
        self
    }

    pub fn build(self) -> Result<Query, ClientError> {
        let session = self.session.ok_or(ClientError::NullArgument("session"))?;
        let resource_id = self.resource_id.ok_or(ClientError::NullArgument("query"))?;
        let context = self.context.ok_or(ClientError::NullArgument("context"))?;
        Query::new(session, resource_id, &context)
    }
}

/// Successful submission: the session it ran on and the service acknowledgement
#[derive(Debug, Clone)]
pub struct QueryResponse {
    session: Arc<Session>,
    response: AsyncResponse,
}

impl QueryResponse {
    pub fn new(session: Arc<Session>, response: AsyncResponse) -> Self {
        Self { session, response }
    }

    /// Correlation token for resource delivery and completion events
    pub fn token(&self) -> &str {
        &self.response.token
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn response(&self) -> &AsyncResponse {
        &self.response
    }
}

/// Outcome of an in-flight [`Query::execute`] call.
///
/// Resolves once to `Ok(QueryResponse)` or `Err(ClientError)`. Dropping it
/// detaches from the submission without cancelling it.
pub struct PendingResponse {
    state: PendingState,
}

enum PendingState {
    Spawned(JoinHandle<Result<QueryResponse, ClientError>>),
    Failed(Option<ClientError>),
}

impl PendingResponse {
    fn spawned(task: JoinHandle<Result<QueryResponse, ClientError>>) -> Self {
        Self {
            state: PendingState::Spawned(task),
        }
    }

    fn failed(error: ClientError) -> Self {
        Self {
            state: PendingState::Failed(Some(error)),
        }
    }

    /// True once the outcome is available.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            PendingState::Spawned(task) => task.is_finished(),
            PendingState::Failed(_) => true,
        }
    }

    /// Best-effort cancel of the submission task. The network call stops only
    /// if the transport future honours being dropped.
    pub fn abort(&self) {
        if let PendingState::Spawned(task) = &self.state {
            task.abort();
        }
    }
}

impl Future for PendingResponse {
    type Output = Result<QueryResponse, ClientError>;

    fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            PendingState::Spawned(task) => Pin::new(task).poll(cx).map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(e) if e.is_cancelled() => {
                    Err(ClientError::TaskFailed("submission was cancelled".to_string()))
                }
                Err(e) => Err(ClientError::TaskFailed(e.to_string())),
            }),
            PendingState::Failed(error) => Poll::Ready(Err(error.take().unwrap_or_else(|| {
                ClientError::TaskFailed("outcome already taken".to_string())
            }))),
        }
    }
}

impl std::fmt::Debug for PendingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingResponse")
            .field("finished", &self.is_finished())
            .finish()
    }
}
