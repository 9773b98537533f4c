//! Warden: Policy-Governed Data Access Client
//!
//! Attach a context (including a stated purpose) to a resource query, submit it
//! asynchronously to the data service, receive a correlation token, and learn
//! through the completion channel when the resources for that token have all
//! been delivered.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod logging;
pub mod query;

pub use context::Context;
pub use error::{ClientError, ContextError};
pub use event::{CompletionChannel, CompletionEvent};
pub use query::{PendingResponse, Query, QueryResponse, Session};
