//! Completion events: announcing that no further resources will arrive for a token.

pub mod bus;
pub mod events;

pub use bus::{CompletionChannel, CompletionHandler, FnHandler, Subscription};
pub use events::CompletionEvent;
