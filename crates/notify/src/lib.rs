//! Rendering and delivery of insight messages.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - A `LogNotifier` channel that writes messages through `tracing`
//! - Minijinja rendering of message strings against a parameter map
//! - A `Dispatcher` that routes a message to the channels for its template

pub mod dispatcher;
pub mod log;
pub mod templating;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use log::LogNotifier;
pub use templating::TemplateRenderer;
pub use traits::{DispatchResult, Notification, Notifier, NotifyError};
