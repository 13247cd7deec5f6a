//! Editor Session - session state for a code-editor shell
//!
//! Models the stateful core behind an editor window: open tabs and the
//! active document, folder expansion in the file tree, and the assistant
//! chat panel with its delayed, cancellable replies.

pub mod app;
pub mod assistant;
pub mod config;
pub mod error;
pub mod message;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod ui;

pub use app::{Redraw, Session};
pub use config::SessionConfig;
pub use error::{AppError, AppResult};
pub use message::Message;
pub use runtime::{SessionHandle, SessionRuntime};
pub use scheduler::{Scheduler, TimerId, TokioScheduler, VirtualScheduler};
