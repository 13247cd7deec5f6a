//! Session event loop
//!
//! A single actor owns the `Session`. UI messages and timer deliveries arrive
//! on one channel and are applied one at a time, so store operations never
//! interleave; the only suspension is the wait for the next message.

use crate::app::{Redraw, Session};
use crate::config::SessionConfig;
use crate::error::{AppResult, RuntimeError};
use crate::message::Message;
use crate::scheduler::{Scheduler, TokioScheduler};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Cloneable sender for posting messages into a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: UnboundedSender<Message>,
}

impl SessionHandle {
    /// Queue a message for the session
    pub fn send(&self, message: impl Into<Message>) -> Result<(), RuntimeError> {
        self.tx
            .send(message.into())
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

/// Owns a session and the channel feeding it
#[derive(Debug)]
pub struct SessionRuntime {
    session: Session,
    rx: UnboundedReceiver<Message>,
    handle: SessionHandle,
}

impl SessionRuntime {
    /// Build a session whose replies are timed by tokio on `runtime`.
    /// `build` receives the scheduler the session must use.
    pub fn new<F>(runtime: Handle, build: F) -> Self
    where
        F: FnOnce(Box<dyn Scheduler>) -> Session,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(runtime, tx.clone());
        let session = build(Box::new(scheduler));

        Self {
            session,
            rx,
            handle: SessionHandle { tx },
        }
    }

    /// Validate `config` and start the sample-project session on it
    pub fn from_config(runtime: Handle, config: SessionConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::new(runtime, |scheduler| Session::demo(config, scheduler)))
    }

    /// Sender for other tasks
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Wait for the next queued message
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Apply a message immediately
    pub fn apply(&mut self, message: impl Into<Message>) -> Redraw {
        let message = message.into();
        log::debug!("Applying {:?}", message);
        self.session.update(message)
    }

    /// Wait for the next queued message and apply it
    pub async fn step(&mut self) -> Option<Redraw> {
        let message = self.recv().await?;
        Some(self.apply(message))
    }

    /// Read access to the session
    pub fn session(&self) -> &Session {
        &self.session
    }
}
