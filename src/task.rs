//! Background dispatch on tokio's blocking pool.
//!
//! A dispatch never suspends, so it runs as a blocking task and the caller
//! gets a [`DispatchHandle`] to await. Awaiting the handle yields the
//! dispatch result, including handler failures.
//!
//! Dropping the handle without awaiting it detaches the task: it still runs
//! to completion, but its result (and any error) is lost. That is the
//! fire-and-forget mode, and it is the caller's choice to use it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::value::Value;

/// Runs dispatches without blocking the calling task.
#[derive(Debug, Clone)]
pub struct AsyncDispatcher {
    inner: Dispatcher,
}

impl AsyncDispatcher {
    pub fn new(inner: Dispatcher) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Dispatcher {
        &self.inner
    }

    /// Start dispatching `input` in the background.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(&self, context: Option<Value>, input: impl Into<String>) -> DispatchHandle {
        let dispatcher = self.inner.clone();
        let input = input.into();
        let span = tracing::debug_span!("dispatch", input = %input);
        let handle = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            dispatcher.dispatch(context.as_ref(), &input)
        });
        DispatchHandle { handle }
    }
}

/// Awaitable result of one background dispatch.
#[derive(Debug)]
pub struct DispatchHandle {
    handle: JoinHandle<Result<(), DispatchError>>,
}

impl DispatchHandle {
    /// Cancel the dispatch. Only effective if it has not started yet; a
    /// running dispatch has no cancellation point and completes anyway.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for DispatchHandle {
    type Output = Result<(), DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.unwrap_or(Err(DispatchError::Aborted)))
    }
}
