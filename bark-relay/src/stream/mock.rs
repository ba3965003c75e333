//! Mock source for testing.
//!
//! Allows queueing events and read failures, forcing dial failures, and
//! counting connections so reconnect behavior can be asserted.

use super::{EventSource, EventStream};
use crate::error::{DialError, DialResult, StreamError, StreamResult};
use async_trait::async_trait;
use bark_types::InboundEvent;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock Gotify source.
///
/// Clones share state. Every stream it produces reads from the same queue;
/// an empty queue reads as the server closing the stream.
#[derive(Debug, Default, Clone)]
pub struct MockSource {
    inner: Arc<Mutex<MockSourceInner>>,
}

#[derive(Debug, Default)]
struct MockSourceInner {
    reads: VecDeque<Result<InboundEvent, String>>,
    fail_connects: VecDeque<String>,
    connects: usize,
    closes: usize,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for a future `next_event()` call.
    pub fn queue_event(&self, event: InboundEvent) {
        let mut inner = self.inner.lock().unwrap();
        inner.reads.push_back(Ok(event));
    }

    /// Queue a read failure for a future `next_event()` call.
    pub fn queue_read_error(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.reads.push_back(Err(error.to_string()));
    }

    /// Cause the next connect() to fail with the given error.
    pub fn fail_next_connect(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_connects.push_back(error.to_string());
    }

    /// Number of successful connects.
    pub fn connect_count(&self) -> usize {
        self.inner.lock().unwrap().connects
    }

    /// Number of streams closed.
    pub fn close_count(&self) -> usize {
        self.inner.lock().unwrap().closes
    }

    /// Number of reads still queued.
    pub fn pending_reads(&self) -> usize {
        self.inner.lock().unwrap().reads.len()
    }
}

#[async_trait]
impl EventSource for MockSource {
    type Stream = MockStream;

    async fn connect(&self) -> DialResult<MockStream> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_connects.pop_front() {
            return Err(DialError::Connection(error));
        }

        inner.connects += 1;
        Ok(MockStream {
            inner: Arc::clone(&self.inner),
            closed: false,
        })
    }
}

/// Stream produced by [`MockSource`].
#[derive(Debug)]
pub struct MockStream {
    inner: Arc<Mutex<MockSourceInner>>,
    closed: bool,
}

#[async_trait]
impl EventStream for MockStream {
    async fn next_event(&mut self) -> StreamResult<InboundEvent> {
        if self.closed {
            return Err(StreamError::Closed);
        }

        let mut inner = self.inner.lock().unwrap();
        match inner.reads.pop_front() {
            Some(Ok(event)) => Ok(event),
            Some(Err(error)) => Err(StreamError::Read(error)),
            None => Err(StreamError::Closed),
        }
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.inner.lock().unwrap().closes += 1;
        }
    }
}
