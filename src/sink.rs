//! Event dispatch seam between translator threads and the host.

use crate::event::InputEvent;

/// Receives translated input events from a session's worker thread.
///
/// The host input core implements this to feed its own dispatch queue. A
/// sink is owned by exactly one session and is called from that session's
/// worker thread only, in emission order.
pub trait EventSink: Send {
    fn dispatch(&mut self, event: &InputEvent);
}

/// Closures work as sinks directly.
impl<F: FnMut(&InputEvent) + Send> EventSink for F {
    fn dispatch(&mut self, event: &InputEvent) {
        self(event)
    }
}

/// A sink that logs every event at debug level.
pub struct LogSink;

impl EventSink for LogSink {
    fn dispatch(&mut self, event: &InputEvent) {
        log::debug!("input event: {event:?}");
    }
}

/// Wraps a sink and forwards only events matching a predicate.
pub struct FilteredSink {
    predicate: Box<dyn Fn(&InputEvent) -> bool + Send>,
    inner: Box<dyn EventSink>,
}

impl FilteredSink {
    pub fn new(
        predicate: impl Fn(&InputEvent) -> bool + Send + 'static,
        inner: Box<dyn EventSink>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner,
        }
    }
}

impl EventSink for FilteredSink {
    fn dispatch(&mut self, event: &InputEvent) {
        if (self.predicate)(event) {
            self.inner.dispatch(event);
        }
    }
}
