//! Coalescing render scheduling.
//!
//! Table state changes are computed synchronously, but writing them out is
//! deferred to the host's next paint. A [`FrameQueue`] holds at most one
//! pending frame: scheduling again before the host flushes replaces the
//! pending payload, so rapid repeated requests always render the latest state.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    /// Get the raw u64 value of this frame ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

fn next_frame_id() -> FrameId {
    FrameId(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed))
}

struct PendingFrame<T> {
    id: FrameId,
    payload: T,
}

/// Holds the latest frame waiting to be rendered.
pub struct FrameQueue<T> {
    pending: Option<PendingFrame<T>>,
    /// Frames replaced before they were flushed.
    coalesced: u64,
}

impl<T> FrameQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: None,
            coalesced: 0,
        }
    }

    /// Schedule a frame, replacing any frame that has not been flushed yet.
    pub fn schedule(&mut self, payload: T) -> FrameId {
        let id = next_frame_id();
        if let Some(previous) = self.pending.replace(PendingFrame { id, payload }) {
            self.coalesced += 1;
            tracing::trace!(
                target: targets::FRAME,
                replaced = previous.id.as_u64(),
                frame = id.as_u64(),
                "coalesced pending frame"
            );
        }
        id
    }

    /// Cancel the pending frame if it has the given ID.
    ///
    /// Returns `true` if the frame was found and cancelled.
    pub fn cancel(&mut self, id: FrameId) -> bool {
        match &self.pending {
            Some(frame) if frame.id == id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Check if a frame is waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The ID of the pending frame, if any.
    pub fn pending_id(&self) -> Option<FrameId> {
        self.pending.as_ref().map(|frame| frame.id)
    }

    /// Peek at the pending payload.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|frame| &frame.payload)
    }

    /// Number of frames that were replaced before being flushed.
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    /// Remove and return the pending frame.
    pub fn take(&mut self) -> Option<(FrameId, T)> {
        self.pending.take().map(|frame| (frame.id, frame.payload))
    }

    /// Run `render` with the pending payload, if there is one.
    ///
    /// Returns `true` if a frame was rendered.
    pub fn flush<F>(&mut self, render: F) -> bool
    where
        F: FnOnce(T),
    {
        match self.take() {
            Some((id, payload)) => {
                tracing::trace!(target: targets::FRAME, frame = id.as_u64(), "flushing frame");
                render(payload);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
