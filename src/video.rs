use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::frame::Frame;
use crate::types::{ReadyState, Size};

/// A playable video the buffer samples from.
///
/// The source is shared with whatever drives playback; the buffer only reads it.
pub trait VideoSource {
    type Frame<'a>: Frame
    where
        Self: 'a;

    fn ready_state(&self) -> ReadyState;

    /// Current playback position.
    fn current_time(&self) -> Duration;

    /// Intrinsic frame size, [`Size::ZERO`] until metadata is known.
    fn native_size(&self) -> Size;

    /// The frame currently presented, if the decoder has one.
    fn current_frame(&self) -> Option<Self::Frame<'_>>;

    /// Reference to a still image shown before playback can start.
    fn poster(&self) -> Option<&str> {
        None
    }

    /// Register a one-shot "can play through" notification.
    ///
    /// The host fires `signal` when the source first becomes playable.
    /// Sources that never notify may simply drop it.
    fn on_can_play_through(&self, signal: ReadySignal) {
        let _ = signal;
    }
}

/// One-shot readiness notification handed to a [`VideoSource`].
///
/// Firing is idempotent and may happen on any thread.
#[derive(Debug, Clone, Default)]
pub struct ReadySignal {
    fired: Arc<AtomicBool>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        if !self.fired.swap(true, Ordering::AcqRel) {
            tracing::debug!("video can play through");
        }
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_is_idempotent_across_clones() {
        let signal = ReadySignal::new();
        let host = signal.clone();
        assert!(!signal.is_fired());

        host.fire();
        host.fire();
        assert!(signal.is_fired());
    }

    #[test]
    fn fire_from_another_thread() {
        let signal = ReadySignal::new();
        let host = signal.clone();
        std::thread::spawn(move || host.fire()).join().unwrap();
        assert!(signal.is_fired());
    }
}
