//! Single-slot data sink.
//!
//! The handoff point between the encoding pipeline and the external
//! consumer. One slot, last-write-wins: a publish overwrites any unread
//! value, and a reader always sees either nothing or one complete message,
//! never a partial one.

use std::sync::Mutex;

use crate::protocol::FrameMessage;

/// Last-write-wins holder for the most recent frame message.
#[derive(Debug, Default)]
pub struct DataSink {
    slot: Mutex<Option<FrameMessage>>,
}

impl DataSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publish a message, replacing any unread previous value.
    pub fn publish(&self, message: FrameMessage) {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(message);
    }

    /// Read the most recently published message, if any.
    ///
    /// Non-consuming: repeated reads between publishes return the same
    /// value.
    pub fn read(&self) -> Option<FrameMessage> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
