//! Seams for the platform services behind the copy and speak buttons.

use crate::Result;
use std::sync::{Arc, Mutex};

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<()>;
    fn cancel(&self);
}

/// Clipboard that keeps the last written text in memory.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.unavailable {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "clipboard access denied",
            )
            .into());
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// Speaker that records what it was asked to say.
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
    cancels: Arc<Mutex<usize>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn cancel(&self) {
        *self.cancels.lock().unwrap() += 1;
    }
}
