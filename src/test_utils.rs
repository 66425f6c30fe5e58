//! Fakes for driving the engine without hardware.

use crate::{ConfigStorage, Rgb, StorageError, StripDriver, NUM_CHANNELS};

/// Strip driver that captures the last transmitted frame per channel.
#[derive(Debug, Default)]
pub struct CaptureDriver {
    pub channels: [Vec<Rgb>; NUM_CHANNELS],
    pub shows: usize,
}

impl CaptureDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All transmitted pixels of the last frame, channel order.
    pub fn flat(&self) -> Vec<Rgb> {
        self.channels.iter().flatten().copied().collect()
    }
}

impl StripDriver for CaptureDriver {
    fn write(&mut self, channel: usize, pixels: &[Rgb]) {
        self.channels[channel] = pixels.to_vec();
        if channel == NUM_CHANNELS - 1 {
            self.shows += 1;
        }
    }
}

/// In-memory storage backend, optionally failing writes.
#[derive(Debug, Default)]
pub struct MemStorage {
    pub value: Option<String>,
    pub fail_writes: bool,
    pub stores: usize,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(json: &str) -> Self {
        Self {
            value: Some(String::from(json)),
            ..Self::default()
        }
    }
}

impl ConfigStorage for MemStorage {
    fn load(&mut self) -> Option<String> {
        self.value.clone()
    }

    fn store(&mut self, json: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError("write failed"));
        }
        self.value = Some(String::from(json));
        self.stores += 1;
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError("erase failed"));
        }
        self.value = None;
        Ok(())
    }
}
