//! Rolling history of input levels
//!
//! Keeps the most recent RMS readings for the live level meter. When the
//! history is full the oldest reading is dropped.

use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

/// Thread-safe ring of recent RMS levels (0.0-1.0)
///
/// Clones share the same history, so the capture side can write while the
/// UI reads.
#[derive(Clone)]
pub struct LevelHistory {
    levels: Arc<Mutex<HeapRb<f32>>>,
}

impl LevelHistory {
    /// Create a history holding at most `capacity` readings
    pub fn new(capacity: usize) -> Self {
        Self {
            levels: Arc::new(Mutex::new(HeapRb::new(capacity.max(1)))),
        }
    }

    /// Record one reading, evicting the oldest when full
    pub fn push(&self, level: f32) {
        let mut levels = self.levels.lock();
        let level = level.clamp(0.0, 1.0);
        if levels.try_push(level).is_err() {
            let _ = levels.try_pop();
            let _ = levels.try_push(level);
        }
    }

    /// All readings, oldest first, without consuming them
    pub fn levels(&self) -> Vec<f32> {
        self.levels.lock().iter().copied().collect()
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<f32> {
        self.levels.lock().iter().last().copied()
    }

    /// Highest reading currently held
    pub fn peak(&self) -> f32 {
        self.levels.lock().iter().copied().fold(0.0, f32::max)
    }

    pub fn clear(&self) {
        self.levels.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.levels.lock().occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.levels.lock().capacity().get()
    }
}
