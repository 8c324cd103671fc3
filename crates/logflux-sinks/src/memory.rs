//! In-memory sink — records every call for later inspection.

use std::sync::{Arc, Mutex, MutexGuard};

use logflux_core::{Batch, Point};

use crate::{PointSink, SinkError};

#[derive(Debug, Default)]
struct Recorded {
    namespaces: Vec<String>,
    batches: Vec<Batch>,
    closed: bool,
}

/// A sink that keeps batches in memory.
///
/// Cloning yields another handle onto the same storage, so a test can hand
/// one clone to an output and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    recorded: Arc<Mutex<Recorded>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Namespaces passed to `ensure_namespace`, in call order.
    pub fn namespaces(&self) -> Vec<String> {
        self.lock().namespaces.clone()
    }

    /// Every batch written so far.
    pub fn batches(&self) -> Vec<Batch> {
        self.lock().batches.clone()
    }

    /// All written points, flattened across batches.
    pub fn points(&self) -> Vec<Point> {
        self.lock()
            .batches
            .iter()
            .flat_map(|b| b.points().iter().cloned())
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl PointSink for MemorySink {
    fn ensure_namespace(&self, name: &str) -> Result<(), SinkError> {
        let mut recorded = self.lock();
        if recorded.closed {
            return Err(SinkError::Closed);
        }
        recorded.namespaces.push(name.to_string());
        Ok(())
    }

    fn write(&self, batch: Batch) -> Result<(), SinkError> {
        let mut recorded = self.lock();
        if recorded.closed {
            return Err(SinkError::Closed);
        }
        recorded.batches.push(batch);
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        self.lock().closed = true;
        Ok(())
    }
}
