//! Line-protocol writer sink.

use std::io::Write;
use std::sync::Mutex;

use logflux_core::Batch;

use crate::line_protocol::encode_point;
use crate::{PointSink, SinkError};

/// Writes each batch as newline-terminated line protocol to `W`.
///
/// `ensure_namespace` emits a `# namespace: <name>` comment line so a
/// downstream loader knows which database the lines belong to.
#[derive(Debug)]
pub struct LineSink<W> {
    inner: Mutex<Inner<W>>,
}

#[derive(Debug)]
struct Inner<W> {
    writer: W,
    closed: bool,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                writer,
                closed: false,
            }),
        }
    }

    /// Take the writer back, e.g. to inspect a `Vec<u8>` in tests.
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .writer
    }

    fn with_writer<T>(
        &self,
        f: impl FnOnce(&mut W) -> std::io::Result<T>,
    ) -> Result<T, SinkError> {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.closed {
            return Err(SinkError::Closed);
        }
        Ok(f(&mut inner.writer)?)
    }
}

impl<W: Write + Send> PointSink for LineSink<W> {
    fn ensure_namespace(&self, name: &str) -> Result<(), SinkError> {
        self.with_writer(|w| writeln!(w, "# namespace: {name}"))
    }

    fn write(&self, batch: Batch) -> Result<(), SinkError> {
        let mut lines = String::new();
        let mut skipped = 0usize;
        for point in batch.points() {
            match encode_point(point) {
                Some(line) => {
                    lines.push_str(&line);
                    lines.push('\n');
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "points without fields were not written");
        }
        self.with_writer(|w| w.write_all(lines.as_bytes()))
    }

    fn close(&self) -> Result<(), SinkError> {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !inner.closed {
            inner.closed = true;
            inner.writer.flush()?;
        }
        Ok(())
    }
}
