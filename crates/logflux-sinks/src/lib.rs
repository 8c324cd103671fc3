//! logflux-sinks — storage collaborators for logflux.
//!
//! A sink receives non-empty [`Batch`]es from the output and owns everything
//! after that point: serialisation, namespace management and flushing.
//!
//! ```text
//! Batch ──► LineSink ──► line protocol text (stdout, file, ...)
//!       └─► MemorySink ──► recorded batches (tests, dry runs)
//! ```

pub mod line_protocol;
pub mod line_sink;
pub mod memory;

use logflux_core::Batch;

pub use line_sink::LineSink;
pub use memory::MemorySink;

/// Errors a sink can report back to the output.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink is closed")]
    Closed,
}

/// Destination for batches of points.
///
/// Methods take `&self` so one sink can serve concurrent writers;
/// implementations synchronise internally.
pub trait PointSink: Send + Sync {
    /// Make sure the target namespace (database) exists. Called once at
    /// output start, before any write.
    fn ensure_namespace(&self, name: &str) -> Result<(), SinkError>;

    /// Write one batch as a single request.
    fn write(&self, batch: Batch) -> Result<(), SinkError>;

    /// Flush and release resources. Later writes fail with
    /// [`SinkError::Closed`].
    fn close(&self) -> Result<(), SinkError>;
}
