//! logflux — turn structured log records into time-series points.
//!
//! The engine lives in [`logflux_core`] and the storage collaborators in
//! [`logflux_sinks`]. This crate adds the pieces a running process needs:
//! the [`Output`](output::Output) lifecycle and NDJSON [`ingest`].
//!
//! # Architecture
//!
//! ```text
//! NDJSON ──► ingest ──► Output ──► build/assemble ──► PointSink
//!                         │
//!                  Initializing → Active → Stopped
//! ```

pub mod ingest;
pub mod output;

pub use output::{Output, OutputError, OutputState, WriteOutcome};
