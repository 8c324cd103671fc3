//! logflux-core — rule compiler and record-to-point engine.
//!
//! Configuration strings are compiled once into an immutable [`RuleSet`];
//! each inbound [`Record`] is then filtered, tagged and mapped into at most
//! one [`Point`], and the surviving points of a call are grouped into a
//! [`Batch`] for a sink.
//!
//! # Architecture
//!
//! ```text
//! config strings ──► parser ──► RuleSet
//!                                  │
//! Record ──────────────────────► build ──► Option<Point> ──► assemble ──► Option<Batch>
//! ```
//!
//! Nothing in this crate performs I/O or spawns tasks.

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod mapper;
pub mod matcher;
pub mod parser;
pub mod rules;
pub mod types;

pub use batch::{assemble, Batch};
pub use builder::build;
pub use error::{RuleError, RuleKind};
pub use mapper::Mapper;
pub use matcher::{MatchKind, Matcher};
pub use parser::{parse_mapper, parse_matcher};
pub use rules::{FieldRule, RuleSet, TagRule};
pub use types::{FieldValue, Point, Record, SOURCE_TAG};
