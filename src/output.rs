//! Output — the lifecycle wrapper around the engine and a sink.
//!
//! ```text
//! Output::new ──► Initializing ──start()──► Active ──stop()──► Stopped
//!                      │                                         ▲
//!                      └─────────────────stop()──────────────────┘
//! ```
//!
//! Only an `Active` output accepts records. The state is an atomic, so it can
//! be read and flipped from any thread while writes are in flight; the rule
//! set itself is immutable and shared by `&self`.

use std::sync::atomic::{AtomicU8, Ordering};

use logflux_core::config::{OutputConfig, RulesConfig};
use logflux_core::{assemble, build, Batch, Record, RuleError, RuleSet};
use logflux_sinks::{PointSink, SinkError};

/// Lifecycle state of an [`Output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputState {
    Initializing = 0,
    Active = 1,
    Stopped = 2,
}

impl OutputState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => OutputState::Initializing,
            1 => OutputState::Active,
            _ => OutputState::Stopped,
        }
    }
}

impl std::fmt::Display for OutputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputState::Initializing => write!(f, "initializing"),
            OutputState::Active => write!(f, "active"),
            OutputState::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("invalid rule: {0}")]
    Rules(#[from] RuleError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("cannot start an output that is {0}")]
    InvalidState(OutputState),
}

/// What happened to the records handed to [`Output::write`] or
/// [`Output::write_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// This many points were sent to the sink in one batch.
    Written(usize),
    /// Every record was dropped by the rules; the sink was not called.
    Dropped,
    /// The output is not active; nothing was processed.
    Inactive,
}

/// Turns records into points with a fixed [`RuleSet`] and forwards them to
/// a sink.
#[derive(Debug)]
pub struct Output<S> {
    url: String,
    database: String,
    measurement: String,
    rules: RuleSet,
    sink: S,
    state: AtomicU8,
}

impl<S: PointSink> Output<S> {
    /// Compile the rules. The output stays `Initializing` until
    /// [`start`](Self::start) succeeds.
    pub fn new(settings: &OutputConfig, rules: &RulesConfig, sink: S) -> Result<Self, OutputError> {
        tracing::debug!(url = %settings.url, database = %settings.database, "starting output");

        let rules = rules.compile()?;
        tracing::debug!(
            filters = rules.filters().len(),
            tags = rules.tags().len(),
            fields = rules.fields().len(),
            "rules compiled"
        );

        Ok(Self {
            url: settings.url.clone(),
            database: settings.database.clone(),
            measurement: settings.measurement.clone(),
            rules,
            sink,
            state: AtomicU8::new(OutputState::Initializing as u8),
        })
    }

    /// Make sure the target database exists, then accept writes.
    pub fn start(&self) -> Result<(), OutputError> {
        let current = self.state();
        if current != OutputState::Initializing {
            return Err(OutputError::InvalidState(current));
        }

        self.sink.ensure_namespace(&self.database)?;

        self.state
            .compare_exchange(
                OutputState::Initializing as u8,
                OutputState::Active as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|raw| OutputError::InvalidState(OutputState::from_u8(raw)))?;

        tracing::info!(url = %self.url, database = %self.database, "output started");
        Ok(())
    }

    /// [`new`](Self::new) followed by [`start`](Self::start).
    pub fn launch(settings: &OutputConfig, rules: &RulesConfig, sink: S) -> Result<Self, OutputError> {
        let output = Self::new(settings, rules, sink)?;
        output.start()?;
        Ok(output)
    }

    pub fn state(&self) -> OutputState {
        OutputState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == OutputState::Active
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process one record.
    pub fn write(&self, record: &Record) -> Result<WriteOutcome, OutputError> {
        if !self.is_running() {
            return Ok(WriteOutcome::Inactive);
        }
        match build(&self.rules, &self.measurement, record) {
            Some(point) => self.send(Batch::single(point)),
            None => Ok(WriteOutcome::Dropped),
        }
    }

    /// Process a group of records and send the survivors as one batch.
    pub fn write_batch<'r, I>(&self, records: I) -> Result<WriteOutcome, OutputError>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        if !self.is_running() {
            return Ok(WriteOutcome::Inactive);
        }
        let points = records
            .into_iter()
            .map(|record| build(&self.rules, &self.measurement, record));
        match assemble(points) {
            Some(batch) => self.send(batch),
            None => Ok(WriteOutcome::Dropped),
        }
    }

    /// Hand a batch to the sink. A sink closed by a concurrent `stop` counts
    /// as `Inactive` rather than an error.
    fn send(&self, batch: Batch) -> Result<WriteOutcome, OutputError> {
        let written = batch.len();
        match self.sink.write(batch) {
            Ok(()) => {
                tracing::debug!(written, "batch written");
                Ok(WriteOutcome::Written(written))
            }
            Err(SinkError::Closed) if !self.is_running() => Ok(WriteOutcome::Inactive),
            Err(err) => Err(err.into()),
        }
    }

    /// Stop accepting records and close the sink. Stopping twice is a no-op.
    pub fn stop(&self) -> Result<(), OutputError> {
        let previous = OutputState::from_u8(
            self.state.swap(OutputState::Stopped as u8, Ordering::AcqRel),
        );
        if previous == OutputState::Stopped {
            return Ok(());
        }

        tracing::debug!(url = %self.url, database = %self.database, "stopping output");
        self.sink.close()?;
        tracing::info!(url = %self.url, database = %self.database, "output stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logflux_sinks::MemorySink;
    use std::sync::atomic::AtomicBool;
    use std::sync::Barrier;

    /// Parks each write between two barrier waits so a test can run `stop`
    /// in the gap.
    struct GatedSink {
        gate: Barrier,
        closed: AtomicBool,
    }

    impl PointSink for GatedSink {
        fn ensure_namespace(&self, _name: &str) -> Result<(), SinkError> {
            Ok(())
        }

        fn write(&self, _batch: Batch) -> Result<(), SinkError> {
            self.gate.wait();
            self.gate.wait();
            if self.closed.load(Ordering::Acquire) {
                return Err(SinkError::Closed);
            }
            Ok(())
        }

        fn close(&self) -> Result<(), SinkError> {
            self.closed.store(true, Ordering::Release);
            Ok(())
        }
    }

    fn rules(filters: &[&str], fields: &[&str]) -> RulesConfig {
        RulesConfig {
            filters: filters.iter().map(|s| s.to_string()).collect(),
            tags: Vec::new(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn lifecycle_transitions() {
        let sink = MemorySink::new();
        let output = Output::new(&OutputConfig::default(), &rules(&[], &["cpu"]), sink.clone()).unwrap();
        assert_eq!(output.state(), OutputState::Initializing);
        assert!(!output.is_running());

        output.start().unwrap();
        assert_eq!(output.state(), OutputState::Active);
        assert_eq!(sink.namespaces(), vec!["graylog".to_string()]);
        assert!(matches!(output.start(), Err(OutputError::InvalidState(OutputState::Active))));

        output.stop().unwrap();
        assert_eq!(output.state(), OutputState::Stopped);
        assert!(sink.is_closed());
        output.stop().unwrap();
        assert!(matches!(output.start(), Err(OutputError::InvalidState(OutputState::Stopped))));
    }

    #[test]
    fn bad_rules_never_start() {
        let err = Output::launch(&OutputConfig::default(), &rules(&["msg~("], &[]), MemorySink::new())
            .unwrap_err();
        assert!(matches!(err, OutputError::Rules(_)));
    }

    #[test]
    fn writes_are_ignored_unless_active() {
        let sink = MemorySink::new();
        let output = Output::new(&OutputConfig::default(), &rules(&[], &["cpu"]), sink.clone()).unwrap();
        let record = Record::new(chrono::Utc::now(), "n1").with_field("cpu", 1);

        assert_eq!(output.write(&record).unwrap(), WriteOutcome::Inactive);
        output.start().unwrap();
        assert_eq!(output.write(&record).unwrap(), WriteOutcome::Written(1));
        output.stop().unwrap();
        assert_eq!(output.write_batch([&record]).unwrap(), WriteOutcome::Inactive);
        assert_eq!(sink.batches().len(), 1);
    }

    #[test]
    fn write_racing_stop_is_inactive() {
        let sink = GatedSink {
            gate: Barrier::new(2),
            closed: AtomicBool::new(false),
        };
        let output = Output::launch(&OutputConfig::default(), &rules(&[], &["cpu"]), sink).unwrap();
        let record = Record::new(chrono::Utc::now(), "n1").with_field("cpu", 1);

        std::thread::scope(|s| {
            let writer = s.spawn(|| output.write(&record));
            output.sink().gate.wait();
            output.stop().unwrap();
            output.sink().gate.wait();
            assert_eq!(writer.join().unwrap().unwrap(), WriteOutcome::Inactive);
        });
    }

    #[test]
    fn closed_sink_while_active_is_an_error() {
        let sink = MemorySink::new();
        let output = Output::launch(&OutputConfig::default(), &rules(&[], &["cpu"]), sink.clone()).unwrap();
        sink.close().unwrap();
        let record = Record::new(chrono::Utc::now(), "n1").with_field("cpu", 1);
        assert!(matches!(
            output.write(&record),
            Err(OutputError::Sink(SinkError::Closed))
        ));
    }
}
