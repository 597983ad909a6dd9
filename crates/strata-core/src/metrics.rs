//! Observational instrumentation for the analysis stages.
//!
//! A [`Metrics`] value pairs a start/stop [`Stopwatch`] with a set of named
//! operation [`Counter`]s. Algorithms bump counters as they work; callers
//! decide whether to time them. Nothing recorded here feeds back into an
//! algorithm's result.
//!
//! [`MetricsReport`] collects finished stages for display, either as JSON or
//! as a terminal table. Collection is switched on by the `--timing` flag or
//! the `STRATA_TIMING` environment variable.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde_json::json;

/// Misuse of the start/stop protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("stopwatch stopped before it was started")]
    NotStarted,
    #[error("stopwatch started while already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum TimerState {
    #[default]
    Idle,
    Running(Instant),
    Stopped(Duration),
}

/// A single-measurement timer: `start()`, then `stop()`, then `elapsed()`.
///
/// Starting a stopped stopwatch begins a fresh measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    state: TimerState,
}

impl Stopwatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a measurement.
    ///
    /// # Errors
    ///
    /// [`MetricsError::AlreadyRunning`] if a measurement is in progress.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        if matches!(self.state, TimerState::Running(_)) {
            return Err(MetricsError::AlreadyRunning);
        }
        self.state = TimerState::Running(Instant::now());
        Ok(())
    }

    /// End the current measurement and return its duration.
    ///
    /// # Errors
    ///
    /// [`MetricsError::NotStarted`] if no measurement is in progress.
    pub fn stop(&mut self) -> Result<Duration, MetricsError> {
        let TimerState::Running(started) = self.state else {
            return Err(MetricsError::NotStarted);
        };
        let elapsed = started.elapsed();
        self.state = TimerState::Stopped(elapsed);
        Ok(elapsed)
    }

    /// Duration of the last completed measurement.
    ///
    /// `None` until both [`Stopwatch::start`] and [`Stopwatch::stop`] have
    /// been called, in that order.
    #[must_use]
    pub const fn elapsed(&self) -> Option<Duration> {
        match self.state {
            TimerState::Stopped(elapsed) => Some(elapsed),
            TimerState::Idle | TimerState::Running(_) => None,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running(_))
    }
}

/// Operations counted by the analysis stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    /// Nodes discovered by the SCC depth-first search.
    DfsVisits,
    /// Adjacency entries examined.
    EdgesScanned,
    /// Nodes popped off the Tarjan component stack.
    StackPops,
    /// Nodes pushed onto the Kahn queue.
    QueuePushes,
    /// Nodes popped from the Kahn queue.
    QueuePops,
    /// Edge relaxations performed by the path engine.
    Relaxations,
    /// Relaxations that improved a distance.
    Improvements,
}

impl Counter {
    /// Stable snake-case name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DfsVisits => "dfs_visits",
            Self::EdgesScanned => "edges_scanned",
            Self::StackPops => "stack_pops",
            Self::QueuePushes => "queue_pushes",
            Self::QueuePops => "queue_pops",
            Self::Relaxations => "relaxations",
            Self::Improvements => "improvements",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stopwatch plus operation counters for one stage.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    stopwatch: Stopwatch,
    counters: BTreeMap<Counter, u64>,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`Stopwatch::start`].
    ///
    /// # Errors
    ///
    /// [`MetricsError::AlreadyRunning`] if the stopwatch is running.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        self.stopwatch.start()
    }

    /// See [`Stopwatch::stop`].
    ///
    /// # Errors
    ///
    /// [`MetricsError::NotStarted`] if the stopwatch is not running.
    pub fn stop(&mut self) -> Result<Duration, MetricsError> {
        self.stopwatch.stop()
    }

    #[must_use]
    pub const fn elapsed(&self) -> Option<Duration> {
        self.stopwatch.elapsed()
    }

    pub fn incr(&mut self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: Counter, amount: u64) {
        *self.counters.entry(counter).or_insert(0) += amount;
    }

    /// Current value of `counter` (zero if never touched).
    #[must_use]
    pub fn count(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    /// All non-zero counters in [`Counter`] order.
    pub fn counters(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        self.counters.iter().map(|(&counter, &value)| (counter, value))
    }
}

/// Run `f` between `metrics.start()` and `metrics.stop()`.
///
/// A stopwatch that was already running is left untouched and `f` runs
/// untimed.
pub fn timed<R>(metrics: &mut Metrics, f: impl FnOnce(&mut Metrics) -> R) -> R {
    let started = metrics.start().is_ok();
    let result = f(metrics);
    if started {
        let _ = metrics.stop();
    }
    result
}

/// Returns true when `STRATA_TIMING` enables the timing report.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("STRATA_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

/// One finished stage in a [`MetricsReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    pub elapsed: Duration,
    pub counters: Vec<(Counter, u64)>,
}

/// Ordered list of finished stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    pub stages: Vec<StageReport>,
}

impl MetricsReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage. Stages whose stopwatch never completed are recorded
    /// with a zero duration so their counters are still visible.
    pub fn record(&mut self, name: &str, metrics: &Metrics) {
        self.stages.push(StageReport {
            name: name.to_string(),
            elapsed: metrics.elapsed().unwrap_or_default(),
            counters: metrics.counters().collect(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum of all stage durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|stage| stage.elapsed).sum()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages = self
            .stages
            .iter()
            .map(|stage| {
                let counters: serde_json::Map<String, serde_json::Value> = stage
                    .counters
                    .iter()
                    .map(|(counter, value)| (counter.as_str().to_string(), json!(value)))
                    .collect();
                json!({
                    "name": stage.name,
                    "elapsed_ns": u64::try_from(stage.elapsed.as_nanos()).unwrap_or(u64::MAX),
                    "counters": counters,
                })
            })
            .collect::<Vec<_>>();

        json!({ "stages": stages })
    }

    /// Render the report as a table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.stages.is_empty() {
            return "No stages recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("stage                  elapsed  counters\n");
        out.push_str("------------------------------------------------------------\n");

        for stage in &self.stages {
            let counters = stage
                .counters
                .iter()
                .map(|(counter, value)| format!("{counter}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!(
                "{:<20} {:>9}  {}\n",
                stage.name,
                format_duration(stage.elapsed),
                counters
            ));
        }

        out
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|truthy| value.eq_ignore_ascii_case(truthy))
}
