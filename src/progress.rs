//! Fetch progress reporting.
//!
//! Reports observable progress during `rcat fetch` so users see how far a
//! scan has gotten and how much is left. Progress is emitted on **stderr**
//! so stdout remains parseable for scripts.

use std::io::Write;
use std::time::Instant;

/// Rolling counters for one fetch run.
///
/// `total` comes from the advisory pre-count and may undershoot or overshoot
/// the real number of listed files; `processed` is authoritative.
#[derive(Clone, Debug)]
pub struct ProgressState {
    pub processed: u64,
    pub total: u64,
    pub elapsed_seconds: f64,
    pub completed: bool,
    started: Instant,
}

impl ProgressState {
    pub fn new(total: u64) -> Self {
        Self {
            processed: 0,
            total,
            elapsed_seconds: 0.0,
            completed: false,
            started: Instant::now(),
        }
    }

    /// Count one ingested record and refresh the clock.
    pub fn record(&mut self) {
        self.processed += 1;
        self.touch();
    }

    /// Refresh the elapsed time without counting anything.
    pub fn touch(&mut self) {
        self.elapsed_seconds = self.started.elapsed().as_secs_f64();
    }

    pub fn complete(&mut self) {
        self.completed = true;
        self.touch();
    }
}

/// Reports fetch progress. Implementations write to stderr (human or JSON).
///
/// Reporting is fire-and-forget: implementations swallow their own I/O
/// errors rather than aborting an otherwise healthy run.
pub trait ProgressReporter: Send + Sync {
    /// Emit a progress snapshot. Called from the ingest pipeline.
    fn report(&self, state: &ProgressState);
}

/// Human-friendly progress on stderr: "fetch  1,234 / 5,000 files".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, state: &ProgressState) {
        let line = if state.completed {
            format!(
                "fetch complete  {} files in {:.1}s\n",
                format_number(state.processed),
                state.elapsed_seconds
            )
        } else {
            format!(
                "fetch  {} / {} files\n",
                format_number(state.processed),
                format_number(state.total)
            )
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, state: &ProgressState) {
        let obj = serde_json::json!({
            "event": "progress",
            "processed": state.processed,
            "total": state.total,
            "elapsed_seconds": state.elapsed_seconds,
            "completed": state.completed,
        });
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _state: &ProgressState) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse a `--progress` argument. `auto` defers to the TTY check.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "auto" => Ok(Self::default_for_tty()),
            "off" => Ok(ProgressMode::Off),
            "human" => Ok(ProgressMode::Human),
            "json" => Ok(ProgressMode::Json),
            other => anyhow::bail!(
                "invalid progress mode '{}' (expected auto, off, human, or json)",
                other
            ),
        }
    }

    /// Build a reporter for this mode. Caller can pass it to ingest.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1), "1");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn record_advances_processed() {
        let mut state = ProgressState::new(10);
        state.record();
        state.record();
        assert_eq!(state.processed, 2);
        assert!(!state.completed);
        state.complete();
        assert!(state.completed);
    }

    #[test]
    fn parse_rejects_unknown_mode() {
        assert_eq!(ProgressMode::parse("off").unwrap(), ProgressMode::Off);
        assert_eq!(ProgressMode::parse("human").unwrap(), ProgressMode::Human);
        assert_eq!(ProgressMode::parse("json").unwrap(), ProgressMode::Json);
        assert!(ProgressMode::parse("loud").is_err());
    }
}
