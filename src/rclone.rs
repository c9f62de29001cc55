//! The rclone listing source.
//!
//! All remote I/O goes through the `rclone` executable. Two subcommands are
//! used: `rclone size --json` for the advisory pre-count and
//! `rclone lsf --recursive` for the actual listing. The listing is consumed
//! line by line from the child's stdout so a large remote never has to fit
//! in memory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::models::ScanTarget;

/// Fields emitted per `lsf` line: path, type suffix, size, modification time.
pub const LSF_FORMAT: &str = "ptsm";

/// Field separator for `lsf` output. Tabs survive in remote file names far
/// less often than the default semicolon.
pub const LSF_SEPARATOR: char = '\t';

/// A provider of remote listings.
///
/// The production implementation shells out to rclone; tests substitute an
/// in-memory source. Calls are blocking, the ingestor runs them from its own
/// async context.
pub trait RemoteSource: Send + Sync {
    /// Verify the backing tool is usable before any target is touched.
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    /// Number of items under the target, for progress accounting only.
    fn count_items(&self, target: &ScanTarget) -> Result<u64>;

    /// Start a recursive listing of the target.
    fn list(&self, target: &ScanTarget) -> Result<Box<dyn Listing>>;
}

/// An in-progress listing, consumed one line at a time.
pub trait Listing {
    /// The next raw line, or `None` when the stream is exhausted.
    fn next_line(&mut self) -> Option<std::io::Result<String>>;

    /// Wait for the producer to exit and surface its failure, if any.
    ///
    /// Must be called after the stream is drained; a non-zero exit here is
    /// fatal for the run even though lines were already consumed.
    fn finish(self: Box<Self>) -> Result<()>;
}

/// `rclone size --json` payload. Only the count matters here.
#[derive(Debug, Deserialize)]
struct SizeReport {
    #[serde(default)]
    count: u64,
}

/// The real rclone CLI, driven as a subprocess.
pub struct RcloneCli {
    binary: String,
    config_path: PathBuf,
}

impl RcloneCli {
    pub fn new(binary: impl Into<String>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config_path: config_path.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--config").arg(&self.config_path);
        cmd
    }
}

impl RemoteSource for RcloneCli {
    fn ensure_available(&self) -> Result<()> {
        // An absolute or relative path bypasses the PATH lookup.
        if Path::new(&self.binary).components().count() > 1 {
            if !Path::new(&self.binary).exists() {
                bail!("rclone binary not found on PATH");
            }
            return Ok(());
        }
        which::which(&self.binary)
            .map(|_| ())
            .map_err(|_| anyhow::anyhow!("rclone binary not found on PATH"))
    }

    fn count_items(&self, target: &ScanTarget) -> Result<u64> {
        let scoped = target.scoped_id();
        let output = self
            .command()
            .args(["size", scoped.as_str(), "--json"])
            .output()
            .with_context(|| format!("Failed to run {} size. Is rclone installed?", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("rclone size failed for {}: {}", scoped, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(0);
        }
        let report: SizeReport = serde_json::from_str(stdout.trim())
            .with_context(|| format!("Unexpected rclone size output for {}", scoped))?;
        Ok(report.count)
    }

    fn list(&self, target: &ScanTarget) -> Result<Box<dyn Listing>> {
        let scoped = target.scoped_id();
        let separator = LSF_SEPARATOR.to_string();
        let mut child = self
            .command()
            .args([
                "lsf",
                scoped.as_str(),
                "--recursive",
                "--format",
                LSF_FORMAT,
                "--separator",
                separator.as_str(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to run {} lsf. Is rclone installed?", self.binary))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("rclone lsf produced no stdout handle"))?;

        Ok(Box::new(RcloneListing {
            child,
            lines: BufReader::new(stdout).lines(),
            scoped,
        }))
    }
}

struct RcloneListing {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    scoped: String,
}

impl Listing for RcloneListing {
    fn next_line(&mut self) -> Option<std::io::Result<String>> {
        self.lines.next()
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        let status = self
            .child
            .wait()
            .with_context(|| format!("Failed to wait for rclone lsf on {}", self.scoped))?;

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = self.child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            bail!("rclone lsf failed for {}: {}", self.scoped, stderr.trim());
        }
        Ok(())
    }
}
