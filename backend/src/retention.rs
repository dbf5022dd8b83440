// src/retention.rs

//! Upload retention sweep.
//!
//! Deletes top-level files in the upload directory that are older than the
//! configured age or larger than the configured size. Runs on its own tokio
//! task and shares no state with request handling.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tokio::task::JoinHandle;

use crate::config::UploadConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_age: Duration,
    pub max_bytes: u64,
}

impl From<&UploadConfig> for RetentionPolicy {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_age: config.max_age,
            max_bytes: config.max_bytes,
        }
    }
}

/// Outcome of one sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub removed_by_age: usize,
    pub removed_by_size: usize,
    pub bytes_freed: u64,
    /// Entries that could not be inspected, plus files that matched the
    /// policy but could not be deleted.
    pub failures: usize,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.removed_by_age + self.removed_by_size
    }

    fn record_removal(&mut self, verdict: Verdict, len: u64, result: &io::Result<()>) {
        match (result, verdict) {
            (Err(_), _) => self.failures += 1,
            (Ok(()), Verdict::TooOld) => {
                self.removed_by_age += 1;
                self.bytes_freed += len;
            }
            (Ok(()), Verdict::TooLarge) => {
                self.removed_by_size += 1;
                self.bytes_freed += len;
            }
            (Ok(()), Verdict::Keep) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    TooOld,
    TooLarge,
}

fn judge(policy: &RetentionPolicy, modified: SystemTime, len: u64, now: SystemTime) -> Verdict {
    // Files with a modification time in the future count as fresh.
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    if age > policy.max_age {
        Verdict::TooOld
    } else if len > policy.max_bytes {
        Verdict::TooLarge
    } else {
        Verdict::Keep
    }
}

/// Sweeps `dir` relative to the current time.
pub async fn sweep(dir: &Path, policy: &RetentionPolicy) -> io::Result<SweepReport> {
    sweep_at(dir, policy, SystemTime::now()).await
}

/// Sweeps `dir` as if the current time were `now`.
///
/// A missing directory yields an empty report. Subdirectories and symlinks
/// are left alone.
pub async fn sweep_at(dir: &Path, policy: &RetentionPolicy, now: SystemTime) -> io::Result<SweepReport> {
    let mut report = SweepReport::default();

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "upload dir missing, nothing to sweep");
            return Ok(report);
        }
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = match fs::symlink_metadata(&path).await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot stat upload");
                report.failures += 1;
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        report.scanned += 1;

        let modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "no mtime for upload");
                report.failures += 1;
                continue;
            }
        };

        let verdict = judge(policy, modified, metadata.len(), now);
        if verdict == Verdict::Keep {
            continue;
        }

        let result = fs::remove_file(&path).await;
        match &result {
            Ok(()) => tracing::debug!(path = %path.display(), ?verdict, "removed upload"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove upload"),
        }
        report.record_removal(verdict, metadata.len(), &result);
    }

    Ok(report)
}

/// Runs [`sweep`] every `interval` until the task is aborted.
///
/// Errors are logged and the loop continues.
pub fn spawn(dir: PathBuf, policy: RetentionPolicy, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;

            match sweep(&dir, &policy).await {
                Ok(report) if report.removed() > 0 || report.failures > 0 => {
                    tracing::info!(
                        dir = %dir.display(),
                        scanned = report.scanned,
                        removed_by_age = report.removed_by_age,
                        removed_by_size = report.removed_by_size,
                        bytes_freed = report.bytes_freed,
                        failures = report.failures,
                        "upload sweep finished"
                    );
                }
                Ok(report) => {
                    tracing::debug!(dir = %dir.display(), scanned = report.scanned, "upload sweep: nothing to do");
                }
                Err(e) => {
                    tracing::error!(dir = %dir.display(), error = %e, "upload sweep failed");
                }
            }
        }
    })
}
