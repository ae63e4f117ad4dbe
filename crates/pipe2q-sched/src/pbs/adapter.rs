//! qsub invocation for rendered submission scripts.

use std::path::Path;
use std::process::Stdio;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::process::Command;

use crate::error::{SubmitError, SubmitResult};

/// Outcome of one qsub invocation.
///
/// A nonzero qsub exit marks the batch as not accepted but is not an
/// error; capacity or policy rejections look identical to acceptance
/// failures at this level and neither is retried.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    /// Whether qsub exited with status zero.
    pub accepted: bool,

    /// Scheduler output: the job id line on acceptance, stderr otherwise.
    /// Carried verbatim; the job id is never parsed.
    pub diagnostic: Option<String>,
}

/// Runs the external `qsub` command against a script file.
///
/// In mock mode no process is spawned; submitted script contents are
/// recorded for inspection and a fake job id is reported.
pub struct QsubRunner {
    qsub_bin: String,
    /// Whether to use mock mode (for testing).
    mock_mode: bool,
    /// Mock job counter for generating fake job IDs.
    mock_counter: AtomicU64,
    /// Scripts submitted in mock mode, in submission order.
    mock_scripts: Mutex<Vec<String>>,
}

impl QsubRunner {
    /// Create a runner that invokes the system `qsub`.
    pub fn new() -> Self {
        Self::with_binary("qsub")
    }

    /// Use a different submission binary (e.g. a fake qsub in tests).
    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self {
            qsub_bin: bin.into(),
            mock_mode: false,
            mock_counter: AtomicU64::new(1000),
            mock_scripts: Mutex::new(Vec::new()),
        }
    }

    /// Create a runner in mock mode (for testing).
    pub fn mock() -> Self {
        Self {
            qsub_bin: "qsub".to_string(),
            mock_mode: true,
            mock_counter: AtomicU64::new(1000),
            mock_scripts: Mutex::new(Vec::new()),
        }
    }

    /// Scripts submitted while in mock mode, in submission order.
    pub fn submitted_scripts(&self) -> Vec<String> {
        self.mock_scripts
            .lock()
            .expect("mock script log poisoned")
            .clone()
    }

    /// Submit the script at `script_path` to the scheduler.
    ///
    /// Only a failure to run qsub at all (missing binary, timeout) is an
    /// error; a nonzero exit is reported as a rejected [`SubmissionResult`].
    pub async fn submit(&self, script_path: &Path) -> SubmitResult<SubmissionResult> {
        if self.mock_mode {
            let script = std::fs::read_to_string(script_path)?;
            self.mock_scripts
                .lock()
                .expect("mock script log poisoned")
                .push(script);
            let job_id = self.mock_counter.fetch_add(1, Ordering::SeqCst);
            return Ok(SubmissionResult {
                accepted: true,
                diagnostic: Some(format!("{job_id}.pbs-server")),
            });
        }

        let output = tokio::time::timeout(
            Duration::from_secs(60),
            Command::new(&self.qsub_bin)
                .arg(script_path)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| SubmitError::Timeout("qsub timed out after 60s".into()))?
        .map_err(|e| SubmitError::QsubCommand {
            message: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            let job_id = stdout.trim();
            if !job_id.is_empty() {
                tracing::info!("qsub accepted job: {job_id}");
            }
            Ok(SubmissionResult {
                accepted: true,
                diagnostic: (!job_id.is_empty()).then(|| job_id.to_string()),
            })
        } else {
            tracing::warn!("qsub rejected submission: {}", stderr.trim());
            Ok(SubmissionResult {
                accepted: false,
                diagnostic: Some(stderr.trim().to_string()),
            })
        }
    }
}

impl Default for QsubRunner {
    fn default() -> Self {
        Self::new()
    }
}
