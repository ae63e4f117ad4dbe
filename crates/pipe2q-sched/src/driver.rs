//! Submission pipeline orchestration.
//!
//! Drives read → batch → render → persist → submit → release, one batch at
//! a time, strictly in input order.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::batch::CommandBatch;
use crate::error::SubmitResult;
use crate::options::SubmissionOptions;
use crate::pbs::{QsubRunner, SubmissionResult, render_script};
use crate::walltime::Walltime;

/// Delay between successive qsub invocations, a crude rate limit so a long
/// command list does not hammer the submission endpoint.
const SUBMIT_PAUSE: Duration = Duration::from_secs(1);

/// Materialize the command stream: every line in order, trailing
/// whitespace stripped.
///
/// The whole stream is read before batching since batch boundaries depend
/// on the total count.
pub fn read_commands<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut commands = Vec::new();
    for line in reader.lines() {
        commands.push(line?.trim_end().to_string());
    }
    Ok(commands)
}

/// Submits each batch of commands as one scheduler job.
pub struct SubmitDriver {
    opts: SubmissionOptions,
    runner: QsubRunner,
    pause: Duration,
    script_dir: Option<PathBuf>,
}

impl SubmitDriver {
    /// Create a driver for the given options and qsub runner.
    pub fn new(opts: SubmissionOptions, runner: QsubRunner) -> Self {
        Self {
            opts,
            runner,
            pause: SUBMIT_PAUSE,
            script_dir: None,
        }
    }

    /// Override the pause between submissions (used by tests).
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Write transient scripts into `dir` instead of the system temp
    /// directory (used by tests to observe cleanup).
    pub fn with_script_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.script_dir = Some(dir.into());
        self
    }

    /// The runner this driver submits through.
    pub fn runner(&self) -> &QsubRunner {
        &self.runner
    }

    /// Submit every batch of `commands`, in order.
    ///
    /// Outcomes are collected rather than short-circuited: a batch the
    /// scheduler rejects, or a qsub invocation that fails outright, is
    /// recorded and the remaining batches are still submitted. An `Err` is
    /// returned only for pipeline failures: invalid walltime, invalid batch
    /// size, or script IO.
    pub async fn run(&self, commands: Vec<String>) -> SubmitResult<Vec<SubmissionResult>> {
        let walltime = Walltime::parse(&self.opts.walltime)?;
        let batches = CommandBatch::split(&commands, self.opts.batch_size)?;

        tracing::info!(
            "submitting {} command(s) as {} job(s), walltime {walltime}",
            commands.len(),
            batches.len()
        );

        let mut results = Vec::with_capacity(batches.len());
        for (i, batch) in batches.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.pause).await;
            }
            results.push(self.submit_batch(batch, &walltime, i).await?);
        }
        Ok(results)
    }

    /// Render, persist, and submit one batch.
    ///
    /// The temp file backing the script is removed when `script_file`
    /// drops, on every path out of this function, including a failed qsub
    /// invocation.
    async fn submit_batch(
        &self,
        batch: &CommandBatch,
        walltime: &Walltime,
        index: usize,
    ) -> SubmitResult<SubmissionResult> {
        let script = render_script(batch, &self.opts, walltime);

        let mut builder = tempfile::Builder::new();
        builder.prefix("pipe2q-").suffix(".pbs");
        let mut script_file = match &self.script_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        script_file.write_all(script.as_bytes())?;
        script_file.flush()?;

        tracing::debug!(
            "batch {index}: {} command(s), script at {}",
            batch.len(),
            script_file.path().display()
        );

        match self.runner.submit(script_file.path()).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("batch {index}: qsub invocation failed: {e}");
                Ok(SubmissionResult {
                    accepted: false,
                    diagnostic: Some(e.to_string()),
                })
            }
        }
    }
}
