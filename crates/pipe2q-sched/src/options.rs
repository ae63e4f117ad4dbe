//! Submission options produced by the CLI front-end.

/// Immutable configuration for one pipe2q run.
///
/// Built once from the command line and consumed read-only by the rest of
/// the pipeline.
#[derive(Debug, Clone)]
pub struct SubmissionOptions {
    /// Raw walltime string as supplied with `--wt`.
    pub walltime: String,

    /// Processors per node requested for each job.
    pub processors: u32,

    /// Number of commands grouped into one submitted job.
    pub batch_size: usize,

    /// Job name; the `n-` prefix is applied at render time.
    pub job_name: Option<String>,

    /// Route jobs to the test queue.
    pub use_test_queue: bool,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            walltime: "00:00:10:00".to_string(),
            processors: 1,
            batch_size: 1,
            job_name: None,
            use_test_queue: false,
        }
    }
}
