//! Batch submission pipeline for piped shell commands.
//!
//! Takes an ordered list of shell command lines, groups them into
//! fixed-size batches, renders one `#PBS` submission script per batch, and
//! submits each script to a PBS-family scheduler via `qsub`. The transient
//! script file backing each submission is deleted once the invocation
//! returns, whether or not the scheduler accepted the job.
//!
//! The pipeline does not track job state after submission, does not parse
//! scheduler output, and does not retry rejected submissions.

pub mod batch;
pub mod driver;
pub mod error;
pub mod options;
pub mod pbs;
pub mod walltime;

pub use batch::CommandBatch;
pub use driver::{SubmitDriver, read_commands};
pub use error::{SubmitError, SubmitResult};
pub use options::SubmissionOptions;
pub use pbs::{QsubRunner, SubmissionResult, render_script};
pub use walltime::Walltime;
