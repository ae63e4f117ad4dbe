//! PBS (Portable Batch System) integration for job submission.
//!
//! Renders `#PBS` directive scripts and drives the `qsub` submission
//! command for PBS/Torque/PBS Pro schedulers.

mod adapter;
mod templates;

pub use adapter::{QsubRunner, SubmissionResult};
pub use templates::render_script;
