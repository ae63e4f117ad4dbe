//! Submission script generation.

use crate::batch::CommandBatch;
use crate::options::SubmissionOptions;
use crate::walltime::Walltime;

/// Shell block that moves the job into the directory qsub was invoked
/// from. The conditional is evaluated by the job's shell at run time; the
/// block itself is always emitted.
const WORKDIR_BLOCK: &str = "if [ ! -z ${PBS_O_WORKDIR+x} ]; then\ncd $PBS_O_WORKDIR\nfi\n";

/// Render the submission script for one batch.
///
/// Directive order is fixed: shebang, resource request, walltime, then the
/// optional job-name and test-queue directives, followed by the working
/// directory block and the batch's commands, one per line.
pub fn render_script(
    batch: &CommandBatch,
    opts: &SubmissionOptions,
    walltime: &Walltime,
) -> String {
    let mut script = String::new();

    script.push_str("#!/bin/sh\n");
    script.push_str(&format!("#PBS -l nodes=1:ppn={}\n", opts.processors));
    script.push_str(&format!("#PBS -l walltime={walltime}\n"));
    if let Some(name) = opts.job_name.as_deref() {
        if !name.is_empty() {
            script.push_str(&format!("#PBS -N n-{name}\n"));
        }
    }
    if opts.use_test_queue {
        script.push_str("#PBS -q testq\n");
    }

    script.push('\n');
    script.push_str(WORKDIR_BLOCK);

    script.push('\n');
    for command in batch.commands() {
        script.push_str(command);
        script.push('\n');
    }

    script
}
