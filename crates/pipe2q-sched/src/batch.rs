//! Fixed-size batching of the incoming command stream.

use crate::error::{SubmitError, SubmitResult};

/// An ordered, non-empty group of shell commands submitted as one job.
///
/// The commands of a batch run sequentially inside the job, in the order
/// they appeared on standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch {
    commands: Vec<String>,
}

impl CommandBatch {
    /// Partition `commands` into consecutive batches of `size` elements,
    /// the last possibly smaller.
    ///
    /// Empty input yields zero batches. Fails if `size` is zero.
    pub fn split(commands: &[String], size: usize) -> SubmitResult<Vec<CommandBatch>> {
        if size < 1 {
            return Err(SubmitError::InvalidBatchSize(size));
        }
        Ok(commands
            .chunks(size)
            .map(|chunk| CommandBatch {
                commands: chunk.to_vec(),
            })
            .collect())
    }

    /// The batch's commands, in input order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Number of commands in the batch.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the batch holds no commands. `split` never produces an
    /// empty batch.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
