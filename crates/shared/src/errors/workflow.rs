use crate::errors::service::{ErrorKind, ServiceError};
use serde::Serialize;
use thiserror::Error;

/// How far a multi-step operation got before it failed.
///
/// Store writes in a workflow commit independently, so a failure after the
/// first write leaves earlier writes in place. Callers that see
/// `PartiallyApplied` should re-read the affected resources before retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WriteProgress {
    RejectedBeforeWrite,
    PartiallyApplied { committed_writes: usize },
}

impl WriteProgress {
    pub fn is_partial(&self) -> bool {
        matches!(self, WriteProgress::PartiallyApplied { .. })
    }
}

/// Counts committed writes while a workflow runs.
#[derive(Debug, Default)]
pub struct WriteLedger {
    committed: usize,
}

impl WriteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self) {
        self.committed += 1;
    }

    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn progress(&self) -> WriteProgress {
        if self.committed == 0 {
            WriteProgress::RejectedBeforeWrite
        } else {
            WriteProgress::PartiallyApplied {
                committed_writes: self.committed,
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("{error} (trace_id={trace_id}, progress={progress:?})")]
pub struct WorkflowError {
    #[source]
    pub error: ServiceError,
    pub progress: WriteProgress,
    pub trace_id: String,
}

impl WorkflowError {
    pub fn new(error: ServiceError, progress: WriteProgress, trace_id: impl Into<String>) -> Self {
        Self {
            error,
            progress,
            trace_id: trace_id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn code(&self) -> &'static str {
        self.error.code()
    }
}
