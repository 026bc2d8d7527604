use thiserror::Error;

use crate::api::ApiError;
use crate::capture::ValidationError;
use crate::gate::OperationClass;

/// Failure of a single orchestrated operation.
///
/// Every variant is recoverable: the caller may simply retry the action.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} already in progress")]
    Busy(OperationClass),
    #[error("could not {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: ApiError,
    },
}

impl SyncError {
    pub(crate) fn transport(operation: &'static str, source: ApiError) -> Self {
        SyncError::Transport { operation, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }
}
