use allocator::AllocError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Allocation(AllocError),

    #[error("booking lost to concurrent bookings on all {attempts} attempts")]
    BookingConflict { attempts: usize },

    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Allocation(AllocError::InvalidCount { .. }) => "invalid_count",
            AppError::Allocation(AllocError::InsufficientInventory { .. }) => {
                "insufficient_inventory"
            }
            AppError::Allocation(AllocError::MalformedIdentifier { .. }) => "data_integrity",
            AppError::Allocation(AllocError::InternalInconsistency(_)) => "internal",
            AppError::BookingConflict { .. } => "booking_conflict",
            AppError::Storage(_) => "storage",
        }
    }
}

impl From<AllocError> for AppError {
    fn from(err: AllocError) -> Self {
        AppError::Allocation(err)
    }
}

/// Repository errors may carry an [`AllocError`] from row mapping; those are
/// surfaced as allocation faults rather than generic storage failures.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AllocError>() {
            Ok(alloc) => AppError::Allocation(alloc),
            Err(other) => AppError::Storage(other),
        }
    }
}
