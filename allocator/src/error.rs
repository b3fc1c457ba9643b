use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Inventory data fault: the room number does not decode to a floor and position.
    #[error("malformed room number {identifier:?}: {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    #[error("requested {requested} rooms; a booking must ask for 1 to 5 rooms")]
    InvalidCount { requested: usize },

    #[error("requested {requested} rooms but only {available} are available")]
    InsufficientInventory { requested: usize, available: usize },

    #[error("selection invariant violated: {0}")]
    InternalInconsistency(String),
}

impl AllocError {
    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        AllocError::MalformedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AllocError::InvalidCount { .. } | AllocError::InsufficientInventory { .. }
        )
    }
}
