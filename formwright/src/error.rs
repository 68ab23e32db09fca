use formwright_types::ValidationError;

/// Error type for persistence gateway operations.
///
/// Both the local and the remote realizations report failures through this
/// type so callers can treat them alike.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The input was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Nothing is stored under the requested id.
    #[error("{operation}: {kind} '{id}' not found")]
    NotFound {
        operation: &'static str,
        kind: &'static str,
        id: String,
    },

    /// The credential was missing or rejected. Callers should re-authenticate.
    #[error("{operation}: not authorized")]
    Auth { operation: &'static str },

    /// The server answered with a non-success status.
    #[error("{operation} failed with HTTP status {status}")]
    Status { operation: &'static str, status: u16 },

    /// The store was unreachable or rejected the write.
    #[error("{operation} failed: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl GatewayError {
    /// Create a persistence error from any error type.
    pub fn persistence(operation: &'static str, err: impl Into<anyhow::Error>) -> Self {
        Self::Persistence {
            operation,
            source: err.into(),
        }
    }

    pub fn not_found(operation: &'static str, kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            operation,
            kind,
            id: id.to_string(),
        }
    }

    /// Check if this error means the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the caller needs to log in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check if this is a correctable input problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The operation that failed, when known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Auth { operation }
            | Self::NotFound { operation, .. }
            | Self::Status { operation, .. }
            | Self::Persistence { operation, .. } => Some(operation),
            Self::Validation(_) => None,
        }
    }
}
