use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A save was rejected and the follow-up refetch failed as well; the
    /// store still holds the optimistic state.
    #[error("Reconciliation failed after rejected save ({reason}): {source}")]
    Reconciliation {
        reason: String,
        #[source]
        source: Box<BoardError>,
    },
}

impl BoardError {
    /// Short label used when logging rejected saves.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::AccessDenied(_) => "authorization",
            Self::NotFound(_) => "not-found",
            Self::Connection(_) | Self::Io(_) => "transport",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
            Self::Reconciliation { .. } => "reconciliation",
        }
    }
}
