// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrustError {
    // Configuration errors
    #[error("Chain configuration not found: {0}")]
    ConfigNotFound(String),

    // Knowledge-graph errors
    #[error("Query '{query}' failed: {reason}")]
    QueryFailure { query: String, reason: String },

    #[error("Malformed response for query '{query}': {reason}")]
    MalformedResponse { query: String, reason: String },

    // RPC errors
    #[error("RPC call failed: {0}")]
    RpcFailure(String),

    // Cache errors (always downgraded to a miss / no-op before reaching callers)
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    // Implementation errors
    #[error("Classification input missing: {0}")]
    ClassificationInputMissing(&'static str),

    // Validation errors
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid origin URL: {0}")]
    InvalidOrigin(String),
}

impl TrustError {
    /// Check if error is fatal (raised before any I/O, never worth degrading around)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TrustError::ConfigNotFound(_) | TrustError::ClassificationInputMissing(_)
        )
    }

    /// Check if error may be silently downgraded (cache is best-effort)
    pub fn is_best_effort(&self) -> bool {
        matches!(self, TrustError::CacheUnavailable(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TrustError::ConfigNotFound(_) => "configuration",

            TrustError::QueryFailure { .. } | TrustError::MalformedResponse { .. } => "query",

            TrustError::RpcFailure(_) => "rpc",

            TrustError::CacheUnavailable(_) => "cache",

            TrustError::ClassificationInputMissing(_) => "classification",

            TrustError::InvalidAddress(_) | TrustError::InvalidOrigin(_) => "validation",
        }
    }
}

// Result type alias for convenience
pub type TrustResult<T> = Result<T, TrustError>;
