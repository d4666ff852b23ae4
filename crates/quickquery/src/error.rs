//! Error types for quickquery

use thiserror::Error;

/// Result type alias for quickquery operations
pub type DataAccessResult<T> = Result<T, DataAccessError>;

/// The single error type surfaced by every data access operation.
///
/// Driver failures are never swallowed: they are wrapped together with a message
/// describing the step that failed (prepare, execute, row read, ...), and the original
/// error stays reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum DataAccessError {
    /// A `tokio-postgres` call failed.
    #[error("{message}: {source}")]
    Driver {
        message: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Checking a connection out of the pool failed.
    #[cfg(feature = "pool")]
    #[error("{message}: {source}")]
    Pool {
        message: String,
        #[source]
        source: deadpool_postgres::PoolError,
    },

    /// Reading a typed column value failed.
    #[error("{message} from column {column}: {source}")]
    Decode {
        column: String,
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The API was used in a way that can never succeed (unbound parameters, bad config, ...).
    #[error("{0}")]
    Usage(String),
}

impl DataAccessError {
    /// Wrap a driver error with a description of the failing step.
    pub fn driver(message: impl Into<String>, source: tokio_postgres::Error) -> Self {
        Self::Driver {
            message: message.into(),
            source,
        }
    }

    /// Wrap a column read failure.
    pub fn decode(
        column: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// The descriptive message, without the cause.
    pub fn message(&self) -> &str {
        match self {
            Self::Driver { message, .. } => message,
            #[cfg(feature = "pool")]
            Self::Pool { message, .. } => message,
            Self::Decode { message, .. } => message,
            Self::Usage(message) => message,
        }
    }

    /// Check if this error wraps a driver failure.
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver { .. })
    }

    /// Check if this error is a failed pool checkout.
    pub fn is_pool(&self) -> bool {
        match self {
            #[cfg(feature = "pool")]
            Self::Pool { .. } => true,
            _ => false,
        }
    }

    /// Check if this error is a column read failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// The SQLSTATE code reported by the server, if the cause is a database error.
    pub fn db_code(&self) -> Option<&str> {
        match self {
            Self::Driver { source, .. } => source.as_db_error().map(|e| e.code().code()),
            _ => None,
        }
    }
}

/// Extension for attaching a step description to driver results.
pub(crate) trait DriverResultExt<T> {
    fn context(self, message: &str) -> DataAccessResult<T>;
}

impl<T> DriverResultExt<T> for Result<T, tokio_postgres::Error> {
    fn context(self, message: &str) -> DataAccessResult<T> {
        self.map_err(|e| DataAccessError::driver(message, e))
    }
}
