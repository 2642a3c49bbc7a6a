use thiserror::Error;

/// Result type for GridFS operations
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur while configuring, connecting to, or reading from GridFS
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("{message}")]
    Connection {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid file identifier: {id}")]
    InvalidId { id: String },

    #[error("File not found: {id}")]
    NotFound { id: String },

    #[error("Timed out reading file: {id}")]
    Timeout { id: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GridError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap a failure that happened while establishing the backend session
    pub fn connection<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            message: format!("Unable to connect to the MongoDB server ({error})"),
            source: Box::new(error),
        }
    }

    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_id<S: Into<String>>(id: S) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a read timeout error
    pub fn timeout<S: Into<String>>(id: S) -> Self {
        Self::Timeout { id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Errors that belong to a single lookup rather than to the instance.
    ///
    /// Configuration and connection failures happen at construction time only.
    pub fn is_request_scoped(&self) -> bool {
        !matches!(self, Self::Configuration { .. } | Self::Connection { .. })
    }
}

/// Elapsed connect deadline, kept as a concrete error so it can be wrapped
/// like any driver failure.
#[derive(Error, Debug)]
#[error("timed out after {0:?}")]
pub struct ConnectTimeout(pub std::time::Duration);
