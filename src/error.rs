//! Error handling shared by the pi-utils command-line tools.

/// A specialized `Result` type for pi-utils operations.
pub type Result<T> = std::result::Result<T, UtilError>;

/// The main error type for pi-utils operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or conflicting command-line input, detected before any loop starts
    #[error("{0}")]
    Config(String),

    /// A single tick's acquisition failed
    #[error("{0}")]
    Read(String),

    /// Sensor bus or chip failure
    #[error("Sensor error: {0}")]
    Sensor(String),

    /// Camera capture failed
    #[error("Capture error: {0}")]
    Capture(String),
}

impl UtilError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new read error
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Create a new sensor error
    pub fn sensor(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }

    /// Create a new capture error
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// True for errors that are fatal before a polling loop starts.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
