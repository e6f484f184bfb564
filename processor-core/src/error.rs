//! Error types for stream processing

use thiserror::Error;
use tonic::Status;

/// Main error type for processor operations
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Receiving from or sending to the proxy failed
    #[error("Transport error: {0}")]
    Transport(#[from] Status),

    /// The proxy went away before a response could be delivered
    #[error("Response channel closed")]
    ChannelClosed,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// The gRPC server stopped with an error
    #[error("Server error: {0}")]
    Server(#[from] tonic::transport::Error),

    /// General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProcessorError> for Status {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Transport(status) => status,
            ProcessorError::ChannelClosed => Status::cancelled("response channel closed"),
            other => Status::internal(other.to_string()),
        }
    }
}
