//! Processor Core Library
//!
//! This library implements an external processor for a reverse proxy's
//! streaming side-channel protocol: one gRPC stream per HTTP transaction,
//! dispatched by request path to handlers that continue, mutate or
//! short-circuit the transaction.

pub mod dispatcher;
pub mod encoding;
pub mod handlers;
pub mod headers;
pub mod model;
pub mod pb;
pub mod server;
pub mod service;
pub mod stream;

/// Scripted streams for exercising handlers
pub mod testing;

/// Configuration types and utilities
pub mod config;

/// Error types for processor operations
pub mod error;

/// Logging setup
pub mod logging;

pub use config::ProcessorConfig;
pub use dispatcher::Dispatcher;
pub use error::ProcessorError;
pub use handlers::{PathHandler, StreamContext};
pub use headers::{is_json_content_type, HeaderMutation, Headers};
pub use logging::{init_logging, LoggingConfig};
pub use model::{
    BodyMutation, BodySendMode, Continue, EventKind, HttpBody, HttpHeaders, ImmediateResponse,
    ProcessingEvent, ProcessingModeOverride, ProcessingResponse,
};
pub use server::ProcessorServer;
pub use service::ExternalProcessorService;
pub use stream::{EventStream, GrpcStream};

/// Result type alias for processor operations
pub type Result<T> = std::result::Result<T, ProcessorError>;
