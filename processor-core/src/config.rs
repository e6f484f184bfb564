//! Configuration types and utilities

use crate::error::ProcessorError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Static processor startup configuration.
/// Set once at startup; nothing here changes while streams are served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Address to listen on
    pub listen_address: String,
    /// Port to listen on for the external processing gRPC service
    pub listen_port: u16,
    /// Capacity of each stream's outbound response buffer
    pub response_buffer: usize,
    pub logging: LoggingConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".to_string(),
            listen_port: 0,
            response_buffer: 16,
            logging: LoggingConfig::default(),
        }
    }
}

impl ProcessorConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ProcessorError> {
        format!("{}:{}", self.listen_address, self.listen_port)
            .parse()
            .map_err(|e| ProcessorError::Configuration(format!("Invalid address: {}", e)))
    }

    /// Convert a raw `-p` value into a TCP port.
    pub fn parse_port(raw: i64) -> Result<u16, ProcessorError> {
        u16::try_from(raw)
            .map_err(|_| ProcessorError::Configuration(format!("Invalid listen port: {}", raw)))
    }
}
