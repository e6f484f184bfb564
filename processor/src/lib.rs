//! Processor Binary
//!
//! Command-line front end for the external processor: parses `-p/-d/-h`,
//! binds the gRPC listener and serves until interrupted.

use clap::{CommandFactory, Parser};
use processor_core::{LoggingConfig, ProcessorConfig, ProcessorError, ProcessorServer};
use tokio::net::TcpListener;

/// Exit status for bad or missing arguments, and for `-h`.
pub const EXIT_USAGE: i32 = 2;

/// Exit status when the listener cannot be bound.
pub const EXIT_BIND_FAILURE: i32 = 3;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "processor",
    about = "External processing service for the proxy's ext_proc filter",
    disable_help_flag = true
)]
pub struct Args {
    /// Port to listen on (required)
    #[arg(short = 'p', value_name = "PORT", allow_negative_numbers = true)]
    pub port: Option<i64>,

    /// Enable debug logging
    #[arg(short = 'd')]
    pub debug: bool,

    /// Print this message
    #[arg(short = 'h')]
    pub help: bool,
}

impl Args {
    /// Validate the arguments into a startup configuration.
    pub fn into_config(self) -> Result<ProcessorConfig, ProcessorError> {
        let raw = self
            .port
            .ok_or_else(|| ProcessorError::Configuration("Listen port (-p) is required".to_string()))?;
        let listen_port = ProcessorConfig::parse_port(raw)?;

        let logging = if self.debug {
            LoggingConfig::debug()
        } else {
            LoggingConfig::default()
        };

        Ok(ProcessorConfig {
            listen_port,
            logging,
            ..Default::default()
        })
    }
}

/// Usage text printed for `-h` and for argument errors.
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn run_processor(
    server: ProcessorServer,
    listener: TcpListener,
) -> Result<(), ProcessorError> {
    tracing::info!(
        "Starting processor (log level: {})",
        server.config().logging.level
    );

    server
        .serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, stopping processor...");
        })
        .await
}
