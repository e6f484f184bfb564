//! Processor Binary Entry Point

use clap::Parser;
use processor::{run_processor, usage, Args, EXIT_BIND_FAILURE, EXIT_USAGE};
use processor_core::{init_logging, ProcessorServer};
use std::process;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_USAGE);
        }
    };

    if args.help {
        eprint!("{}", usage());
        process::exit(EXIT_USAGE);
    }

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n", e);
            eprint!("{}", usage());
            process::exit(EXIT_USAGE);
        }
    };

    init_logging(&config.logging)?;

    let port = config.listen_port;
    let server = ProcessorServer::new(config);
    let listener = match server.bind().await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to listen on port {}: {}", port, e);
            process::exit(EXIT_BIND_FAILURE);
        }
    };

    if let Err(e) = run_processor(server, listener).await {
        tracing::error!("Processor failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
