use clap::Parser;
use processor_core::init_logging;
use std::process;
use test_server::{serve, usage, Args, EXIT_BIND_FAILURE, EXIT_USAGE};
use tokio::net::TcpListener;

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

    let listener = match TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to listen on {}: {}", config.listen_addr, e);
            process::exit(EXIT_BIND_FAILURE);
        }
    };

    serve(listener, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received, stopping test target...");
    })
    .await?;

    Ok(())
}
