//! Listener and server lifecycle

use crate::config::ProcessorConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ProcessorError;
use crate::service::ExternalProcessorService;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

pub struct ProcessorServer {
    config: ProcessorConfig,
    dispatcher: Dispatcher,
}

impl ProcessorServer {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::with_default_routes(),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Bind the configured address. Failing here is a startup failure.
    pub async fn bind(&self) -> Result<TcpListener, ProcessorError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        Ok(listener)
    }

    /// Serve streams on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ProcessorError>
    where
        F: Future<Output = ()>,
    {
        let local_addr: Option<SocketAddr> = listener.local_addr().ok();
        info!("Listening on {}", display_addr(local_addr));

        let service = ExternalProcessorService::new(self.dispatcher)
            .with_response_buffer(self.config.response_buffer);

        Server::builder()
            .add_service(service.into_server())
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await?;

        info!("Processor stopped");
        Ok(())
    }
}

fn display_addr(addr: Option<SocketAddr>) -> String {
    addr.map(|a| a.to_string())
        .unwrap_or_else(|| "unknown address".to_string())
}
