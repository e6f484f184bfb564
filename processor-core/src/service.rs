//! gRPC service implementation

use crate::dispatcher::Dispatcher;
use crate::pb;
use crate::pb::external_processor_server::{ExternalProcessor, ExternalProcessorServer};
use crate::stream::GrpcStream;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, warn};

/// Serves `envoy.service.ext_proc.v3.ExternalProcessor/Process`.
///
/// Every call gets its own task; the dispatcher is shared read-only.
#[derive(Debug, Clone)]
pub struct ExternalProcessorService {
    dispatcher: Arc<Dispatcher>,
    response_buffer: usize,
}

impl ExternalProcessorService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            response_buffer: 16,
        }
    }

    pub fn with_response_buffer(mut self, response_buffer: usize) -> Self {
        self.response_buffer = response_buffer.max(1);
        self
    }

    pub fn into_server(self) -> ExternalProcessorServer<Self> {
        ExternalProcessorServer::new(self)
    }
}

impl Default for ExternalProcessorService {
    fn default() -> Self {
        Self::new(Dispatcher::with_default_routes())
    }
}

#[tonic::async_trait]
impl ExternalProcessor for ExternalProcessorService {
    type ProcessStream = ReceiverStream<Result<pb::ProcessingResponse, Status>>;

    async fn process(
        &self,
        request: Request<Streaming<pb::ProcessingRequest>>,
    ) -> Result<Response<Self::ProcessStream>, Status> {
        let remote_addr = request.remote_addr();
        let inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(self.response_buffer);
        let dispatcher = self.dispatcher.clone();

        debug!(?remote_addr, "Processing stream opened");

        tokio::spawn(async move {
            let mut stream = GrpcStream::new(inbound, tx);
            match dispatcher.dispatch(&mut stream).await {
                // Dropping the sender ends the response stream with OK
                Ok(()) => debug!("Processing stream finished"),
                Err(e) => {
                    warn!("Processing stream failed: {}", e);
                    stream.fail(e.into()).await;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
