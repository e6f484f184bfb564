//! The per-transaction event stream
//!
//! Handlers talk to the proxy only through [`EventStream`], which lets the
//! same handler code run against a live gRPC stream or a scripted mock.

use crate::error::ProcessorError;
use crate::model::{EventKind, ProcessingEvent, ProcessingResponse};
use crate::pb;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tonic::{Status, Streaming};
use tracing::{debug, error};

#[async_trait]
pub trait EventStream: Send {
    /// Next event from the proxy; `Ok(None)` once the proxy has closed its side.
    async fn recv(&mut self) -> Result<Option<ProcessingEvent>, ProcessorError>;

    /// Hand one response back to the proxy.
    async fn send(&mut self, response: ProcessingResponse) -> Result<(), ProcessorError>;
}

/// Outcome of waiting for a specific event kind
#[derive(Debug)]
pub enum Expected {
    /// The event arrived as required
    Event(ProcessingEvent),
    /// The proxy closed the stream cleanly
    Closed,
    /// Something else arrived; already logged
    Violation(EventKind),
}

/// Receive the next event and check that it has the `expected` shape.
///
/// A mismatch is a protocol-sequence violation: it is logged here and the
/// caller is expected to end the stream quietly. Transport errors still
/// propagate.
pub async fn expect_event(
    stream: &mut dyn EventStream,
    expected: EventKind,
) -> Result<Expected, ProcessorError> {
    match stream.recv().await? {
        Some(event) if event.kind() == expected => Ok(Expected::Event(event)),
        Some(event) => {
            error!(
                expected = %expected,
                received = %event.kind(),
                "Expecting {} as the next message",
                expected
            );
            Ok(Expected::Violation(event.kind()))
        }
        None => {
            debug!(expected = %expected, "Stream closed by proxy");
            Ok(Expected::Closed)
        }
    }
}

/// Live stream: inbound half from tonic, outbound half feeding the
/// `ReceiverStream` returned to the client.
pub struct GrpcStream {
    inbound: Streaming<pb::ProcessingRequest>,
    outbound: mpsc::Sender<Result<pb::ProcessingResponse, Status>>,
}

impl GrpcStream {
    pub fn new(
        inbound: Streaming<pb::ProcessingRequest>,
        outbound: mpsc::Sender<Result<pb::ProcessingResponse, Status>>,
    ) -> Self {
        Self { inbound, outbound }
    }

    /// Close the stream with an error status.
    pub async fn fail(self, status: Status) {
        // The client may already be gone; nothing more to do in that case
        let _ = self.outbound.send(Err(status)).await;
    }
}

#[async_trait]
impl EventStream for GrpcStream {
    async fn recv(&mut self) -> Result<Option<ProcessingEvent>, ProcessorError> {
        Ok(self.inbound.message().await?.map(ProcessingEvent::from))
    }

    async fn send(&mut self, response: ProcessingResponse) -> Result<(), ProcessorError> {
        self.outbound
            .send(Ok(response.into()))
            .await
            .map_err(|_| ProcessorError::ChannelClosed)
    }
}
