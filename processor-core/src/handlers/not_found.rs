use super::{PathHandler, StreamContext};
use crate::error::ProcessorError;
use crate::model::{ImmediateResponse, ProcessingResponse};
use crate::stream::EventStream;
use async_trait::async_trait;
use tracing::debug;

/// Answers every request with a plain-text 404 without contacting the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundHandler;

impl NotFoundHandler {
    pub fn response() -> ProcessingResponse {
        ProcessingResponse::Immediate(ImmediateResponse::plain_text(
            404,
            "Not found",
            "Requested path was not found",
        ))
    }
}

#[async_trait]
impl PathHandler for NotFoundHandler {
    fn name(&self) -> &'static str {
        "not_found"
    }

    async fn handle(
        &self,
        ctx: &StreamContext,
        stream: &mut dyn EventStream,
    ) -> Result<(), ProcessorError> {
        debug!("Rejecting {} with 404", ctx.path);
        stream.send(Self::response()).await
    }
}
