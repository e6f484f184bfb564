use super::{PathHandler, StreamContext};
use crate::error::ProcessorError;
use crate::stream::EventStream;
use async_trait::async_trait;
use tracing::debug;

/// Closes the stream without a response, so the proxy forwards the
/// transaction untouched. Used for the test target's own endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughHandler;

#[async_trait]
impl PathHandler for PassthroughHandler {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn handle(
        &self,
        ctx: &StreamContext,
        _stream: &mut dyn EventStream,
    ) -> Result<(), ProcessorError> {
        debug!("Passing {} through unmodified", ctx.path);
        Ok(())
    }
}
