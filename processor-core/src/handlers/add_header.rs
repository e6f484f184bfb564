use super::{PathHandler, StreamContext};
use crate::error::ProcessorError;
use crate::headers::{HeaderMutation, PATH_HEADER};
use crate::model::{Continue, EventKind, ProcessingResponse};
use crate::stream::{expect_event, EventStream, Expected};
use async_trait::async_trait;
use tracing::debug;

pub const STATUS_HEADER: &str = "x-external-processor-status";
pub const STATUS_VALUE: &str = "We were here";

/// Sends the request to `/hello` on the origin and marks the response
/// with [`STATUS_HEADER`]. Bodies are never inspected.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddHeaderHandler;

#[async_trait]
impl PathHandler for AddHeaderHandler {
    fn name(&self) -> &'static str {
        "add_header"
    }

    async fn handle(
        &self,
        _ctx: &StreamContext,
        stream: &mut dyn EventStream,
    ) -> Result<(), ProcessorError> {
        // No mode override: the next message is the origin's response headers
        stream
            .send(ProcessingResponse::ContinueRequestHeaders {
                response: Continue::with_headers(HeaderMutation::new().set(PATH_HEADER, "/hello")),
                mode_override: None,
            })
            .await?;

        match expect_event(stream, EventKind::ResponseHeaders).await? {
            Expected::Event(_) => {
                debug!("Adding {} to response", STATUS_HEADER);
                stream
                    .send(ProcessingResponse::ContinueResponseHeaders(Continue::with_headers(
                        HeaderMutation::new().set(STATUS_HEADER, STATUS_VALUE),
                    )))
                    .await
            }
            Expected::Closed | Expected::Violation(_) => Ok(()),
        }
    }
}
