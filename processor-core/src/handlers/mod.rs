//! Per-path stream handlers
//!
//! Each handler drives one stream to completion after the dispatcher has
//! consumed the request headers. Handlers never see another stream and hold
//! no state between calls.

use crate::error::ProcessorError;
use crate::model::HttpHeaders;
use crate::stream::EventStream;
use async_trait::async_trait;
use uuid::Uuid;

pub mod add_header;
pub mod check_json;
pub mod echo_encode;
pub mod not_found;
pub mod passthrough;

pub use add_header::AddHeaderHandler;
pub use check_json::{CheckJsonHandler, JsonStatus};
pub use echo_encode::EchoEncodeHandler;
pub use not_found::NotFoundHandler;
pub use passthrough::PassthroughHandler;

/// What a handler knows about its stream
#[derive(Debug, Clone)]
pub struct StreamContext {
    pub stream_id: Uuid,
    /// Value of `:path` (empty when the proxy sent none)
    pub path: String,
    /// The first event of the stream
    pub request: HttpHeaders,
    /// Span every log line of this stream is recorded under
    pub span: tracing::Span,
}

impl StreamContext {
    pub fn new(request: HttpHeaders) -> Self {
        let stream_id = Uuid::new_v4();
        let path = request.headers.get(crate::headers::PATH_HEADER).to_string();
        let span = tracing::info_span!("stream", %stream_id, path = %path);
        Self {
            stream_id,
            path,
            request,
            span,
        }
    }
}

#[async_trait]
pub trait PathHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Drive `stream` until this handler has nothing more to say.
    ///
    /// Returning `Ok(())` closes the stream normally, whether or not anything
    /// was sent. An error closes it with an error status.
    async fn handle(
        &self,
        ctx: &StreamContext,
        stream: &mut dyn EventStream,
    ) -> Result<(), ProcessorError>;
}
