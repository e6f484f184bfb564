//! Stream dispatcher
//!
//! Reads the first event of a stream, which must be the request headers,
//! and hands the rest of the stream to the handler registered for the
//! request's exact `:path`.

use crate::error::ProcessorError;
use crate::handlers::{
    AddHeaderHandler, CheckJsonHandler, EchoEncodeHandler, NotFoundHandler, PassthroughHandler,
    PathHandler, StreamContext,
};
use crate::model::ProcessingEvent;
use crate::stream::EventStream;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn, Instrument};

/// Paths of the test target that go through without processing
pub const PASSTHROUGH_PATHS: [&str; 4] = ["/echo", "/help", "/hello", "/json"];

/// Maps request paths to handlers
#[derive(Clone, Default)]
pub struct Dispatcher {
    routes: HashMap<String, Arc<dyn PathHandler>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<_> = self.routes.keys().collect();
        paths.sort();
        f.debug_struct("Dispatcher").field("paths", &paths).finish()
    }
}

impl Dispatcher {
    /// Dispatcher with no routes; every stream is passed through.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed route table served by the processor.
    pub fn with_default_routes() -> Self {
        PASSTHROUGH_PATHS
            .iter()
            .fold(Self::new(), |d, path| d.route(*path, PassthroughHandler))
            .route("/notfound", NotFoundHandler)
            .route("/addHeader", AddHeaderHandler)
            .route("/checkJson", CheckJsonHandler)
            .route("/echoencode", EchoEncodeHandler)
    }

    /// Register `handler` for requests whose `:path` is exactly `path`.
    pub fn route(mut self, path: impl Into<String>, handler: impl PathHandler + 'static) -> Self {
        self.routes.insert(path.into(), Arc::new(handler));
        self
    }

    pub fn handler_for(&self, path: &str) -> Option<&Arc<dyn PathHandler>> {
        self.routes.get(path)
    }

    /// Drive one stream to completion.
    ///
    /// A stream that closes before its first event, or whose first event is
    /// not the request headers, ends successfully without any response.
    /// Unknown paths likewise get no response, which tells the proxy to
    /// carry on unmodified.
    pub async fn dispatch(&self, stream: &mut dyn EventStream) -> Result<(), ProcessorError> {
        let request = match stream.recv().await? {
            Some(ProcessingEvent::RequestHeaders(headers)) => headers,
            Some(other) => {
                warn!(received = %other.kind(), "Expecting request headers message first");
                return Ok(());
            }
            None => {
                debug!("Stream closed by proxy");
                return Ok(());
            }
        };

        let ctx = StreamContext::new(request);
        let span = ctx.span.clone();

        async move {
            debug!("Received request headers for {}", ctx.path);
            match self.handler_for(&ctx.path) {
                Some(handler) => {
                    debug!(handler = handler.name(), "Dispatching stream");
                    handler.handle(&ctx, stream).await
                }
                None => {
                    debug!("No handler registered, leaving request unmodified");
                    Ok(())
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProcessingResponse;
    use crate::testing::{request_body, request_headers, response_headers, MockStream};
    use tonic::Status;

    #[tokio::test]
    async fn test_closed_before_first_event() {
        let mut stream = MockStream::new(vec![]);
        Dispatcher::with_default_routes()
            .dispatch(&mut stream)
            .await
            .unwrap();
        assert!(stream.sent.is_empty());
    }

    #[tokio::test]
    async fn test_first_event_must_be_request_headers() {
        let mut stream = MockStream::new(vec![request_body(b"{}"), response_headers("200")]);
        Dispatcher::with_default_routes()
            .dispatch(&mut stream)
            .await
            .unwrap();
        assert!(stream.sent.is_empty());
        assert_eq!(stream.receives, 1);
    }

    #[tokio::test]
    async fn test_empty_first_message_ends_cleanly() {
        let mut stream = MockStream::new(vec![
            ProcessingEvent::Empty,
            request_headers("/notfound", &[], true),
        ]);
        Dispatcher::with_default_routes()
            .dispatch(&mut stream)
            .await
            .unwrap();
        assert!(stream.sent.is_empty());
        assert_eq!(stream.remaining(), 1);
    }

    #[tokio::test]
    async fn test_unknown_path_sends_nothing() {
        for path in ["/", "/unknown", "/notfound/extra", "/NOTFOUND", "/checkJson?x=1"] {
            let mut stream = MockStream::new(vec![
                request_headers(path, &[], true),
                response_headers("200"),
            ]);
            Dispatcher::with_default_routes()
                .dispatch(&mut stream)
                .await
                .unwrap();
            assert!(stream.sent.is_empty(), "path {} should pass through", path);
        }
    }

    #[tokio::test]
    async fn test_missing_path_sends_nothing() {
        let mut stream = MockStream::new(vec![ProcessingEvent::RequestHeaders(Default::default())]);
        Dispatcher::with_default_routes()
            .dispatch(&mut stream)
            .await
            .unwrap();
        assert!(stream.sent.is_empty());
    }

    #[tokio::test]
    async fn test_passthrough_paths() {
        for path in PASSTHROUGH_PATHS {
            let mut stream = MockStream::new(vec![request_headers(path, &[], true)]);
            Dispatcher::with_default_routes()
                .dispatch(&mut stream)
                .await
                .unwrap();
            assert!(stream.sent.is_empty());
            assert_eq!(stream.receives, 1);
        }
    }

    #[tokio::test]
    async fn test_dispatches_by_exact_path() {
        let mut stream = MockStream::new(vec![request_headers("/notfound", &[], true)]);
        Dispatcher::with_default_routes()
            .dispatch(&mut stream)
            .await
            .unwrap();
        assert_eq!(stream.sent, vec![NotFoundHandler::response()]);
    }

    #[tokio::test]
    async fn test_first_match_path_is_used() {
        let mut stream = MockStream::new(vec![request_headers(
            "/notfound",
            &[(":path", "/hello")],
            true,
        )]);
        Dispatcher::with_default_routes()
            .dispatch(&mut stream)
            .await
            .unwrap();
        assert!(matches!(stream.sent[0], ProcessingResponse::Immediate(_)));
    }

    #[tokio::test]
    async fn test_custom_route() {
        let dispatcher = Dispatcher::new().route("/custom", NotFoundHandler);
        let mut stream = MockStream::new(vec![request_headers("/custom", &[], true)]);
        dispatcher.dispatch(&mut stream).await.unwrap();
        assert_eq!(stream.sent.len(), 1);

        let mut stream = MockStream::new(vec![request_headers("/notfound", &[], true)]);
        dispatcher.dispatch(&mut stream).await.unwrap();
        assert!(stream.sent.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_on_first_receive() {
        let mut stream = MockStream::new(vec![]).fail_after_script(Status::unavailable("gone"));
        let result = Dispatcher::with_default_routes().dispatch(&mut stream).await;
        assert!(matches!(result, Err(ProcessorError::Transport(_))));
    }
}
