use super::{PathHandler, StreamContext};
use crate::encoding::Base64ChunkEncoder;
use crate::error::ProcessorError;
use crate::headers::{HeaderMutation, CONTENT_LENGTH_HEADER, PATH_HEADER};
use crate::model::{
    BodyMutation, Continue, EventKind, ProcessingEvent, ProcessingModeOverride, ProcessingResponse,
};
use crate::stream::EventStream;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, error};

/// Echoes the request body through the origin and base64-encodes the
/// response body chunk by chunk as it streams back.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoEncodeHandler;

#[async_trait]
impl PathHandler for EchoEncodeHandler {
    fn name(&self) -> &'static str {
        "echo_encode"
    }

    async fn handle(
        &self,
        _ctx: &StreamContext,
        stream: &mut dyn EventStream,
    ) -> Result<(), ProcessorError> {
        stream
            .send(ProcessingResponse::ContinueRequestHeaders {
                response: Continue::with_headers(HeaderMutation::new().set(PATH_HEADER, "/echo")),
                mode_override: Some(ProcessingModeOverride::streamed_response_body()),
            })
            .await?;

        let mut encoder = Base64ChunkEncoder::new();

        // Response headers first, then any number of body chunks
        while let Some(event) = stream.recv().await? {
            match event {
                ProcessingEvent::ResponseHeaders(_) => {
                    // The encoded body is longer than the original
                    stream
                        .send(ProcessingResponse::ContinueResponseHeaders(Continue::with_headers(
                            HeaderMutation::new().remove(CONTENT_LENGTH_HEADER),
                        )))
                        .await?;
                }
                ProcessingEvent::ResponseBody(chunk) => {
                    let encoded = encoder.encode(&chunk.body, chunk.end_of_stream);
                    debug!(
                        chunk_len = chunk.body.len(),
                        encoded_len = encoded.len(),
                        end_of_stream = chunk.end_of_stream,
                        "Encoded response chunk"
                    );
                    // Chunks held back whole for the next group carry no output
                    let mutation = if encoded.is_empty() {
                        BodyMutation::Clear
                    } else {
                        BodyMutation::Replace(Bytes::from(encoded))
                    };
                    stream
                        .send(ProcessingResponse::ContinueResponseBody(Continue::with_body(
                            mutation,
                        )))
                        .await?;
                }
                other => {
                    error!(
                        expected = %EventKind::ResponseBody,
                        received = %other.kind(),
                        "Unexpected message while encoding response"
                    );
                    return Ok(());
                }
            }
        }

        debug!("Stream closed by proxy");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BodySendMode;
    use crate::testing::{request_body, response_body, response_headers, stream_context, MockStream};

    fn replaced_body(response: &ProcessingResponse) -> String {
        match response {
            ProcessingResponse::ContinueResponseBody(Continue {
                body_mutation: Some(BodyMutation::Replace(body)),
                ..
            }) => String::from_utf8(body.to_vec()).unwrap(),
            other => panic!("Expected body replacement, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_streams_encoded_chunks() {
        let ctx = stream_context("/echoencode", &[("content-type", "text/plain")], false);
        let mut stream = MockStream::new(vec![
            response_headers("200"),
            response_body(b"abcde", false),
            response_body(b"fg", true),
        ]);

        EchoEncodeHandler.handle(&ctx, &mut stream).await.unwrap();

        assert_eq!(stream.sent.len(), 4);
        match &stream.sent[0] {
            ProcessingResponse::ContinueRequestHeaders {
                mode_override: Some(mode),
                ..
            } => {
                assert_eq!(mode.response_body, BodySendMode::Streamed);
                assert_eq!(mode.request_body, BodySendMode::None);
            }
            other => panic!("Expected request headers response, got {:?}", other),
        }
        match &stream.sent[1] {
            ProcessingResponse::ContinueResponseHeaders(c) => {
                assert_eq!(c.header_mutation.removed_headers(), &["content-length".to_string()]);
            }
            other => panic!("Expected response headers response, got {:?}", other),
        }
        assert_eq!(replaced_body(&stream.sent[2]), "YWJj");
        assert_eq!(replaced_body(&stream.sent[3]), "ZGVmZw==");
    }

    #[tokio::test]
    async fn test_short_chunk_is_cleared_then_carried_over() {
        let ctx = stream_context("/echoencode", &[], false);
        let mut stream = MockStream::new(vec![
            response_headers("200"),
            response_body(b"ab", false),
            response_body(b"c", true),
        ]);

        EchoEncodeHandler.handle(&ctx, &mut stream).await.unwrap();

        assert_eq!(stream.sent.len(), 4);
        assert_eq!(
            stream.sent[2],
            ProcessingResponse::ContinueResponseBody(Continue::with_body(BodyMutation::Clear))
        );
        assert_eq!(replaced_body(&stream.sent[3]), "YWJj");
    }

    #[tokio::test]
    async fn test_unexpected_event_stops_processing() {
        let ctx = stream_context("/echoencode", &[], false);
        let mut stream = MockStream::new(vec![request_body(b"late"), response_headers("200")]);

        EchoEncodeHandler.handle(&ctx, &mut stream).await.unwrap();

        assert_eq!(stream.sent.len(), 1);
        assert_eq!(stream.remaining(), 1);
    }
}
