//! Processing events and responses
//!
//! The protocol's oneof messages become plain enums here so that handlers
//! match on them exhaustively. Conversions to and from the wire types in
//! [`crate::pb`] live next to the enums.

use crate::headers::{HeaderMutation, Headers};
use crate::pb;
use crate::pb::processing_request::Request;
use crate::pb::processing_response::Response;
use bytes::Bytes;
use std::fmt;

/// Request or response headers as delivered by the proxy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    pub headers: Headers,
    /// No body follows these headers
    pub end_of_stream: bool,
}

/// A complete (buffered) body or one streamed chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpBody {
    pub body: Bytes,
    pub end_of_stream: bool,
}

/// One message received from the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEvent {
    RequestHeaders(HttpHeaders),
    RequestBody(HttpBody),
    ResponseHeaders(HttpHeaders),
    ResponseBody(HttpBody),
    RequestTrailers(Headers),
    ResponseTrailers(Headers),
    /// A message with no phase set. Never legal in any step.
    Empty,
}

/// Shape of a [`ProcessingEvent`], used when a step waits for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RequestHeaders,
    RequestBody,
    ResponseHeaders,
    ResponseBody,
    RequestTrailers,
    ResponseTrailers,
    Empty,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::RequestHeaders => "request headers",
            EventKind::RequestBody => "request body",
            EventKind::ResponseHeaders => "response headers",
            EventKind::ResponseBody => "response body",
            EventKind::RequestTrailers => "request trailers",
            EventKind::ResponseTrailers => "response trailers",
            EventKind::Empty => "empty message",
        };
        f.write_str(name)
    }
}

impl ProcessingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProcessingEvent::RequestHeaders(_) => EventKind::RequestHeaders,
            ProcessingEvent::RequestBody(_) => EventKind::RequestBody,
            ProcessingEvent::ResponseHeaders(_) => EventKind::ResponseHeaders,
            ProcessingEvent::ResponseBody(_) => EventKind::ResponseBody,
            ProcessingEvent::RequestTrailers(_) => EventKind::RequestTrailers,
            ProcessingEvent::ResponseTrailers(_) => EventKind::ResponseTrailers,
            ProcessingEvent::Empty => EventKind::Empty,
        }
    }
}

impl From<pb::HttpHeaders> for HttpHeaders {
    fn from(msg: pb::HttpHeaders) -> Self {
        Self {
            headers: msg.headers.into(),
            end_of_stream: msg.end_of_stream,
        }
    }
}

impl From<pb::HttpBody> for HttpBody {
    fn from(msg: pb::HttpBody) -> Self {
        Self {
            body: Bytes::from(msg.body),
            end_of_stream: msg.end_of_stream,
        }
    }
}

impl From<pb::ProcessingRequest> for ProcessingEvent {
    fn from(msg: pb::ProcessingRequest) -> Self {
        match msg.request {
            Some(Request::RequestHeaders(h)) => ProcessingEvent::RequestHeaders(h.into()),
            Some(Request::ResponseHeaders(h)) => ProcessingEvent::ResponseHeaders(h.into()),
            Some(Request::RequestBody(b)) => ProcessingEvent::RequestBody(b.into()),
            Some(Request::ResponseBody(b)) => ProcessingEvent::ResponseBody(b.into()),
            Some(Request::RequestTrailers(t)) => ProcessingEvent::RequestTrailers(t.trailers.into()),
            Some(Request::ResponseTrailers(t)) => {
                ProcessingEvent::ResponseTrailers(t.trailers.into())
            }
            None => ProcessingEvent::Empty,
        }
    }
}

impl From<ProcessingEvent> for pb::ProcessingRequest {
    fn from(event: ProcessingEvent) -> Self {
        let headers = |h: HttpHeaders| pb::HttpHeaders {
            headers: Some(pb::HeaderMap::from(&h.headers)),
            end_of_stream: h.end_of_stream,
        };
        let body = |b: HttpBody| pb::HttpBody {
            body: b.body.to_vec(),
            end_of_stream: b.end_of_stream,
        };
        let trailers = |t: Headers| pb::HttpTrailers {
            trailers: Some(pb::HeaderMap::from(&t)),
        };

        let request = match event {
            ProcessingEvent::RequestHeaders(h) => Some(Request::RequestHeaders(headers(h))),
            ProcessingEvent::RequestBody(b) => Some(Request::RequestBody(body(b))),
            ProcessingEvent::ResponseHeaders(h) => Some(Request::ResponseHeaders(headers(h))),
            ProcessingEvent::ResponseBody(b) => Some(Request::ResponseBody(body(b))),
            ProcessingEvent::RequestTrailers(t) => Some(Request::RequestTrailers(trailers(t))),
            ProcessingEvent::ResponseTrailers(t) => Some(Request::ResponseTrailers(trailers(t))),
            ProcessingEvent::Empty => None,
        };

        pb::ProcessingRequest { request }
    }
}

/// How the proxy should deliver a body to us
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodySendMode {
    #[default]
    None,
    Streamed,
    Buffered,
}

impl From<BodySendMode> for pb::processing_mode::BodySendMode {
    fn from(mode: BodySendMode) -> Self {
        match mode {
            BodySendMode::None => pb::processing_mode::BodySendMode::None,
            BodySendMode::Streamed => pb::processing_mode::BodySendMode::Streamed,
            BodySendMode::Buffered => pb::processing_mode::BodySendMode::Buffered,
        }
    }
}

/// Asks the proxy to send more of the transaction than headers alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingModeOverride {
    pub request_body: BodySendMode,
    pub response_body: BodySendMode,
}

impl ProcessingModeOverride {
    pub fn buffered_request_body() -> Self {
        Self {
            request_body: BodySendMode::Buffered,
            ..Default::default()
        }
    }

    pub fn streamed_response_body() -> Self {
        Self {
            response_body: BodySendMode::Streamed,
            ..Default::default()
        }
    }
}

impl From<ProcessingModeOverride> for pb::ProcessingMode {
    fn from(mode: ProcessingModeOverride) -> Self {
        pb::ProcessingMode {
            request_body_mode: pb::processing_mode::BodySendMode::from(mode.request_body) as i32,
            response_body_mode: pb::processing_mode::BodySendMode::from(mode.response_body) as i32,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyMutation {
    Replace(Bytes),
    Clear,
}

/// Payload of every continue-style response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Continue {
    pub header_mutation: HeaderMutation,
    pub body_mutation: Option<BodyMutation>,
}

impl Continue {
    pub fn with_headers(header_mutation: HeaderMutation) -> Self {
        Self {
            header_mutation,
            body_mutation: None,
        }
    }

    pub fn with_body(body_mutation: BodyMutation) -> Self {
        Self {
            header_mutation: HeaderMutation::default(),
            body_mutation: Some(body_mutation),
        }
    }

    fn into_common(self) -> Option<pb::CommonResponse> {
        let header_mutation = self.header_mutation.into_pb();
        let body_mutation = self.body_mutation.map(|mutation| pb::BodyMutation {
            mutation: Some(match mutation {
                BodyMutation::Replace(body) => pb::body_mutation::Mutation::Body(body.to_vec()),
                BodyMutation::Clear => pb::body_mutation::Mutation::ClearBody(true),
            }),
        });

        if header_mutation.is_none() && body_mutation.is_none() {
            return None;
        }

        Some(pb::CommonResponse {
            header_mutation,
            body_mutation,
            ..Default::default()
        })
    }
}

/// A synthesized HTTP response that ends the transaction at the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmediateResponse {
    pub status: u16,
    pub headers: HeaderMutation,
    pub body: Bytes,
    /// Free text the proxy may log; never sent to the client
    pub details: String,
}

impl ImmediateResponse {
    /// Plain-text error response
    pub fn plain_text(status: u16, body: &str, details: &str) -> Self {
        Self {
            status,
            headers: HeaderMutation::new().set(crate::headers::CONTENT_TYPE_HEADER, "text/plain"),
            body: Bytes::copy_from_slice(body.as_bytes()),
            details: details.to_string(),
        }
    }
}

/// One message sent back to the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResponse {
    ContinueRequestHeaders {
        response: Continue,
        mode_override: Option<ProcessingModeOverride>,
    },
    ContinueRequestBody(Continue),
    ContinueResponseHeaders(Continue),
    ContinueResponseBody(Continue),
    Immediate(ImmediateResponse),
}

impl From<ProcessingResponse> for pb::ProcessingResponse {
    fn from(response: ProcessingResponse) -> Self {
        let headers = |c: Continue| pb::HeadersResponse {
            response: c.into_common(),
        };
        let body = |c: Continue| pb::BodyResponse {
            response: c.into_common(),
        };

        let mut mode = None;
        let response = match response {
            ProcessingResponse::ContinueRequestHeaders {
                response,
                mode_override,
            } => {
                mode = mode_override.map(pb::ProcessingMode::from);
                Response::RequestHeaders(headers(response))
            }
            ProcessingResponse::ContinueRequestBody(c) => Response::RequestBody(body(c)),
            ProcessingResponse::ContinueResponseHeaders(c) => Response::ResponseHeaders(headers(c)),
            ProcessingResponse::ContinueResponseBody(c) => Response::ResponseBody(body(c)),
            ProcessingResponse::Immediate(immediate) => {
                Response::ImmediateResponse(pb::ImmediateResponse {
                    status: Some(pb::HttpStatus {
                        code: i32::from(immediate.status),
                    }),
                    headers: immediate.headers.into_pb(),
                    body: immediate.body.to_vec(),
                    grpc_status: None,
                    details: immediate.details,
                })
            }
        };

        pb::ProcessingResponse {
            response: Some(response),
            mode_override: mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_headers(path: &str) -> pb::ProcessingRequest {
        pb::ProcessingRequest {
            request: Some(Request::RequestHeaders(pb::HttpHeaders {
                headers: Some(pb::HeaderMap {
                    headers: vec![pb::HeaderValue {
                        key: ":path".into(),
                        value: path.into(),
                        raw_value: Vec::new(),
                    }],
                }),
                end_of_stream: true,
            })),
        }
    }

    #[test]
    fn test_request_headers_from_wire() {
        let event = ProcessingEvent::from(request_headers("/hello"));
        match event {
            ProcessingEvent::RequestHeaders(h) => {
                assert_eq!(h.headers.get(":path"), "/hello");
                assert!(h.end_of_stream);
            }
            other => panic!("Expected request headers, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_empty_request_has_its_own_kind() {
        let event = ProcessingEvent::from(pb::ProcessingRequest { request: None });
        assert_eq!(event, ProcessingEvent::Empty);
        assert_eq!(event.kind(), EventKind::Empty);

        let wire = pb::ProcessingRequest::from(ProcessingEvent::Empty);
        assert!(wire.request.is_none());
    }

    #[test]
    fn test_trailers_map_to_their_own_kind() {
        let msg = pb::ProcessingRequest {
            request: Some(Request::ResponseTrailers(pb::HttpTrailers { trailers: None })),
        };
        let event = ProcessingEvent::from(msg);
        assert_eq!(event.kind(), EventKind::ResponseTrailers);
    }

    #[test]
    fn test_empty_body_continue_has_no_common_response() {
        let wire = pb::ProcessingResponse::from(ProcessingResponse::ContinueRequestBody(
            Continue::default(),
        ));
        assert!(wire.mode_override.is_none());
        match wire.response {
            Some(Response::RequestBody(body)) => assert!(body.response.is_none()),
            other => panic!("Expected request body response, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_override_only_on_request_headers() {
        let wire = pb::ProcessingResponse::from(ProcessingResponse::ContinueRequestHeaders {
            response: Continue::with_headers(HeaderMutation::new().set(":path", "/echo")),
            mode_override: Some(ProcessingModeOverride::buffered_request_body()),
        });

        let mode = wire.mode_override.expect("mode override");
        assert_eq!(
            mode.request_body_mode,
            pb::processing_mode::BodySendMode::Buffered as i32
        );
        assert_eq!(
            mode.response_body_mode,
            pb::processing_mode::BodySendMode::None as i32
        );
        assert!(matches!(wire.response, Some(Response::RequestHeaders(_))));
    }

    #[test]
    fn test_immediate_response_wire_form() {
        let response = ProcessingResponse::Immediate(ImmediateResponse::plain_text(
            404,
            "Not found",
            "Requested path was not found",
        ));
        let wire = pb::ProcessingResponse::from(response);
        match wire.response {
            Some(Response::ImmediateResponse(immediate)) => {
                assert_eq!(immediate.status.unwrap().code, 404);
                assert_eq!(immediate.body, b"Not found".to_vec());
                assert_eq!(immediate.details, "Requested path was not found");
                let header = immediate.headers.unwrap().set_headers[0].header.clone().unwrap();
                assert_eq!(header.key, "content-type");
                assert_eq!(header.value, "text/plain");
            }
            other => panic!("Expected immediate response, got {:?}", other),
        }
    }

    #[test]
    fn test_body_clear_wire_form() {
        let wire = pb::ProcessingResponse::from(ProcessingResponse::ContinueResponseBody(
            Continue::with_body(BodyMutation::Clear),
        ));
        match wire.response {
            Some(Response::ResponseBody(body)) => {
                let mutation = body.response.unwrap().body_mutation.unwrap().mutation;
                assert_eq!(mutation, Some(pb::body_mutation::Mutation::ClearBody(true)));
            }
            other => panic!("Expected response body response, got {:?}", other),
        }
    }

    #[test]
    fn test_body_replacement_wire_form() {
        let wire = pb::ProcessingResponse::from(ProcessingResponse::ContinueResponseBody(
            Continue::with_body(BodyMutation::Replace(Bytes::from_static(b"YWJj"))),
        ));
        match wire.response {
            Some(Response::ResponseBody(body)) => {
                let mutation = body.response.unwrap().body_mutation.unwrap().mutation;
                assert_eq!(
                    mutation,
                    Some(pb::body_mutation::Mutation::Body(b"YWJj".to_vec()))
                );
            }
            other => panic!("Expected response body response, got {:?}", other),
        }
    }
}
