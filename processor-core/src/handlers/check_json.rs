//! Conditional JSON body validation
//!
//! How deep this handler looks into a transaction depends on the request:
//! the body is only requested when the request has one and its content type
//! names JSON. The origin call is redirected to `/echo` either way, and the
//! outcome is reported back to the client in [`STATUS_HEADER`].

use super::{PathHandler, StreamContext};
use crate::error::ProcessorError;
use crate::headers::{is_json_content_type, HeaderMutation, CONTENT_TYPE_HEADER, PATH_HEADER};
use crate::model::{
    Continue, EventKind, ImmediateResponse, ProcessingEvent, ProcessingModeOverride,
    ProcessingResponse,
};
use crate::stream::{expect_event, EventStream, Expected};
use async_trait::async_trait;
use serde::de::IgnoredAny;
use tracing::{debug, info};

pub const STATUS_HEADER: &str = "x-json-status";

/// Verdict reported in [`STATUS_HEADER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStatus {
    Valid,
    NotJson,
}

impl JsonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonStatus::Valid => "Body is valid JSON",
            JsonStatus::NotJson => "Body is not JSON",
        }
    }
}

/// Where the exchange stands. Each waiting state accepts exactly one event
/// kind; anything else ends the stream without another response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonCheckState {
    AwaitBody,
    AwaitResponseHeaders(JsonStatus),
    Done,
    Rejected,
}

/// Whether `body` is a single complete JSON text (surrounding whitespace allowed).
pub fn is_valid_json(body: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(body).is_ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckJsonHandler;

impl CheckJsonHandler {
    pub fn invalid_json_response() -> ProcessingResponse {
        ProcessingResponse::Immediate(ImmediateResponse::plain_text(
            400,
            "Invalid JSON",
            "Request body was not valid JSON",
        ))
    }

    async fn step(
        state: JsonCheckState,
        stream: &mut dyn EventStream,
    ) -> Result<JsonCheckState, ProcessorError> {
        match state {
            JsonCheckState::AwaitBody => {
                let body = match expect_event(stream, EventKind::RequestBody).await? {
                    Expected::Event(ProcessingEvent::RequestBody(body)) => body,
                    _ => return Ok(JsonCheckState::Done),
                };

                if is_valid_json(&body.body) {
                    stream
                        .send(ProcessingResponse::ContinueRequestBody(Continue::default()))
                        .await?;
                    Ok(JsonCheckState::AwaitResponseHeaders(JsonStatus::Valid))
                } else {
                    info!(body_len = body.body.len(), "Rejecting request with invalid JSON body");
                    stream.send(Self::invalid_json_response()).await?;
                    Ok(JsonCheckState::Rejected)
                }
            }
            JsonCheckState::AwaitResponseHeaders(status) => {
                if let Expected::Event(_) = expect_event(stream, EventKind::ResponseHeaders).await? {
                    stream
                        .send(ProcessingResponse::ContinueResponseHeaders(Continue::with_headers(
                            HeaderMutation::new().set(STATUS_HEADER, status.as_str()),
                        )))
                        .await?;
                }
                Ok(JsonCheckState::Done)
            }
            JsonCheckState::Done | JsonCheckState::Rejected => Ok(state),
        }
    }
}

#[async_trait]
impl PathHandler for CheckJsonHandler {
    fn name(&self) -> &'static str {
        "check_json"
    }

    async fn handle(
        &self,
        ctx: &StreamContext,
        stream: &mut dyn EventStream,
    ) -> Result<(), ProcessorError> {
        let content_type = ctx.request.headers.get(CONTENT_TYPE_HEADER);
        debug!("Checking content-type {} to see if it is JSON", content_type);
        let candidate = !ctx.request.end_of_stream && is_json_content_type(content_type);

        stream
            .send(ProcessingResponse::ContinueRequestHeaders {
                response: Continue::with_headers(HeaderMutation::new().set(PATH_HEADER, "/echo")),
                mode_override: candidate.then(ProcessingModeOverride::buffered_request_body),
            })
            .await?;

        let mut state = if candidate {
            JsonCheckState::AwaitBody
        } else {
            JsonCheckState::AwaitResponseHeaders(JsonStatus::NotJson)
        };

        while !matches!(state, JsonCheckState::Done | JsonCheckState::Rejected) {
            state = Self::step(state, stream).await?;
        }
        Ok(())
    }
}
