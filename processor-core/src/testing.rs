//! Scripted stream for driving handlers without a proxy

use crate::error::ProcessorError;
use crate::handlers::StreamContext;
use crate::headers::Headers;
use crate::model::{HttpBody, HttpHeaders, ProcessingEvent, ProcessingResponse};
use crate::stream::EventStream;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use tonic::Status;

/// Replays a fixed list of events and records every response sent.
///
/// When the script runs out, `recv` reports a clean close, unless
/// [`MockStream::fail_after_script`] was set.
#[derive(Debug, Default)]
pub struct MockStream {
    script: VecDeque<ProcessingEvent>,
    pub sent: Vec<ProcessingResponse>,
    pub receives: usize,
    failure: Option<Status>,
}

impl MockStream {
    pub fn new(script: Vec<ProcessingEvent>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    /// Report `status` as a transport error once the script is exhausted.
    pub fn fail_after_script(mut self, status: Status) -> Self {
        self.failure = Some(status);
        self
    }

    /// Events the handler never read
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl EventStream for MockStream {
    async fn recv(&mut self) -> Result<Option<ProcessingEvent>, ProcessorError> {
        self.receives += 1;
        match self.script.pop_front() {
            Some(event) => Ok(Some(event)),
            None => match self.failure.take() {
                Some(status) => Err(ProcessorError::Transport(status)),
                None => Ok(None),
            },
        }
    }

    async fn send(&mut self, response: ProcessingResponse) -> Result<(), ProcessorError> {
        self.sent.push(response);
        Ok(())
    }
}

/// Request headers for `path`, with any extra headers appended in order.
pub fn request_headers(path: &str, extra: &[(&str, &str)], end_of_stream: bool) -> ProcessingEvent {
    let mut headers = Headers::new();
    headers.push(":method", if end_of_stream { "GET" } else { "POST" });
    headers.push(":path", path);
    for (key, value) in extra {
        headers.push(*key, *value);
    }
    ProcessingEvent::RequestHeaders(HttpHeaders {
        headers,
        end_of_stream,
    })
}

pub fn request_body(body: &[u8]) -> ProcessingEvent {
    ProcessingEvent::RequestBody(HttpBody {
        body: Bytes::copy_from_slice(body),
        end_of_stream: true,
    })
}

pub fn response_headers(status: &str) -> ProcessingEvent {
    let mut headers = Headers::new();
    headers.push(":status", status);
    headers.push("content-type", "text/plain");
    ProcessingEvent::ResponseHeaders(HttpHeaders {
        headers,
        end_of_stream: false,
    })
}

pub fn response_body(chunk: &[u8], end_of_stream: bool) -> ProcessingEvent {
    ProcessingEvent::ResponseBody(HttpBody {
        body: Bytes::copy_from_slice(chunk),
        end_of_stream,
    })
}

/// Context for a stream whose first event is [`request_headers`]`(path, extra, end_of_stream)`.
pub fn stream_context(path: &str, extra: &[(&str, &str)], end_of_stream: bool) -> StreamContext {
    match request_headers(path, extra, end_of_stream) {
        ProcessingEvent::RequestHeaders(first) => StreamContext::new(first),
        _ => unreachable!("request_headers always builds request headers"),
    }
}
