//! HTTP test target
//!
//! A small origin server for exercising the processor end to end behind
//! the proxy. Served over HTTP/1.1 and cleartext HTTP/2.

use axum::{
    body::Body,
    extract::Query,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use clap::{CommandFactory, Parser};
use http_body_util::StreamBody;
use hyper::body::Frame;
use processor_core::{LoggingConfig, ProcessorConfig, ProcessorError};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::num::IntErrorKind;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const HELP_MESSAGE: &str = "GET  /              : Print default message
GET  /help          : Print this message
POST /echo          : Echo back whatever you posted
GET  /json          : Return JSON content. Use optional \"size\" parameter for extra data.
GET  /json-trailers : Return JSON content with the trailer \"x-test-target: Yes\"
GET  /data?size=xxx : Return arbitrary characters xxx bytes long
";

pub const INDEX_MESSAGE: &str = "Use /help to find out what is possible\n";
pub const HELLO_MESSAGE: &str = "Hello, World!";

/// Trailer sent by `/json-trailers`
pub const TRAILER_NAME: &str = "x-test-target";

pub const DEFAULT_DATA_SIZE: usize = 100;
/// Largest `size` the target will generate
pub const MAX_DATA_SIZE: usize = 16 * 1024 * 1024;
const PATTERN: &[u8] = b"0123456789";

pub const EXIT_USAGE: i32 = 2;
pub const EXIT_BIND_FAILURE: i32 = 3;

// --- Configuration ---

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "test_server",
    about = "HTTP test target for the external processor",
    disable_help_flag = true
)]
pub struct Args {
    /// TCP listen port (required)
    #[arg(short = 'p', value_name = "PORT", allow_negative_numbers = true)]
    pub port: Option<i64>,

    /// Enable debug logging
    #[arg(short = 'd')]
    pub debug: bool,

    /// Print help message
    #[arg(short = 'h')]
    pub help: bool,
}

#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub listen_addr: SocketAddr,
    pub logging: LoggingConfig,
}

impl Args {
    pub fn into_config(self) -> Result<TargetConfig, ProcessorError> {
        let raw = self
            .port
            .ok_or_else(|| ProcessorError::Configuration("Listen port (-p) is required".to_string()))?;
        let port = ProcessorConfig::parse_port(raw)?;

        Ok(TargetConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            logging: if self.debug {
                LoggingConfig::debug()
            } else {
                LoggingConfig::default()
            },
        })
    }
}

pub fn usage() -> String {
    Args::command().render_help().to_string()
}

// --- Server ---

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/help", get(help_handler))
        .route("/hello", get(hello_handler))
        .route("/echo", post(echo_handler))
        .route("/json", get(json_handler))
        .route("/json-trailers", get(json_trailers_handler))
        .route("/data", get(data_handler))
        .layer(TraceLayer::new_for_http())
}

/// Serve the target on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Test target listening on http://{}", addr);
    }
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
}

// --- Payloads ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleJson {
    testing: i32,
    is_testing: bool,
    how_testy_are_we: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_data: Option<String>,
}

impl SampleJson {
    fn new(extra: Option<Vec<u8>>) -> Self {
        Self {
            testing: 123,
            is_testing: true,
            how_testy_are_we: "Very!",
            extra_data: extra.map(|data| STANDARD.encode(data)),
        }
    }

    /// One JSON document followed by a newline.
    fn to_body(&self) -> Result<Vec<u8>, StatusCode> {
        let mut body = serde_json::to_vec(self).map_err(|e| {
            tracing::error!("Failed to encode JSON: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        body.push(b'\n');
        Ok(body)
    }
}

/// Missing or empty → `default`; unparsable → 0; negative → 0.
/// Anything above [`MAX_DATA_SIZE`] is clamped to it.
pub fn parse_size(raw: Option<&str>, default: usize) -> usize {
    let size = match raw {
        None | Some("") => default,
        Some(s) => match s.parse::<u64>() {
            Ok(n) => usize::try_from(n).unwrap_or(MAX_DATA_SIZE),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_DATA_SIZE,
            Err(_) => 0,
        },
    };
    size.min(MAX_DATA_SIZE)
}

/// `size` bytes of the repeating `0123456789` pattern.
pub fn make_data(size: usize) -> Vec<u8> {
    PATTERN.iter().copied().cycle().take(size).collect()
}

// --- Handlers ---

fn plain_text(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

async fn index_handler() -> Response {
    plain_text(INDEX_MESSAGE)
}

async fn help_handler() -> Response {
    plain_text(HELP_MESSAGE)
}

async fn hello_handler() -> Response {
    plain_text(HELLO_MESSAGE)
}

async fn echo_handler(headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }
    response
}

async fn json_handler(Query(params): Query<HashMap<String, String>>) -> Result<Response, StatusCode> {
    let size = parse_size(params.get("size").map(String::as_str), 0);
    let extra = (size > 0).then(|| make_data(size));
    let body = SampleJson::new(extra).to_body()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn json_trailers_handler() -> Result<Response, StatusCode> {
    let body = SampleJson::new(None).to_body()?;

    let mut trailers = HeaderMap::new();
    trailers.insert(TRAILER_NAME, HeaderValue::from_static("Yes"));

    let frames = tokio_stream::iter(vec![
        Ok::<_, Infallible>(Frame::data(Bytes::from(body))),
        Ok(Frame::trailers(trailers)),
    ]);

    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::TRAILER, TRAILER_NAME)
        .body(Body::new(StreamBody::new(frames)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn data_handler(Query(params): Query<HashMap<String, String>>) -> Response {
    let size = parse_size(params.get("size").map(String::as_str), DEFAULT_DATA_SIZE);
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, size.to_string()),
        ],
        make_data(size),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size(None, 100), 100);
        assert_eq!(parse_size(Some(""), 100), 100);
        assert_eq!(parse_size(Some("25"), 100), 25);
        assert_eq!(parse_size(Some("lots"), 100), 0);
        assert_eq!(parse_size(Some("-4"), 100), 0);
        assert_eq!(parse_size(Some("99999999999999"), 100), MAX_DATA_SIZE);
        assert_eq!(parse_size(Some("99999999999999999999999"), 100), MAX_DATA_SIZE);
    }

    #[test]
    fn test_make_data_pattern() {
        assert_eq!(make_data(0), b"");
        assert_eq!(make_data(4), b"0123");
        assert_eq!(make_data(13), b"0123456789012");
    }

    #[test]
    fn test_sample_json_shape() {
        let body = SampleJson::new(None).to_body().unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "{\"testing\":123,\"isTesting\":true,\"howTestyAreWe\":\"Very!\"}\n"
        );

        let body = SampleJson::new(Some(make_data(3))).to_body().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["extraData"], "MDEy");
    }

    #[test]
    fn test_args_validation() {
        let args = Args::try_parse_from(["test_server", "-p", "8080", "-d"]).unwrap();
        let config = args.into_config().unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.logging.level, "debug");

        let args = Args::try_parse_from(["test_server"]).unwrap();
        assert!(args.into_config().is_err());

        let args = Args::try_parse_from(["test_server", "-p", "-1"]).unwrap();
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_port_validation_matches_processor() {
        for raw in [-1i64, 65536, 70000] {
            let target = Args { port: Some(raw), ..Default::default() }.into_config();
            let processor = ProcessorConfig::parse_port(raw);
            match (target, processor) {
                (Err(ProcessorError::Configuration(a)), Err(ProcessorError::Configuration(b))) => {
                    assert_eq!(a, b)
                }
                other => panic!("Expected matching configuration errors, got {:?}", other),
            }
        }
    }
}
