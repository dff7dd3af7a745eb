//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::convert::Infallible;
use std::io;

/// Body type shared by in-memory and streamed responses
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Box a fully-buffered body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never: Infallible| match never {})
        .boxed_unsync()
}

/// Build 200 response from an in-memory payload
pub fn build_payload_response(data: Bytes, content_type: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(full(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            build_500_response()
        })
}

/// Build 200 response around a streamed body of known length
///
/// `attachment` names the file when the client should download rather than render it.
pub fn build_stream_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    attachment: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(name) = attachment {
        builder = builder.header(CONTENT_DISPOSITION, content_disposition(name));
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        build_500_response()
    })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_plain_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_plain_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

fn build_plain_response(status: StatusCode, message: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(full(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(full(message));
            *resp.status_mut() = status;
            resp
        })
}

/// `attachment; filename="<name>"`, with quotes and backslashes escaped
fn content_disposition(file_name: &str) -> String {
    let escaped = file_name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{escaped}\"")
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
