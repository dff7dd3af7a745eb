//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: exact route lookup, dispatch, access logging.
//! Any method is accepted on a registered route. Paths are percent-decoded before lookup,
//! since routes hold file names as they are on disk.

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use hyper::body::Body;
use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Request, Response};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();

    let endpoint = decode_path(req.uri().path()).and_then(|path| state.routes.get(&path));
    let response = match endpoint {
        Some(endpoint) => endpoint.serve().await,
        None => http::build_404_response(),
    };

    if let Some(format) = &state.access_log {
        log_access(&req, &response, peer_addr, started, format);
    }

    Ok(response)
}

/// Decoded request path; `None` when the escapes do not form valid UTF-8
fn decode_path(raw: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(raw).decode_utf8().ok()
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
    format: &AccessLogFormat,
) {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    // Streamed bodies have no exact size hint; their length is in the header
    entry.body_bytes = response.body().size_hint().exact().or_else(|| {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    });
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Cli, Config};
    use crate::routing::build_route_table;
    use clap::Parser;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::{Method, StatusCode};
    use std::fs;
    use std::path::Path;

    fn state_for(root: &Path, extra: &[&str]) -> Arc<AppState> {
        let root = root.to_string_lossy().into_owned();
        let mut argv = vec!["sv", "-q", "-d", root.as_str()];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv).expect("flags should parse");
        let cfg = Config::load(&cli).expect("config should resolve");
        let routes = build_route_table(&cfg).expect("registration");
        Arc::new(AppState::new(cfg, routes))
    }

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_AGENT, "test")
            .body(Empty::new())
            .expect("valid request")
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().expect("valid addr")
    }

    #[tokio::test]
    async fn test_registered_route() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "<h1>home</h1>").expect("write");
        let state = state_for(dir.path(), &["--access-log"]);

        let resp = handle_request(request(Method::GET, "/"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(body, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_query_string_ignored_for_lookup() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("app.js"), "1").expect("write");
        let state = state_for(dir.path(), &[]);

        let resp = handle_request(request(Method::GET, "/app.js?v=3"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unregistered_route_is_404() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("docs")).expect("mkdir");
        fs::write(dir.path().join("docs/index.html"), "docs").expect("write");
        let state = state_for(dir.path(), &[]);

        for uri in ["/docs", "/docs/index.html", "/missing"] {
            let resp = handle_request(request(Method::GET, uri), Arc::clone(&state), peer())
                .await
                .expect("infallible");
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_encoded_paths_are_decoded() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("my file.txt"), "spaced").expect("write");
        fs::write(dir.path().join("café.html"), "accent").expect("write");
        let state = state_for(dir.path(), &[]);

        for (uri, expected) in [("/my%20file.txt", "spaced"), ("/caf%C3%A9.html", "accent")] {
            let resp = handle_request(request(Method::GET, uri), Arc::clone(&state), peer())
                .await
                .expect("infallible");
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let body = resp.into_body().collect().await.expect("body").to_bytes();
            assert_eq!(body, expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_escape_is_404() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "a").expect("write");
        let state = state_for(dir.path(), &[]);

        let resp = handle_request(request(Method::GET, "/%FF.txt"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/plain.txt").as_deref(), Some("/plain.txt"));
        assert_eq!(decode_path("/a%2Fb").as_deref(), Some("/a/b"));
        assert_eq!(decode_path("/%C3%28"), None);
    }

    #[tokio::test]
    async fn test_any_method_is_served() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("data.json"), "{}").expect("write");
        let state = state_for(dir.path(), &["-e"]);

        let resp = handle_request(request(Method::POST, "/data.json"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
