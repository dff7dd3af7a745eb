// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` and serve each on its own task.
///
/// Returns once `shutdown` resolves; connections already accepted keep running on their
/// tasks until the runtime is dropped.
pub async fn start_server_loop<S>(listener: TcpListener, state: Arc<AppState>, shutdown: S)
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Cli, Config};
    use crate::routing::build_route_table;
    use crate::server::create_listener;
    use clap::Parser;
    use std::fs;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.expect("write request");

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.expect("read response");
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn test_serves_over_tcp_until_shutdown() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("a")).expect("mkdir");
        fs::write(dir.path().join("a/index.html"), "<p>a</p>").expect("write");

        let root = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["sv", "-q", "-e", "-d", root.as_str()]).expect("flags");
        let cfg = Config::load(&cli).expect("config");
        let routes = build_route_table(&cfg).expect("registration");
        let state = Arc::new(AppState::new(cfg, routes));

        let listener = create_listener("127.0.0.1:0".parse().expect("addr")).expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, state, async move {
            let _ = stop_rx.await;
        }));

        let found = get(addr, "/a/").await;
        assert!(found.starts_with("HTTP/1.1 200 OK"), "{found}");
        assert!(found.to_ascii_lowercase().contains("content-type: text/html; charset=utf-8"));
        assert!(found.ends_with("<p>a</p>"));

        let missing = get(addr, "/a/index.html").await;
        assert!(missing.starts_with("HTTP/1.1 404 Not Found"), "{missing}");

        stop_tx.send(()).expect("server still running");
        server.await.expect("server loop exits cleanly");
    }
}
