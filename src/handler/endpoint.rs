//! File endpoint module
//!
//! One endpoint per discovered file. Eager endpoints hold the file's bytes from startup;
//! lazy endpoints open and stream the file on every request.

use futures_util::StreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::config::{FilesConfig, LoadingMode};
use crate::error::StartupError;
use crate::http::{self, response, ResponseBody};
use crate::logger;
use crate::routing::FileEntry;

#[derive(Debug)]
enum Strategy {
    Eager { payload: Bytes },
    Lazy { attachment_threshold: u64 },
}

/// Serving handler bound to one route
#[derive(Debug)]
pub struct Endpoint {
    entry: FileEntry,
    strategy: Strategy,
}

impl Endpoint {
    /// Build the endpoint the configured mode calls for; eager mode reads the file now.
    pub fn from_config(entry: FileEntry, files: &FilesConfig) -> Result<Self, StartupError> {
        match files.mode {
            LoadingMode::Eager => Self::eager(entry),
            LoadingMode::Lazy => Ok(Self::lazy(entry, files.attachment_threshold())),
        }
    }

    pub fn eager(entry: FileEntry) -> Result<Self, StartupError> {
        let payload = std::fs::read(&entry.path).map_err(|source| StartupError::Load {
            path: entry.path.clone(),
            source,
        })?;
        Ok(Self {
            entry,
            strategy: Strategy::Eager {
                payload: Bytes::from(payload),
            },
        })
    }

    pub const fn lazy(entry: FileEntry, attachment_threshold: u64) -> Self {
        Self {
            entry,
            strategy: Strategy::Lazy {
                attachment_threshold,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.entry.path
    }

    pub async fn serve(&self) -> Response<ResponseBody> {
        match &self.strategy {
            Strategy::Eager { payload } => {
                response::build_payload_response(payload.clone(), &self.entry.content_type)
            }
            Strategy::Lazy {
                attachment_threshold,
            } => self.serve_from_disk(*attachment_threshold).await,
        }
    }

    async fn serve_from_disk(&self, attachment_threshold: u64) -> Response<ResponseBody> {
        let path = &self.entry.path;

        let file = match File::open(path).await {
            Ok(f) => f,
            Err(e) => {
                logger::log_error(&format!("Failed to open '{}': {e}", path.display()));
                return http::build_404_response();
            }
        };

        let size = match file.metadata().await {
            Ok(m) => m.len(),
            Err(e) => {
                logger::log_error(&format!("Failed to stat '{}': {e}", path.display()));
                return http::build_500_response();
            }
        };

        let file_name = self.entry.file_name();
        let attachment = (size > attachment_threshold).then_some(&*file_name);

        response::build_stream_response(
            stream_file(file, path.clone()),
            &self.entry.content_type,
            size,
            attachment,
        )
    }
}

/// Stream a file in chunks, logging how far the copy got if a read fails
fn stream_file(file: File, path: PathBuf) -> ResponseBody {
    let mut copied: usize = 0;
    let frames = ReaderStream::new(file).map(move |chunk| match chunk {
        Ok(bytes) => {
            copied += bytes.len();
            Ok(Frame::data(bytes))
        }
        Err(e) => {
            logger::log_error(&format!(
                "Copy of '{}' failed after {copied} bytes: {e}",
                path.display()
            ));
            Err(e)
        }
    });
    StreamBody::new(frames).boxed_unsync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
    use hyper::StatusCode;
    use std::fs;

    fn write_entry(root: &Path, relative: &str, content: &[u8]) -> FileEntry {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(&path, content).expect("write file");
        FileEntry::new(root, PathBuf::from(relative))
    }

    async fn body_bytes(resp: Response<ResponseBody>) -> Bytes {
        resp.into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes()
    }

    #[tokio::test]
    async fn test_eager_serves_startup_bytes_repeatedly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = b"body { color: red }".to_vec();
        let entry = write_entry(dir.path(), "a/style.css", &content);
        let endpoint = Endpoint::eager(entry).expect("eager load");

        // Later changes on disk are not observed
        fs::remove_file(dir.path().join("a/style.css")).expect("remove");

        for _ in 0..3 {
            let resp = endpoint.serve().await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers()[CONTENT_TYPE], "text/css; charset=utf-8");
            assert_eq!(body_bytes(resp).await, content);
        }
    }

    #[test]
    fn test_eager_load_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = FileEntry::new(dir.path(), PathBuf::from("missing.txt"));
        let err = Endpoint::eager(entry).err().expect("should fail");
        assert!(matches!(err, StartupError::Load { .. }));
    }

    #[tokio::test]
    async fn test_lazy_small_file_inline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = write_entry(dir.path(), "notes.txt", b"hello");
        let endpoint = Endpoint::lazy(entry, 1_000_000);

        let resp = endpoint.serve().await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert!(resp.headers().get(CONTENT_DISPOSITION).is_none());
        assert_eq!(body_bytes(resp).await, "hello");
    }

    #[tokio::test]
    async fn test_lazy_reads_current_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = write_entry(dir.path(), "live.txt", b"v1");
        let endpoint = Endpoint::lazy(entry, 1_000_000);

        fs::write(dir.path().join("live.txt"), b"version 2").expect("rewrite");
        let resp = endpoint.serve().await;
        assert_eq!(resp.headers()[CONTENT_LENGTH], "9");
        assert_eq!(body_bytes(resp).await, "version 2");
    }

    #[tokio::test]
    async fn test_lazy_large_file_is_attachment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = vec![7u8; 2_000_000];
        let entry = write_entry(dir.path(), "big.bin", &content);
        let endpoint = Endpoint::lazy(entry, 1_000_000);

        let resp = endpoint.serve().await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "2000000");
        assert_eq!(
            resp.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"big.bin\""
        );
        assert_eq!(body_bytes(resp).await.len(), 2_000_000);
    }

    #[tokio::test]
    async fn test_lazy_threshold_is_exclusive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = write_entry(dir.path(), "edge.bin", &[0u8; 10]);
        let endpoint = Endpoint::lazy(entry, 10);

        let resp = endpoint.serve().await;
        assert!(resp.headers().get(CONTENT_DISPOSITION).is_none());
    }

    #[tokio::test]
    async fn test_lazy_deleted_file_is_404() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = write_entry(dir.path(), "gone.html", b"<p>bye</p>");
        let endpoint = Endpoint::lazy(entry, 1_000_000);

        fs::remove_file(dir.path().join("gone.html")).expect("remove");
        let resp = endpoint.serve().await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_failure_ends_stream_with_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Opening a directory succeeds on unix; reading it fails with EISDIR
        let file = File::open(dir.path()).await.expect("open dir");

        let body = stream_file(file, dir.path().to_path_buf());
        assert!(body.collect().await.is_err());
    }

    #[test]
    fn test_from_config_respects_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = write_entry(dir.path(), "a.txt", b"a");
        let mut files = FilesConfig {
            root: dir.path().to_path_buf(),
            exclude: r"^\.".to_string(),
            mode: LoadingMode::Lazy,
            max_size_mb: 3,
        };

        let endpoint = Endpoint::from_config(entry.clone(), &files).expect("lazy endpoint");
        assert!(matches!(
            endpoint.strategy,
            Strategy::Lazy {
                attachment_threshold: 3_000_000
            }
        ));

        files.mode = LoadingMode::Eager;
        let endpoint = Endpoint::from_config(entry, &files).expect("eager endpoint");
        assert!(matches!(endpoint.strategy, Strategy::Eager { ref payload } if payload == "a"));
    }
}
