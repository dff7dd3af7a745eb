//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on a file name's extension.

use std::borrow::Cow;

const FALLBACK: &str = "application/octet-stream";
const CHARSET: &str = "; charset=utf-8";

/// Extension of a file name: the text after the last `.`.
///
/// A name without a dot, or ending in one, has no extension.
pub fn extension(file_name: &str) -> Option<&str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Get MIME Content-Type for a file name
///
/// Every `text/*` type carries a UTF-8 charset.
///
/// # Examples
/// ```
/// use sv::http::mime::get_content_type;
/// assert_eq!(get_content_type("index.html"), "text/html; charset=utf-8");
/// assert_eq!(get_content_type("clip.mp4"), "video/mp4");
/// assert_eq!(get_content_type("Makefile"), "application/octet-stream");
/// ```
pub fn get_content_type(file_name: &str) -> Cow<'static, str> {
    let base = lookup(file_name);
    if base.starts_with("text/") {
        Cow::Owned(format!("{base}{CHARSET}"))
    } else {
        Cow::Borrowed(base)
    }
}

/// Bare MIME type without charset
fn lookup(file_name: &str) -> &'static str {
    if file_name == ".gitignore" {
        return "text/plain";
    }

    match extension(file_name) {
        // Web
        Some("js" | "mjs") => "application/javascript",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("html" | "htm") => "text/html",

        // Application
        Some("7z") => "application/x-7z-compressed",
        Some("zip") => "application/zip",
        Some("rtf") => "application/rtf",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        Some("gz") => "application/gzip",
        Some("rar") => "application/vnd.rar",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xhtml") => "application/xhtml+xml",
        Some("sh") => "application/x-sh",
        Some("csh") => "application/x-csh",

        // Fonts
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        // Audio
        Some("wav") => "audio/wav",
        Some("aac") => "audio/aac",
        Some("opus") => "audio/opus",
        Some("mp3") => "audio/mpeg",

        // Images
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("tif" | "tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",

        // Video
        Some("ts") => "video/mp2t",
        Some("avi") => "video/x-msvideo",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mpeg") => "video/mpeg",

        // Plain text, source code and build metadata
        Some("txt" | "dat" | "md") => "text/plain",
        Some("go" | "h" | "c" | "py" | "tex" | "sty" | "m") => "text/plain",
        Some("sum" | "mod" | "lock") => "text/plain",

        // Default
        _ => FALLBACK,
    }
}
