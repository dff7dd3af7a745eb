//! Route derivation
//!
//! Maps a path relative to the served root onto the URL path it is served under.

use std::path::{Component, Path};

/// A directory's index, served at the directory's own route
pub const INDEX_FILE: &str = "index.html";

/// Derive the URL route for a path relative to the root.
///
/// `docs/guide.md` becomes `/docs/guide.md`; `docs/index.html` becomes `/docs/`
/// and a top-level `index.html` becomes `/`.
pub fn derive_route(relative: &Path) -> String {
    let segments: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();

    match segments.split_last() {
        Some((last, parents)) if last == INDEX_FILE => {
            let mut route = String::from("/");
            for dir in parents {
                route.push_str(dir);
                route.push('/');
            }
            route
        }
        _ => format!("/{}", segments.join("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_plain_files() {
        assert_eq!(derive_route(Path::new("style.css")), "/style.css");
        assert_eq!(derive_route(Path::new("a/b/c.txt")), "/a/b/c.txt");
        assert_eq!(derive_route(Path::new(".gitignore")), "/.gitignore");
    }

    #[test]
    fn test_index_maps_to_directory() {
        assert_eq!(derive_route(Path::new("index.html")), "/");
        assert_eq!(derive_route(Path::new("a/index.html")), "/a/");
        assert_eq!(derive_route(Path::new("a/b/index.html")), "/a/b/");
    }

    #[test]
    fn test_only_exact_index_name_is_special() {
        assert_eq!(derive_route(Path::new("a/index.htm")), "/a/index.htm");
        assert_eq!(derive_route(Path::new("a/Index.html")), "/a/Index.html");
        assert_eq!(derive_route(Path::new("index.html/x")), "/index.html/x");
    }

    #[test]
    fn test_separators_normalized() {
        let relative: PathBuf = ["docs", "api", "v1.json"].iter().collect();
        assert_eq!(derive_route(&relative), "/docs/api/v1.json");
    }
}
