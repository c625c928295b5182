//! Location resolution.
//!
//! Turns the path a user typed (or a link target) into an absolute [`Url`]
//! that the fetch layer can read. Local paths are accepted without a scheme,
//! and directories resolve to their `index.html`/`index.htm`.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub use url::Url;

/// File names tried, case-insensitively, when a directory is opened.
const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Resolve `path` to a fetchable location.
///
/// # Algorithm
///
/// STEP 1: With no context, try `path` as a local file or directory.
///
/// STEP 2: Otherwise parse `path` as a URL, relative to `context` if one is
/// given.
///
/// STEP 3: `file:` results are checked on disk again so that directories
/// become their index file and missing files resolve to nothing.
///
/// Returns `None` when nothing readable could be found; the loader reports
/// that as a 404.
#[must_use]
pub fn resolve_location(path: &str, context: Option<&Url>) -> Option<Url> {
    // STEP 1
    if context.is_none()
        && let Some(local) = resolve_file(Path::new(path))
    {
        return Some(local);
    }

    // STEP 2
    let url = match context {
        Some(base) => base.join(path).ok()?,
        None => Url::parse(path).ok()?,
    };

    // STEP 3
    if url.scheme() == "file" {
        let file = url.to_file_path().ok()?;
        return resolve_file(&file);
    }

    Some(url)
}

/// Map an existing file, or a directory with an index file, to a `file:` URL.
fn resolve_file(path: &Path) -> Option<Url> {
    let file = if path.is_dir() {
        index_file(path)?
    } else if path.is_file() {
        path.to_path_buf()
    } else {
        return None;
    };
    let absolute = std::path::absolute(file).ok()?;
    Url::from_file_path(absolute).ok()
}

fn index_file(directory: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(directory)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|candidate| {
            candidate
                .file_name()
                .and_then(OsStr::to_str)
                .is_some_and(|name| INDEX_FILES.iter().any(|index| name.eq_ignore_ascii_case(index)))
        })
        .collect();
    // read_dir order is platform-defined; sort so the pick is stable.
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mender-url-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn absolute_http_url_passes_through() {
        let url = resolve_location("http://example.com/a/b.html", None).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a/b.html");
    }

    #[test]
    fn relative_link_resolves_against_context() {
        let base = Url::parse("http://example.com/docs/index.html").unwrap();
        let url = resolve_location("../img/logo.html", Some(&base)).unwrap();
        assert_eq!(url.as_str(), "http://example.com/img/logo.html");
    }

    #[test]
    fn missing_relative_path_without_context_is_unresolved() {
        assert!(resolve_location("definitely-not-here.html", None).is_none());
    }

    #[test]
    fn local_file_resolves_to_file_url() {
        let dir = scratch_dir("file");
        let page = dir.join("page.html");
        fs::write(&page, "<p>x</p>").unwrap();

        let url = resolve_location(page.to_str().unwrap(), None).unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.to_file_path().unwrap(), page);
    }

    #[test]
    fn directory_resolves_to_index_file() {
        let dir = scratch_dir("index");
        fs::write(dir.join("INDEX.HTM"), "<p>x</p>").unwrap();

        let url = resolve_location(dir.to_str().unwrap(), None).unwrap();
        assert!(url.path().ends_with("/INDEX.HTM"));
    }

    #[test]
    fn directory_without_index_is_unresolved() {
        let dir = scratch_dir("empty");
        assert!(resolve_location(dir.to_str().unwrap(), None).is_none());
    }

    #[test]
    fn file_link_relative_to_file_context_is_checked_on_disk() {
        let dir = scratch_dir("context");
        fs::write(dir.join("a.html"), "a").unwrap();
        let base = Url::from_file_path(dir.join("start.html")).unwrap();

        assert!(resolve_location("a.html", Some(&base)).is_some());
        assert!(resolve_location("b.html", Some(&base)).is_none());
    }
}
