// ABOUTME: References to open documents.
// ABOUTME: A document's identity is its path or resource name, nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRef {
    /// A file on disk
    File(PathBuf),
    /// Anything else addressable by name (scratch buffers, remote resources)
    Resource(String),
}

impl DocumentRef {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        DocumentRef::File(path.into())
    }

    pub fn resource(name: impl Into<String>) -> Self {
        DocumentRef::Resource(name.into())
    }

    /// Short name shown on the tab strip
    pub fn title(&self) -> String {
        match self {
            DocumentRef::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            DocumentRef::Resource(name) => name
                .rsplit(['/', ':'])
                .find(|segment| !segment.is_empty())
                .unwrap_or(name)
                .to_string(),
        }
    }

    /// Icon key for the renderer, derived from the file extension
    pub fn icon(&self) -> Option<String> {
        match self {
            DocumentRef::File(path) => extension_of(path),
            DocumentRef::Resource(_) => None,
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::File(path) => write!(f, "{}", path.display()),
            DocumentRef::Resource(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for DocumentRef {
    /// Strings with a `scheme:` prefix are resources, everything else a file path
    fn from(value: &str) -> Self {
        match value.split_once(':') {
            Some((scheme, _))
                if scheme.len() > 1 && scheme.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                DocumentRef::Resource(value.to_string())
            }
            _ => DocumentRef::File(PathBuf::from(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_title_is_file_name() {
        let doc = DocumentRef::file("/home/user/src/main.rs");
        assert_eq!(doc.title(), "main.rs");
        assert_eq!(doc.icon().as_deref(), Some("rs"));
    }

    #[test]
    fn resource_title_is_last_segment() {
        let doc = DocumentRef::resource("untitled:scratch-1");
        assert_eq!(doc.title(), "scratch-1");
        assert_eq!(doc.icon(), None);
    }

    #[test]
    fn from_str_detects_schemes() {
        assert_eq!(
            DocumentRef::from("untitled:notes"),
            DocumentRef::resource("untitled:notes")
        );
        assert_eq!(
            DocumentRef::from("src/lib.rs"),
            DocumentRef::file("src/lib.rs")
        );
        // Windows drive letters stay paths
        assert_eq!(
            DocumentRef::from("C:/work/a.txt"),
            DocumentRef::file("C:/work/a.txt")
        );
    }

    #[test]
    fn identity_ignores_presentation() {
        assert_eq!(DocumentRef::file("a/b.txt"), DocumentRef::file("a/b.txt"));
        assert_ne!(DocumentRef::file("a/b.txt"), DocumentRef::file("c/b.txt"));
    }
}
