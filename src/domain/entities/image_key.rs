//! Cache key for images, derived from the image URL.

use std::path::PathBuf;

/// Marker segment used by the backend's image URLs. Everything after it
/// becomes the on-disk relative path, so images keep their server-side
/// folder structure inside the cache.
const IMAGES_MARKER: &str = "/images/";

/// Disk-relative cache location for an image URL.
///
/// Derived from the URL path: the remainder after a `/images/` marker when
/// one is present, otherwise the last path component. The full URL string
/// keys the in-memory tier; this type keys the disk tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Derives a key from an image URL.
    ///
    /// Returns `None` when the URL yields no usable path component (empty
    /// path, or a relative path escaping the cache root).
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let path = strip_query(url);

        let relative = match path.find(IMAGES_MARKER) {
            Some(pos) => &path[pos + IMAGES_MARKER.len()..],
            None => path.rsplit('/').next().unwrap_or(path),
        };

        let segments: Vec<&str> = relative
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        if segments.is_empty() || segments.iter().any(|s| *s == "..") {
            return None;
        }

        Some(Self(segments.join("/")))
    }

    /// The key as a slash-separated relative path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key as a relative filesystem path.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://cdn.example.com/images/600/92c952.png", "600/92c952.png"; "images marker keeps subfolders")]
    #[test_case("https://cdn.example.com/images/thumb.png", "thumb.png"; "images marker single segment")]
    #[test_case("https://cdn.example.com/static/photo.jpg", "photo.jpg"; "no marker uses last component")]
    #[test_case("https://cdn.example.com/images/600/92c952.png?w=150", "600/92c952.png"; "query stripped")]
    #[test_case("https://cdn.example.com/a/b/c.webp#frag", "c.webp"; "fragment stripped")]
    fn test_key_derivation(url: &str, expected: &str) {
        let key = ImageKey::from_url(url).unwrap();
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(ImageKey::from_url("https://cdn.example.com/images/").is_none());
        assert!(ImageKey::from_url("").is_none());
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(ImageKey::from_url("https://cdn.example.com/images/../../etc/passwd").is_none());
    }
}
