use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::http::fetch_checked;

/// Directory for mirrored enclosure files, relative to the public root.
pub const MEDIA_DIR: &str = "uploads/newshauler";

/// One mirrored enclosure attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaAttachment {
    /// Path of the mirrored file, relative to the public root.
    pub file: String,
    pub show_in_preview: bool,
}

/// Mirrors feed enclosures into local storage.
///
/// Filenames are derived from the item id and the md5 of the enclosure URL,
/// so re-importing the same feed finds the file already present and skips the
/// fetch. Failures of any kind skip the attachment for that item only.
pub struct MediaMirror<'a> {
    pub client: &'a reqwest::blocking::Client,
    pub public_root: &'a Path,
}

impl MediaMirror<'_> {
    pub fn mirror(&self, url: &str, mime_type: &str, item_id: &str) -> Vec<MediaAttachment> {
        let Some(ext) = extension_for(mime_type) else {
            return Vec::new();
        };
        if url.is_empty() {
            return Vec::new();
        }

        let relative = relative_path(item_id, url, ext);
        let target = self.public_root.join(&relative);
        if !target.exists() {
            let body = match fetch_checked(self.client, url) {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(url, error = %e, "enclosure fetch failed, skipping");
                    return Vec::new();
                }
            };
            if body.is_empty() {
                return Vec::new();
            }
            let Some(parent) = target.parent() else {
                return Vec::new();
            };
            if fs::create_dir_all(parent).is_err() || fs::write(&target, &body).is_err() {
                return Vec::new();
            }
        }

        vec![MediaAttachment {
            file: relative,
            show_in_preview: true,
        }]
    }
}

/// Allow-listed enclosure MIME types and their file extensions.
fn extension_for(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/png" => Some("png"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// `uploads/newshauler/<stem>_<md5(url)>.<ext>`. Feed item ids are often
/// URLs, so the stem keeps only filename-safe bytes; uniqueness comes from
/// the URL digest.
pub fn relative_path(item_id: &str, url: &str, ext: &str) -> String {
    format!(
        "{MEDIA_DIR}/{}_{:x}.{ext}",
        file_stem(item_id),
        md5::compute(url)
    )
}

fn file_stem(item_id: &str) -> String {
    item_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use tempfile::TempDir;

    use crate::http::http_client;

    use super::*;

    #[test]
    fn test_extension_allow_list() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/gif"), Some("gif"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("application/pdf"), Some("pdf"));
        assert_eq!(extension_for("image/webp"), None);
        assert_eq!(extension_for("text/html"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn test_relative_path_shape() {
        let path = relative_path("item-1", "http://x/a.png", "png");
        assert_eq!(
            path,
            format!(
                "uploads/newshauler/item-1_{:x}.png",
                md5::compute("http://x/a.png")
            )
        );
    }

    #[test]
    fn test_file_stem_sanitizes_url_ids() {
        assert_eq!(
            file_stem("https://example.com/post/1?x=2"),
            "https---example.com-post-1-x-2"
        );
        assert_eq!(file_stem("plain_id-1.2"), "plain_id-1.2");
    }

    #[test]
    fn test_disallowed_mime_skips_without_fetch() {
        let dir = TempDir::new().unwrap();
        let client = http_client().unwrap();
        let mirror = MediaMirror {
            client: &client,
            public_root: dir.path(),
        };
        // The URL would fail to resolve; the MIME check must come first.
        let media = mirror.mirror("http://127.0.0.1:9/a.webp", "image/webp", "item-1");
        assert!(media.is_empty());
    }

    #[test]
    fn test_empty_url_skips() {
        let dir = TempDir::new().unwrap();
        let client = http_client().unwrap();
        let mirror = MediaMirror {
            client: &client,
            public_root: dir.path(),
        };
        assert!(mirror.mirror("", "image/png", "item-1").is_empty());
    }

    #[test]
    fn test_existing_file_is_reused_without_fetch() {
        let dir = TempDir::new().unwrap();
        let url = "http://127.0.0.1:9/a.png";
        let relative = relative_path("item-1", url, "png");
        let target = dir.path().join(&relative);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"already here").unwrap();

        let client = http_client().unwrap();
        let mirror = MediaMirror {
            client: &client,
            public_root: dir.path(),
        };
        // Fetching this URL would error; the existing file short-circuits it.
        let media = mirror.mirror(url, "image/png", "item-1");

        assert_eq!(
            media,
            vec![MediaAttachment {
                file: relative,
                show_in_preview: true,
            }]
        );
    }

    #[test]
    fn test_mirror_fetches_and_writes() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/a.png");
            then.status(200).body(b"png bytes");
        });

        let client = http_client().unwrap();
        let mirror = MediaMirror {
            client: &client,
            public_root: dir.path(),
        };
        let url = server.url("/a.png");
        let media = mirror.mirror(&url, "image/png", "item-1");

        assert_eq!(media.len(), 1);
        assert!(media[0].show_in_preview);
        let written = fs::read(dir.path().join(&media[0].file)).unwrap();
        assert_eq!(written, b"png bytes");
        mock.assert_hits(1);
    }

    #[test]
    fn test_mirror_twice_fetches_once() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/a.png");
            then.status(200).body(b"png bytes");
        });

        let client = http_client().unwrap();
        let mirror = MediaMirror {
            client: &client,
            public_root: dir.path(),
        };
        let url = server.url("/a.png");
        let first = mirror.mirror(&url, "image/png", "item-1");
        let second = mirror.mirror(&url, "image/png", "item-1");

        assert_eq!(first, second);
        mock.assert_hits(1);
    }

    #[test]
    fn test_fetch_failure_skips_item() {
        let dir = TempDir::new().unwrap();
        let client = http_client().unwrap();
        let mirror = MediaMirror {
            client: &client,
            public_root: dir.path(),
        };
        let media = mirror.mirror("http://127.0.0.1:9/gone.png", "image/png", "item-1");
        assert!(media.is_empty());
    }
}
