pub mod atom;
pub mod rss;

use std::fs;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// One entry of a syndicated document, normalized across RSS and Atom.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedItem {
    /// Parser-assigned identifier: guid, falling back to the entry link.
    /// Can be arbitrarily long; importers derive their own bounded key.
    pub id: String,
    pub title: String,
    /// Raw body, markup included.
    pub content: String,
    pub author: String,
    pub url: String,
    pub guid: String,
    pub date: Option<DateTime<Utc>>,
    pub enclosure_url: String,
    pub enclosure_type: String,
    /// Category labels in document order, duplicates preserved.
    pub categories: Vec<String>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to fetch feed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse feed: {0}")]
    Malformed(String),
    #[error("no feed found at {0}")]
    NoFeedFound(String),
}

/// Loads the feed at `path`, which is either an HTTP(S) URL or a local file
/// path. A URL that serves an HTML page instead of a feed is scanned for
/// feed candidates, which are tried in order until one parses.
pub fn load(client: &reqwest::blocking::Client, path: &str) -> Result<Vec<FeedItem>, FeedError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        let bytes = get(client, path)?;
        let text = String::from_utf8_lossy(&bytes);
        if looks_like_feed(&text) {
            parse(&bytes)
        } else {
            discover(client, path, &text)
        }
    } else {
        let bytes = fs::read(path)?;
        parse(&bytes)
    }
}

fn get(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, FeedError> {
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

fn looks_like_feed(text: &str) -> bool {
    text.contains("<rss") || text.contains("<feed")
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let text = String::from_utf8_lossy(bytes);
    if text.contains("<rss") {
        rss::parse(bytes)
    } else {
        atom::parse(bytes)
    }
}

fn discover(
    client: &reqwest::blocking::Client,
    path: &str,
    html: &str,
) -> Result<Vec<FeedItem>, FeedError> {
    let base = Url::parse(path).map_err(|_| FeedError::NoFeedFound(path.to_string()))?;
    let candidates =
        feedfinder::detect_feeds(&base, html).map_err(|_| FeedError::NoFeedFound(path.to_string()))?;
    // Candidates can include non-feed links picked up from <a> tags; the
    // first one that fetches and parses wins.
    for candidate in &candidates {
        let Ok(bytes) = get(client, candidate.url().as_str()) else {
            continue;
        };
        if let Ok(items) = parse(&bytes) {
            return Ok(items);
        }
    }
    Err(FeedError::NoFeedFound(path.to_string()))
}
