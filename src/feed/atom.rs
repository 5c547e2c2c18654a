use std::io::BufReader;

use atom_syndication::{Entry, Feed};

use super::{FeedError, FeedItem};

pub fn parse(bytes: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let feed = Feed::read_from(BufReader::new(bytes))
        .map_err(|e| FeedError::Malformed(e.to_string()))?;
    Ok(feed.entries().iter().map(item_from).collect())
}

fn item_from(entry: &Entry) -> FeedItem {
    let url = entry
        .links()
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| entry.links().first())
        .map(|l| l.href().to_string())
        .unwrap_or_default();
    let enclosure = entry.links().iter().find(|l| l.rel() == "enclosure");

    FeedItem {
        id: entry.id().to_string(),
        title: entry.title().as_str().to_string(),
        content: entry
            .content()
            .and_then(|c| c.value().map(str::to_string))
            .or_else(|| entry.summary().map(|s| s.as_str().to_string()))
            .unwrap_or_default(),
        author: entry
            .authors()
            .first()
            .map(|p| p.name().to_string())
            .unwrap_or_default(),
        url,
        guid: entry.id().to_string(),
        date: entry
            .published()
            .or(Some(entry.updated()))
            .map(|d| d.to_utc()),
        enclosure_url: enclosure.map(|l| l.href().to_string()).unwrap_or_default(),
        enclosure_type: enclosure
            .and_then(|l| l.mime_type())
            .unwrap_or_default()
            .to_string(),
        categories: entry
            .categories()
            .iter()
            .map(|c| c.term().to_string())
            .collect(),
    }
}
