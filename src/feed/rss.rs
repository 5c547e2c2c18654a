use std::io::BufReader;

use chrono::{DateTime, FixedOffset};
use rss::{Channel, Item};

use super::{FeedError, FeedItem};

pub fn parse(bytes: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let channel = Channel::read_from(BufReader::new(bytes))
        .map_err(|e| FeedError::Malformed(e.to_string()))?;
    Ok(channel.items().iter().map(item_from).collect())
}

fn item_from(item: &Item) -> FeedItem {
    let guid = item
        .guid()
        .map(|g| g.value().to_string())
        .unwrap_or_default();
    let url = item.link().unwrap_or_default().to_string();
    let id = if guid.is_empty() { url.clone() } else { guid.clone() };
    let (enclosure_url, enclosure_type) = item
        .enclosure()
        .map(|e| (e.url().to_string(), e.mime_type().to_string()))
        .unwrap_or_default();

    FeedItem {
        id,
        title: item.title().unwrap_or("untitled").to_string(),
        // content:encoded carries the full body where present; the
        // description is often just a teaser.
        content: item
            .content()
            .or_else(|| item.description())
            .unwrap_or_default()
            .to_string(),
        author: item
            .author()
            .map(str::to_string)
            .or_else(|| {
                item.dublin_core_ext()
                    .and_then(|dc| dc.creators().first().cloned())
            })
            .unwrap_or_default(),
        url,
        guid,
        date: item
            .pub_date()
            .and_then(|d| DateTime::<FixedOffset>::parse_from_rfc2822(d).ok())
            .map(|d| d.to_utc()),
        enclosure_url,
        enclosure_type,
        categories: item
            .categories()
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
    }
}
