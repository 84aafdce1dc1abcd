use crate::types::{NewsError, Result};
use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::debug;

/// One feed entry flattened to the fields the pipeline cares about.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    /// RFC 2822 rendering of the published date; empty when the feed omits it.
    pub published: String,
    pub source: Option<String>,
    pub image: Option<String>,
}

/// Parse a feed document into flat items. Entries without a link are skipped.
pub fn parse_feed_items(content: &str) -> Result<Vec<FeedItem>> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| NewsError::Parse(format!("Failed to parse feed: {}", e)))?;

    let mut items = Vec::new();
    for entry in feed.entries {
        if let Some(item) = flatten_entry(entry) {
            items.push(item);
        }
    }

    debug!("Parsed feed with {} items", items.len());
    Ok(items)
}

fn flatten_entry(entry: Entry) -> Option<FeedItem> {
    let link = entry.links.first()?.href.clone();

    let title = entry
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled".to_string());

    let summary = entry.summary.map(|s| s.content).unwrap_or_default();

    let published = entry
        .published
        .or(entry.updated)
        .map(render_timestamp)
        .unwrap_or_default();

    let image = media_image(&entry.media);

    Some(FeedItem {
        title,
        link,
        summary,
        published,
        source: entry.source,
        image,
    })
}

/// Downstream consumers treat `published` as an opaque display string, so
/// the feed's parsed date is re-rendered once here.
fn render_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc2822()
}

/// First usable image URL from media attachments, preferring full content
/// objects over thumbnails.
fn media_image(media: &[feed_rs::model::MediaObject]) -> Option<String> {
    for object in media {
        for content in &object.content {
            if let Some(url) = &content.url {
                return Some(url.to_string());
            }
        }
        if let Some(thumb) = object.thumbnails.first() {
            return Some(thumb.image.uri.clone());
        }
    }
    None
}
