use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::categories::{self, ImportLogger};
use crate::config::{RunContext, TaskConfiguration};
use crate::content;
use crate::feed::{self, FeedItem};
use crate::media::{MediaAttachment, MediaMirror};
use crate::slug::SlugGenerator;

/// Tag distinguishing this importer's records from other importers sharing
/// the same container; cleanup is scoped by it.
pub const IMPORT_SOURCE: &str = "newshauler_xml";

/// Keys longer than this are replaced by their md5 digest.
const MAX_IMPORT_ID_LEN: usize = 100;

/// Persistence layer the importer hands records to. The pipeline itself only
/// needs the cleanup operation; storing the returned batch is the caller's
/// side of the contract.
pub trait RecordStore {
    fn remove_imported(&mut self, pid: i64, import_source: &str) -> anyhow::Result<()>;
}

/// Record type codes of the target content system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum RecordType {
    Article,
    ExternalUrl,
}

impl From<RecordType> for u8 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Article => 0,
            RecordType::ExternalUrl => 2,
        }
    }
}

/// Import provenance carried alongside each record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportMeta {
    pub import_date: String,
    pub feed: String,
    pub url: String,
    pub guid: String,
}

/// One feed item mapped into the shape the content system stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub import_source: String,
    pub import_id: String,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
    pub record_type: RecordType,
    pub visible: bool,
    pub container_id: i64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub media: Vec<MediaAttachment>,
    pub timestamp: i64,
    pub category_ids: Vec<i64>,
    pub external_url: Option<String>,
    pub slug_segment: Option<String>,
    pub import_meta: ImportMeta,
    pub source: FeedItem,
}

/// Maps a feed document into normalized records, one per item, in document
/// order. Single-threaded: each item, media fetch included, completes before
/// the next begins.
pub struct FeedMapper<'a> {
    pub client: &'a reqwest::blocking::Client,
    pub public_root: &'a Path,
    pub logger: &'a dyn ImportLogger,
    pub slugs: &'a dyn SlugGenerator,
}

impl FeedMapper<'_> {
    pub fn map(
        &self,
        cfg: &TaskConfiguration,
        ctx: &RunContext,
        store: &mut dyn RecordStore,
    ) -> anyhow::Result<Vec<NormalizedRecord>> {
        if cfg.clean_before_import {
            store
                .remove_imported(cfg.pid, IMPORT_SOURCE)
                .context("failed to remove previously imported records")?;
        }

        let items = feed::load(self.client, &cfg.path)
            .with_context(|| format!("failed to load feed from {}", cfg.path))?;

        let media = MediaMirror {
            client: self.client,
            public_root: self.public_root,
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let mut record = NormalizedRecord {
                import_source: IMPORT_SOURCE.to_string(),
                import_id: derive_import_id(&item.id),
                created_at: ctx.created_at,
                created_by: ctx.created_by,
                record_type: RecordType::Article,
                visible: false,
                container_id: cfg.pid,
                title: item.title.clone(),
                body: content::normalize(&item.content),
                author: item.author.clone(),
                // Keyed by the item's native id, not the derived import id.
                media: media.mirror(&item.enclosure_url, &item.enclosure_type, &item.id),
                timestamp: item
                    .date
                    .map(|d| d.timestamp())
                    .unwrap_or_else(|| ctx.created_at.timestamp()),
                category_ids: categories::resolve(
                    &item.categories,
                    cfg.mapping.as_ref(),
                    self.logger,
                ),
                external_url: None,
                slug_segment: None,
                import_meta: ImportMeta {
                    import_date: ctx.created_at.format("%d.%m.%Y %I:%M:%S").to_string(),
                    feed: cfg.path.clone(),
                    url: item.url.clone(),
                    guid: item.guid.clone(),
                },
                source: item,
            };
            if cfg.persist_as_external_url {
                record.record_type = RecordType::ExternalUrl;
                record.external_url = Some(record.source.url.clone());
            }
            if cfg.set_slug {
                record.slug_segment = Some(self.slugs.generate(&record, cfg.pid));
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// Storage keys are capped at 100 bytes; longer parser ids fall back to
/// their md5 hex digest.
fn derive_import_id(id: &str) -> String {
    if id.len() > MAX_IMPORT_ID_LEN {
        format!("{:x}", md5::compute(id))
    } else {
        id.to_string()
    }
}
