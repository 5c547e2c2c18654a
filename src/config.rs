use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

/// Immutable per-run import settings, built once by the caller.
#[derive(Debug, Clone)]
pub struct TaskConfiguration {
    /// Target container id records are imported into.
    pub pid: i64,
    /// Feed URL or local file path.
    pub path: String,
    /// Remove previously imported records for this source before importing.
    pub clean_before_import: bool,
    /// Store items as external-URL records pointing at the original article.
    pub persist_as_external_url: bool,
    /// Generate a URL path segment for each record.
    pub set_slug: bool,
    /// Category label to id table; `None` means no mapping was configured.
    pub mapping: Option<CategoryMapping>,
}

/// Translation table from feed category labels to taxonomy ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMapping {
    by_title: HashMap<String, i64>,
}

impl CategoryMapping {
    pub fn new(by_title: HashMap<String, i64>) -> Self {
        Self { by_title }
    }

    /// Loads a mapping from a JSON object file of `{"label": id}` pairs.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read mapping file {}", path.display()))?;
        let by_title: HashMap<String, i64> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse mapping file {}", path.display()))?;
        Ok(Self { by_title })
    }

    pub fn id_for(&self, title: &str) -> Option<i64> {
        self.by_title.get(title).copied()
    }
}

/// Ambient facts of one import run, passed in explicitly: the run-start
/// timestamp stamped on every record, and the acting user id.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
}

impl RunContext {
    pub fn now(created_by: i64) -> Self {
        Self {
            created_at: Utc::now(),
            created_by,
        }
    }
}
