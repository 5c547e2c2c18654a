use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::mapper::{NormalizedRecord, RecordStore};

/// Append-only JSONL record sink, one JSON object per line. Stands in for
/// the content system's persistence layer: `append` stores a mapped batch,
/// cleanup rewrites the file without the matching records.
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn open(root: &Path) -> Self {
        Self {
            path: root.join("records.jsonl"),
        }
    }

    pub fn append(&self, records: &[NormalizedRecord]) -> anyhow::Result<()> {
        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string(record).context("failed to serialize record")?);
            out.push('\n');
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        file.write_all(out.as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn records(&self) -> anyhow::Result<Vec<serde_json::Value>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).context("failed to parse stored record"))
            .collect()
    }
}

impl RecordStore for JsonlStore {
    fn remove_imported(&mut self, pid: i64, import_source: &str) -> anyhow::Result<()> {
        let records = self.records()?;
        if records.is_empty() {
            return Ok(());
        }
        let mut out = String::new();
        for record in records {
            let matches = record["container_id"] == pid
                && record["import_source"] == import_source;
            if !matches {
                out.push_str(&record.to_string());
                out.push('\n');
            }
        }
        fs::write(&self.path, out)
            .with_context(|| format!("failed to rewrite {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::feed::FeedItem;
    use crate::mapper::{IMPORT_SOURCE, ImportMeta, RecordType};

    use super::*;

    fn record(pid: i64, import_id: &str) -> NormalizedRecord {
        NormalizedRecord {
            import_source: IMPORT_SOURCE.to_string(),
            import_id: import_id.to_string(),
            created_at: Utc::now(),
            created_by: 1,
            record_type: RecordType::Article,
            visible: false,
            container_id: pid,
            title: "Title".to_string(),
            body: String::new(),
            author: String::new(),
            media: Vec::new(),
            timestamp: 0,
            category_ids: Vec::new(),
            external_url: None,
            slug_segment: None,
            import_meta: ImportMeta {
                import_date: String::new(),
                feed: String::new(),
                url: String::new(),
                guid: String::new(),
            },
            source: FeedItem::default(),
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::open(dir.path());

        store.append(&[record(5, "a"), record(5, "b")]).unwrap();
        store.append(&[record(6, "c")]).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["import_id"], "a");
        assert_eq!(records[2]["container_id"], 6);
        assert_eq!(records[0]["record_type"], 0);
    }

    #[test]
    fn test_remove_imported_filters_by_pid_and_source() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonlStore::open(dir.path());
        store
            .append(&[record(5, "a"), record(5, "b"), record(6, "c")])
            .unwrap();

        store.remove_imported(5, IMPORT_SOURCE).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["import_id"], "c");
    }

    #[test]
    fn test_remove_imported_ignores_other_sources() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonlStore::open(dir.path());
        store.append(&[record(5, "a")]).unwrap();

        store.remove_imported(5, "some_other_importer").unwrap();

        assert_eq!(store.records().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_imported_on_empty_store_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonlStore::open(dir.path());
        store.remove_imported(5, IMPORT_SOURCE).unwrap();
        assert!(store.records().unwrap().is_empty());
    }
}
