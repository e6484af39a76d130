//! Storage of extracted bills next to their original PDFs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::invoice::InvoiceFields;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A persisted bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInvoice {
    pub id: u64,

    #[serde(flatten)]
    pub fields: InvoiceFields,

    /// File name of the stored PDF, relative to the store directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<String>,

    /// Name of the file the bill was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence collaborator for extracted bills.
pub trait InvoiceStore {
    /// Persist a record, optionally with the original PDF bytes.
    fn save(&self, fields: &InvoiceFields, pdf: Option<&[u8]>, source_name: Option<&str>) -> Result<StoredInvoice>;

    /// Fetch one record.
    fn get(&self, id: u64) -> Result<StoredInvoice>;

    /// All records, ordered by id.
    fn list(&self) -> Result<Vec<StoredInvoice>>;

    /// Records of one client, ordered by id.
    fn find_by_client(&self, client_number: &str) -> Result<Vec<StoredInvoice>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.fields.client_number == client_number)
            .collect())
    }

    /// Original PDF bytes of a record, if they were kept.
    fn load_pdf(&self, id: u64) -> Result<Option<Vec<u8>>>;
}

/// Store keeping `<id>.json` and `<id>.pdf` files in one directory.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) a store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn pdf_name(id: u64) -> String {
        format!("{}.pdf", id)
    }

    fn record_ids(&self) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<u64>) {
                Some(Ok(id)) => ids.push(id),
                _ => debug!("Skipping unrelated file {}", path.display()),
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn read_record(&self, path: &Path) -> Result<StoredInvoice> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
            path: path.display().to_string(),
            source,
        })
    }

    fn write_record(&self, record: &StoredInvoice) -> Result<()> {
        let path = self.record_path(record.id);
        let content = serde_json::to_string_pretty(record).map_err(|source| StoreError::Serialization {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(&path, content)?;
        Ok(())
    }
}

impl InvoiceStore for DirectoryStore {
    fn save(&self, fields: &InvoiceFields, pdf: Option<&[u8]>, source_name: Option<&str>) -> Result<StoredInvoice> {
        let id = self.record_ids()?.last().map_or(1, |last| last + 1);

        let pdf_file = match pdf {
            Some(bytes) => {
                let name = Self::pdf_name(id);
                fs::write(self.root.join(&name), bytes)?;
                Some(name)
            }
            None => None,
        };

        let now = Utc::now();
        let record = StoredInvoice {
            id,
            fields: fields.clone(),
            pdf_file,
            source_name: source_name.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.write_record(&record)?;

        debug!("Stored invoice {} for client {}", id, record.fields.client_number);
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<StoredInvoice> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        self.read_record(&path)
    }

    fn list(&self) -> Result<Vec<StoredInvoice>> {
        let mut records = Vec::new();
        for id in self.record_ids()? {
            match self.read_record(&self.record_path(id)) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable record {}: {}", id, e),
            }
        }
        Ok(records)
    }

    fn load_pdf(&self, id: u64) -> Result<Option<Vec<u8>>> {
        let record = self.get(id)?;
        match record.pdf_file {
            Some(name) => Ok(Some(fs::read(self.root.join(name))?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn bill(client: &str, month: &str) -> InvoiceFields {
        InvoiceFields {
            client_number: client.to_string(),
            reference_month: month.to_string(),
            energia_compensada_valor: Decimal::new(-23399, 2),
            economia_gd: Decimal::new(23399, 2),
            ..InvoiceFields::default()
        }
    }

    #[test]
    fn test_save_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        let saved = store
            .save(&bill("7204076116", "ABR/2024"), Some(b"%PDF-1.4 fake"), Some("abril.pdf"))
            .unwrap();
        assert_eq!(saved.id, 1);
        assert_eq!(saved.pdf_file.as_deref(), Some("1.pdf"));

        let loaded = store.get(1).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(store.load_pdf(1).unwrap(), Some(b"%PDF-1.4 fake".to_vec()));
    }

    #[test]
    fn test_ids_are_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        for month in ["JAN/2024", "FEV/2024", "MAR/2024"] {
            store.save(&bill("1", month), None, None).unwrap();
        }

        let ids: Vec<u64> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.load_pdf(2).unwrap(), None);
    }

    #[test]
    fn test_find_by_client() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();

        store.save(&bill("111", "JAN/2024"), None, None).unwrap();
        store.save(&bill("222", "JAN/2024"), None, None).unwrap();
        store.save(&bill("111", "FEV/2024"), None, None).unwrap();

        let found = store.find_by_client("111").unwrap();
        let months: Vec<&str> = found.iter().map(|r| r.fields.reference_month.as_str()).collect();
        assert_eq!(months, vec!["JAN/2024", "FEV/2024"]);
        assert!(store.find_by_client("999").unwrap().is_empty());
    }

    #[test]
    fn test_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(store.get(42), Err(StoreError::NotFound(42))));
    }

    #[test]
    fn test_record_json_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        store.save(&bill("7204076116", "ABR/2024"), None, None).unwrap();

        let raw = fs::read_to_string(dir.path().join("1.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["clientNumber"], "7204076116");
        assert_eq!(json["id"], 1);
        assert!(json.get("fields").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
