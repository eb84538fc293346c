//! Durable storage for the session state.
//!
//! The record is one JSON value, `{"state": {...}, "version": 0}`, holding the
//! document plus the UI preferences worth keeping between runs.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StorageError;
use crate::model::{DocumentData, Locale, PaperSize, TemplateType, Theme};

pub const STORE_VERSION: u32 = 0;

/// The persisted subset of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub document_data: DocumentData,
    pub paper_size: PaperSize,
    pub template_type: TemplateType,
    pub locale: Locale,
    pub theme: Theme,
}

#[derive(Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

pub fn encode(state: &PersistedState) -> Result<String, StorageError> {
    let record = Record {
        state: state.clone(),
        version: STORE_VERSION,
    };
    serde_json::to_string_pretty(&record).map_err(StorageError::Serialize)
}

/// Fields missing from `raw` take their defaults.
pub fn decode(raw: &str) -> Result<PersistedState, StorageError> {
    let record: Record = serde_json::from_str(raw).map_err(StorageError::Parse)?;
    if record.version != STORE_VERSION {
        debug!(version = record.version, "stored record has a different version");
    }
    Ok(record.state)
}

pub trait StateStorage {
    /// `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<PersistedState>, StorageError>;
    fn save(&self, state: &PersistedState) -> Result<(), StorageError>;
}

impl<S: StateStorage + ?Sized> StateStorage for &S {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        (**self).save(state)
    }
}

/// One JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        decode(&content).map(Some)
    }

    fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        let content = encode(state)?;
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, content).map_err(write_err)
    }
}

/// Keeps the serialized record in memory, so loads go through the same codec
/// as the file backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        self.slot.borrow().as_deref().map(decode).transpose()
    }

    fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(encode(state)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentType, LineItem};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_state() -> PersistedState {
        let mut doc = DocumentData::new(Locale::Fr, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        doc.to_company = "Société Générale".to_string();
        doc.items.push(LineItem {
            description: "Audit".to_string(),
            quantity: 3.0,
            rate: 0.1,
            amount: 0.30000000000000004,
            currency: Some("€".to_string()),
            tax_rate: Some(20.0),
            ..LineItem::blank()
        });
        PersistedState {
            document_data: doc,
            paper_size: PaperSize::Letter,
            template_type: TemplateType::Compact,
            locale: Locale::Fr,
            theme: Theme::Dark,
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested").join("store.json"));
        assert!(storage.load().unwrap().is_none());

        let state = sample_state();
        storage.save(&state).unwrap();
        assert_eq!(storage.load().unwrap(), Some(state));
    }

    #[test]
    fn test_record_layout_uses_browser_field_names() {
        let raw = encode(&sample_state()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        let state = &value["state"];
        assert_eq!(state["paperSize"], "Letter");
        assert_eq!(state["templateType"], "compact");
        assert_eq!(state["theme"], "dark");
        assert_eq!(state["documentData"]["type"], "invoice");
        assert_eq!(state["documentData"]["date"], "2025-06-01");
        assert_eq!(state["documentData"]["template"]["fontFamily"], "sans-serif");
        assert_eq!(state["documentData"]["items"][1]["taxRate"], 20.0);
        assert!(state["documentData"]["items"][0].get("currency").is_none());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let raw = r#"{"state": {"documentData": {"type": "purchase-order", "documentNumber": "PO-042"}, "theme": "dark"}}"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.document_data.document_type, DocumentType::PurchaseOrder);
        assert_eq!(state.document_data.document_number, "PO-042");
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.paper_size, PaperSize::A4);
        assert_eq!(state.document_data.template.currency, "$");
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let storage = MemoryStorage::with_contents("{ not json");
        assert!(matches!(storage.load(), Err(StorageError::Parse(_))));
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        let state = sample_state();
        storage.save(&state).unwrap();
        assert!(storage.contents().unwrap().contains("Société Générale"));
        assert_eq!(storage.load().unwrap(), Some(state));
    }
}
