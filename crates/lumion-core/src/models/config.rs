//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LumionError, Result};

/// Main configuration for lumion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LumionConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Record store configuration.
    pub store: StoreConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length below which a warning is logged.
    pub min_text_length: usize,

    /// Fail on PDFs that contain images but no text instead of parsing nothing.
    pub reject_image_only: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            reject_image_only: true,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keep the normalized text in extraction results.
    pub include_raw_text: bool,

    /// Log a warning (instead of debug) for every field that fell back.
    pub warn_on_missing: bool,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding stored records and PDFs.
    pub data_dir: PathBuf,

    /// Keep the original PDF next to each record.
    pub keep_pdf: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("invoices"),
            keep_pdf: true,
        }
    }
}

impl LumionConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LumionError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| LumionError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
