//! Core library for electricity bill processing.
//!
//! This crate provides:
//! - PDF text acquisition
//! - Rule-based bill field extraction with Brazilian number normalization
//! - Derived totals (consumption, value without GD, GD savings)
//! - A directory-backed store and reporting over stored bills

pub mod error;
pub mod models;
pub mod pdf;
pub mod invoice;
pub mod pipeline;
pub mod store;
pub mod report;

pub use error::{LumionError, PdfError, Result, StoreError};
pub use models::config::LumionConfig;
pub use models::invoice::{Field, FieldValue, InvoiceFields, UNKNOWN};
pub use models::month::ReferenceMonth;
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use invoice::{compute_aggregates, ExtractionResult, FieldExtractor, InvoiceParser, RuleExtractor};
pub use pipeline::InvoicePipeline;
pub use store::{DirectoryStore, InvoiceStore, StoredInvoice};
pub use report::{client_table, monthly_series, ClientRow, InvoiceFilter, MonthlyPoint, Summary};

pub use rust_decimal::Decimal;
