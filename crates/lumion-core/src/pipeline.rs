//! End-to-end processing: document bytes in, bill record out.

use tracing::{info, warn};

use crate::error::{PdfError, Result};
use crate::invoice::{ExtractionResult, InvoiceParser, RuleExtractor};
use crate::models::config::LumionConfig;
use crate::pdf::{PdfExtractor, PdfProcessor, PdfType};

/// Glues text acquisition to field extraction.
///
/// Acquisition failures surface as [`crate::LumionError::Acquisition`] and
/// stop processing; nothing is extracted from a partially read document.
pub struct InvoicePipeline {
    parser: RuleExtractor,
    min_text_length: usize,
    reject_image_only: bool,
}

impl InvoicePipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &LumionConfig) -> Self {
        Self {
            parser: RuleExtractor::new()
                .with_raw_text(config.extraction.include_raw_text)
                .with_missing_warnings(config.extraction.warn_on_missing),
            min_text_length: config.pdf.min_text_length,
            reject_image_only: config.pdf.reject_image_only,
        }
    }

    /// Extract a bill from PDF bytes using lopdf/pdf-extract.
    pub fn process_pdf(&self, data: &[u8]) -> Result<ExtractionResult> {
        let mut extractor = PdfExtractor::new();
        self.process_with(&mut extractor, data)
    }

    /// Extract a bill from PDF bytes with a caller-supplied processor.
    pub fn process_with<P: PdfProcessor>(&self, processor: &mut P, data: &[u8]) -> Result<ExtractionResult> {
        let text = self.acquire_text(processor, data)?;
        Ok(self.process_text(&text))
    }

    /// Extract a bill from already acquired text.
    pub fn process_text(&self, text: &str) -> ExtractionResult {
        let result = self.parser.parse(text);
        if !result.fields.has_client() {
            warn!("No client number found in bill text");
        }
        info!(
            "Extracted bill for client {} ({}) in {}ms",
            result.fields.client_number, result.fields.reference_month, result.processing_time_ms
        );
        result
    }

    /// Load the document and extract its text once. Blank text is a
    /// successful acquisition and goes on to produce the fallback record.
    fn acquire_text<P: PdfProcessor>(&self, processor: &mut P, data: &[u8]) -> std::result::Result<String, PdfError> {
        processor.load(data)?;
        let text = processor.extract_text()?;

        let pdf_type = processor.analyze(&text);
        if pdf_type == PdfType::Image && self.reject_image_only {
            return Err(PdfError::ImageOnly);
        }

        let chars = text.trim().chars().count();
        if chars < self.min_text_length {
            warn!(
                "Only {} characters of text extracted from {} pages ({:?})",
                chars,
                processor.page_count(),
                pdf_type
            );
        }

        Ok(text)
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new(&LumionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LumionError;
    use crate::models::invoice::InvoiceFields;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    /// Processor returning canned text.
    struct FakePdf {
        text: std::result::Result<String, String>,
        pdf_type: PdfType,
        loaded: bool,
        extractions: Cell<usize>,
    }

    impl FakePdf {
        fn with_text(text: &str) -> Self {
            Self {
                text: Ok(text.to_string()),
                pdf_type: PdfType::Text,
                loaded: false,
                extractions: Cell::new(0),
            }
        }
    }

    impl PdfProcessor for FakePdf {
        fn load(&mut self, data: &[u8]) -> crate::pdf::Result<()> {
            if data.is_empty() {
                return Err(PdfError::Parse("empty input".to_string()));
            }
            self.loaded = true;
            Ok(())
        }

        fn page_count(&self) -> u32 {
            1
        }

        fn analyze(&self, _text: &str) -> PdfType {
            self.pdf_type
        }

        fn extract_text(&self) -> crate::pdf::Result<String> {
            self.extractions.set(self.extractions.get() + 1);
            self.text.clone().map_err(PdfError::TextExtraction)
        }
    }

    #[test]
    fn test_process_with_fake_processor() {
        let pipeline = InvoicePipeline::default();
        let mut pdf = FakePdf::with_text(
            "Energia Elétrica kWh 50 1,03060000 51,53\nContrib Ilum Publica Municipal 58,13",
        );

        let result = pipeline.process_with(&mut pdf, b"%PDF").unwrap();
        assert!(pdf.loaded);
        assert_eq!(pdf.extractions.get(), 1);
        assert_eq!(result.fields.consumo_energia_eletrica, Decimal::from(50));
        assert_eq!(result.fields.valor_total_sem_gd, Decimal::new(10966, 2));
    }

    #[test]
    fn test_load_failure_is_wrapped() {
        let pipeline = InvoicePipeline::default();
        let mut pdf = FakePdf::with_text("irrelevant");

        let err = pipeline.process_with(&mut pdf, b"").unwrap_err();
        match err {
            LumionError::Acquisition(PdfError::Parse(msg)) => assert_eq!(msg, "empty input"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_text_failure_is_wrapped() {
        let pipeline = InvoicePipeline::default();
        let mut pdf = FakePdf {
            text: Err("corrupt stream".to_string()),
            pdf_type: PdfType::Text,
            loaded: false,
            extractions: Cell::new(0),
        };

        let err = pipeline.process_with(&mut pdf, b"%PDF").unwrap_err();
        assert!(matches!(err, LumionError::Acquisition(PdfError::TextExtraction(_))));
        assert!(err.to_string().contains("corrupt stream"));
    }

    #[test]
    fn test_image_only_rejected() {
        let pipeline = InvoicePipeline::default();
        let mut pdf = FakePdf::with_text("");
        pdf.pdf_type = PdfType::Image;

        let err = pipeline.process_with(&mut pdf, b"%PDF").unwrap_err();
        assert!(matches!(err, LumionError::Acquisition(PdfError::ImageOnly)));
    }

    #[test]
    fn test_blank_text_gives_fallback_record() {
        let pipeline = InvoicePipeline::default();
        let mut pdf = FakePdf::with_text("  \n ");
        pdf.pdf_type = PdfType::Empty;

        let result = pipeline.process_with(&mut pdf, b"%PDF").unwrap();
        assert_eq!(result.fields, InvoiceFields::default());
        assert_eq!(result.missing_fields.len(), 9);
    }

    #[test]
    fn test_process_text_is_total() {
        let result = InvoicePipeline::default().process_text("");
        assert_eq!(result.missing_fields.len(), 9);
        assert!(result.fields.economia_gd.is_zero());
    }
}
