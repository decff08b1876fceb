use crate::models::{FieldType, RecognitionResult};
use crate::processing::image_processor::{preprocess, Profile};
use crate::processing::ocr::{OcrConfig, OcrEngine};
use crate::utils::CardError;
use crate::validation::FormatValidator;
use image::RgbaImage;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Runs preprocessing, OCR and validation for one text field.
///
/// Failures never escape: an engine error, an expired deadline or a rejected
/// value all produce the field's default with low confidence.
#[derive(Clone)]
pub struct FieldRecognizer {
    engine: Arc<dyn OcrEngine>,
    deadline: Duration,
    dark_text: bool,
}

impl FieldRecognizer {
    pub fn new(engine: Arc<dyn OcrEngine>, deadline: Duration, dark_text: bool) -> Self {
        FieldRecognizer { engine, deadline, dark_text }
    }

    pub async fn recognize(&self, field: FieldType, pixels: RgbaImage) -> RecognitionResult {
        let Some(config) = OcrConfig::for_field(field) else {
            return RecognitionResult::defaulted(field);
        };

        if field == FieldType::Barcode {
            return self.recognize_barcode(pixels, config).await;
        }

        let prepared = preprocess(pixels, Profile::for_field(field, self.dark_text));
        match self.run_ocr(prepared, config).await {
            Ok(raw) => {
                let result = FormatValidator::validate(field, &raw);
                if result.is_defaulted() {
                    debug!("Rejected {} text {:?}, using default", field, raw.trim());
                } else {
                    debug!("Recognized {}: {}", field, result.text);
                }
                result
            }
            Err(e) => {
                warn!("Recognition failed for {}: {}", field, e);
                RecognitionResult::defaulted(field)
            }
        }
    }

    /// Barcode digits, retried once with the dark-text profile when the first pass is short.
    async fn recognize_barcode(&self, pixels: RgbaImage, config: OcrConfig) -> RecognitionResult {
        for profile in [Profile::Barcode, Profile::BarcodeAlternate] {
            let prepared = preprocess(pixels.clone(), profile);
            match self.run_ocr(prepared, config.clone()).await {
                Ok(raw) => {
                    if let Some(digits) = FormatValidator::normalize_barcode(&raw) {
                        debug!("Recognized barcode with {:?}: {}", profile, digits);
                        return RecognitionResult::accepted(digits);
                    }
                    debug!("Barcode pass {:?} too short: {:?}", profile, raw.trim());
                }
                Err(e) => warn!("Barcode pass {:?} failed: {}", profile, e),
            }
        }
        RecognitionResult::defaulted(FieldType::Barcode)
    }

    /// One bounded OCR call on the blocking pool.
    ///
    /// An expired call is abandoned, not cancelled; its thread finishes on its own.
    async fn run_ocr(&self, pixels: RgbaImage, config: OcrConfig) -> Result<String, CardError> {
        let engine = Arc::clone(&self.engine);
        let task = tokio::task::spawn_blocking(move || engine.recognize(&pixels, &config));

        match timeout(self.deadline, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(CardError::Ocr(format!("OCR task failed: {}", join_err))),
            Err(_) => Err(CardError::Timeout(self.deadline.as_millis() as u64)),
        }
    }
}
