use crate::models::FieldType;
use crate::processing::image::encode_png;
use crate::utils::CardError;
use image::RgbaImage;
use log::debug;
use std::io::Write;
use tesseract::{PageSegMode, Tesseract};

pub const DIGITS: &str = "0123456789";
pub const NAME_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz -'";
pub const YEAR_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

/// Line segmentation hint passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segmentation {
    /// A single line of text (Tesseract PSM 7).
    SingleLine,
    /// A uniform block of text (Tesseract PSM 6).
    SingleBlock,
}

impl Segmentation {
    fn page_seg_mode(&self) -> PageSegMode {
        match self {
            Segmentation::SingleLine => PageSegMode::PsmSingleLine,
            Segmentation::SingleBlock => PageSegMode::PsmSingleBlock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub whitelist: &'static str,
    pub segmentation: Segmentation,
}

impl OcrConfig {
    /// Engine configuration for a text field. `None` for the photo.
    pub fn for_field(field: FieldType) -> Option<OcrConfig> {
        let config = match field {
            FieldType::Photo => return None,
            FieldType::Name => OcrConfig { whitelist: NAME_CHARS, segmentation: Segmentation::SingleLine },
            FieldType::Id => OcrConfig { whitelist: DIGITS, segmentation: Segmentation::SingleLine },
            FieldType::Year => OcrConfig { whitelist: YEAR_CHARS, segmentation: Segmentation::SingleBlock },
            FieldType::Barcode => OcrConfig { whitelist: DIGITS, segmentation: Segmentation::SingleBlock },
        };
        Some(config)
    }
}

/// Pixel-to-text capability used by the recognizer.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RgbaImage, config: &OcrConfig) -> Result<String, CardError>;
}

/// Tesseract-backed engine. A fresh API handle is created per call.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
    datapath: Option<String>,
}

impl TesseractEngine {
    pub fn new(language: &str, datapath: Option<&str>) -> Self {
        TesseractEngine {
            language: language.to_string(),
            datapath: datapath.map(|p| p.to_string()),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng", None)
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &RgbaImage, config: &OcrConfig) -> Result<String, CardError> {
        let png = encode_png(image)?;

        // Tesseract reads from a path, so hand the region over through a temp file
        let mut temp_file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| CardError::Ocr(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(&png)
            .map_err(|e| CardError::Ocr(format!("Failed to write to temp file: {}", e)))?;
        let path_str = temp_file
            .path()
            .to_str()
            .ok_or_else(|| CardError::Ocr("Failed to convert path to string".to_string()))?;

        let mut tess = Tesseract::new(self.datapath.as_deref(), Some(self.language.as_str()))
            .map_err(|e| CardError::Ocr(format!("Tesseract init error: {}", e)))?
            .set_variable("tessedit_char_whitelist", config.whitelist)
            .map_err(|e| CardError::Ocr(format!("Tesseract set variable error: {}", e)))?;

        tess.set_page_seg_mode(config.segmentation.page_seg_mode());

        let mut tess = tess
            .set_image(path_str)
            .map_err(|e| CardError::Ocr(format!("Tesseract set image error: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| CardError::Ocr(format!("Tesseract error: {}", e)))?;

        debug!("Tesseract returned {:?}", text.trim());
        Ok(text)
    }
}
