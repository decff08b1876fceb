use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value used for the name field when recognition is rejected.
pub const DEFAULT_NAME: &str = "Student Name";
/// Value used for the card ID when recognition is rejected.
pub const DEFAULT_CARD_ID: &str = "000000";
/// Value used for the class year when recognition is rejected.
pub const DEFAULT_YEAR: &str = "Class of 0000";
/// An empty barcode means "encode the card ID instead".
pub const DEFAULT_BARCODE: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Photo,
    Name,
    Id,
    Year,
    Barcode,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Photo,
        FieldType::Name,
        FieldType::Id,
        FieldType::Year,
        FieldType::Barcode,
    ];

    /// Fields that go through OCR.
    pub const TEXT: [FieldType; 4] = [
        FieldType::Name,
        FieldType::Id,
        FieldType::Year,
        FieldType::Barcode,
    ];

    /// Compiled-in fallback for a text field. The photo has no textual default.
    pub fn default_value(&self) -> &'static str {
        match self {
            FieldType::Photo => "",
            FieldType::Name => DEFAULT_NAME,
            FieldType::Id => DEFAULT_CARD_ID,
            FieldType::Year => DEFAULT_YEAR,
            FieldType::Barcode => DEFAULT_BARCODE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Photo => "photo",
            FieldType::Name => "name",
            FieldType::Id => "id",
            FieldType::Year => "year",
            FieldType::Barcode => "barcode",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel rectangle on the card assigned to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub field: FieldType,
}

impl Region {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= width && self.bottom() <= height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Confidence::Low => f.write_str("low"),
            Confidence::High => f.write_str("high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
    pub confidence: Confidence,
}

impl RecognitionResult {
    pub fn accepted(text: impl Into<String>) -> Self {
        RecognitionResult {
            text: text.into(),
            confidence: Confidence::High,
        }
    }

    /// The field's default, marked low confidence.
    pub fn defaulted(field: FieldType) -> Self {
        RecognitionResult {
            text: field.default_value().to_string(),
            confidence: Confidence::Low,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceMap {
    pub name: Confidence,
    pub card_id: Confidence,
    pub year: Confidence,
}

/// Where the record's barcode value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarcodeSource {
    Scanned,
    CardId,
}

/// Final output of one scan. Every text field is populated, with defaults if needed.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub name: String,
    pub card_id: String,
    pub year: String,
    pub photo: RgbaImage,
    pub barcode: String,
    pub barcode_source: BarcodeSource,
    pub barcode_image: RgbaImage,
    pub confidence: ConfidenceMap,
}

/// Body accepted by the pass issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    pub name: String,
    pub card_id: String,
    pub year: String,
    pub photo: String,
    pub barcode: String,
}

/// Progress notifications emitted while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    CardLocated { x: u32, y: u32, width: u32, height: u32 },
    RegionsPartitioned,
    FieldRecognized { field: FieldType, confidence: Confidence },
    PhotoEnhanced,
    Assembled,
}
