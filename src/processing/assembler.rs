use crate::models::{
    BarcodeSource, CardRecord, Confidence, ConfidenceMap, PassPayload, RecognitionResult,
    DEFAULT_CARD_ID, DEFAULT_NAME, DEFAULT_YEAR,
};
use crate::processing::barcode::render_barcode;
use crate::processing::image::encode_png;
use crate::utils::CardError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;

fn tag(value: &str, default: &str) -> Confidence {
    if value == default {
        Confidence::Low
    } else {
        Confidence::High
    }
}

/// Combine field results into a complete record. Never fails.
pub fn assemble(
    name: RecognitionResult,
    id: RecognitionResult,
    year: RecognitionResult,
    barcode: RecognitionResult,
    photo: RgbaImage,
) -> CardRecord {
    let (barcode, barcode_source) = if barcode.text.is_empty() {
        (id.text.clone(), BarcodeSource::CardId)
    } else {
        (barcode.text, BarcodeSource::Scanned)
    };

    let confidence = ConfidenceMap {
        name: tag(&name.text, DEFAULT_NAME),
        card_id: tag(&id.text, DEFAULT_CARD_ID),
        year: tag(&year.text, DEFAULT_YEAR),
    };

    CardRecord {
        name: name.text,
        card_id: id.text,
        year: year.text,
        photo,
        barcode_image: render_barcode(&barcode),
        barcode,
        barcode_source,
        confidence,
    }
}

impl CardRecord {
    pub fn has_low_confidence(&self) -> bool {
        [self.confidence.name, self.confidence.card_id, self.confidence.year]
            .contains(&Confidence::Low)
    }

    /// Photo as a `data:image/png;base64,` URL.
    pub fn photo_data_url(&self) -> Result<String, CardError> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(encode_png(&self.photo)?)))
    }

    /// Fields handed to the pass issuer.
    pub fn to_pass_payload(&self) -> Result<PassPayload, CardError> {
        Ok(PassPayload {
            name: self.name.clone(),
            card_id: self.card_id.clone(),
            year: self.year.clone(),
            photo: self.photo_data_url()?,
            barcode: self.barcode.clone(),
        })
    }

    pub fn to_json(&self) -> Result<String, CardError> {
        Ok(serde_json::to_string_pretty(&self.to_pass_payload()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;
    use image::Rgba;

    fn photo() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([90, 120, 150, 255]))
    }

    #[test]
    fn test_assemble_prefers_scanned_barcode() {
        let record = assemble(
            RecognitionResult::accepted("Jane Doe"),
            RecognitionResult::accepted("12345"),
            RecognitionResult::accepted("Class of 2025"),
            RecognitionResult::accepted("99887766"),
            photo(),
        );
        assert_eq!(record.barcode, "99887766");
        assert_eq!(record.barcode_source, BarcodeSource::Scanned);
        assert_eq!(record.barcode_image, render_barcode("99887766"));
        assert!(!record.has_low_confidence());
    }

    #[test]
    fn test_assemble_falls_back_to_card_id() {
        let record = assemble(
            RecognitionResult::accepted("Jane Doe"),
            RecognitionResult::accepted("12345"),
            RecognitionResult::accepted("Class of 2025"),
            RecognitionResult::defaulted(FieldType::Barcode),
            photo(),
        );
        assert_eq!(record.barcode, record.card_id);
        assert_eq!(record.barcode_source, BarcodeSource::CardId);
    }

    #[test]
    fn test_confidence_tracks_defaults() {
        let record = assemble(
            RecognitionResult::defaulted(FieldType::Name),
            RecognitionResult::defaulted(FieldType::Id),
            RecognitionResult::accepted("Class of 2026"),
            RecognitionResult::defaulted(FieldType::Barcode),
            photo(),
        );
        assert_eq!(record.confidence.name, Confidence::Low);
        assert_eq!(record.confidence.card_id, Confidence::Low);
        assert_eq!(record.confidence.year, Confidence::High);
        assert_eq!(record.barcode, DEFAULT_CARD_ID);
        assert!(record.has_low_confidence());
    }

    #[test]
    fn test_pass_payload_is_complete() {
        let record = assemble(
            RecognitionResult::defaulted(FieldType::Name),
            RecognitionResult::defaulted(FieldType::Id),
            RecognitionResult::defaulted(FieldType::Year),
            RecognitionResult::defaulted(FieldType::Barcode),
            photo(),
        );
        let payload = record.to_pass_payload().unwrap();
        for value in [&payload.name, &payload.card_id, &payload.year, &payload.photo, &payload.barcode] {
            assert!(!value.is_empty());
        }
        assert!(payload.photo.starts_with("data:image/png;base64,"));

        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json["cardId"], DEFAULT_CARD_ID);
        assert_eq!(json["barcode"], DEFAULT_CARD_ID);
        assert_eq!(json["name"], DEFAULT_NAME);
    }
}
