use crate::models::FieldType;
use crate::utils::CardError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fractional bounds of one field, relative to the card's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fraction {
    pub fx: f32,
    pub fy: f32,
    pub fw: f32,
    pub fh: f32,
}

impl Fraction {
    pub const fn new(fx: f32, fy: f32, fw: f32, fh: f32) -> Self {
        Fraction { fx, fy, fw, fh }
    }
}

/// Region table for a single card template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    pub photo: Fraction,
    pub name: Fraction,
    pub id: Fraction,
    pub year: Fraction,
    pub barcode: Fraction,
}

impl Default for CardLayout {
    fn default() -> Self {
        CardLayout {
            // Photo - left side of card
            photo: Fraction::new(0.03, 0.20, 0.35, 0.50),
            // Text bands below the photo
            name: Fraction::new(0.05, 0.72, 0.90, 0.08),
            id: Fraction::new(0.05, 0.80, 0.25, 0.08),
            year: Fraction::new(0.05, 0.88, 0.40, 0.08),
            // Barcode - lower right
            barcode: Fraction::new(0.60, 0.70, 0.35, 0.20),
        }
    }
}

impl CardLayout {
    pub fn fraction(&self, field: FieldType) -> Fraction {
        match field {
            FieldType::Photo => self.photo,
            FieldType::Name => self.name,
            FieldType::Id => self.id,
            FieldType::Year => self.year,
            FieldType::Barcode => self.barcode,
        }
    }

    /// Reject tables that would place a region outside the card.
    pub fn validate(&self) -> Result<(), CardError> {
        for field in FieldType::ALL {
            let f = self.fraction(field);
            let values = [f.fx, f.fy, f.fw, f.fh];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(CardError::Layout(format!(
                    "{} fractions must be finite and non-negative",
                    field
                )));
            }
            if f.fw <= 0.0 || f.fh <= 0.0 {
                return Err(CardError::Layout(format!("{} region has no area", field)));
            }
            if f.fx + f.fw > 1.0 + f32::EPSILON || f.fy + f.fh > 1.0 + f32::EPSILON {
                return Err(CardError::Layout(format!(
                    "{} region extends past the card edge",
                    field
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, CardError> {
        let layout: CardLayout =
            serde_json::from_str(json).map_err(|e| CardError::Layout(format!("Invalid layout: {}", e)))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CardError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CardError::Io(format!("Failed to read layout {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        assert!(CardLayout::default().validate().is_ok());
    }

    #[test]
    fn test_layout_from_json() {
        let json = r#"{
            "photo":   {"fx": 0.0, "fy": 0.0, "fw": 0.5, "fh": 0.5},
            "name":    {"fx": 0.0, "fy": 0.5, "fw": 1.0, "fh": 0.1},
            "id":      {"fx": 0.0, "fy": 0.6, "fw": 0.3, "fh": 0.1},
            "year":    {"fx": 0.0, "fy": 0.7, "fw": 0.3, "fh": 0.1},
            "barcode": {"fx": 0.5, "fy": 0.8, "fw": 0.5, "fh": 0.2}
        }"#;
        let layout = CardLayout::from_json(json).unwrap();
        assert_eq!(layout.name.fw, 1.0);
        assert_eq!(layout.fraction(FieldType::Barcode).fx, 0.5);
    }

    #[test]
    fn test_layout_out_of_bounds_rejected() {
        let mut layout = CardLayout::default();
        layout.barcode = Fraction::new(0.8, 0.7, 0.35, 0.2);
        assert!(matches!(layout.validate(), Err(CardError::Layout(_))));

        layout = CardLayout::default();
        layout.id = Fraction::new(0.05, 0.8, 0.0, 0.08);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_layout_missing_field_rejected() {
        let json = r#"{"photo": {"fx": 0.0, "fy": 0.0, "fw": 0.5, "fh": 0.5}}"#;
        assert!(matches!(CardLayout::from_json(json), Err(CardError::Layout(_))));
    }
}
