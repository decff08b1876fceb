use crate::models::CardLayout;
use crate::utils::CardError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default deadline for a single OCR call.
pub const DEFAULT_OCR_TIMEOUT_MS: u64 = 15_000;

/// Settings for one scanner instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub ocr_timeout_ms: u64,
    /// Lower the name threshold for cards printed with dark text on a dark band.
    pub dark_text: bool,
    /// Crop to the coloured card before partitioning.
    pub locate_card: bool,
    pub language: String,
    pub tessdata_path: Option<String>,
    pub layout: CardLayout,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            ocr_timeout_ms: DEFAULT_OCR_TIMEOUT_MS,
            dark_text: false,
            locate_card: true,
            language: "eng".to_string(),
            tessdata_path: None,
            layout: CardLayout::default(),
        }
    }
}

impl ScanConfig {
    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_millis(self.ocr_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.ocr_timeout_ms == 0 {
            return Err(CardError::Config("ocr_timeout_ms must be positive".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(CardError::Config("language must not be empty".to_string()));
        }
        self.layout.validate()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CardError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CardError::Io(format!("Failed to read config {:?}: {}", path.as_ref(), e))
        })?;
        let config: ScanConfig = serde_json::from_str(&json)
            .map_err(|e| CardError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
