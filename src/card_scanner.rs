use crate::models::*;
use crate::processing::{
    assemble, crop_to_card, partition, preprocess, CardColors, CardImage, FieldRecognizer,
    OcrEngine, Profile, TesseractEngine,
};
use crate::utils::CardError;
use image::RgbaImage;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// Extracts a `CardRecord` from a photographed ID card.
pub struct CardScanner {
    config: ScanConfig,
    colors: CardColors,
    recognizer: FieldRecognizer,
}

impl CardScanner {
    pub fn new(engine: Arc<dyn OcrEngine>, config: ScanConfig) -> Self {
        let recognizer = FieldRecognizer::new(engine, config.ocr_timeout(), config.dark_text);
        CardScanner {
            config,
            colors: CardColors::default(),
            recognizer,
        }
    }

    /// Scanner backed by Tesseract with the configured language and data path.
    pub fn with_tesseract(config: ScanConfig) -> Self {
        let engine = TesseractEngine::new(&config.language, config.tessdata_path.as_deref());
        Self::new(Arc::new(engine), config)
    }

    pub fn with_colors(mut self, colors: CardColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub async fn scan_file(
        &self,
        path: &Path,
        progress_tx: Option<Sender<ProgressEvent>>,
    ) -> Result<CardRecord, CardError> {
        let image = CardImage::open(path)?;
        Ok(self.scan(&image, progress_tx).await)
    }

    pub async fn scan_bytes(
        &self,
        bytes: &[u8],
        progress_tx: Option<Sender<ProgressEvent>>,
    ) -> Result<CardRecord, CardError> {
        let image = CardImage::from_bytes(bytes)?;
        Ok(self.scan(&image, progress_tx).await)
    }

    /// Run the full pipeline on a decoded image. Always returns a complete record.
    pub async fn scan(
        &self,
        image: &CardImage,
        progress_tx: Option<Sender<ProgressEvent>>,
    ) -> CardRecord {
        // Step 1: Find the card in the frame
        let card = if self.config.locate_card {
            let (card, bounds) = crop_to_card(image, &self.colors);
            info!("Card located at {}x{}+{}+{}", bounds.width, bounds.height, bounds.x, bounds.y);
            notify(
                &progress_tx,
                ProgressEvent::CardLocated { x: bounds.x, y: bounds.y, width: bounds.width, height: bounds.height },
            );
            card
        } else {
            image.clone()
        };

        // Step 2: Partition into field regions, each branch owns its crop
        let regions = partition(&card, &self.config.layout);
        notify(&progress_tx, ProgressEvent::RegionsPartitioned);
        let crop = |field: FieldType| card.crop(&regions[&field]);

        // Step 3: Recognize text fields and enhance the photo concurrently
        let photo_pixels = crop(FieldType::Photo);
        let (name, id, year, barcode, photo) = tokio::join!(
            self.recognize(FieldType::Name, crop(FieldType::Name), &progress_tx),
            self.recognize(FieldType::Id, crop(FieldType::Id), &progress_tx),
            self.recognize(FieldType::Year, crop(FieldType::Year), &progress_tx),
            self.recognize(FieldType::Barcode, crop(FieldType::Barcode), &progress_tx),
            enhance_photo(photo_pixels, &progress_tx),
        );

        // Step 4: Assemble
        let record = assemble(name, id, year, barcode, photo);
        info!(
            "Assembled card record: name={} ({}), id={} ({}), year={} ({}), barcode={} ({:?})",
            record.name,
            record.confidence.name,
            record.card_id,
            record.confidence.card_id,
            record.year,
            record.confidence.year,
            record.barcode,
            record.barcode_source
        );
        notify(&progress_tx, ProgressEvent::Assembled);
        record
    }

    /// Blocking wrapper for callers without a runtime.
    ///
    /// OCR calls abandoned after their deadline are left running on the
    /// blocking pool; the runtime is shut down without waiting for them.
    pub fn scan_file_blocking(&self, path: &Path) -> Result<CardRecord, CardError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CardError::Io(format!("Failed to start runtime: {}", e)))?;
        let result = runtime.block_on(self.scan_file(path, None));
        runtime.shutdown_background();
        result
    }

    async fn recognize(
        &self,
        field: FieldType,
        pixels: RgbaImage,
        progress_tx: &Option<Sender<ProgressEvent>>,
    ) -> RecognitionResult {
        let result = self.recognizer.recognize(field, pixels).await;
        notify(progress_tx, ProgressEvent::FieldRecognized { field, confidence: result.confidence });
        result
    }
}

async fn enhance_photo(
    pixels: RgbaImage,
    progress_tx: &Option<Sender<ProgressEvent>>,
) -> RgbaImage {
    let photo = preprocess(pixels, Profile::Photo);
    notify(progress_tx, ProgressEvent::PhotoEnhanced);
    photo
}

/// Progress is best effort: a full or closed channel drops the event.
fn notify(progress_tx: &Option<Sender<ProgressEvent>>, event: ProgressEvent) {
    if let Some(tx) = progress_tx {
        if let Err(e) = tx.try_send(event) {
            debug!("Progress event dropped: {}", e);
        }
    }
}
