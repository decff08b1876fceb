pub mod assembler;
pub mod barcode;
pub mod image;
pub mod image_processor;
pub mod ocr;
pub mod recognizer;
pub mod regions;

pub use assembler::assemble;
pub use barcode::render_barcode;
pub use self::image::CardImage;
pub use image_processor::{preprocess, Profile};
pub use ocr::{OcrConfig, OcrEngine, Segmentation, TesseractEngine};
pub use recognizer::FieldRecognizer;
pub use regions::{crop_to_card, locate_card, partition, CardColors};
