// Student ID card scanner
// Extracts card fields from a photo and prints a report or the pass payload

use cardscan::{
    models::{CardLayout, CardRecord, Confidence, ScanConfig},
    processing::image::save_png,
    utils::CardError,
    CardScanner,
};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cardscan", version, about = "Extract student ID card fields for a wallet pass")]
struct Args {
    /// Photo of the card
    image: PathBuf,

    /// JSON scan configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON region layout, overrides the one in --config
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Deadline for each OCR call in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Use the lower threshold for dark name text
    #[arg(long)]
    dark_text: bool,

    /// Skip locating the card inside the photo
    #[arg(long)]
    no_locate: bool,

    /// Tesseract data directory
    #[arg(long)]
    tessdata: Option<String>,

    /// OCR language
    #[arg(long)]
    lang: Option<String>,

    /// Write the enhanced photo as PNG
    #[arg(long)]
    photo_out: Option<PathBuf>,

    /// Write the barcode rendering as PNG
    #[arg(long)]
    barcode_out: Option<PathBuf>,

    /// Print the pass payload as JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn build_config(args: &Args) -> Result<ScanConfig, CardError> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(path) = &args.layout {
        config.layout = CardLayout::from_json_file(path)?;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.ocr_timeout_ms = timeout_ms;
    }
    if args.dark_text {
        config.dark_text = true;
    }
    if args.no_locate {
        config.locate_card = false;
    }
    if let Some(tessdata) = &args.tessdata {
        config.tessdata_path = Some(tessdata.clone());
    }
    if let Some(lang) = &args.lang {
        config.language = lang.clone();
    }
    config.validate()?;
    Ok(config)
}

fn marker(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "",
        Confidence::Low => "  [LOW CONFIDENCE - please check]",
    }
}

fn print_report(record: &CardRecord) {
    println!("\n===============================================");
    println!("          STUDENT ID CARD SCAN REPORT");
    println!("===============================================\n");

    println!("  Name:    {}{}", record.name, marker(record.confidence.name));
    println!("  ID:      {}{}", record.card_id, marker(record.confidence.card_id));
    println!("  Year:    {}{}", record.year, marker(record.confidence.year));
    println!("  Barcode: {} (from {:?})", record.barcode, record.barcode_source);
    println!(
        "  Photo:   {}x{} px",
        record.photo.width(),
        record.photo.height()
    );

    if record.has_low_confidence() {
        println!("\nSome fields fell back to defaults. Review them before issuing a pass.");
    }
}

fn run(args: &Args) -> Result<(), CardError> {
    let config = build_config(args)?;
    let scanner = CardScanner::with_tesseract(config);

    info!("Scanning card image at: {:?}", args.image);
    let record = scanner.scan_file_blocking(&args.image)?;

    if let Some(path) = &args.photo_out {
        save_png(&record.photo, path)?;
        info!("Photo written to {:?}", path);
    }
    if let Some(path) = &args.barcode_out {
        save_png(&record.barcode_image, path)?;
        info!("Barcode written to {:?}", path);
    }

    if args.json {
        println!("{}", record.to_json()?);
    } else {
        print_report(&record);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error scanning card: {}", err);
            ExitCode::FAILURE
        }
    }
}
