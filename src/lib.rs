pub mod models;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod card_scanner;

pub use card_scanner::CardScanner;
