pub mod config;
pub mod data;
pub mod layout;

pub use config::*;
pub use data::*;
pub use layout::*;
