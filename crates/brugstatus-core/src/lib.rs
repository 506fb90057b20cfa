pub mod config;
pub mod error;
pub mod fetch;
pub mod interpret;
pub mod record;
pub mod strategy;
pub mod types;

pub use error::{BrugError, Result};
