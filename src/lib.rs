pub mod config;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod stats;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{RatesError, Result};
