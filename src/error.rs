// src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RatesError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while collecting and summarising rates.
#[derive(Error, Debug)]
pub enum RatesError {
    /// Bad user input: reversed range, invalid config values.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Decoder, number style or HTTP client could not be set up.
    #[error("initialisation failed: {0}")]
    Init(String),

    /// Connection, timeout or HTTP status failure while reading `resource`.
    #[error("fetching {resource} failed: {source}")]
    Io {
        resource: String,
        #[source]
        source: BoxError,
    },

    /// The resource was fetched but its content could not be decoded.
    #[error("decoding {resource} failed: {message}")]
    Decode { resource: String, message: String },

    /// No index line for this date and table type. Normal on weekends and holidays.
    #[error("no table of type {table_type:?} for {date} listed in {index}")]
    TableNotListed {
        table_type: String,
        date: NaiveDate,
        index: String,
    },

    #[error("currency code not found: {0}")]
    CurrencyNotFound(String),

    #[error("no rates collected for {code} between {start} and {end}")]
    EmptyResult {
        code: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl RatesError {
    pub(crate) fn io(resource: impl Into<String>, source: impl Into<BoxError>) -> Self {
        RatesError::Io {
            resource: resource.into(),
            source: source.into(),
        }
    }

    pub(crate) fn decode(resource: impl Into<String>, message: impl ToString) -> Self {
        RatesError::Decode {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    /// True for failures that only cost the current date; the run carries on.
    pub fn is_per_date(&self) -> bool {
        matches!(
            self,
            RatesError::Io { .. }
                | RatesError::Decode { .. }
                | RatesError::TableNotListed { .. }
                | RatesError::CurrencyNotFound(_)
        )
    }
}
