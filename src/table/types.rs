// src/table/types.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

use crate::error::{RatesError, Result};

/// One currency's quote within a rate table (a "pozycja").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRecord {
    currency_name: String,
    currency_code: String,
    multiplier: u32,
    buying_price: Decimal,
    selling_price: Decimal,
}

impl RateRecord {
    pub fn new(
        currency_name: impl Into<String>,
        currency_code: impl Into<String>,
        multiplier: u32,
        buying_price: Decimal,
        selling_price: Decimal,
    ) -> Self {
        Self {
            currency_name: currency_name.into(),
            currency_code: currency_code.into(),
            multiplier,
            buying_price,
            selling_price,
        }
    }

    pub fn currency_name(&self) -> &str {
        &self.currency_name
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// How many units of the currency the prices are quoted for.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn buying_price(&self) -> Decimal {
        self.buying_price
    }

    pub fn selling_price(&self) -> Decimal {
        self.selling_price
    }
}

/// One daily publication of exchange quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    table_id: String,
    table_type: String,
    listing_date: NaiveDate,
    publishing_date: NaiveDate,
    positions: Vec<RateRecord>,
}

impl RateTable {
    pub fn new(
        table_id: impl Into<String>,
        table_type: impl Into<String>,
        listing_date: NaiveDate,
        publishing_date: NaiveDate,
        positions: Vec<RateRecord>,
    ) -> Self {
        Self {
            table_id: table_id.into(),
            table_type: table_type.into(),
            listing_date,
            publishing_date,
            positions,
        }
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn table_type(&self) -> &str {
        &self.table_type
    }

    /// The day the quotes were taken.
    pub fn listing_date(&self) -> NaiveDate {
        self.listing_date
    }

    pub fn publishing_date(&self) -> NaiveDate {
        self.publishing_date
    }

    pub fn positions(&self) -> &[RateRecord] {
        &self.positions
    }

    /// First record quoted for `currency_code` (exact, case-sensitive match).
    pub fn position(&self, currency_code: &str) -> Result<&RateRecord> {
        self.positions
            .iter()
            .find(|p| p.currency_code == currency_code)
            .ok_or_else(|| RatesError::CurrencyNotFound(currency_code.to_string()))
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (type {}, listed {}, published {}, {} positions)",
            self.table_id,
            self.table_type,
            self.listing_date,
            self.publishing_date,
            self.positions.len()
        )
    }
}
