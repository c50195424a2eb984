// src/fetch/index.rs

use chrono::{Datelike, NaiveDate};
use encoding_rs::Encoding;
use tracing::{debug, trace, warn};

use super::RemoteSource;
use crate::error::{RatesError, Result};

/// Index of the tables published so far in the running year.
pub const CURRENT_INDEX: &str = "dir.txt";
pub const TABLE_EXTENSION: &str = ".xml";

/// Index file holding the tables published in `date`'s year.
///
/// The running year lives in `dir.txt`; every finished year moves to
/// `dir<YYYY>.txt`. `today` is the wall-clock day of the run, not `date`.
pub fn index_file_name(date: NaiveDate, today: NaiveDate) -> String {
    if date.year() == today.year() {
        CURRENT_INDEX.to_string()
    } else {
        format!("dir{}.txt", date.year())
    }
}

/// `yyMMdd`, the way publishing dates are embedded in index lines.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// First index line starting with `table_type` that mentions `date`.
pub fn find_table_stem<'a>(index: &'a str, table_type: &str, date: NaiveDate) -> Option<&'a str> {
    let key = date_key(date);
    index
        .lines()
        .find(|line| line.starts_with(table_type) && line.contains(&key))
}

/// Resolves a date to the name of the table document published on it.
#[derive(Debug, Clone)]
pub struct TableLocator {
    table_type: String,
    encoding: &'static Encoding,
}

impl TableLocator {
    pub fn new(table_type: impl Into<String>, encoding: &'static Encoding) -> Result<Self> {
        let table_type = table_type.into();
        if table_type.is_empty() {
            return Err(RatesError::Argument("table type must not be empty".into()));
        }
        Ok(Self {
            table_type,
            encoding,
        })
    }

    pub fn table_type(&self) -> &str {
        &self.table_type
    }

    /// Index bytes as text. A leading byte-order mark is dropped and
    /// malformed bytes become U+FFFD, so other lines stay searchable.
    pub fn decode_index(&self, resource: &str, bytes: &[u8]) -> String {
        let (text, had_errors) = self.encoding.decode_with_bom_removal(bytes);
        if had_errors {
            warn!(
                index = resource,
                encoding = self.encoding.name(),
                "malformed bytes replaced in index"
            );
        }
        text.into_owned()
    }

    /// File name (`<stem>.xml`) of the table published on `date`.
    pub fn locate(
        &self,
        source: &impl RemoteSource,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<String> {
        let index = index_file_name(date, today);
        let text = self.decode_index(&index, &source.fetch(&index)?);
        trace!(index = %index, lines = text.lines().count(), "scanning index");

        let stem = find_table_stem(&text, &self.table_type, date).ok_or_else(|| {
            RatesError::TableNotListed {
                table_type: self.table_type.clone(),
                date,
                index: index.clone(),
            }
        })?;
        debug!(%date, index = %index, stem, "located table");
        Ok(format!("{stem}{TABLE_EXTENSION}"))
    }
}
