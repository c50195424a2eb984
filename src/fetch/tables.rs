// src/fetch/tables.rs

use chrono::NaiveDate;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use super::{HttpSource, RemoteSource, TableLocator};
use crate::config::Config;
use crate::error::Result;
use crate::table::{decode_table, NumberStyle, RateTable};

/// Locates and downloads rate tables from one source.
pub struct TableFetcher<S> {
    source: S,
    locator: TableLocator,
    number_style: NumberStyle,
}

impl TableFetcher<HttpSource> {
    /// HTTP fetcher set up from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base: Url = config.base_url()?;
        let source = HttpSource::new(
            base,
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.read_timeout_ms),
        )?;
        let locator = TableLocator::new(config.table_type.clone(), config.encoding()?)?;
        Ok(Self::new(source, locator, NumberStyle::COMMA_DECIMAL))
    }
}

impl<S: RemoteSource> TableFetcher<S> {
    pub fn new(source: S, locator: TableLocator, number_style: NumberStyle) -> Self {
        Self {
            source,
            locator,
            number_style,
        }
    }

    pub fn locator(&self) -> &TableLocator {
        &self.locator
    }

    /// Download and decode the table document `file_name` (`<stem>.xml`).
    pub fn fetch_table(&self, file_name: &str) -> Result<RateTable> {
        let bytes = self.source.fetch(file_name)?;
        decode_table(file_name, &bytes, &self.number_style)
    }

    /// The table published on `date`: one index read, one table read.
    #[instrument(level = "debug", skip(self, today))]
    pub fn download_table(&self, date: NaiveDate, today: NaiveDate) -> Result<RateTable> {
        let file_name = self.locator.locate(&self.source, date, today)?;
        self.fetch_table(&file_name)
    }
}
