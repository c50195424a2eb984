// src/driver.rs

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::error::{RatesError, Result};
use crate::fetch::{RemoteSource, TableFetcher};
use crate::stats::{self, RateSummary};
use crate::table::RateRecord;

/// What one run over a date range produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub summary: RateSummary,
    pub days: usize,
    pub skipped: usize,
}

/// Every calendar day from `start` to `end`, both included.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Quote for `code` on each day of the range that has one.
///
/// Days whose table cannot be located, fetched, decoded or that lack the
/// currency are logged and left out. Returns the quotes and the number of
/// days skipped.
pub fn collect_rates<S: RemoteSource>(
    fetcher: &TableFetcher<S>,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> (Vec<RateRecord>, usize) {
    let mut rates = Vec::new();
    let mut skipped = 0;

    for date in days_between(start, end) {
        let found = fetcher.download_table(date, today).and_then(|table| {
            info!(%date, table = %table, "received table");
            let record = table.position(code)?.clone();
            Ok(record)
        });
        match found {
            Ok(record) => rates.push(record),
            Err(RatesError::TableNotListed { .. }) => {
                warn!(%date, "no table published, skipping");
                skipped += 1;
            }
            Err(e) if e.is_per_date() => {
                warn!(%date, error = %e, "skipping day");
                skipped += 1;
            }
            Err(e) => {
                error!(%date, error = %e, "unexpected failure, skipping day");
                skipped += 1;
            }
        }
    }

    (rates, skipped)
}

/// Collect `code` over `[start, end]` and summarise it.
pub fn run<S: RemoteSource>(
    fetcher: &TableFetcher<S>,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<RunReport> {
    if end < start {
        return Err(RatesError::Argument(format!(
            "end date {end} is before start date {start}"
        )));
    }

    let (rates, skipped) = collect_rates(fetcher, code, start, end, today);
    let days = rates.len() + skipped;
    let summary = stats::summarize(&rates).ok_or_else(|| RatesError::EmptyResult {
        code: code.to_string(),
        start,
        end,
    })?;

    info!(
        code,
        days,
        skipped,
        mean_buying = %summary.mean_buying,
        mean_selling = %summary.mean_selling,
        "collected rates"
    );
    Ok(RunReport {
        summary,
        days,
        skipped,
    })
}
