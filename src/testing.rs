// src/testing.rs
//
// Shared fixtures for the in-crate tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{RatesError, Result};
use crate::fetch::RemoteSource;

pub(crate) const SAMPLE_TABLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tabela_kursow typ="C" uid="23c051">
<numer_tabeli>051/C/NBP/2023</numer_tabeli>
<data_notowania>2023-03-14</data_notowania>
<data_publikacji>2023-03-15</data_publikacji>
<pozycja>
<nazwa_waluty>dolar amerykański</nazwa_waluty>
<przelicznik>1</przelicznik>
<kod_waluty>USD</kod_waluty>
<kurs_kupna>4,3712</kurs_kupna>
<kurs_sprzedazy>4,4596</kurs_sprzedazy>
</pozycja>
<pozycja>
<nazwa_waluty>jen (Japonia)</nazwa_waluty>
<przelicznik>100</przelicznik>
<kod_waluty>JPY</kod_waluty>
<kurs_kupna>3,2601</kurs_kupna>
<kurs_sprzedazy>3,3259</kurs_sprzedazy>
</pozycja>
</tabela_kursow>
"#;

/// A single-currency C table with the given number, dates and prices.
pub(crate) fn c_table(number: &str, published: &str, code: &str, buy: &str, sell: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tabela_kursow typ="C">
<numer_tabeli>{number}</numer_tabeli>
<data_notowania>{published}</data_notowania>
<data_publikacji>{published}</data_publikacji>
<pozycja>
<nazwa_waluty>waluta</nazwa_waluty>
<przelicznik>1</przelicznik>
<kod_waluty>{code}</kod_waluty>
<kurs_kupna>{buy}</kurs_kupna>
<kurs_sprzedazy>{sell}</kurs_sprzedazy>
</pozycja>
</tabela_kursow>
"#
    )
}

/// In-memory stand-in for the publisher's folder. Missing names fail like a 404.
#[derive(Default)]
pub(crate) struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, name: &str, body: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.to_string(), body.into());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl RemoteSource for MemorySource {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(name.to_string());
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| RatesError::io(format!("memory://{name}"), "404 Not Found"))
    }
}

pub(crate) fn init_test_logging() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
