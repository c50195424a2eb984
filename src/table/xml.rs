// src/table/xml.rs

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::bytes::Regex;
use serde::Deserialize;
use tracing::{debug, instrument, trace};

use super::number::NumberStyle;
use super::types::{RateRecord, RateTable};
use crate::error::{RatesError, Result};

const ROOT_ELEMENT: &str = "tabela_kursow";

static PROLOG_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?-u:\xEF\xBB\xBF)?\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("prolog encoding regex should compile")
});

/// `<tabela_kursow typ="C">` as published.
#[derive(Debug, Deserialize)]
struct TableXml {
    #[serde(rename = "@typ")]
    table_type: String,
    #[serde(rename = "numer_tabeli")]
    table_id: String,
    #[serde(rename = "data_notowania")]
    listing_date: NaiveDate,
    #[serde(rename = "data_publikacji")]
    publishing_date: NaiveDate,
    #[serde(rename = "pozycja", default)]
    positions: Vec<PositionXml>,
}

/// Prices stay raw text here; `NumberStyle` turns them into decimals.
#[derive(Debug, Deserialize)]
struct PositionXml {
    #[serde(rename = "nazwa_waluty")]
    currency_name: String,
    #[serde(rename = "kod_waluty")]
    currency_code: String,
    #[serde(rename = "przelicznik")]
    multiplier: u32,
    #[serde(rename = "kurs_kupna")]
    buying_price: String,
    #[serde(rename = "kurs_sprzedazy")]
    selling_price: String,
}

/// Encoding named in the `<?xml ... encoding="..."?>` prolog, UTF-8 when absent.
fn declared_encoding(bytes: &[u8]) -> std::result::Result<&'static Encoding, String> {
    match PROLOG_ENCODING.captures(bytes).and_then(|c| c.get(1)) {
        Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            format!(
                "unknown encoding {:?} in prolog",
                String::from_utf8_lossy(label.as_bytes())
            )
        }),
        None => Ok(UTF_8),
    }
}

fn root_name(text: &str) -> std::result::Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(String::from_utf8_lossy(e.name().as_ref()).into_owned()))
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Decode a published table document into a [`RateTable`].
#[instrument(level = "debug", skip(bytes, style), fields(len = bytes.len()))]
pub fn decode_table(resource: &str, bytes: &[u8], style: &NumberStyle) -> Result<RateTable> {
    let encoding = declared_encoding(bytes).map_err(|m| RatesError::decode(resource, m))?;
    trace!(encoding = encoding.name(), "decoding table text");
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(RatesError::decode(
            resource,
            format!("invalid {} byte sequence", encoding.name()),
        ));
    }

    match root_name(&text).map_err(|e| RatesError::decode(resource, e))? {
        Some(name) if name == ROOT_ELEMENT => {}
        Some(name) => {
            return Err(RatesError::decode(
                resource,
                format!("expected <{ROOT_ELEMENT}>, found <{name}>"),
            ))
        }
        None => return Err(RatesError::decode(resource, "document has no root element")),
    }

    let raw: TableXml =
        quick_xml::de::from_str(&text).map_err(|e| RatesError::decode(resource, e))?;

    let mut positions = Vec::with_capacity(raw.positions.len());
    for p in raw.positions {
        let price = |field: &str, value: &str| {
            style.parse(value).map_err(|m| {
                RatesError::decode(resource, format!("{field} of {}: {m}", p.currency_code))
            })
        };
        let buying = price("kurs_kupna", &p.buying_price)?;
        let selling = price("kurs_sprzedazy", &p.selling_price)?;
        positions.push(RateRecord::new(
            p.currency_name,
            p.currency_code,
            p.multiplier,
            buying,
            selling,
        ));
    }

    debug!(table = %raw.table_id, positions = positions.len(), "decoded table");
    Ok(RateTable::new(
        raw.table_id,
        raw.table_type,
        raw.listing_date,
        raw.publishing_date,
        positions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SAMPLE_TABLE as SAMPLE;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_sample_table() {
        let t = decode_table("c051z230315.xml", SAMPLE.as_bytes(), &NumberStyle::default())
            .unwrap();
        assert_eq!(t.table_id(), "051/C/NBP/2023");
        assert_eq!(t.table_type(), "C");
        assert_eq!(t.listing_date(), NaiveDate::from_ymd_opt(2023, 3, 14).unwrap());
        assert_eq!(t.publishing_date(), NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(t.positions().len(), 2);

        let jpy = t.position("JPY").unwrap();
        assert_eq!(jpy.currency_name(), "jen (Japonia)");
        assert_eq!(jpy.multiplier(), 100);
        assert_eq!(jpy.buying_price(), dec!(3.2601));
        assert_eq!(jpy.selling_price(), dec!(3.3259));
    }

    #[test]
    fn test_decode_honours_declared_latin2() {
        let doc = SAMPLE.replace(r#"encoding="UTF-8""#, r#"encoding="ISO-8859-2""#);
        let (bytes, _, unmappable) = encoding_rs::ISO_8859_2.encode(&doc);
        assert!(!unmappable);
        let t = decode_table("c051z230315.xml", &bytes, &NumberStyle::default()).unwrap();
        assert_eq!(t.position("USD").unwrap().currency_name(), "dolar amerykański");
    }

    #[test]
    fn test_bad_price_is_a_decode_error() {
        let doc = SAMPLE.replace("4,3712", "4.3712");
        let err = decode_table("c051z230315.xml", doc.as_bytes(), &NumberStyle::default())
            .unwrap_err();
        match err {
            RatesError::Decode { resource, message } => {
                assert_eq!(resource, "c051z230315.xml");
                assert!(message.contains("USD"), "{message}");
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_root_and_garbage_are_decode_errors() {
        let style = NumberStyle::default();
        let wrong = "<html><body>Not Found</body></html>";
        assert!(matches!(
            decode_table("x.xml", wrong.as_bytes(), &style),
            Err(RatesError::Decode { .. })
        ));
        assert!(matches!(
            decode_table("x.xml", b"", &style),
            Err(RatesError::Decode { .. })
        ));
        let truncated = &SAMPLE[..SAMPLE.find("<data_publikacji>").unwrap()];
        assert!(matches!(
            decode_table("x.xml", truncated.as_bytes(), &style),
            Err(RatesError::Decode { .. })
        ));
    }

    #[test]
    fn test_unknown_prolog_encoding() {
        let doc = SAMPLE.replace(r#"encoding="UTF-8""#, r#"encoding="x-made-up""#);
        assert!(matches!(
            decode_table("x.xml", doc.as_bytes(), &NumberStyle::default()),
            Err(RatesError::Decode { .. })
        ));
    }
}
