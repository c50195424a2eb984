pub mod number;
pub mod types;
pub mod xml;

pub use number::NumberStyle;
pub use types::{RateRecord, RateTable};
pub use xml::decode_table;
