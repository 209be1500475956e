pub mod currency;
pub mod dates;
pub mod error;
pub mod logging;
pub mod normalization;

pub use currency::{format_currency, normalize_currency, parse_currency};
pub use dates::{format_date_local, parse_date, to_iso_date_or_null};
pub use error::*;
