// src/currency/mod.rs
pub mod converter;
pub mod display;

pub use converter::{CurrencyConverter, CurrencySettings, RateSource, ResolvedRate};
pub use display::{DisplayAmounts, FormattedAmounts};
