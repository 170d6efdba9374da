// src/currency/display.rs
use serde::{Deserialize, Serialize};

use crate::currency::converter::CurrencySettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayAmounts {
    pub base: f64,
    pub secondary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedAmounts {
    pub base: String,
    pub secondary: String,
}

impl DisplayAmounts {
    /// Local amounts are shown whole, the reference currency with cents.
    pub fn format(&self, settings: &CurrencySettings) -> FormattedAmounts {
        FormattedAmounts {
            base: format!("{} {}", settings.base_code, group_thousands(self.base, 0)),
            secondary: format!("{} {}", settings.quote_code, group_thousands(self.secondary, 2)),
        }
    }
}

pub fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
