// src/currency/converter.rs
// Base-currency amounts to (base, secondary) display pairs

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::currency::display::DisplayAmounts;
use crate::store::exchange_rate_store::ExchangeRateStore;

/// Roughly 1 / 3571 USD per UGX.
pub const DEFAULT_FALLBACK_RATE: f64 = 0.00028;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencySettings {
    /// Currency amounts are stored in (the local currency).
    pub base_code: String,
    /// Reference currency shown next to it.
    pub quote_code: String,
    /// Secondary units per base unit, used when no usable row exists.
    pub fallback_rate: f64,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            base_code: "UGX".to_string(),
            quote_code: "USD".to_string(),
            fallback_rate: DEFAULT_FALLBACK_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RateSource {
    Stored { fetched_at: DateTime<Utc> },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRate {
    /// Secondary units per base unit.
    pub rate: f64,
    #[serde(flatten)]
    pub source: RateSource,
}

/// Converter for one execution context. The rate is resolved on first use and
/// kept for the life of the instance; build a new converter per request.
pub struct CurrencyConverter<S> {
    store: Arc<S>,
    settings: CurrencySettings,
    resolved: OnceCell<ResolvedRate>,
}

impl<S: ExchangeRateStore> CurrencyConverter<S> {
    pub fn new(store: Arc<S>, settings: CurrencySettings) -> Self {
        Self {
            store,
            settings,
            resolved: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &CurrencySettings {
        &self.settings
    }

    pub async fn resolved_rate(&self) -> &ResolvedRate {
        self.resolved.get_or_init(|| self.resolve()).await
    }

    pub async fn for_base(&self, amount: f64) -> DisplayAmounts {
        let rate = self.resolved_rate().await.rate;
        DisplayAmounts {
            base: amount,
            secondary: round_cents(amount * rate),
        }
    }

    // Rows are stored the way rates are quoted: one secondary unit
    // (base_code = USD) in local units (quote_code = UGX). We need the inverse.
    async fn resolve(&self) -> ResolvedRate {
        let CurrencySettings {
            base_code,
            quote_code,
            fallback_rate,
        } = &self.settings;

        match self.store.latest(quote_code, base_code).await {
            Ok(Some(row)) if row.rate.is_finite() && row.rate > 0.0 => {
                debug!(
                    "💱 Using stored rate 1 {} = {} {} (fetched {})",
                    quote_code, row.rate, base_code, row.fetched_at
                );
                ResolvedRate {
                    rate: 1.0 / row.rate,
                    source: RateSource::Stored {
                        fetched_at: row.fetched_at,
                    },
                }
            }
            Ok(Some(row)) => {
                warn!(
                    "💱 Ignoring unusable {}/{} rate {}, using fallback {}",
                    quote_code, base_code, row.rate, fallback_rate
                );
                Self::fallback(*fallback_rate)
            }
            Ok(None) => {
                debug!("💱 No {}/{} rate stored, using fallback {}", quote_code, base_code, fallback_rate);
                Self::fallback(*fallback_rate)
            }
            Err(e) => {
                warn!("💱 Exchange rate lookup failed: {}, using fallback {}", e, fallback_rate);
                Self::fallback(*fallback_rate)
            }
        }
    }

    fn fallback(rate: f64) -> ResolvedRate {
        ResolvedRate {
            rate,
            source: RateSource::Fallback,
        }
    }
}

/// Round half away from zero to two decimals.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
