// src/config.rs
// Environment-driven configuration (.env is loaded by the binary)

use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::currency::converter::{CurrencySettings, DEFAULT_FALLBACK_RATE};
use crate::errors::ConfigError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub redis_url: String,
    pub server_port: u16,
    pub mail_relay_url: Option<String>,
    pub mail_relay_token: Option<String>,
    pub mail_from: String,
    pub notifications_enabled: bool,
    pub notification_history_limit: usize,
    pub currency: CurrencySettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup instead of the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379/".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 3010),
            mail_relay_url: non_empty(lookup("MAIL_RELAY_URL")),
            mail_relay_token: non_empty(lookup("MAIL_RELAY_TOKEN")),
            mail_from: lookup("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_string()),
            notifications_enabled: lookup("NOTIFICATIONS_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            notification_history_limit: parse_or(&lookup, "NOTIFICATION_HISTORY_LIMIT", 100),
            currency: CurrencySettings {
                base_code: lookup("CURRENCY_BASE_CODE").unwrap_or_else(|| "UGX".to_string()),
                quote_code: lookup("CURRENCY_QUOTE_CODE").unwrap_or_else(|| "USD".to_string()),
                fallback_rate: parse_or(&lookup, "CURRENCY_FALLBACK_RATE", DEFAULT_FALLBACK_RATE),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.currency.fallback_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "CURRENCY_FALLBACK_RATE",
                value: rate.to_string(),
            });
        }
        if self.currency.base_code == self.currency.quote_code {
            return Err(ConfigError::InvalidValue {
                key: "CURRENCY_QUOTE_CODE",
                value: self.currency.quote_code.clone(),
            });
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        info!("⚙️  Configuration:");
        info!("   🗄️  Redis: {}", self.redis_url);
        info!("   🌐 Port: {}", self.server_port);
        info!(
            "   📧 Mail relay: {}",
            self.mail_relay_url.as_deref().unwrap_or("Not configured")
        );
        info!("   🔔 Notifications enabled: {}", self.notifications_enabled);
        info!(
            "   💱 Currency: {} -> {} (fallback {})",
            self.currency.base_code, self.currency.quote_code, self.currency.fallback_rate
        );
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {} value '{}': {}, using default {}", key, raw, e, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port, 3010);
        assert!(config.mail_relay_url.is_none());
        assert!(!config.notifications_enabled);
        assert_eq!(config.notification_history_limit, 100);
        assert_eq!(config.currency, CurrencySettings::default());
    }

    #[test]
    fn test_overrides_and_flags() {
        let config = config_from(&[
            ("SERVER_PORT", "8088"),
            ("MAIL_RELAY_URL", "https://relay.example.org/send"),
            ("MAIL_RELAY_TOKEN", "   "),
            ("NOTIFICATIONS_ENABLED", "TRUE"),
            ("CURRENCY_FALLBACK_RATE", "0.0003"),
        ])
        .unwrap();
        assert_eq!(config.server_port, 8088);
        assert_eq!(config.mail_relay_url.as_deref(), Some("https://relay.example.org/send"));
        assert!(config.mail_relay_token.is_none());
        assert!(config.notifications_enabled);
        assert_eq!(config.currency.fallback_rate, 0.0003);
    }

    #[test]
    fn test_bad_numbers_fall_back_to_defaults() {
        let config = config_from(&[("SERVER_PORT", "eighty"), ("NOTIFICATION_HISTORY_LIMIT", "-4")]).unwrap();
        assert_eq!(config.server_port, 3010);
        assert_eq!(config.notification_history_limit, 100);
    }

    #[test]
    fn test_non_positive_fallback_rate_is_rejected() {
        let result = config_from(&[("CURRENCY_FALLBACK_RATE", "0")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "CURRENCY_FALLBACK_RATE",
                ..
            })
        ));
    }
}
