//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use rates_providers::{ProviderSettings, ProvidersConfig};
use rates_types::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_RATE_LIMIT: u32 = 100;
const DEFAULT_CURRENCYAPI_URL: &str = "https://api.currencyapi.com";
const DEFAULT_EXCHANGERATESAPI_URL: &str = "https://api.exchangeratesapi.io";
const DEFAULT_OPENEXCHANGERATES_URL: &str = "https://openexchangerates.org";

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub timeout: Duration,
    pub rate_limit_per_minute: u32,
    /// Trust `X-Forwarded-For` to identify clients; only safe behind a proxy
    pub trust_forwarded_for: bool,
    pub providers: ProvidersConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_lookup(|name| env::var(name).ok())?)
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", &lookup, DEFAULT_PORT)?;
        let timeout_ms = parse_or("RATE_TIMEOUT_MS", &lookup, DEFAULT_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RATE_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let rate_limit_per_minute = parse_or("RATE_LIMIT_PER_MINUTE", &lookup, DEFAULT_RATE_LIMIT)?;
        let trust_forwarded_for = parse_or("TRUST_FORWARDED_FOR", &lookup, true)?;

        let providers = ProvidersConfig {
            currencyapi: provider_settings(
                &lookup,
                "CURRENCYAPI_API_KEY",
                "CURRENCYAPI_BASE_URL",
                DEFAULT_CURRENCYAPI_URL,
            ),
            exchangeratesapi: provider_settings(
                &lookup,
                "EXCHANGERATESAPI_API_KEY",
                "EXCHANGERATESAPI_BASE_URL",
                DEFAULT_EXCHANGERATESAPI_URL,
            ),
            openexchangerates: provider_settings(
                &lookup,
                "OPENEXCHANGERATES_API_KEY",
                "OPENEXCHANGERATES_BASE_URL",
                DEFAULT_OPENEXCHANGERATES_URL,
            ),
        };
        if providers.currencyapi.is_none()
            && providers.exchangeratesapi.is_none()
            && providers.openexchangerates.is_none()
        {
            return Err(ConfigError::NoProviders);
        }

        Ok(Self {
            port,
            timeout: Duration::from_millis(timeout_ms),
            rate_limit_per_minute,
            trust_forwarded_for,
            providers,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn provider_settings(
    lookup: &impl Fn(&str) -> Option<String>,
    key_var: &str,
    url_var: &str,
    default_url: &str,
) -> Option<ProviderSettings> {
    let api_key = non_empty(lookup, key_var)?;
    let base_url = non_empty(lookup, url_var).unwrap_or_else(|| default_url.to_string());
    Some(ProviderSettings::new(base_url, api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_with_single_provider() {
        let config = load(&[("CURRENCYAPI_API_KEY", "abc")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.rate_limit_per_minute, 100);
        assert!(config.trust_forwarded_for);

        let currencyapi = config.providers.currencyapi.unwrap();
        assert_eq!(currencyapi.base_url, "https://api.currencyapi.com");
        assert_eq!(currencyapi.api_key, "abc");
        assert!(config.providers.exchangeratesapi.is_none());
        assert!(config.providers.openexchangerates.is_none());
    }

    #[test]
    fn test_open_exchange_rates_alone_is_enough() {
        let config = load(&[("OPENEXCHANGERATES_API_KEY", "oxr")]).unwrap();

        let oxr = config.providers.openexchangerates.unwrap();
        assert_eq!(oxr.base_url, "https://openexchangerates.org");
        assert_eq!(oxr.api_key, "oxr");
        assert!(config.providers.currencyapi.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("RATE_TIMEOUT_MS", "1500"),
            ("RATE_LIMIT_PER_MINUTE", "10"),
            ("TRUST_FORWARDED_FOR", "false"),
            ("EXCHANGERATESAPI_API_KEY", "xyz"),
            ("EXCHANGERATESAPI_BASE_URL", "http://localhost:9999/"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.rate_limit_per_minute, 10);
        assert!(!config.trust_forwarded_for);
        assert_eq!(
            config.providers.exchangeratesapi.unwrap().base_url,
            "http://localhost:9999"
        );
    }

    #[test]
    fn test_no_provider_keys_is_error() {
        let err = load(&[("PORT", "8080"), ("CURRENCYAPI_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::NoProviders));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = load(&[("CURRENCYAPI_API_KEY", "abc"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));

        let err = load(&[("CURRENCYAPI_API_KEY", "abc"), ("RATE_TIMEOUT_MS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "RATE_TIMEOUT_MS",
                ..
            }
        ));
    }
}
