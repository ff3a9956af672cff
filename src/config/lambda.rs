use crate::adapters::TwilioOptions;
use crate::config::toml_config::{AlertConfig, AlertSettings, NotifierConfig, SourceConfig};
use crate::core::listing_parser::PageShape;
use crate::utils::error::{AlertError, Result};

pub const DEFAULT_SOURCE_URL: &str = "https://www.pinkbike.com/buysell/list/?lat=37.8663&lng=-122.132&distance=100&category=2&price=..2500&framesize=23,27,34,35,36,30,31,47&material=2";

/// Builds an [`AlertConfig`] from environment variables, for scheduled
/// function deployments where no config file is shipped.
pub struct LambdaConfig;

impl LambdaConfig {
    pub fn from_env() -> Result<AlertConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<AlertConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AlertError::MissingConfigError {
                    field: key.to_string(),
                })
        };
        let parsed = |key: &str| -> Result<Option<u64>> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|e| AlertError::InvalidConfigValueError {
                            field: key.to_string(),
                            value: raw.clone(),
                            reason: e.to_string(),
                        })
                })
                .transpose()
        };

        Ok(AlertConfig {
            source: SourceConfig {
                url: lookup("SOURCE_URL").unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
                timeout_seconds: parsed("REQUEST_TIMEOUT_SECONDS")?,
                concurrent_requests: parsed("CONCURRENT_REQUESTS")?.map(|n| n as usize),
            },
            page: PageShape::default(),
            alert: AlertSettings {
                recipient: required("RECIPIENT_NUMBER")?,
                banner: lookup("ALERT_BANNER"),
            },
            notifier: NotifierConfig::Twilio(TwilioOptions {
                account_sid: required("TWILIO_SID")?,
                auth_token: required("TWILIO_AUTH_TOKEN")?,
                from_number: required("TWILIO_NUMBER")?,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup_builds_twilio_config() {
        let vars = env(&[
            ("TWILIO_SID", "AC0123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_NUMBER", "+15105550100"),
            ("RECIPIENT_NUMBER", "+15105550123"),
            ("CONCURRENT_REQUESTS", "2"),
        ]);

        let config = LambdaConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.concurrent_requests(), 2);
        assert_eq!(config.alert.recipient, "+15105550123");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_are_reported_by_name() {
        let vars = env(&[("RECIPIENT_NUMBER", "+15105550123")]);

        let err = LambdaConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();

        assert!(matches!(err, AlertError::MissingConfigError { ref field } if field == "TWILIO_SID"));
    }

    #[test]
    fn test_non_numeric_timeout_is_invalid() {
        let vars = env(&[
            ("TWILIO_SID", "AC0123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_NUMBER", "+15105550100"),
            ("RECIPIENT_NUMBER", "+15105550123"),
            ("REQUEST_TIMEOUT_SECONDS", "ten"),
        ]);

        assert!(matches!(
            LambdaConfig::from_lookup(|k| vars.get(k).cloned()),
            Err(AlertError::InvalidConfigValueError { .. })
        ));
    }
}
