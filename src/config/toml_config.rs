use crate::adapters::{SmtpOptions, TwilioOptions};
use crate::core::alert_pipeline::{
    PipelineSettings, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::listing_parser::PageShape;
use crate::core::message::DEFAULT_BANNER;
use crate::utils::error::{AlertError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub page: PageShape,
    pub alert: AlertSettings,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Listing search page to scrape.
    pub url: String,
    pub timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Phone number or email address, depending on the notifier.
    pub recipient: String,
    pub banner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotifierConfig {
    Twilio(TwilioOptions),
    Email(SmtpOptions),
    Console,
}

impl AlertConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` placeholders from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content, |name| std::env::var(name).ok());

        toml::from_str(&processed).map_err(|e| AlertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unknown variables are left as-is so validation can point at them.
    pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                lookup(name).unwrap_or_else(|| format!("${{{}}}", name))
            })
            .into_owned()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn concurrent_requests(&self) -> usize {
        self.source
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    pub fn banner(&self) -> &str {
        self.alert.banner.as_deref().unwrap_or(DEFAULT_BANNER)
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            source_url: self.source.url.clone(),
            page: self.page.clone(),
            request_timeout: self.request_timeout(),
            concurrent_requests: self.concurrent_requests(),
            banner: self.banner().to_string(),
        }
    }

    fn validate_notifier(&self) -> Result<()> {
        match &self.notifier {
            NotifierConfig::Twilio(twilio) => {
                validation::validate_non_empty_string("notifier.account_sid", &twilio.account_sid)?;
                validation::validate_non_empty_string("notifier.auth_token", &twilio.auth_token)?;
                validation::validate_phone_number("notifier.from_number", &twilio.from_number)?;
                validation::validate_phone_number("alert.recipient", &self.alert.recipient)
            }
            NotifierConfig::Email(smtp) => {
                validation::validate_non_empty_string("notifier.smtp_host", &smtp.smtp_host)?;
                validation::validate_non_empty_string("notifier.username", &smtp.username)?;
                validation::validate_email_address("notifier.from_address", &smtp.from_address)?;
                validation::validate_email_address("alert.recipient", &self.alert.recipient)
            }
            NotifierConfig::Console => {
                validation::validate_non_empty_string("alert.recipient", &self.alert.recipient)
            }
        }
    }
}

impl Validate for AlertConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.url", &self.source.url)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 60)?;
        }
        if let Some(concurrent) = self.source.concurrent_requests {
            validation::validate_positive_number("source.concurrent_requests", concurrent, 1)?;
        }

        validation::validate_non_empty_string("page.item_selector", &self.page.item_selector)?;
        validation::validate_non_empty_string(
            "page.details_selector",
            &self.page.details_selector,
        )?;

        self.validate_notifier()
    }
}
