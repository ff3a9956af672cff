use crate::domain::ports::Notifier;
use crate::utils::error::{AlertError, NotifyError, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";
const CHANNEL: &str = "sms";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Twilio number the message is sent from, E.164.
    pub from_number: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: Option<String>,
    status: Option<String>,
}

/// Sends alerts as SMS through Twilio's Messages API.
#[derive(Debug, Clone)]
pub struct TwilioNotifier {
    options: TwilioOptions,
    client: Client,
    base_url: String,
}

impl TwilioNotifier {
    pub fn new(options: TwilioOptions, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertError::ConfigError {
                message: format!("Failed to build Twilio client: {}", e),
            })?;

        Ok(Self {
            options,
            client,
            base_url: TWILIO_API_BASE.to_string(),
        })
    }

    /// Points the notifier at another API host, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.options.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    fn channel(&self) -> &str {
        CHANNEL
    }

    async fn send(&self, recipient: &str, message: &str) -> std::result::Result<(), NotifyError> {
        let form = [
            ("To", recipient),
            ("From", self.options.from_number.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::Transport {
                channel: CHANNEL.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            match response.json::<MessageResponse>().await {
                Ok(MessageResponse { sid, status }) => tracing::info!(
                    "Twilio accepted message {} ({})",
                    sid.as_deref().unwrap_or("?"),
                    status.as_deref().unwrap_or("unknown status")
                ),
                Err(e) => tracing::debug!("Twilio accepted the message, body unreadable: {}", e),
            }
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            channel: CHANNEL.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
