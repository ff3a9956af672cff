use crate::domain::ports::Notifier;
use crate::utils::error::{AlertError, NotifyError, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHANNEL: &str = "email";

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "New listings".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpOptions {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

/// Sends alerts as plain-text mail through an SMTP relay (STARTTLS).
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    options: SmtpOptions,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    pub fn new(options: SmtpOptions, timeout: Duration) -> Result<Self> {
        let credentials = Credentials::new(options.username.clone(), options.password.clone());
        let transport = SmtpTransport::starttls_relay(&options.smtp_host)
            .map_err(|e| AlertError::ConfigError {
                message: format!("SMTP relay configuration error: {}", e),
            })?
            .port(options.smtp_port)
            .credentials(credentials)
            .timeout(Some(timeout))
            .build();

        Ok(Self { options, transport })
    }

    fn mailbox(address: &str) -> std::result::Result<Mailbox, NotifyError> {
        address.parse().map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
            channel: CHANNEL.to_string(),
            address: address.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn build_message(
        &self,
        recipient: &str,
        body: &str,
    ) -> std::result::Result<Message, NotifyError> {
        Message::builder()
            .from(Self::mailbox(&self.options.from_address)?)
            .to(Self::mailbox(recipient)?)
            .subject(self.options.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Transport {
                channel: CHANNEL.to_string(),
                message: format!("Failed to build email: {}", e),
            })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn channel(&self) -> &str {
        CHANNEL
    }

    async fn send(&self, recipient: &str, message: &str) -> std::result::Result<(), NotifyError> {
        let email = self.build_message(recipient, message)?;

        // lettre's SmtpTransport blocks
        let result = tokio::task::spawn_blocking({
            let transport = self.transport.clone();
            move || transport.send(&email)
        })
        .await;

        match result {
            Ok(Ok(response)) => {
                tracing::info!("SMTP relay accepted message ({})", response.code());
                Ok(())
            }
            Ok(Err(e)) => Err(NotifyError::Transport {
                channel: CHANNEL.to_string(),
                message: format!("SMTP delivery failed: {}", e),
            }),
            Err(e) => Err(NotifyError::Transport {
                channel: CHANNEL.to_string(),
                message: format!("Send task failed: {}", e),
            }),
        }
    }
}
