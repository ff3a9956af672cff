// Adapters layer: concrete fetch, clock and notification transports behind the domain ports.

pub mod clock;
pub mod console;
pub mod email;
pub mod http;
pub mod sms;

use crate::config::NotifierConfig;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use std::time::Duration;

pub use clock::{FixedClock, SystemClock};
pub use console::ConsoleNotifier;
pub use email::{SmtpNotifier, SmtpOptions};
pub use http::HttpFetcher;
pub use sms::{TwilioNotifier, TwilioOptions};

pub fn build_notifier(config: &NotifierConfig, timeout: Duration) -> Result<Box<dyn Notifier>> {
    Ok(match config {
        NotifierConfig::Twilio(options) => Box::new(TwilioNotifier::new(options.clone(), timeout)?),
        NotifierConfig::Email(options) => Box::new(SmtpNotifier::new(options.clone(), timeout)?),
        NotifierConfig::Console => Box::new(ConsoleNotifier),
    })
}
