use crate::domain::ports::Notifier;
use crate::utils::error::NotifyError;
use async_trait::async_trait;

/// Prints alerts to stdout instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn channel(&self) -> &str {
        "console"
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        println!("📨 To {}:\n{}", recipient, message);
        Ok(())
    }
}
