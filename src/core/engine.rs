use crate::adapters::{build_notifier, HttpFetcher, SystemClock};
use crate::config::AlertConfig;
use crate::core::alert_pipeline::AlertPipeline;
use crate::domain::model::{NotificationStatus, RunSummary};
use crate::domain::ports::{Clock, Fetcher, Notifier};
use crate::utils::error::Result;

/// One configured pipeline plus the collaborators it runs against.
pub struct AlertEngine {
    pipeline: AlertPipeline,
    clock: Box<dyn Clock>,
    fetcher: Box<dyn Fetcher>,
    notifier: Box<dyn Notifier>,
    recipient: String,
}

impl AlertEngine {
    pub fn new(
        pipeline: AlertPipeline,
        clock: Box<dyn Clock>,
        fetcher: Box<dyn Fetcher>,
        notifier: Box<dyn Notifier>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            clock,
            fetcher,
            notifier,
            recipient: recipient.into(),
        }
    }

    /// Wires the real HTTP fetcher, wall clock and configured notifier.
    pub fn from_config(config: &AlertConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        Ok(Self::new(
            AlertPipeline::new(config.pipeline_settings())?,
            Box::new(SystemClock),
            Box::new(HttpFetcher::new(timeout)?),
            build_notifier(&config.notifier, timeout)?,
            config.alert.recipient.clone(),
        ))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!(
            "🚀 Starting listing alert run ({} notifier)",
            self.notifier.channel()
        );

        let summary = self
            .pipeline
            .run(
                self.clock.as_ref(),
                self.fetcher.as_ref(),
                self.notifier.as_ref(),
                &self.recipient,
            )
            .await?;

        if !summary.diagnostics.is_empty() {
            let undated = summary
                .diagnostics
                .iter()
                .filter(|d| d.keeps_listing())
                .count();
            tracing::warn!(
                "⚠️ {} listing(s) kept with an unknown date, {} block(s) skipped",
                undated,
                summary.diagnostics.len() - undated
            );
        }

        match &summary.notification {
            NotificationStatus::Skipped => tracing::info!("😴 No new listings, nothing sent"),
            NotificationStatus::Sent => tracing::info!("✅ {}", summary.headline()),
            NotificationStatus::Failed(e) => {
                tracing::error!("❌ {} but the alert was not delivered: {}", summary.headline(), e)
            }
        }

        Ok(summary)
    }
}
