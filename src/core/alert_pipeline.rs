use crate::core::fetch::fetch_page;
use crate::core::freshness::filter_fresh;
use crate::core::listing_parser::{ListingParser, PageShape};
use crate::core::message::{format_alert, DEFAULT_BANNER};
use crate::domain::model::{NotificationStatus, RunSummary};
use crate::domain::ports::{Clock, Fetcher, Notifier};
use crate::utils::error::{AlertError, PipelineError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 4;

/// Everything one run needs to know, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub source_url: String,
    pub page: PageShape,
    pub request_timeout: Duration,
    pub concurrent_requests: usize,
    pub banner: String,
}

impl PipelineSettings {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            page: PageShape::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            banner: DEFAULT_BANNER.to_string(),
        }
    }
}

/// Fetch, parse, filter, notify. Holds no state between runs.
pub struct AlertPipeline {
    settings: PipelineSettings,
    source: Url,
    parser: ListingParser,
}

impl AlertPipeline {
    pub fn new(settings: PipelineSettings) -> Result<Self> {
        let source =
            Url::parse(&settings.source_url).map_err(|e| AlertError::InvalidConfigValueError {
                field: "source.url".to_string(),
                value: settings.source_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            })?;
        let parser = ListingParser::new(settings.page.clone())?;

        Ok(Self {
            settings,
            source,
            parser,
        })
    }

    /// Runs one invocation. Only a failed listing-page fetch is an error;
    /// per-listing problems end up in `RunSummary::diagnostics` and a failed
    /// send in `RunSummary::notification`.
    pub async fn run(
        &self,
        clock: &dyn Clock,
        fetcher: &dyn Fetcher,
        notifier: &dyn Notifier,
        recipient: &str,
    ) -> std::result::Result<RunSummary, PipelineError> {
        let timeout = self.settings.request_timeout;

        tracing::info!("🔎 Fetching listing page: {}", self.source);
        let page = fetch_page(fetcher, self.source.as_str(), timeout).await?;

        let outcome = self
            .parser
            .parse(
                &page.text(),
                &self.source,
                fetcher,
                timeout,
                self.settings.concurrent_requests,
            )
            .await;
        let scraped = outcome.listings.len();

        let reference = clock.now();
        let fresh = filter_fresh(reference, outcome.listings);
        tracing::info!(
            "🗓️ {} of {} listings were posted on {}",
            fresh.len(),
            scraped,
            reference.format("%b %d")
        );

        if fresh.is_empty() {
            return Ok(RunSummary {
                scraped,
                fresh,
                diagnostics: outcome.diagnostics,
                notification: NotificationStatus::Skipped,
            });
        }

        let message = format_alert(&self.settings.banner, &fresh);
        tracing::debug!("Alert message:\n{}", message);

        let notification = match notifier.send(recipient, &message).await {
            Ok(()) => {
                tracing::info!("📨 Alert sent via {} to {}", notifier.channel(), recipient);
                NotificationStatus::Sent
            }
            Err(e) => {
                tracing::error!("❌ Alert via {} failed: {}", notifier.channel(), e);
                NotificationStatus::Failed(e)
            }
        };

        Ok(RunSummary {
            scraped,
            fresh,
            diagnostics: outcome.diagnostics,
            notification,
        })
    }
}
