#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use listing_alert::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use listing_alert::{AlertEngine, LambdaConfig, NotificationStatus};
#[cfg(feature = "lambda")]
use serde::Serialize;

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub listings_scraped: usize,
    pub listings_new: usize,
    pub diagnostics: usize,
    pub notified: bool,
}

/// Invoked by a scheduled (cron) rule; the event payload is ignored.
#[cfg(feature = "lambda")]
async fn function_handler(_event: LambdaEvent<serde_json::Value>) -> Result<Response, Error> {
    tracing::info!("Starting listing alert Lambda function");

    let config = LambdaConfig::from_env()?;
    config.validate()?;

    let engine = AlertEngine::from_config(&config)?;
    let summary = engine.run().await?;

    if let Some(e) = summary.notify_error() {
        return Err(e.clone().into());
    }

    Ok(Response {
        message: summary.headline(),
        listings_scraped: summary.scraped,
        listings_new: summary.fresh.len(),
        diagnostics: summary.diagnostics.len(),
        notified: summary.notification == NotificationStatus::Sent,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
