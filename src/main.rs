use anyhow::Context;
use clap::Parser;
use listing_alert::adapters::{ConsoleNotifier, FixedClock};
use listing_alert::utils::error::ErrorSeverity;
use listing_alert::utils::{logger, validation::Validate};
use listing_alert::{AlertConfig, AlertEngine, AlertError, CliArgs, NotificationStatus, RunSummary};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(e: &AlertError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    exit_code(e.severity())
}

fn summary_json(summary: &RunSummary) -> serde_json::Value {
    let notification = match &summary.notification {
        NotificationStatus::Skipped => "skipped".to_string(),
        NotificationStatus::Sent => "sent".to_string(),
        NotificationStatus::Failed(e) => format!("failed: {}", e),
    };
    serde_json::json!({
        "headline": summary.headline(),
        "scraped": summary.scraped,
        "fresh": summary.fresh,
        "diagnostics": summary.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        "notification": notification,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = AlertConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if let Some(recipient) = &args.recipient {
        config.alert.recipient = recipient.clone();
        tracing::info!("🔧 Recipient overridden to: {}", recipient);
    }

    if let Err(e) = config.validate() {
        std::process::exit(report_failure(&e));
    }

    let mut engine = match AlertEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => std::process::exit(report_failure(&e)),
    };

    if let Some(date) = args.as_of {
        tracing::info!("🗓️ Treating {} as today", date);
        engine = engine.with_clock(Box::new(FixedClock::on(date)));
    }
    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the alert will be printed, not sent");
        engine = engine.with_notifier(Box::new(ConsoleNotifier));
    }

    let summary = match engine.run().await {
        Ok(summary) => summary,
        Err(e) => std::process::exit(report_failure(&e)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&summary))?);
    } else {
        println!("✅ {}", summary.headline());
        for diagnostic in &summary.diagnostics {
            println!("⚠️ {}", diagnostic);
        }
    }

    if let Some(e) = summary.notify_error() {
        std::process::exit(report_failure(&AlertError::from(e.clone())));
    }

    Ok(())
}
