use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "listing-alert")]
#[command(about = "Scrape a classifieds page and text yourself what was posted today")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "listing-alert.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the alert instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Override alert.recipient from the config
    #[arg(long)]
    pub recipient: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
