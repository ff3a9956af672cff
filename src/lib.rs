pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::config::{AlertConfig, LambdaConfig};
pub use crate::core::{
    alert_pipeline::{AlertPipeline, PipelineSettings},
    engine::AlertEngine,
    listing_parser::{ListingParser, PageShape},
};
pub use crate::domain::model::{Listing, NotificationStatus, RunSummary};
pub use crate::utils::error::{AlertError, Result};
