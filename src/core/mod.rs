pub mod alert_pipeline;
pub mod date_extractor;
pub mod engine;
pub mod fetch;
pub mod freshness;
pub mod listing_parser;
pub mod message;

pub use crate::domain::model::{Diagnostic, DiagnosticKind, Listing, ParseOutcome, RunSummary};
pub use crate::domain::ports::{Clock, FetchResponse, Fetcher, Notifier};
pub use crate::utils::error::Result;
