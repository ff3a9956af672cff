use crate::utils::error::{DateParseError, MalformedPageError, NotifyError, TransportError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One scraped classified ad. `date` is `None` when the posted-on time
/// could not be recovered; such listings are never fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub link: String,
    pub date: Option<NaiveDateTime>,
}

impl Listing {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{}", date.format(DATE_DISPLAY_FORMAT))?,
            None => f.write_str("unknown")?,
        }
        write!(f, " : {} : {}", self.title, self.link)
    }
}

/// A listing block that passed the index-page rules but has no date yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    pub index: usize,
    pub title: String,
    pub link: String,
}

impl From<ListingCandidate> for Listing {
    fn from(candidate: ListingCandidate) -> Self {
        Listing::new(candidate.title, candidate.link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The listing block on the index page was skipped.
    MalformedBlock(MalformedPageError),
    /// The listing's own page could not be fetched.
    SecondaryFetch(TransportError),
    /// The listing's own page was fetched but lacks the posted-on column.
    MalformedDetailsPage(MalformedPageError),
    DateParse(DateParseError),
}

/// A non-fatal issue recorded while parsing; the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position of the source block on the listing page.
    pub index: usize,
    pub link: Option<String>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn malformed_block(index: usize, error: MalformedPageError) -> Self {
        Self {
            index,
            link: None,
            kind: DiagnosticKind::MalformedBlock(error),
        }
    }

    pub fn for_listing(index: usize, link: &str, kind: DiagnosticKind) -> Self {
        Self {
            index,
            link: Some(link.to_string()),
            kind,
        }
    }

    /// True when the listing itself survived with an unset date.
    pub fn keeps_listing(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::MalformedBlock(_))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block #{}", self.index)?;
        if let Some(link) = &self.link {
            write!(f, " ({})", link)?;
        }
        match &self.kind {
            DiagnosticKind::MalformedBlock(e) => write!(f, " skipped: {}", e),
            DiagnosticKind::SecondaryFetch(e) => write!(f, " date unknown: {}", e),
            DiagnosticKind::MalformedDetailsPage(e) => write!(f, " date unknown: {}", e),
            DiagnosticKind::DateParse(e) => write!(f, " date unknown: {}", e),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub listings: Vec<Listing>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Nothing was fresh, so nothing was sent.
    Skipped,
    Sent,
    Failed(NotifyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Listings parsed from the index page, dated or not.
    pub scraped: usize,
    pub fresh: Vec<Listing>,
    pub diagnostics: Vec<Diagnostic>,
    pub notification: NotificationStatus,
}

impl RunSummary {
    pub fn headline(&self) -> String {
        if self.fresh.is_empty() {
            return "no new items".to_string();
        }
        let noun = if self.fresh.len() == 1 { "item" } else { "items" };
        format!("{} new {} of {} scraped", self.fresh.len(), noun, self.scraped)
    }

    pub fn notify_error(&self) -> Option<&NotifyError> {
        match &self.notification {
            NotificationStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}
