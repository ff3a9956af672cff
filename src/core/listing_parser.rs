use crate::core::date_extractor;
use crate::core::fetch::fetch_page;
use crate::domain::model::{Diagnostic, DiagnosticKind, Listing, ListingCandidate, ParseOutcome};
use crate::domain::ports::Fetcher;
use crate::utils::error::{AlertError, MalformedPageError, Result};
use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Where the interesting parts of the listing site's markup live.
///
/// Index page: every `item_selector` block is one listing. Its anchors are
/// counted in document order; the one at `title_anchor_index` is the
/// title-and-link anchor, earlier ones are decorative (thumbnail links).
///
/// Listing page: the `details_selector` column at `details_index` holds the
/// posted-on date; earlier columns are structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageShape {
    pub item_selector: String,
    pub title_anchor_index: usize,
    pub details_selector: String,
    pub details_index: usize,
}

impl Default for PageShape {
    fn default() -> Self {
        Self {
            item_selector: ".bsitem".to_string(),
            title_anchor_index: 1,
            details_selector: ".buysell-details-column".to_string(),
            details_index: 1,
        }
    }
}

fn compile(field: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AlertError::InvalidConfigValueError {
        field: field.to_string(),
        value: css.to_string(),
        reason: format!("Invalid CSS selector: {}", e),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct ListingParser {
    shape: PageShape,
    item: Selector,
    anchor: Selector,
    details: Selector,
}

impl ListingParser {
    pub fn new(shape: PageShape) -> Result<Self> {
        Ok(Self {
            item: compile("page.item_selector", &shape.item_selector)?,
            anchor: compile("anchor", "a")?,
            details: compile("page.details_selector", &shape.details_selector)?,
            shape,
        })
    }

    /// Parses the index page into candidates, resolves every candidate's
    /// date from its own page, and returns listings in document order.
    pub async fn parse(
        &self,
        markup: &str,
        base: &Url,
        fetcher: &dyn Fetcher,
        timeout: Duration,
        concurrency: usize,
    ) -> ParseOutcome {
        let (candidates, mut diagnostics) = self.parse_index(markup, base);
        tracing::info!(
            "📋 Found {} listing candidates, resolving dates ({} at a time)",
            candidates.len(),
            concurrency.max(1)
        );

        // `buffered` yields in input order, so slot i always belongs to candidate i.
        let resolved: Vec<(Listing, Option<Diagnostic>)> = stream::iter(candidates)
            .map(|candidate| self.resolve(candidate, fetcher, timeout))
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut listings = Vec::with_capacity(resolved.len());
        for (listing, diagnostic) in resolved {
            listings.push(listing);
            diagnostics.extend(diagnostic);
        }
        diagnostics.sort_by_key(|d| d.index);

        ParseOutcome {
            listings,
            diagnostics,
        }
    }

    /// Index-page pass only; no network.
    pub fn parse_index(&self, markup: &str, base: &Url) -> (Vec<ListingCandidate>, Vec<Diagnostic>) {
        let document = Html::parse_document(markup);
        let mut candidates = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, block) in document.select(&self.item).enumerate() {
            match self.title_and_link(block, base) {
                Ok((title, link)) => candidates.push(ListingCandidate { index, title, link }),
                Err(e) => {
                    tracing::warn!("Skipping malformed listing block #{}: {}", index, e);
                    diagnostics.push(Diagnostic::malformed_block(index, e));
                }
            }
        }

        (candidates, diagnostics)
    }

    fn title_and_link(
        &self,
        block: ElementRef<'_>,
        base: &Url,
    ) -> std::result::Result<(String, String), MalformedPageError> {
        let wanted = self.shape.title_anchor_index;
        let anchors: Vec<ElementRef<'_>> = block.select(&self.anchor).collect();
        let anchor = anchors
            .get(wanted)
            .ok_or(MalformedPageError::MissingTitleAnchor {
                found: anchors.len(),
                wanted,
            })?;

        let href = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or(MalformedPageError::MissingHref)?;
        let link = base
            .join(href)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or(MalformedPageError::MissingHref)?;

        let title = collapse_whitespace(&anchor.text().collect::<String>());
        if title.is_empty() {
            return Err(MalformedPageError::EmptyTitle);
        }

        Ok((title, link.to_string()))
    }

    /// Text content of the posted-on details column of a listing page.
    pub fn details_text(&self, markup: &str) -> std::result::Result<String, MalformedPageError> {
        let document = Html::parse_document(markup);
        let wanted = self.shape.details_index;
        let columns: Vec<ElementRef<'_>> = document.select(&self.details).collect();
        let column = columns
            .get(wanted)
            .ok_or(MalformedPageError::MissingDetailsColumn {
                found: columns.len(),
                wanted,
            })?;
        Ok(column.text().collect())
    }

    /// Follows the candidate's link to recover its posted-on date. Any
    /// failure leaves the date unset and is returned as a diagnostic.
    pub async fn resolve(
        &self,
        candidate: ListingCandidate,
        fetcher: &dyn Fetcher,
        timeout: Duration,
    ) -> (Listing, Option<Diagnostic>) {
        let index = candidate.index;
        let mut listing = Listing::from(candidate);

        match self.resolve_date(&listing.link, fetcher, timeout).await {
            Ok(date) => {
                if date.is_none() {
                    tracing::debug!("No posted-on date on {}", listing.link);
                }
                listing.date = date;
                (listing, None)
            }
            Err(kind) => {
                let diagnostic = Diagnostic::for_listing(index, &listing.link, kind);
                tracing::warn!("⚠️ {}", diagnostic);
                (listing, Some(diagnostic))
            }
        }
    }

    async fn resolve_date(
        &self,
        link: &str,
        fetcher: &dyn Fetcher,
        timeout: Duration,
    ) -> std::result::Result<Option<NaiveDateTime>, DiagnosticKind> {
        tracing::debug!("Fetching listing page: {}", link);
        let response = fetch_page(fetcher, link, timeout)
            .await
            .map_err(DiagnosticKind::SecondaryFetch)?;

        let text = self
            .details_text(&response.text())
            .map_err(DiagnosticKind::MalformedDetailsPage)?;

        date_extractor::extract(&text).map_err(DiagnosticKind::DateParse)
    }
}
