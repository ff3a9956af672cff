use crate::domain::model::Listing;
use chrono::{Datelike, NaiveDateTime};

/// A listing is fresh when it was posted on the reference day-of-month and
/// month. The year is not compared, so a listing from the same date one year
/// earlier also counts as fresh.
pub fn is_fresh(listing: &Listing, reference: &NaiveDateTime) -> bool {
    listing
        .date
        .is_some_and(|date| date.day() == reference.day() && date.month() == reference.month())
}

/// Keeps the fresh listings, in input order.
pub fn filter_fresh(reference: NaiveDateTime, listings: Vec<Listing>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|listing| is_fresh(listing, &reference))
        .collect()
}
