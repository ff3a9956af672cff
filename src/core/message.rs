use crate::domain::model::Listing;

pub const DEFAULT_BANNER: &str = "🚵‍♀️ MTN BIKE ALERT 🚵‍♀️:";
pub const HEADING: &str = "New listings:";

/// Renders the alert text: banner, heading, then one line per listing.
pub fn format_alert(banner: &str, listings: &[Listing]) -> String {
    let mut message = format!("{}\n{}\n", banner, HEADING);
    for listing in listings {
        message.push_str(&listing.to_string());
        message.push('\n');
    }
    message
}
