use crate::domain::ports::{FetchResponse, Fetcher};
use crate::utils::error::TransportError;
use std::time::Duration;

/// Fetches `url` under a hard deadline and treats any non-2xx status as a
/// transport failure. No retries.
pub async fn fetch_page(
    fetcher: &dyn Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<FetchResponse, TransportError> {
    let response = tokio::time::timeout(timeout, fetcher.get(url))
        .await
        .map_err(|_| TransportError::Timeout {
            url: url.to_string(),
            millis: timeout.as_millis() as u64,
        })??;

    if !response.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response)
}
