use thiserror::Error;

/// Errors raised by a single provider API call.
#[derive(Error, Debug)]
pub enum DnsError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("API reported failure: {0}")]
    Unsuccessful(String),

    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The record directory could not be fetched in full.
#[derive(Error, Debug)]
#[error("Failed to fetch page {page} of {record_type} records: {source}")]
pub struct FetchError {
    pub record_type: String,
    pub page: u32,
    #[source]
    pub source: DnsError,
}
