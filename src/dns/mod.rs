mod cloudflare;
mod error;
pub mod pagination;
mod provider;

pub use cloudflare::{CloudflareProvider, CLOUDFLARE_API_BASE, DEFAULT_REQUEST_TIMEOUT};
pub use error::{DnsError, FetchError};
pub use pagination::fetch_all;
pub use provider::{DnsProvider, DnsRecord, RecordInput, RecordPage, AUTO_TTL};

#[cfg(test)]
pub(crate) mod mock;

use anyhow::Result;
use std::sync::Arc;

use crate::config::Settings;

pub fn create_provider(settings: &Settings) -> Result<Arc<dyn DnsProvider>> {
    let provider = CloudflareProvider::with_base_url(
        &settings.api_base,
        &settings.zone_id,
        &settings.api_token,
        settings.timeout,
    )?;

    Ok(Arc::new(provider))
}
