//! Page-number pagination over a provider's record listing.
//!
//! Pages are fetched strictly in order: the next page is only requested once
//! the current one has succeeded and reported how many pages exist.

use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

use super::error::FetchError;
use super::provider::{DnsProvider, DnsRecord, RecordPage};

pub const PAGE_SIZE: u32 = 100;

/// Position in a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    Next(u32),
    Done,
}

impl PageCursor {
    pub fn start() -> Self {
        PageCursor::Next(1)
    }

    /// Cursor following a successfully fetched `page` when the provider
    /// reports `total_pages`. A zero page count ends the listing.
    pub fn after(page: u32, total_pages: u32) -> Self {
        if page < total_pages {
            PageCursor::Next(page + 1)
        } else {
            PageCursor::Done
        }
    }
}

/// Lazy stream of record pages. The stream ends after the last page or
/// after the first error, and cannot be restarted.
pub fn record_pages<'a>(
    provider: &'a dyn DnsProvider,
    record_type: &'a str,
) -> impl Stream<Item = Result<RecordPage, FetchError>> + 'a {
    stream::try_unfold(PageCursor::start(), move |cursor| async move {
        let page = match cursor {
            PageCursor::Next(page) => page,
            PageCursor::Done => return Ok(None),
        };

        let fetched = provider
            .list_records(record_type, page, PAGE_SIZE)
            .await
            .map_err(|source| FetchError {
                record_type: record_type.to_string(),
                page,
                source,
            })?;

        debug!(
            page,
            total_pages = fetched.total_pages,
            records_in_page = fetched.records.len(),
            "Fetched record page"
        );

        let next = PageCursor::after(page, fetched.total_pages);
        Ok::<_, FetchError>(Some((fetched, next)))
    })
}

/// Fetch every record of `record_type`. Any page failure discards what was
/// already collected.
pub async fn fetch_all(
    provider: &dyn DnsProvider,
    record_type: &str,
) -> Result<Vec<DnsRecord>, FetchError> {
    let records = record_pages(provider, record_type)
        .try_fold(Vec::new(), |mut all, page| async move {
            all.extend(page.records);
            Ok(all)
        })
        .await?;

    debug!(
        provider = provider.provider_name(),
        total_records = records.len(),
        "Completed paginated fetch"
    );

    Ok(records)
}
