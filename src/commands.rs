//! The three subcommands. Each validates its input before touching the
//! network, fetches the record directory once, then reports per item.
//!
//! Fatal errors (invalid input, failed fetch) are returned; per-item
//! failures end up in the printed outcomes and the returned [`Summary`].

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::config::Settings;
use crate::dns::{fetch_all, DnsProvider};
use crate::reconcile::{self, apply_deletions, apply_upserts, DesiredState};
use crate::report::{self, Summary};
use crate::validate;

pub const RECORD_TYPE: &str = "A";

pub async fn list<W: Write>(provider: &dyn DnsProvider, out: &mut W) -> Result<()> {
    let records = fetch_all(provider, RECORD_TYPE)
        .await
        .context("Failed to fetch DNS records")?;

    info!(count = records.len(), "Fetched A records");
    report::write_record_table(out, &records)?;

    Ok(())
}

pub async fn upsert<O: Write, E: Write>(
    provider: &dyn DnsProvider,
    settings: &Settings,
    out: &mut O,
    err: &mut E,
) -> Result<Summary> {
    let raw_names = settings
        .names
        .as_deref()
        .ok_or_else(|| anyhow!("No record names given"))?;
    let value = settings
        .value
        .as_deref()
        .ok_or_else(|| anyhow!("No record value given"))?;

    let desired = DesiredState::new(raw_names, value, settings.syntax)?;

    let directory = fetch_all(provider, RECORD_TYPE)
        .await
        .context("Failed to fetch DNS records")?;

    let outcomes = apply_upserts(provider, &desired, &directory, settings.match_strategy).await;
    let summary = report::write_outcomes(out, err, &outcomes)?;

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Upsert finished"
    );
    Ok(summary)
}

pub async fn delete<O: Write, E: Write>(
    provider: &dyn DnsProvider,
    settings: &Settings,
    out: &mut O,
    err: &mut E,
) -> Result<Summary> {
    let raw_names = settings
        .names
        .as_deref()
        .ok_or_else(|| anyhow!("No record names given"))?;

    let names = reconcile::parse_names(raw_names);
    validate::validate_names(&names, settings.syntax)?;

    let directory = fetch_all(provider, RECORD_TYPE)
        .await
        .context("Failed to get existing A records")?;

    let outcomes = apply_deletions(provider, &names, &directory, settings.match_strategy).await;
    let summary = report::write_outcomes(out, err, &outcomes)?;

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Delete finished"
    );
    Ok(summary)
}
