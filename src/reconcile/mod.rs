//! Matching desired names against a fetched record directory and applying
//! the resulting mutations one name at a time.

mod delete;
mod outcome;
mod upsert;

pub use delete::{apply_deletions, find_matches};
pub use outcome::{Operation, Outcome};
pub use upsert::{apply_upserts, reconcile, Action};

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::validate::{self, DomainSyntax, ValidationError};

/// How a desired name is compared with a record name returned by the
/// provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// The record name equals the desired name, ignoring ASCII case.
    Exact,
    /// The record name equals the desired name or starts with `<name>.`,
    /// tolerating a zone suffix appended by the provider. Case-sensitive.
    Prefix,
    /// As `Prefix`, ignoring ASCII case.
    PrefixIgnoreCase,
}

impl MatchStrategy {
    pub fn matches(&self, record_name: &str, name: &str) -> bool {
        match self {
            MatchStrategy::Exact => record_name.eq_ignore_ascii_case(name),
            MatchStrategy::Prefix => {
                record_name == name
                    || record_name
                        .strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('.'))
            }
            MatchStrategy::PrefixIgnoreCase => {
                record_name.eq_ignore_ascii_case(name)
                    || (record_name.as_bytes().get(name.len()) == Some(&b'.')
                        && record_name
                            .get(..name.len())
                            .is_some_and(|head| head.eq_ignore_ascii_case(name)))
            }
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::Exact => write!(f, "exact"),
            MatchStrategy::Prefix => write!(f, "prefix"),
            MatchStrategy::PrefixIgnoreCase => write!(f, "prefix-ignore-case"),
        }
    }
}

/// Names and the shared address an upsert run should converge to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub names: Vec<String>,
    pub value: String,
}

impl DesiredState {
    /// Parse and validate upsert input. Checks run in order: non-empty
    /// name list, IPv4 value, then each name.
    pub fn new(raw_names: &str, value: &str, syntax: DomainSyntax) -> Result<Self, ValidationError> {
        let names = parse_names(raw_names);
        if names.is_empty() {
            return Err(ValidationError::NoNames);
        }
        validate::validate_ipv4(value)?;
        validate::validate_names(&names, syntax)?;

        Ok(Self {
            names,
            value: value.to_string(),
        })
    }
}

/// Split a comma-separated name list, trimming whitespace and dropping
/// empty entries.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
