//! Syntax checks run before any network call.
//!
//! Two domain grammars are supported:
//!
//! * [`DomainSyntax::Relaxed`]: at most 253 characters, no trailing dot,
//!   every dot-separated label 1 to 63 characters long, and only
//!   `[A-Za-z0-9.-]` characters. Leading or trailing hyphens are allowed.
//! * [`DomainSyntax::Strict`]: at most 253 characters; every label starts and
//!   ends with an alphanumeric character and is at most 63 characters long;
//!   at least two labels; the final label is two or more ASCII letters.
//!
//! Every name accepted by `Strict` is also accepted by `Relaxed` unless its
//! final label exceeds 63 characters.

use std::fmt;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

static STRICT_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("strict domain pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DomainSyntax {
    Relaxed,
    Strict,
}

impl fmt::Display for DomainSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSyntax::Relaxed => write!(f, "relaxed"),
            DomainSyntax::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid record name: {0}")]
    InvalidDomain(String),

    #[error("Invalid IPv4 address: {0}")]
    InvalidIpv4(String),

    #[error("No valid names input")]
    NoNames,
}

pub fn is_valid_domain(name: &str, syntax: DomainSyntax) -> bool {
    if name.len() > MAX_NAME_LEN {
        return false;
    }

    match syntax {
        DomainSyntax::Relaxed => {
            if name.ends_with('.') {
                return false;
            }
            if name
                .split('.')
                .any(|label| label.is_empty() || label.len() > MAX_LABEL_LEN)
            {
                return false;
            }
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        }
        DomainSyntax::Strict => STRICT_DOMAIN.is_match(name),
    }
}

/// Dotted-quad check. One- and two-digit octets may carry a leading zero
/// (`07`), three-digit octets may not (`007`).
pub fn is_valid_ipv4(ip: &str) -> bool {
    let octets: Vec<&str> = ip.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| is_valid_octet(octet))
}

fn is_valid_octet(octet: &str) -> bool {
    if !octet.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    match octet.len() {
        1 | 2 => true,
        3 => {
            matches!(octet.as_bytes()[0], b'1' | b'2')
                && octet.parse::<u16>().is_ok_and(|value| value <= 255)
        }
        _ => false,
    }
}

pub fn validate_names(names: &[String], syntax: DomainSyntax) -> Result<(), ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::NoNames);
    }

    match names.iter().find(|name| !is_valid_domain(name, syntax)) {
        Some(invalid) => Err(ValidationError::InvalidDomain(invalid.clone())),
        None => Ok(()),
    }
}

pub fn validate_ipv4(ip: &str) -> Result<(), ValidationError> {
    if is_valid_ipv4(ip) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIpv4(ip.to_string()))
    }
}
