use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::DnsError;

/// TTL value the provider interprets as "automatic".
pub const AUTO_TTL: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

fn default_ttl() -> u32 {
    AUTO_TTL
}

/// Body of a create or full-overwrite update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordInput {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl RecordInput {
    pub fn a_record(name: &str, content: &str) -> Self {
        Self {
            record_type: "A".to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: AUTO_TTL,
            proxied: false,
        }
    }
}

/// One page of a record listing together with the provider's page count.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<DnsRecord>,
    pub total_pages: u32,
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch a single page of records of the given type
    async fn list_records(
        &self,
        record_type: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, DnsError>;

    /// Create a new record
    async fn create_record(&self, input: &RecordInput) -> Result<(), DnsError>;

    /// Replace every field of an existing record
    async fn update_record(&self, record_id: &str, input: &RecordInput) -> Result<(), DnsError>;

    /// Delete a record by id
    async fn delete_record(&self, record_id: &str) -> Result<(), DnsError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
