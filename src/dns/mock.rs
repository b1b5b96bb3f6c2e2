//! In-memory provider for exercising record operations without HTTP.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::DnsError;
use super::provider::{DnsProvider, DnsRecord, RecordInput, RecordPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(RecordInput),
    Update(String, RecordInput),
    Delete(String),
}

#[derive(Default)]
pub struct MockProvider {
    pub records: Vec<DnsRecord>,
    /// Record ids (or names, for creates) whose mutation should fail.
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl MockProvider {
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self, key: &str) -> Result<(), DnsError> {
        if self.failing.contains(key) {
            Err(DnsError::Unsuccessful(format!("mock failure for {key}")))
        } else {
            Ok(())
        }
    }
}

pub fn record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        content: content.to_string(),
        ttl: 1,
        proxied: false,
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    async fn list_records(
        &self,
        _record_type: &str,
        _page: u32,
        _per_page: u32,
    ) -> Result<RecordPage, DnsError> {
        Ok(RecordPage {
            records: self.records.clone(),
            total_pages: 1,
        })
    }

    async fn create_record(&self, input: &RecordInput) -> Result<(), DnsError> {
        self.calls.lock().unwrap().push(Call::Create(input.clone()));
        self.outcome(&input.name)
    }

    async fn update_record(&self, record_id: &str, input: &RecordInput) -> Result<(), DnsError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(record_id.to_string(), input.clone()));
        self.outcome(record_id)
    }

    async fn delete_record(&self, record_id: &str) -> Result<(), DnsError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete(record_id.to_string()));
        self.outcome(record_id)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
