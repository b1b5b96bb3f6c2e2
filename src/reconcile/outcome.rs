use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Skip,
    Delete,
    /// Nothing matched the name, so nothing was deleted.
    NotFound,
}

/// Result of processing one name (upsert) or one matched record (delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub name: String,
    pub operation: Operation,
    pub record_id: Option<String>,
    pub content: Option<String>,
    pub result: Result<(), String>,
}

impl Outcome {
    pub fn ok(name: &str, operation: Operation) -> Self {
        Self {
            name: name.to_string(),
            operation,
            record_id: None,
            content: None,
            result: Ok(()),
        }
    }

    pub fn with_record_id(mut self, record_id: &str) -> Self {
        self.record_id = Some(record_id.to_string());
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_result<E: fmt::Display>(mut self, result: Result<(), E>) -> Self {
        self.result = result.map_err(|e| e.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let content = self.content.as_deref().unwrap_or_default();
        let id = self.record_id.as_deref().unwrap_or_default();

        match (&self.result, self.operation) {
            (Ok(()), Operation::Create) => {
                write!(f, "Created record \"{name}\" with value {content}.")
            }
            (Ok(()), Operation::Update) => {
                write!(f, "Updated record \"{name}\" to value {content}.")
            }
            (Ok(()), Operation::Skip) => {
                write!(f, "Record \"{name}\" already set to {content}, no update needed.")
            }
            (Ok(()), Operation::Delete) => write!(f, "Deleted A record '{name}' (id: {id})"),
            (Ok(()), Operation::NotFound) => {
                write!(f, "No A record found for name: {name} (nothing to delete)")
            }
            (Err(reason), Operation::Create) => {
                write!(f, "Failed to create record \"{name}\": {reason}")
            }
            (Err(reason), Operation::Update) => {
                write!(f, "Failed to update record \"{name}\": {reason}")
            }
            (Err(reason), Operation::Delete) => {
                write!(f, "Failed to delete A record '{name}' (id: {id}): {reason}")
            }
            (Err(reason), _) => write!(f, "Failed to process record \"{name}\": {reason}"),
        }
    }
}
