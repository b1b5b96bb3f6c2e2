use tracing::{debug, error, info};

use super::{DesiredState, MatchStrategy, Operation, Outcome};
use crate::dns::{DnsProvider, DnsRecord, RecordInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Skip,
    Update { record_id: String },
    Create,
}

/// Decide what to do for one desired name. Only the first matching record
/// in directory order is considered.
pub fn reconcile(
    name: &str,
    desired_value: &str,
    directory: &[DnsRecord],
    strategy: MatchStrategy,
) -> Action {
    match directory
        .iter()
        .find(|record| strategy.matches(&record.name, name))
    {
        None => Action::Create,
        Some(existing) if existing.content == desired_value => Action::Skip,
        Some(existing) => Action::Update {
            record_id: existing.id.clone(),
        },
    }
}

/// Converge every desired name, one at a time. A failed call is recorded in
/// its outcome and processing moves on to the next name.
pub async fn apply_upserts(
    provider: &dyn DnsProvider,
    desired: &DesiredState,
    directory: &[DnsRecord],
    strategy: MatchStrategy,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(desired.names.len());

    for name in &desired.names {
        let value = desired.value.as_str();
        let action = reconcile(name, value, directory, strategy);
        debug!(name = %name, ?action, "Reconciled record");

        let outcome = match action {
            Action::Skip => Outcome::ok(name, Operation::Skip).with_content(value),
            Action::Update { record_id } => {
                let input = RecordInput::a_record(name, value);
                let result = provider.update_record(&record_id, &input).await;
                Outcome::ok(name, Operation::Update)
                    .with_record_id(&record_id)
                    .with_content(value)
                    .with_result(result)
            }
            Action::Create => {
                let input = RecordInput::a_record(name, value);
                let result = provider.create_record(&input).await;
                Outcome::ok(name, Operation::Create)
                    .with_content(value)
                    .with_result(result)
            }
        };

        match &outcome.result {
            Ok(()) => info!("{}", outcome),
            Err(_) => error!("{}", outcome),
        }
        outcomes.push(outcome);
    }

    outcomes
}
