use tracing::{error, info};

use super::{MatchStrategy, Operation, Outcome};
use crate::dns::{DnsProvider, DnsRecord};

/// Every record in the directory matching `name`, in directory order.
pub fn find_matches<'a>(
    name: &str,
    directory: &'a [DnsRecord],
    strategy: MatchStrategy,
) -> Vec<&'a DnsRecord> {
    directory
        .iter()
        .filter(|record| strategy.matches(&record.name, name))
        .collect()
}

/// Delete every record matching each name. Each delete produces its own
/// outcome; a name with no match produces a single `NotFound` outcome.
pub async fn apply_deletions(
    provider: &dyn DnsProvider,
    names: &[String],
    directory: &[DnsRecord],
    strategy: MatchStrategy,
) -> Vec<Outcome> {
    let mut outcomes = Vec::new();

    for name in names {
        let matches = find_matches(name, directory, strategy);
        if matches.is_empty() {
            let outcome = Outcome::ok(name, Operation::NotFound);
            info!("{}", outcome);
            outcomes.push(outcome);
            continue;
        }

        for record in matches {
            let result = provider.delete_record(&record.id).await;
            let outcome = Outcome::ok(name, Operation::Delete)
                .with_record_id(&record.id)
                .with_content(&record.content)
                .with_result(result);

            match &outcome.result {
                Ok(()) => info!("{}", outcome),
                Err(_) => error!("{}", outcome),
            }
            outcomes.push(outcome);
        }
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::mock::{record, Call, MockProvider};

    #[test]
    fn test_find_matches_exact_is_case_insensitive() {
        let directory = vec![
            record("r1", "www.example.com", "10.0.0.1"),
            record("r2", "api.example.com", "10.0.0.2"),
            record("r3", "WWW.Example.com", "10.0.0.3"),
            record("r4", "www.example.com.other.net", "10.0.0.4"),
        ];

        let ids: Vec<_> = find_matches("www.example.com", &directory, MatchStrategy::Exact)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r3"]);

        let ids: Vec<_> = find_matches("www.example.com", &directory, MatchStrategy::Prefix)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r4"]);
    }

    #[tokio::test]
    async fn test_deletes_every_match_and_reports_each() {
        let provider = MockProvider::with_records(vec![
            record("r1", "www.example.com", "10.0.0.1"),
            record("r2", "WWW.EXAMPLE.COM", "10.0.0.2"),
            record("r3", "api.example.com", "10.0.0.3"),
        ])
        .failing_on("r1");
        let names = vec!["www.example.com".to_string()];

        let outcomes =
            apply_deletions(&provider, &names, &provider.records, MatchStrategy::Exact).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].record_id.as_deref(), Some("r1"));
        assert!(!outcomes[0].is_success());
        assert_eq!(outcomes[1].record_id.as_deref(), Some("r2"));
        assert!(outcomes[1].is_success());
        assert_eq!(
            provider.calls(),
            vec![Call::Delete("r1".to_string()), Call::Delete("r2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_no_match_is_a_noop() {
        let provider = MockProvider::with_records(vec![record("r1", "a.example.com", "10.0.0.1")]);
        let names = vec!["b.example.com".to_string(), "a.example.com".to_string()];

        let outcomes =
            apply_deletions(&provider, &names, &provider.records, MatchStrategy::Exact).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].operation, Operation::NotFound);
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].operation, Operation::Delete);
        assert_eq!(provider.calls(), vec![Call::Delete("r1".to_string())]);
    }
}
