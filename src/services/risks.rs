use crate::models::artifact::{EndpointItem, RiskItem, SequenceStep};

const PAGINATION_TOKENS: [&str; 5] = ["page", "limit", "cursor", "offset", "per_page"];
const DB_TOKENS: [&str; 5] = ["database", "db", "sqlite", "postgres", "mysql"];
const REPLICA_TOKENS: [&str; 4] = ["replica", "replication", "read-replica", "read replica"];
const PAYMENT_TOKENS: [&str; 4] = ["payment", "payments", "webhook", "webhooks"];

/// Deterministic heuristics over the spec text and generated artifacts.
/// Runs once at generation time; the result is stored with the version.
pub fn run_risk_rules(
    spec: &str,
    endpoints: &[EndpointItem],
    sequence_steps: &[SequenceStep],
) -> Vec<RiskItem> {
    let spec_l = spec.to_lowercase();
    let mut risks = Vec::new();

    // collection GETs only, path parameters mean item lookups
    let unpaginated_list_get = endpoints
        .iter()
        .filter(|ep| ep.method.eq_ignore_ascii_case("get") && !ep.path.contains('{'))
        .any(|ep| !has_pagination(ep));
    if unpaginated_list_get {
        risks.push(risk(
            "missing-pagination",
            "medium",
            "List endpoints without pagination can cause scalability bottlenecks.",
        ));
    }

    if sync_chain_length(sequence_steps) > 4 {
        risks.push(risk(
            "long-sync-chain",
            "medium",
            "Synchronous call chain longer than 4 steps can increase tail latency.",
        ));
    }

    let mentions_db = DB_TOKENS.iter().any(|token| spec_l.contains(token));
    let mentions_replica = REPLICA_TOKENS.iter().any(|token| spec_l.contains(token));
    if mentions_db && !mentions_replica {
        risks.push(risk(
            "single-db-spof",
            "medium",
            "Single database with no replica mention introduces a single point of failure.",
        ));
    }

    let mentions_payment_or_webhook = PAYMENT_TOKENS.iter().any(|token| spec_l.contains(token));
    let mentions_idempotency = spec_l.contains("idempot");
    if mentions_payment_or_webhook && !mentions_idempotency {
        risks.push(risk(
            "missing-idempotency",
            "high",
            "Payments/webhooks without idempotency handling risk duplicate side effects.",
        ));
    }

    risks
}

fn risk(code: &str, severity: &str, message: &str) -> RiskItem {
    RiskItem {
        code: code.to_string(),
        severity: severity.to_string(),
        message: message.to_string(),
    }
}

fn has_pagination(endpoint: &EndpointItem) -> bool {
    endpoint.query_params.iter().any(|param| {
        let name = param.name.to_lowercase();
        PAGINATION_TOKENS.contains(&name.as_str())
    })
}

/// Longest run of synchronous steps, async steps reset the run.
fn sync_chain_length(sequence_steps: &[SequenceStep]) -> usize {
    let mut max_len = 0;
    let mut current = 0;

    for step in sequence_steps {
        if step.is_async {
            max_len = max_len.max(current);
            current = 0;
        } else {
            current += 1;
            max_len = max_len.max(current);
        }
    }

    max_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::ParameterItem;

    fn get_endpoint(path: &str, query_params: Vec<ParameterItem>) -> EndpointItem {
        EndpointItem {
            method: "GET".to_string(),
            path: path.to_string(),
            summary: format!("GET {}", path),
            query_params,
            ..Default::default()
        }
    }

    fn param(name: &str) -> ParameterItem {
        ParameterItem {
            name: name.to_string(),
            param_type: "integer".to_string(),
            required: false,
        }
    }

    fn sync_step() -> SequenceStep {
        SequenceStep {
            from_service: "a".to_string(),
            to_service: "b".to_string(),
            message: "call".to_string(),
            is_async: false,
        }
    }

    fn codes(risks: &[RiskItem]) -> Vec<&str> {
        risks.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn unpaginated_list_get_is_flagged() {
        let endpoints = vec![
            get_endpoint("/tasks", Vec::new()),
            get_endpoint("/tasks/{id}", Vec::new()),
        ];

        let risks = run_risk_rules("task manager", &endpoints, &[]);
        assert_eq!(codes(&risks), vec!["missing-pagination"]);
    }

    #[test]
    fn pagination_params_suppress_the_flag() {
        let endpoints = vec![
            get_endpoint("/tasks", vec![param("Page")]),
            get_endpoint("/projects", vec![param("limit")]),
        ];

        let risks = run_risk_rules("task manager", &endpoints, &[]);
        assert!(risks.is_empty());
    }

    #[test]
    fn item_lookups_do_not_need_pagination() {
        let endpoints = vec![get_endpoint("/tasks/{id}", Vec::new())];

        let risks = run_risk_rules("task manager", &endpoints, &[]);
        assert!(risks.is_empty());
    }

    #[test]
    fn long_sync_chain_is_flagged_past_four_steps() {
        let four: Vec<SequenceStep> = (0..4).map(|_| sync_step()).collect();
        assert!(run_risk_rules("flow", &[], &four).is_empty());

        let five: Vec<SequenceStep> = (0..5).map(|_| sync_step()).collect();
        assert_eq!(codes(&run_risk_rules("flow", &[], &five)), vec!["long-sync-chain"]);
    }

    #[test]
    fn async_steps_reset_the_sync_chain() {
        let mut steps: Vec<SequenceStep> = (0..6).map(|_| sync_step()).collect();
        steps[3].is_async = true;

        let risks = run_risk_rules("flow", &[], &steps);
        assert!(risks.is_empty());
    }

    #[test]
    fn database_without_replica_is_a_spof() {
        let risks = run_risk_rules("store orders in postgres", &[], &[]);
        assert_eq!(codes(&risks), vec!["single-db-spof"]);

        let risks = run_risk_rules("store orders in postgres with a read replica", &[], &[]);
        assert!(risks.is_empty());
    }

    #[test]
    fn payments_without_idempotency_are_high_severity() {
        let risks = run_risk_rules("capture payment via webhook", &[], &[]);
        assert_eq!(codes(&risks), vec!["missing-idempotency"]);
        assert_eq!(risks[0].severity, "high");

        let risks = run_risk_rules("capture payment with idempotency keys", &[], &[]);
        assert!(risks.is_empty());
    }

    #[test]
    fn quiet_spec_produces_no_risks() {
        assert!(run_risk_rules("a small static site", &[], &[]).is_empty());
    }
}
