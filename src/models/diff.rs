use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DesignStore;
use crate::errors::ArchCopilotError;
use crate::models::artifact::{ArtifactBundle, EndpointItem};

/// Identity keys present on one side of a comparison but not the other.
/// Keys keep the order of the bundle they came from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DimensionDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Structural comparison of two artifact bundles across the four identity
/// dimensions. Reports presence only: an endpoint whose summary or schema
/// changed but whose `METHOD /path` did not is considered unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DiffSummary {
    pub services: DimensionDiff,
    pub apis: DimensionDiff,
    pub tables: DimensionDiff,
    pub risks: DimensionDiff,
}

impl DiffSummary {
    /// Compares `base` (the older side) against `target` (the newer side).
    /// Keys only in `target` are `added`, keys only in `base` are `removed`.
    pub fn between(base: &ArtifactBundle, target: &ArtifactBundle) -> DiffSummary {
        DiffSummary {
            services: dimension_diff(&service_keys(base), &service_keys(target)),
            apis: dimension_diff(&api_keys(base), &api_keys(target)),
            tables: dimension_diff(&table_keys(base), &table_keys(target)),
            risks: dimension_diff(&risk_keys(base), &risk_keys(target)),
        }
    }

    /// Loads both versions through the store (owner scoped) and diffs their
    /// bundles. Versions of two different designs do not share a lineage and
    /// are rejected.
    pub fn between_stored(
        store: &dyn DesignStore,
        viewer_id: &str,
        base_id: Uuid,
        target_id: Uuid,
    ) -> Result<DiffSummary, ArchCopilotError> {
        let base = store.get_version(base_id, viewer_id)?;
        let target = store.get_version(target_id, viewer_id)?;

        if base.design_id != target.design_id {
            return Err(ArchCopilotError::CrossDesignDiff(format!(
                "Versions {} and {} belong to different designs",
                base_id, target_id
            )));
        }

        Ok(Self::between(&base.output, &target.output))
    }

    pub fn is_empty(&self) -> bool {
        [&self.services, &self.apis, &self.tables, &self.risks]
            .iter()
            .all(|dimension| dimension.added.is_empty() && dimension.removed.is_empty())
    }
}

/// Identity of an endpoint: upper-cased method plus verbatim path.
pub fn endpoint_key(endpoint: &EndpointItem) -> String {
    format!("{} {}", endpoint.method.to_uppercase(), endpoint.path)
}

fn service_keys(bundle: &ArtifactBundle) -> Vec<String> {
    bundle.services.iter().map(|s| s.name.clone()).collect()
}

fn api_keys(bundle: &ArtifactBundle) -> Vec<String> {
    bundle.endpoints.iter().map(endpoint_key).collect()
}

fn table_keys(bundle: &ArtifactBundle) -> Vec<String> {
    bundle.tables.iter().map(|t| t.name.clone()).collect()
}

fn risk_keys(bundle: &ArtifactBundle) -> Vec<String> {
    bundle.risks.iter().map(|r| r.code.clone()).collect()
}

fn dimension_diff(base: &[String], target: &[String]) -> DimensionDiff {
    DimensionDiff {
        added: missing_from(target, base),
        removed: missing_from(base, target),
    }
}

/// Keys of `keys` absent from `other`, in `keys` order, first occurrence only.
fn missing_from(keys: &[String], other: &[String]) -> Vec<String> {
    let other: HashSet<&str> = other.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    keys.iter()
        .filter(|key| !other.contains(key.as_str()) && seen.insert(key.as_str()))
        .cloned()
        .collect()
}
