use uuid::Uuid;

use crate::errors::ArchCopilotError;
use crate::models::artifact::ArtifactBundle;
use crate::models::design::{Design, DesignSummary};
use crate::models::version::{DesignVersion, VersionSummary};

mod sqlite;

pub use sqlite::SqliteDesignStore;

/// Persistence contract for designs and their immutable version history.
///
/// Every method is scoped to an `owner_id`: records owned by someone else
/// behave exactly like records that do not exist. Writes are atomic, so a
/// version row and the owning design's latest-version pointer can never be
/// observed out of step.
pub trait DesignStore: Send + Sync {
    /// Creates a design together with its version 1 in one transaction.
    fn create_design(
        &self,
        owner_id: &str,
        spec_text: &str,
        output: &ArtifactBundle,
    ) -> Result<(Design, DesignVersion), ArchCopilotError>;

    /// Appends the next version to an existing design. Version numbers stay
    /// contiguous even under concurrent appends.
    fn append_version(
        &self,
        design_id: Uuid,
        owner_id: &str,
        spec_text: &str,
        output: &ArtifactBundle,
    ) -> Result<DesignVersion, ArchCopilotError>;

    fn get_design(&self, design_id: Uuid, owner_id: &str) -> Result<Design, ArchCopilotError>;

    /// All designs owned by `owner_id`, in no particular order.
    fn list_designs(&self, owner_id: &str) -> Result<Vec<DesignSummary>, ArchCopilotError>;

    /// Full version record, including the stored artifact bundle.
    fn get_version(
        &self,
        version_id: Uuid,
        owner_id: &str,
    ) -> Result<DesignVersion, ArchCopilotError>;

    /// Version summaries for a design, ascending by `version_num`. Fails with
    /// `NotFound` when the design itself is missing or foreign.
    fn list_versions(
        &self,
        design_id: Uuid,
        owner_id: &str,
    ) -> Result<Vec<VersionSummary>, ArchCopilotError>;
}
