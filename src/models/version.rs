use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::artifact::ArtifactBundle;

/// One immutable snapshot of a design. `version_num` counts from 1 and is
/// contiguous within its design.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DesignVersion {
    pub id: Uuid,
    pub design_id: Uuid,
    pub spec_text: String,
    pub version_num: i32,
    pub created_at: DateTime<Utc>,
    pub output: ArtifactBundle,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VersionSummary {
    pub id: Uuid,
    pub design_id: Uuid,
    pub version_num: i32,
    pub created_at: DateTime<Utc>,
}
