use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Design {
    pub id: Uuid,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub latest_version_id: Uuid,
    pub latest_version_num: i32,
}

/// Listing row for a design, denormalized with its latest version so list
/// responses never require a second lookup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DesignSummary {
    pub design_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub latest_version_id: Uuid,
    pub latest_version_num: i32,
    pub latest_version_created_at: DateTime<Utc>,
    pub latest_spec_text: String,
}
