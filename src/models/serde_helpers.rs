use serde::de::{self, Deserialize, Deserializer};
use uuid::Uuid;

/// Accepts a uuid string, `null`, an empty string, or an absent field (with
/// `#[serde(default)]`) and maps the last three to `None`.
pub fn empty_uuid_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value).map(Some).map_err(de::Error::custom),
    }
}
