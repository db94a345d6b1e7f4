use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ServiceItem {
    pub name: String,
    pub responsibility: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ColumnItem {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: String,
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TableItem {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ParameterItem {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EndpointItem {
    pub method: String,
    pub path: String,
    pub summary: String,
    #[serde(default)]
    pub query_params: Vec<ParameterItem>,
    #[serde(default)]
    pub request_body_schema: Map<String, Value>,
    #[serde(default)]
    pub response_schema: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SequenceStep {
    pub from_service: String,
    pub to_service: String,
    pub message: String,
    #[serde(default)]
    pub is_async: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RiskItem {
    pub code: String,
    pub severity: String,
    pub message: String,
}

/// Structured architecture produced by a [`crate::services::generator::DesignGenerator`],
/// before derived artifacts are rendered.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StructuredDesign {
    pub services: Vec<ServiceItem>,
    pub tables: Vec<TableItem>,
    pub endpoints: Vec<EndpointItem>,
    pub sequence_steps: Vec<SequenceStep>,
}

/// Complete set of artifacts stored for one design version. Derived fields
/// (`db_schema_sql`, `openapi_yaml`, `mermaid`, `risks`) are rendered once at
/// generation time and returned verbatim afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ArtifactBundle {
    pub services: Vec<ServiceItem>,
    pub tables: Vec<TableItem>,
    pub endpoints: Vec<EndpointItem>,
    pub sequence_steps: Vec<SequenceStep>,
    pub db_schema_sql: String,
    pub openapi_yaml: String,
    pub mermaid: String,
    pub risks: Vec<RiskItem>,
}
