use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::DesignStore;
use crate::errors::ArchCopilotError;
use crate::models::artifact::{
    ArtifactBundle, ColumnItem, EndpointItem, ParameterItem, SequenceStep, ServiceItem,
    StructuredDesign, TableItem,
};
use crate::models::version::DesignVersion;
use crate::services::render::{build_mermaid, build_openapi_yaml, build_sql_ddl};
use crate::services::risks::run_risk_rules;

/// Turns a free-form product spec into a structured architecture. The derived
/// artifacts are rendered afterwards by [`complete_bundle`], so implementors
/// only produce services, tables, endpoints and sequence steps.
#[async_trait]
pub trait DesignGenerator: Send + Sync {
    async fn generate(&self, spec_text: &str) -> Result<StructuredDesign, ArchCopilotError>;
}

/// Generator that answers every spec with the same canned design.
pub struct StaticGenerator {
    design: StructuredDesign,
}

impl StaticGenerator {
    pub fn with_design(design: StructuredDesign) -> Self {
        Self { design }
    }
}

impl Default for StaticGenerator {
    fn default() -> Self {
        Self::with_design(template_design())
    }
}

#[async_trait]
impl DesignGenerator for StaticGenerator {
    async fn generate(&self, _spec_text: &str) -> Result<StructuredDesign, ArchCopilotError> {
        Ok(self.design.clone())
    }
}

/// Generator that plays back a queue of designs, one per call. Fails once the
/// queue runs dry.
pub struct ScriptedGenerator {
    outputs: Mutex<VecDeque<StructuredDesign>>,
}

impl ScriptedGenerator {
    pub fn new(outputs: Vec<StructuredDesign>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
        }
    }
}

#[async_trait]
impl DesignGenerator for ScriptedGenerator {
    async fn generate(&self, _spec_text: &str) -> Result<StructuredDesign, ArchCopilotError> {
        let mut outputs = self.outputs.lock()?;

        outputs.pop_front().ok_or_else(|| {
            ArchCopilotError::GenerationFailed("Scripted generator ran out of designs".to_string())
        })
    }
}

/// Generator that always fails, for exercising upstream error paths.
pub struct FailingGenerator;

#[async_trait]
impl DesignGenerator for FailingGenerator {
    async fn generate(&self, _spec_text: &str) -> Result<StructuredDesign, ArchCopilotError> {
        Err(ArchCopilotError::GenerationFailed(
            "Generator is configured to fail".to_string(),
        ))
    }
}

/// Renders the derived artifacts for a structured design and assembles the
/// bundle that gets stored with the version.
pub fn complete_bundle(
    spec_text: &str,
    design: StructuredDesign,
) -> Result<ArtifactBundle, ArchCopilotError> {
    let db_schema_sql = build_sql_ddl(&design.tables);
    let openapi_yaml = build_openapi_yaml(&design.endpoints)?;
    let mermaid = build_mermaid(&design.sequence_steps);
    let risks = run_risk_rules(spec_text, &design.endpoints, &design.sequence_steps);

    Ok(ArtifactBundle {
        services: design.services,
        tables: design.tables,
        endpoints: design.endpoints,
        sequence_steps: design.sequence_steps,
        db_schema_sql,
        openapi_yaml,
        mermaid,
        risks,
    })
}

/// Runs one generation round: resolve the target design, call the generator,
/// render the bundle, then persist it as a new version (or as a new design
/// when `design_id` is absent).
///
/// The design lookup happens before the generator call, so a stale id fails
/// fast instead of burning a generation. A generator failure leaves the store
/// untouched.
pub async fn generate_version(
    store: &dyn DesignStore,
    generator: &dyn DesignGenerator,
    viewer_id: &str,
    design_id: Option<Uuid>,
    spec_text: &str,
) -> Result<(Uuid, DesignVersion), ArchCopilotError> {
    if let Some(design_id) = design_id {
        store.get_design(design_id, viewer_id)?;
    }

    let structured = generator.generate(spec_text).await?;
    let bundle = complete_bundle(spec_text, structured)?;

    match design_id {
        Some(design_id) => {
            let version = store.append_version(design_id, viewer_id, spec_text, &bundle)?;
            Ok((design_id, version))
        }
        None => {
            let (design, version) = store.create_design(viewer_id, spec_text, &bundle)?;
            Ok((design.id, version))
        }
    }
}

fn template_design() -> StructuredDesign {
    StructuredDesign {
        services: vec![
            ServiceItem {
                name: "api-gateway".to_string(),
                responsibility: "Terminates client traffic and routes requests.".to_string(),
                dependencies: vec!["core-service".to_string()],
            },
            ServiceItem {
                name: "core-service".to_string(),
                responsibility: "Owns business rules and persistence access.".to_string(),
                dependencies: Vec::new(),
            },
        ],
        tables: vec![TableItem {
            name: "items".to_string(),
            columns: vec![
                ColumnItem {
                    name: "id".to_string(),
                    col_type: "INTEGER".to_string(),
                    constraints: vec!["PRIMARY KEY".to_string()],
                },
                ColumnItem {
                    name: "name".to_string(),
                    col_type: "TEXT".to_string(),
                    constraints: vec!["NOT NULL".to_string()],
                },
                ColumnItem {
                    name: "created_at".to_string(),
                    col_type: "TEXT".to_string(),
                    constraints: Vec::new(),
                },
            ],
        }],
        endpoints: vec![
            EndpointItem {
                method: "GET".to_string(),
                path: "/items".to_string(),
                summary: "List items".to_string(),
                query_params: vec![
                    ParameterItem {
                        name: "page".to_string(),
                        param_type: "integer".to_string(),
                        required: false,
                    },
                    ParameterItem {
                        name: "limit".to_string(),
                        param_type: "integer".to_string(),
                        required: false,
                    },
                ],
                ..Default::default()
            },
            EndpointItem {
                method: "POST".to_string(),
                path: "/items".to_string(),
                summary: "Create an item".to_string(),
                ..Default::default()
            },
        ],
        sequence_steps: vec![
            SequenceStep {
                from_service: "api-gateway".to_string(),
                to_service: "core-service".to_string(),
                message: "POST /items".to_string(),
                is_async: false,
            },
            SequenceStep {
                from_service: "core-service".to_string(),
                to_service: "api-gateway".to_string(),
                message: "201 Created".to_string(),
                is_async: false,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::SqliteDesignStore;

    fn one_service_design(name: &str) -> StructuredDesign {
        StructuredDesign {
            services: vec![ServiceItem {
                name: name.to_string(),
                responsibility: format!("{} duties", name),
                dependencies: Vec::new(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn complete_bundle_renders_every_artifact() {
        let bundle = complete_bundle("orders stored in postgres", template_design()).unwrap();

        assert!(bundle.db_schema_sql.starts_with("CREATE TABLE items"));
        assert!(bundle.openapi_yaml.contains("openapi: 3.0.3"));
        assert!(bundle.mermaid.starts_with("sequenceDiagram"));
        assert_eq!(bundle.risks.len(), 1);
        assert_eq!(bundle.risks[0].code, "single-db-spof");
        assert_eq!(bundle.services.len(), 2);
    }

    #[tokio::test]
    async fn scripted_generator_plays_back_in_order() {
        let generator =
            ScriptedGenerator::new(vec![one_service_design("first"), one_service_design("second")]);

        let a = generator.generate("spec").await.unwrap();
        let b = generator.generate("spec").await.unwrap();
        assert_eq!(a.services[0].name, "first");
        assert_eq!(b.services[0].name, "second");

        assert!(matches!(
            generator.generate("spec").await,
            Err(ArchCopilotError::GenerationFailed(_))
        ));
    }

    #[tokio::test]
    async fn generate_version_creates_a_design_without_an_id() {
        let store = SqliteDesignStore::open_in_memory().unwrap();
        let generator = StaticGenerator::default();

        let (design_id, version) =
            generate_version(&store, &generator, "viewer-1", None, "an items app")
                .await
                .unwrap();

        assert_eq!(version.version_num, 1);
        assert_eq!(version.design_id, design_id);
        assert_eq!(version.spec_text, "an items app");
        assert_eq!(store.list_designs("viewer-1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generate_version_appends_with_an_id() {
        let store = SqliteDesignStore::open_in_memory().unwrap();
        let generator = StaticGenerator::default();

        let (design_id, _) = generate_version(&store, &generator, "viewer-1", None, "first")
            .await
            .unwrap();
        let (same_id, version) =
            generate_version(&store, &generator, "viewer-1", Some(design_id), "second")
                .await
                .unwrap();

        assert_eq!(same_id, design_id);
        assert_eq!(version.version_num, 2);
        assert_eq!(version.spec_text, "second");
    }

    #[tokio::test]
    async fn stale_design_id_fails_before_generation() {
        let store = SqliteDesignStore::open_in_memory().unwrap();

        let result = generate_version(
            &store,
            &FailingGenerator,
            "viewer-1",
            Some(Uuid::new_v4()),
            "spec",
        )
        .await;

        assert!(matches!(result, Err(ArchCopilotError::NotFound(_))));
    }

    #[tokio::test]
    async fn generation_failure_leaves_the_store_untouched() {
        let store = SqliteDesignStore::open_in_memory().unwrap();

        let result = generate_version(&store, &FailingGenerator, "viewer-1", None, "spec").await;

        assert!(matches!(result, Err(ArchCopilotError::GenerationFailed(_))));
        assert!(store.list_designs("viewer-1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn bundle_is_stored_verbatim() {
        let store = SqliteDesignStore::open_in_memory().unwrap();
        let generator = StaticGenerator::default();

        let (_, version) = generate_version(&store, &generator, "viewer-1", None, "an items app")
            .await
            .unwrap();
        let reloaded = store.get_version(version.id, "viewer-1").unwrap();

        assert_eq!(reloaded.output, version.output);
        assert_eq!(
            reloaded.output,
            complete_bundle("an items app", template_design()).unwrap()
        );
    }
}
