use serde_json::{Map, Value};
use serde_yaml::{Mapping, Value as Yaml};

use crate::errors::ArchCopilotError;
use crate::models::artifact::{EndpointItem, SequenceStep, TableItem};

/// One `CREATE TABLE` statement per table, blank line separated. A table
/// without columns gets a placeholder primary key so the DDL stays valid.
pub fn build_sql_ddl(tables: &[TableItem]) -> String {
    let mut statements = Vec::new();

    for table in tables {
        let mut cols = Vec::new();
        for col in &table.columns {
            let constraints = col.constraints.join(" ").trim().to_string();
            let mut definition = format!("  {} {}", col.name, col.col_type)
                .trim_end()
                .to_string();
            if !constraints.is_empty() {
                definition.push(' ');
                definition.push_str(&constraints);
            }
            cols.push(definition);
        }

        let body = if cols.is_empty() {
            "  id INTEGER PRIMARY KEY".to_string()
        } else {
            cols.join(",\n")
        };
        statements.push(format!("CREATE TABLE {} (\n{}\n);", table.name, body));
    }

    statements.join("\n\n")
}

/// OpenAPI 3.0.3 document with one path item per distinct path and one
/// operation per endpoint, in first-appearance order.
pub fn build_openapi_yaml(endpoints: &[EndpointItem]) -> Result<String, ArchCopilotError> {
    let mut path_items: Vec<(String, Mapping)> = Vec::new();

    for endpoint in endpoints {
        let operation = operation_for(endpoint)?;
        let method_key = yaml_str(&endpoint.method.to_lowercase());

        match path_items.iter().position(|(path, _)| *path == endpoint.path) {
            Some(i) => {
                path_items[i].1.insert(method_key, Yaml::Mapping(operation));
            }
            None => {
                let mut item = Mapping::new();
                item.insert(method_key, Yaml::Mapping(operation));
                path_items.push((endpoint.path.clone(), item));
            }
        }
    }

    let mut paths = Mapping::new();
    for (path, item) in path_items {
        paths.insert(yaml_str(&path), Yaml::Mapping(item));
    }

    let mut info = Mapping::new();
    info.insert(yaml_str("title"), yaml_str("ArchCopilot Generated API"));
    info.insert(yaml_str("version"), yaml_str("1.0.0"));

    let mut doc = Mapping::new();
    doc.insert(yaml_str("openapi"), yaml_str("3.0.3"));
    doc.insert(yaml_str("info"), Yaml::Mapping(info));
    doc.insert(yaml_str("paths"), Yaml::Mapping(paths));

    serde_yaml::to_string(&Yaml::Mapping(doc)).map_err(|e| {
        ArchCopilotError::InternalServerError(format!("OpenAPI rendering failed: {}", e))
    })
}

fn operation_for(endpoint: &EndpointItem) -> Result<Mapping, ArchCopilotError> {
    let response_schema = if endpoint.response_schema.is_empty() {
        let mut schema = Mapping::new();
        schema.insert(yaml_str("type"), yaml_str("object"));
        schema.insert(yaml_str("additionalProperties"), Yaml::Bool(true));
        Yaml::Mapping(schema)
    } else {
        schema_to_yaml(&endpoint.response_schema)?
    };

    let mut media = Mapping::new();
    media.insert(yaml_str("schema"), response_schema);
    let mut content = Mapping::new();
    content.insert(yaml_str("application/json"), Yaml::Mapping(media));
    let mut ok = Mapping::new();
    ok.insert(yaml_str("description"), yaml_str("OK"));
    ok.insert(yaml_str("content"), Yaml::Mapping(content));
    let mut responses = Mapping::new();
    responses.insert(yaml_str("200"), Yaml::Mapping(ok));

    let mut operation = Mapping::new();
    operation.insert(yaml_str("summary"), yaml_str(&endpoint.summary));
    operation.insert(yaml_str("responses"), Yaml::Mapping(responses));

    if !endpoint.query_params.is_empty() {
        let parameters: Vec<Yaml> = endpoint
            .query_params
            .iter()
            .map(|param| {
                let mut schema = Mapping::new();
                schema.insert(yaml_str("type"), yaml_str(&param.param_type));

                let mut parameter = Mapping::new();
                parameter.insert(yaml_str("in"), yaml_str("query"));
                parameter.insert(yaml_str("name"), yaml_str(&param.name));
                parameter.insert(yaml_str("required"), Yaml::Bool(param.required));
                parameter.insert(yaml_str("schema"), Yaml::Mapping(schema));
                Yaml::Mapping(parameter)
            })
            .collect();
        operation.insert(yaml_str("parameters"), Yaml::Sequence(parameters));
    }

    if !endpoint.request_body_schema.is_empty() {
        let mut media = Mapping::new();
        media.insert(
            yaml_str("schema"),
            schema_to_yaml(&endpoint.request_body_schema)?,
        );
        let mut content = Mapping::new();
        content.insert(yaml_str("application/json"), Yaml::Mapping(media));
        let mut body = Mapping::new();
        body.insert(yaml_str("required"), Yaml::Bool(true));
        body.insert(yaml_str("content"), Yaml::Mapping(content));
        operation.insert(yaml_str("requestBody"), Yaml::Mapping(body));
    }

    Ok(operation)
}

fn schema_to_yaml(schema: &Map<String, Value>) -> Result<Yaml, ArchCopilotError> {
    serde_yaml::to_value(schema).map_err(|e| {
        ArchCopilotError::InternalServerError(format!("Schema conversion failed: {}", e))
    })
}

fn yaml_str(value: &str) -> Yaml {
    Yaml::String(value.to_string())
}

/// Mermaid `sequenceDiagram` source. Participants get stable `svc_N` ids in
/// first-appearance order so labels with spaces or quotes stay renderable.
pub fn build_mermaid(sequence_steps: &[SequenceStep]) -> String {
    let mut lines = vec!["sequenceDiagram".to_string()];
    let mut participants: Vec<(String, String)> = Vec::new();

    if sequence_steps.is_empty() {
        let id = register_participant("System", &mut participants, &mut lines);
        lines.push(format!("  Note over {}: No sequence steps generated", id));
        return lines.join("\n");
    }

    for step in sequence_steps {
        let from_id = register_participant(&step.from_service, &mut participants, &mut lines);
        let to_id = register_participant(&step.to_service, &mut participants, &mut lines);
        let message = normalize_mermaid_message(&step.message);
        let arrow = if step.is_async { "-->>" } else { "->>" };
        lines.push(format!("  {}{}{}: {}", from_id, arrow, to_id, message));
    }

    lines.join("\n")
}

fn register_participant(
    name: &str,
    participants: &mut Vec<(String, String)>,
    lines: &mut Vec<String>,
) -> String {
    let label = normalize_mermaid_label(name);

    if let Some((_, id)) = participants.iter().find(|(known, _)| *known == label) {
        return id.clone();
    }

    let id = format!("svc_{}", participants.len() + 1);
    lines.push(format!(
        "  participant {} as \"{}\"",
        id,
        escape_mermaid_label(&label)
    ));
    participants.push((label, id.clone()));
    id
}

fn normalize_mermaid_label(value: &str) -> String {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.is_empty() {
        "Unknown Service".to_string()
    } else {
        normalized
    }
}

fn escape_mermaid_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn normalize_mermaid_message(value: &str) -> String {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.is_empty() {
        "request".to_string()
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::artifact::{ColumnItem, ParameterItem};

    fn endpoint(method: &str, path: &str, summary: &str) -> EndpointItem {
        EndpointItem {
            method: method.to_string(),
            path: path.to_string(),
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn sql_ddl_renders_columns_and_constraints() {
        let tables = vec![TableItem {
            name: "orders".to_string(),
            columns: vec![
                ColumnItem {
                    name: "id".to_string(),
                    col_type: "INTEGER".to_string(),
                    constraints: vec!["PRIMARY KEY".to_string()],
                },
                ColumnItem {
                    name: "status".to_string(),
                    col_type: "TEXT".to_string(),
                    constraints: Vec::new(),
                },
            ],
        }];

        assert_eq!(
            build_sql_ddl(&tables),
            "CREATE TABLE orders (\n  id INTEGER PRIMARY KEY,\n  status TEXT\n);"
        );
    }

    #[test]
    fn sql_ddl_falls_back_for_empty_tables() {
        let tables = vec![
            TableItem {
                name: "events".to_string(),
                columns: Vec::new(),
            },
            TableItem {
                name: "users".to_string(),
                columns: vec![ColumnItem {
                    name: "id".to_string(),
                    col_type: "INTEGER".to_string(),
                    constraints: Vec::new(),
                }],
            },
        ];

        assert_eq!(
            build_sql_ddl(&tables),
            "CREATE TABLE events (\n  id INTEGER PRIMARY KEY\n);\n\n\
             CREATE TABLE users (\n  id INTEGER\n);"
        );
    }

    #[test]
    fn openapi_groups_methods_under_one_path() {
        let endpoints = vec![
            endpoint("GET", "/orders", "List orders"),
            endpoint("POST", "/orders", "Create an order"),
        ];

        let yaml = build_openapi_yaml(&endpoints).unwrap();
        let doc: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(doc["openapi"], "3.0.3");
        assert_eq!(doc["info"]["title"], "ArchCopilot Generated API");
        assert_eq!(doc["paths"]["/orders"]["get"]["summary"], "List orders");
        assert_eq!(doc["paths"]["/orders"]["post"]["summary"], "Create an order");
    }

    #[test]
    fn openapi_defaults_response_schema_to_open_object() {
        let yaml = build_openapi_yaml(&[endpoint("GET", "/health", "Health")]).unwrap();
        let doc: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();

        let schema = &doc["paths"]["/health"]["get"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], true);
    }

    #[test]
    fn openapi_carries_params_and_request_body() {
        let body = serde_json::json!({
            "type": "object",
            "properties": { "name": { "type": "string" } }
        });
        let mut ep = endpoint("POST", "/projects", "Create a project");
        ep.query_params = vec![ParameterItem {
            name: "dry_run".to_string(),
            param_type: "boolean".to_string(),
            required: false,
        }];
        ep.request_body_schema = body.as_object().cloned().unwrap();

        let yaml = build_openapi_yaml(&[ep]).unwrap();
        let doc: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();

        let op = &doc["paths"]["/projects"]["post"];
        assert_eq!(op["parameters"][0]["in"], "query");
        assert_eq!(op["parameters"][0]["name"], "dry_run");
        assert_eq!(op["parameters"][0]["required"], false);
        assert_eq!(op["parameters"][0]["schema"]["type"], "boolean");
        assert_eq!(op["requestBody"]["required"], true);
        assert_eq!(
            op["requestBody"]["content"]["application/json"]["schema"]["properties"]["name"]
                ["type"],
            "string"
        );
    }

    #[test]
    fn mermaid_reuses_participant_ids() {
        let steps = vec![
            SequenceStep {
                from_service: "api-gateway".to_string(),
                to_service: "orders".to_string(),
                message: "POST /orders".to_string(),
                is_async: false,
            },
            SequenceStep {
                from_service: "orders".to_string(),
                to_service: "api-gateway".to_string(),
                message: "201 Created".to_string(),
                is_async: true,
            },
        ];

        assert_eq!(
            build_mermaid(&steps),
            "sequenceDiagram\n\
             \u{20} participant svc_1 as \"api-gateway\"\n\
             \u{20} participant svc_2 as \"orders\"\n\
             \u{20} svc_1->>svc_2: POST /orders\n\
             \u{20} svc_2-->>svc_1: 201 Created"
        );
    }

    #[test]
    fn mermaid_normalizes_labels_and_messages() {
        let steps = vec![SequenceStep {
            from_service: "  billing\n  core ".to_string(),
            to_service: "\"ledger\"".to_string(),
            message: "   ".to_string(),
            is_async: false,
        }];

        let diagram = build_mermaid(&steps);
        assert!(diagram.contains("participant svc_1 as \"billing core\""));
        assert!(diagram.contains("participant svc_2 as \"\\\"ledger\\\"\""));
        assert!(diagram.contains("svc_1->>svc_2: request"));
    }

    #[test]
    fn mermaid_notes_missing_steps() {
        assert_eq!(
            build_mermaid(&[]),
            "sequenceDiagram\n\
             \u{20} participant svc_1 as \"System\"\n\
             \u{20} Note over svc_1: No sequence steps generated"
        );
    }
}
