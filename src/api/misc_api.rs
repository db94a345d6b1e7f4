use actix_web::{get, HttpResponse};
use serde_json::json;

use crate::api::types::Response;
use crate::constants::EXAMPLE_SPECS;

#[get("/health")]
pub async fn health() -> Response {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

#[get("/examples")]
pub async fn examples() -> Response {
    let specs: Vec<_> = EXAMPLE_SPECS
        .iter()
        .map(|(title, spec)| json!({ "title": title, "spec": spec }))
        .collect();

    Ok(HttpResponse::Ok().json(specs))
}
