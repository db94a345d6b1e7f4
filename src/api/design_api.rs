use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::request::data::RequestData;
use crate::api::types::Response;
use crate::models::serde_helpers::empty_uuid_as_none;
use crate::models::version::DesignVersion;
use crate::services::generator::generate_version;

#[derive(Deserialize)]
pub struct GenerateRequest {
    /// Absent, `null` or `""` means start a new design.
    #[serde(default, deserialize_with = "empty_uuid_as_none")]
    pub design_id: Option<Uuid>,
    pub spec: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub design_id: Uuid,
    pub version: DesignVersion,
}

#[post("/generate")]
pub async fn generate(data: RequestData, payload: web::Json<GenerateRequest>) -> Response {
    let (design_id, version) = generate_version(
        data.store(),
        data.generator(),
        data.viewer_id(),
        payload.design_id,
        &payload.spec,
    )
    .await?;

    Ok(HttpResponse::Ok().json(GenerateResponse { design_id, version }))
}

#[get("")]
pub async fn list_designs(data: RequestData) -> Response {
    let mut designs = data.store().list_designs(data.viewer_id())?;
    designs.sort_by(|a, b| b.latest_version_created_at.cmp(&a.latest_version_created_at));

    Ok(HttpResponse::Ok().json(designs))
}

#[get("/{design_id}/versions")]
pub async fn list_design_versions(data: RequestData, design_id: web::Path<Uuid>) -> Response {
    let mut versions = data.store().list_versions(*design_id, data.viewer_id())?;
    versions.sort_by(|a, b| b.version_num.cmp(&a.version_num));

    Ok(HttpResponse::Ok().json(versions))
}
