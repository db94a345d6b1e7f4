use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::request::data::RequestData;
use crate::api::types::Response;
use crate::models::diff::DiffSummary;

#[derive(Deserialize)]
pub struct DiffParams {
    /// Version id to compare against.
    pub other: Uuid,
}

#[get("/{version_id}")]
pub async fn get_design_version(data: RequestData, version_id: web::Path<Uuid>) -> Response {
    let version = data.store().get_version(*version_id, data.viewer_id())?;

    Ok(HttpResponse::Ok().json(version))
}

#[get("/{version_id}/diff")]
pub async fn diff_design_versions(
    data: RequestData,
    version_id: web::Path<Uuid>,
    params: web::Query<DiffParams>,
) -> Response {
    let diff =
        DiffSummary::between_stored(data.store(), data.viewer_id(), params.other, *version_id)?;

    Ok(HttpResponse::Ok().json(diff))
}
