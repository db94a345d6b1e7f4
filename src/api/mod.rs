pub mod request;
pub mod types;

mod design_api;
mod misc_api;
mod version_api;

pub use design_api::*;
pub use misc_api::*;
pub use version_api::*;

use actix_web::web;

/// Full route tree, shared by the server binary and the API tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(generate)
        .service(health)
        .service(examples)
        .service(
            web::scope("/designs")
                .service(list_designs)
                .service(list_design_versions),
        )
        .service(
            web::scope("/design_versions")
                .service(get_design_version)
                .service(diff_design_versions),
        );
}
