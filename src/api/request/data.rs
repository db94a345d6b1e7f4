use std::future::{ready, Ready};

use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::api::request::viewer::{obtain_viewer, Viewer};
use crate::app::App;
use crate::db::DesignStore;
use crate::errors::ArchCopilotError;
use crate::services::generator::DesignGenerator;

/// It contains the data that is required by design API endpoints.
#[derive(Clone)]
pub struct RequestData {
    pub app: web::Data<App>,
    pub viewer: Viewer,
}

impl RequestData {
    pub fn store(&self) -> &dyn DesignStore {
        self.app.store.as_ref()
    }

    pub fn generator(&self) -> &dyn DesignGenerator {
        self.app.generator.as_ref()
    }

    pub fn viewer_id(&self) -> &str {
        &self.viewer.id
    }
}

impl FromRequest for RequestData {
    type Error = ArchCopilotError;
    type Future = Ready<Result<RequestData, ArchCopilotError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let client_session = req.get_session();

        match obtain_viewer(&client_session) {
            Ok(viewer) => {
                let app = req.app_data::<web::Data<App>>();

                match app {
                    Some(app) => {
                        let data = RequestData {
                            app: web::Data::clone(app),
                            viewer,
                        };

                        ready(Ok(data))
                    }
                    None => {
                        let err = ArchCopilotError::InternalServerError(
                            "Could not get app data".to_string(),
                        );

                        ready(Err(err))
                    }
                }
            }
            Err(e) => ready(Err(e)),
        }
    }
}
