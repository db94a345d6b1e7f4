use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use log::error;
use uuid::Uuid;

use crate::constants::VIEWER_ID_KEY;
use crate::errors::ArchCopilotError;

/// Anonymous owner identity, minted on first contact and carried in the
/// session cookie afterwards. There are no accounts; the id is an opaque
/// partition key for everything the browser creates.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub id: String,
}

impl FromRequest for Viewer {
    type Error = ArchCopilotError;
    type Future = Ready<Result<Viewer, ArchCopilotError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let client_session = req.get_session();

        ready(obtain_viewer(&client_session))
    }
}

pub fn obtain_viewer(client_session: &Session) -> Result<Viewer, ArchCopilotError> {
    let existing = client_session.get::<String>(VIEWER_ID_KEY).map_err(|e| {
        error!("Could not get viewer id. {}", e);

        ArchCopilotError::ClientSessionError("Could not get viewer id.".to_string())
    })?;

    if let Some(id) = existing {
        return Ok(Viewer { id });
    }

    let id = Uuid::new_v4().to_string();
    client_session.insert(VIEWER_ID_KEY, &id).map_err(|e| {
        error!("Could not set viewer id. {}", e);

        ArchCopilotError::ClientSessionError("Could not set viewer id.".to_string())
    })?;

    Ok(Viewer { id })
}
