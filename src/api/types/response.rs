use actix_web::HttpResponse;

use crate::errors::ArchCopilotError;

pub type Response = Result<HttpResponse, ArchCopilotError>;
