use actix_web::HttpResponse;
use colored::Colorize;
use serde_json::json;

#[derive(Debug)]
pub enum ArchCopilotError {
    NotFound(String),
    CrossDesignDiff(String),
    GenerationFailed(String),
    StorageUnavailable(String),
    ClientSessionError(String),
    SerdeError(serde_json::Error),
    InternalServerError(String),
}

impl std::fmt::Display for ArchCopilotError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ArchCopilotError::NotFound(e) => write!(f, "Not Found: {}", e),
            ArchCopilotError::CrossDesignDiff(e) => write!(f, "Cross Design Diff: {}", e),
            ArchCopilotError::GenerationFailed(e) => write!(f, "Generation Failed: {}", e),
            ArchCopilotError::StorageUnavailable(e) => write!(f, "Storage Unavailable: {}", e),
            ArchCopilotError::ClientSessionError(e) => write!(f, "Client Session Error: {}", e),
            ArchCopilotError::SerdeError(e) => write!(f, "Serde Error: {}", e),
            ArchCopilotError::InternalServerError(e) => write!(f, "Internal Server Error: {}", e),
        }
    }
}

impl std::error::Error for ArchCopilotError {}

impl actix_web::ResponseError for ArchCopilotError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ArchCopilotError::NotFound(e) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": e
            })),
            ArchCopilotError::CrossDesignDiff(e) => HttpResponse::Conflict().json(json!({
                "status": 409,
                "message": e
            })),
            ArchCopilotError::GenerationFailed(e) => {
                log::error!("Generation Failed: {}", e);

                HttpResponse::BadGateway().json(json!({
                    "status": 502,
                    "message": e
                }))
            }
            ArchCopilotError::StorageUnavailable(e) => {
                log::error!("Storage Unavailable: {}", e);

                HttpResponse::ServiceUnavailable().json(json!({
                    "status": 503,
                    "message": e
                }))
            }
            _ => {
                println!("Internal Server Error: {}", self.to_string().red());

                HttpResponse::InternalServerError().json(json!({
                    "status": 500,
                    "message": "Internal Server Error"
                }))
            }
        }
    }
}

impl From<rusqlite::Error> for ArchCopilotError {
    fn from(e: rusqlite::Error) -> Self {
        ArchCopilotError::StorageUnavailable(format!("RusqliteError: {}", e))
    }
}

impl From<serde_json::Error> for ArchCopilotError {
    fn from(e: serde_json::Error) -> Self {
        ArchCopilotError::SerdeError(e)
    }
}

impl<T> From<std::sync::PoisonError<T>> for ArchCopilotError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ArchCopilotError::InternalServerError(format!("PoisonError: {}", e))
    }
}
