// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Generation backend error: {0}")]
    Backend(String),

    #[error("No image produced by the generation backend")]
    NoImage,

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session busy: {0}")]
    Busy(String),
}

impl ResponseError for StudioError {
    fn error_response(&self) -> HttpResponse {
        match self {
            StudioError::Backend(_) | StudioError::NoImage => {
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "AI service error",
                    "message": self.to_string()
                }))
            }
            StudioError::ImageProcessing(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Image processing error",
                    "message": self.to_string()
                }))
            }
            StudioError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
            StudioError::Config(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Configuration error",
                    "message": self.to_string()
                }))
            }
            StudioError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "Not found",
                "message": self.to_string()
            })),
            StudioError::Busy(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": "Session busy",
                "message": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn maps_errors_to_http_status() {
        assert_eq!(
            StudioError::NoImage.error_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            StudioError::NotFound("session".into())
                .error_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StudioError::Busy("generating".into())
                .error_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StudioError::Validation("bad".into())
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
