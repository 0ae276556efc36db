//! JSON endpoints under `/api/v1`.

use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use crate::models::config::ServerConfig;
use crate::query::{FilterKey, QueryDescriptor, QueryError};
use crate::services::ServiceError;

pub mod applications;
pub mod catalog;
pub mod jobs;
pub mod users;

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    json!({ "error": message.to_string() })
}

/// Reads the list query string of the request.
pub(crate) fn parse_descriptor<K: FilterKey>(
    req: &HttpRequest,
    config: &ServerConfig,
) -> Result<QueryDescriptor<K>, HttpResponse> {
    QueryDescriptor::from_query_string(req.query_string(), &config.query)
        .map_err(|err: QueryError| HttpResponse::BadRequest().json(error_body(err)))
}

/// Maps a service failure onto its HTTP status; `action` names the request in logs.
pub(crate) fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Forbidden().json(error_body("forbidden")),
        ServiceError::NotFound => HttpResponse::NotFound().json(error_body("not found")),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(error_body(message))
        }
        ServiceError::Query(err) => HttpResponse::BadRequest().json(error_body(err)),
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(error_body(message)),
        ServiceError::Internal(message) => {
            log::error!("Failed to {action}: {message}");
            HttpResponse::InternalServerError().json(error_body("internal server error"))
        }
    }
}
