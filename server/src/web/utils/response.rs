use crate::utils::logging::*;
use actix_web::error::InternalError;
use actix_web::web::JsonConfig;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new<T: Into<String>>(error: T) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A request that ended early. The entry is logged and its message becomes the `error` field.
#[derive(Debug)]
pub enum Rejection {
    BadRequest(LogEntry),
    NotFound(LogEntry),
    Internal(LogEntry),
}

impl Rejection {
    pub async fn into_response(self) -> HttpResponse {
        let (mut response, entry) = match self {
            Rejection::BadRequest(entry) => (HttpResponse::BadRequest(), entry),
            Rejection::NotFound(entry) => (HttpResponse::NotFound(), entry),
            Rejection::Internal(entry) => (HttpResponse::InternalServerError(), entry),
        };
        let body = ErrorResponse::new(entry.message.clone());
        logging_entry!(entry);
        response.json(body)
    }
}

pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}
