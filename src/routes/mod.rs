// Route exports
pub mod auth;
pub mod chats;
pub mod health;
pub mod profiles;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::config::ChatSettings;
use crate::core::{Engine, EngineError};
use crate::models::ErrorResponse;
use crate::services::{AccountService, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub engine: Engine,
    pub accounts: AccountService,
    pub chat: ChatSettings,
}

impl AppState {
    pub fn new(storage: Storage, chat: ChatSettings) -> Self {
        Self {
            engine: Engine::new(&storage),
            accounts: AccountService::new(storage.accounts.clone()),
            storage,
            chat,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root)).service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(auth::configure)
            .configure(profiles::configure)
            .configure(chats::configure),
    );
}

pub(crate) fn error_body(status_code: u16, error: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    }
}

/// Map an engine failure onto an HTTP response
///
/// Storage failures become 503 with `Retry-After`, since the caller is
/// expected to retry with backoff.
pub(crate) fn engine_error_response(err: &EngineError) -> HttpResponse {
    match err {
        EngineError::InvalidAction(message) => {
            HttpResponse::BadRequest().json(error_body(400, "Invalid action", message.clone()))
        }
        EngineError::StorageUnavailable(e) => {
            tracing::error!("Storage failure: {}", e);
            HttpResponse::ServiceUnavailable()
                .insert_header(("Retry-After", "1"))
                .json(error_body(503, "Storage unavailable", e.to_string()))
        }
    }
}

/// JSON body for extractor failures
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors (including malformed user ids)
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(handle_query_payload_error)
}
