use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::routes::{error_body, AppState};
use crate::services::AccountError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/auth/signup", web::post().to(signup))
        .route("/auth/login", web::post().to(login));
}

fn account_error_response(err: &AccountError) -> HttpResponse {
    match err {
        AccountError::EmailTaken => {
            HttpResponse::BadRequest().json(error_body(400, "Signup failed", err.to_string()))
        }
        AccountError::InvalidCredentials => {
            HttpResponse::Unauthorized().json(error_body(401, "Login failed", err.to_string()))
        }
        AccountError::Store(e) => {
            tracing::error!("Account storage failure: {}", e);
            HttpResponse::ServiceUnavailable()
                .insert_header(("Retry-After", "1"))
                .json(error_body(503, "Storage unavailable", e.to_string()))
        }
        AccountError::Hashing(e) => {
            tracing::error!("Password hashing failed: {}", e);
            HttpResponse::InternalServerError()
                .json(error_body(500, "Internal error", "Password hashing failed"))
        }
    }
}

/// POST /api/v1/auth/signup
async fn signup(state: web::Data<AppState>, req: web::Json<SignupRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(error_body(400, "Validation failed", errors.to_string()));
    }

    match state.accounts.signup(&req.email, &req.password).await {
        Ok(account) => HttpResponse::Ok().json(AuthResponse {
            user_id: account.id,
            email: account.email,
        }),
        Err(e) => account_error_response(&e),
    }
}

/// POST /api/v1/auth/login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(error_body(400, "Validation failed", errors.to_string()));
    }

    match state.accounts.login(&req.email, &req.password).await {
        Ok(account) => HttpResponse::Ok().json(AuthResponse {
            user_id: account.id,
            email: account.email,
        }),
        Err(e) => account_error_response(&e),
    }
}
