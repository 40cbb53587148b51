use actix_web::{web, HttpResponse, Responder};

use crate::models::{DecisionRequest, DecisionResponse, NewProfile, NextProfileResponse, ProfileDetailsRequest, ProfileUpdateRequest, UserQuery};
use crate::routes::{engine_error_response, error_body, AppState};
use crate::services::StoreError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profile/details", web::post().to(upsert_profile))
        .route("/profile/me", web::get().to(get_my_profile))
        .route("/profile/update", web::post().to(update_profile))
        .route("/profiles/next", web::get().to(next_profile))
        .route("/profiles/like", web::post().to(submit_decision));
}

fn store_error_response(err: &StoreError) -> HttpResponse {
    tracing::error!("Profile storage failure: {}", err);
    HttpResponse::ServiceUnavailable()
        .insert_header(("Retry-After", "1"))
        .json(error_body(503, "Storage unavailable", err.to_string()))
}

/// Create or replace a profile
///
/// POST /api/v1/profile/details
async fn upsert_profile(
    state: web::Data<AppState>,
    req: web::Json<ProfileDetailsRequest>,
) -> impl Responder {
    let profile = NewProfile::from(req.into_inner());

    match state.storage.profiles.upsert_profile(&profile).await {
        Ok(stored) => {
            tracing::debug!("Stored profile for {}", stored.user_id);
            HttpResponse::Ok().json(stored)
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/v1/profile/me?user_id={user_id}
async fn get_my_profile(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    match state.storage.profiles.get_profile(&query.user_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(error_body(404, "Not found", "Profile not found")),
        Err(e) => store_error_response(&e),
    }
}

/// Partial profile update
///
/// POST /api/v1/profile/update
async fn update_profile(
    state: web::Data<AppState>,
    req: web::Json<ProfileUpdateRequest>,
) -> impl Responder {
    let changes = req.changes();
    if changes.is_empty() {
        return HttpResponse::BadRequest().json(error_body(400, "Validation failed", "No changes provided"));
    }

    match state.storage.profiles.update_profile(&req.user_id, &changes).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(error_body(404, "Not found", "Profile not found")),
        Err(e) => store_error_response(&e),
    }
}

/// Next discovery candidate
///
/// GET /api/v1/profiles/next?user_id={user_id}
///
/// Returns a profile, or `{"message": "No more profiles"}` once every other
/// user has been decided upon.
async fn next_profile(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    match state.engine.next_candidate(&query.user_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(NextProfileResponse::Candidate(profile)),
        Ok(None) => {
            tracing::info!("Discovery pool exhausted for {}", query.user_id);
            HttpResponse::Ok().json(NextProfileResponse::exhausted())
        }
        Err(e) => engine_error_response(&e),
    }
}

/// Record a like or dislike
///
/// POST /api/v1/profiles/like
///
/// Request body:
/// ```json
/// {
///   "user_id": "uuid",
///   "target_id": "uuid",
///   "action": "like|dislike"
/// }
/// ```
async fn submit_decision(
    state: web::Data<AppState>,
    req: web::Json<DecisionRequest>,
) -> impl Responder {
    match state
        .engine
        .submit_decision(&req.user_id, &req.target_id, req.action)
        .await
    {
        Ok(matched) => HttpResponse::Ok().json(DecisionResponse { matched }),
        Err(e) => engine_error_response(&e),
    }
}
