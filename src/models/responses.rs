use serde::{Deserialize, Serialize};
use crate::models::domain::{Profile, UserId};

/// Signup/login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    pub email: String,
}

/// Result of a like/dislike submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub matched: bool,
}

/// Discovery response: a profile, or a marker that the pool is exhausted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextProfileResponse {
    Candidate(Profile),
    Exhausted { message: String },
}

impl NextProfileResponse {
    pub fn exhausted() -> Self {
        NextProfileResponse::Exhausted {
            message: "No more profiles".to_string(),
        }
    }
}

/// Plain message body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
