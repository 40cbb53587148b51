// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Account, ActionRecord, Decision, Message, NewProfile, Profile, ProfileChanges, UserId};
pub use requests::{ConversationQuery, DecisionRequest, LoginRequest, ProfileDetailsRequest, ProfileUpdateRequest, SendMessageRequest, SignupRequest, UserQuery};
pub use responses::{AuthResponse, DecisionResponse, ErrorResponse, HealthResponse, MessageResponse, NextProfileResponse};
