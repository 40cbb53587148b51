use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Decision, NewProfile, ProfileChanges, UserId};

/// Signup payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Create-or-replace profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDetailsRequest {
    pub user_id: UserId,
    pub nickname: String,
    #[serde(default = "default_bio")]
    pub bio: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

fn default_bio() -> Option<String> {
    Some(String::new())
}

impl From<ProfileDetailsRequest> for NewProfile {
    fn from(req: ProfileDetailsRequest) -> Self {
        Self {
            user_id: req.user_id,
            nickname: req.nickname,
            bio: req.bio,
            tags: req.tags,
            photos: req.photos,
            age: req.age,
        }
    }
}

/// Partial profile update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    #[serde(default)]
    pub age: Option<i32>,
}

impl ProfileUpdateRequest {
    pub fn changes(&self) -> ProfileChanges {
        ProfileChanges {
            nickname: self.nickname.clone(),
            bio: self.bio.clone(),
            tags: self.tags.clone(),
            photos: self.photos.clone(),
            age: self.age,
        }
    }
}

/// Like/dislike submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub user_id: UserId,
    pub target_id: UserId,
    pub action: Decision,
}

/// Outgoing chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub user_id: UserId,
    pub peer_id: UserId,
    pub text: String,
}

/// `?user_id=` query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub user_id: UserId,
}

/// `?user_id=&peer_id=&limit=` query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationQuery {
    pub user_id: UserId,
    pub peer_id: UserId,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_request_rejects_unknown_action() {
        let json = format!(
            r#"{{"user_id":"{}","target_id":"{}","action":"superlike"}}"#,
            UserId::new(),
            UserId::new()
        );
        assert!(serde_json::from_str::<DecisionRequest>(&json).is_err());
    }

    #[test]
    fn test_profile_details_defaults() {
        let json = format!(r#"{{"user_id":"{}","nickname":"Kai"}}"#, UserId::new());
        let req: ProfileDetailsRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.bio.as_deref(), Some(""));
        assert!(req.tags.is_empty());
        assert!(req.age.is_none());
    }

    #[test]
    fn test_signup_validation() {
        let bad = SignupRequest {
            email: "nope".to_string(),
            password: "secret".to_string(),
        };
        assert!(bad.validate().is_err());

        let good = SignupRequest {
            email: "kai@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(good.validate().is_ok());
    }
}
