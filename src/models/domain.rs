use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque user identity, issued once at signup and stable for the user's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Issue a fresh identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A user's directional verdict on another user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "decision", rename_all = "lowercase")]
pub enum Decision {
    Like,
    Dislike,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Like => "like",
            Decision::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(Decision::Like),
            "dislike" => Ok(Decision::Dislike),
            other => Err(format!("unknown decision '{}', expected like or dislike", other)),
        }
    }
}

/// Ledger entry; exactly one per ordered (actor, target) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub actor_id: UserId,
    pub target_id: UserId,
    pub decision: Decision,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// True when the message belongs to the conversation between `a` and `b`,
    /// whichever side sent it
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (self.sender_id == *a && self.receiver_id == *b)
            || (self.sender_id == *b && self.receiver_id == *a)
    }
}

/// Public profile shown in discovery and chat lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub nickname: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full profile payload for create-or-replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub user_id: UserId,
    pub nickname: String,
    pub bio: Option<String>,
    pub tags: Vec<String>,
    pub photos: Vec<String>,
    pub age: Option<i32>,
}

/// Partial profile update; `None` leaves the stored field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub tags: Option<Vec<String>>,
    pub photos: Option<Vec<String>>,
    pub age: Option<i32>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.bio.is_none()
            && self.tags.is_none()
            && self.photos.is_none()
            && self.age.is_none()
    }

    /// Apply the present fields onto `profile`
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(nickname) = &self.nickname {
            profile.nickname = nickname.clone();
        }
        if let Some(bio) = &self.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(tags) = &self.tags {
            profile.tags = tags.clone();
        }
        if let Some(photos) = &self.photos {
            profile.photos = photos.clone();
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
    }
}

/// Login credentials as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub email: String,
    /// argon2id PHC string; carries its own salt and parameters
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parsing() {
        assert_eq!("like".parse::<Decision>().unwrap(), Decision::Like);
        assert_eq!("DISLIKE".parse::<Decision>().unwrap(), Decision::Dislike);
        assert!("superlike".parse::<Decision>().is_err());
    }

    #[test]
    fn test_decision_serializes_lowercase() {
        let json = serde_json::to_string(&Decision::Dislike).unwrap();
        assert_eq!(json, "\"dislike\"");
    }

    #[test]
    fn test_user_id_rejects_malformed() {
        assert!("not-an-id".parse::<UserId>().is_err());
        let id = UserId::new();
        assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn test_message_is_between_either_direction() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: b,
            receiver_id: a,
            text: "hey".to_string(),
            created_at: Utc::now(),
        };

        assert!(message.is_between(&a, &b));
        assert!(message.is_between(&b, &a));
        assert!(!message.is_between(&a, &c));
    }

    #[test]
    fn test_profile_changes_apply() {
        let now = Utc::now();
        let mut profile = Profile {
            user_id: UserId::new(),
            nickname: "Sam".to_string(),
            bio: None,
            tags: vec!["hiking".to_string()],
            photos: vec![],
            age: Some(29),
            created_at: now,
            updated_at: now,
        };

        let changes = ProfileChanges {
            bio: Some("Coffee first".to_string()),
            age: Some(30),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply_to(&mut profile);

        assert_eq!(profile.nickname, "Sam");
        assert_eq!(profile.bio.as_deref(), Some("Coffee first"));
        assert_eq!(profile.tags, vec!["hiking".to_string()]);
        assert_eq!(profile.age, Some(30));
        assert!(ProfileChanges::default().is_empty());
    }
}
