// Unit tests for Roomance

use chrono::{Duration, Utc};
use roomance::core::select_candidate;
use roomance::models::{Decision, NextProfileResponse, Profile, UserId};
use std::collections::HashSet;

fn profile_updated_at(offset_secs: i64) -> Profile {
    let base = Utc::now();
    Profile {
        user_id: UserId::new(),
        nickname: format!("User {}", offset_secs),
        bio: None,
        tags: vec!["music".to_string()],
        photos: vec![],
        age: Some(30),
        created_at: base,
        updated_at: base + Duration::seconds(offset_secs),
    }
}

#[test]
fn test_select_candidate_consumes_pool_in_recency_order() {
    let profiles: Vec<Profile> = (0..5).map(|i| profile_updated_at(i * 10)).collect();
    let mut expected: Vec<UserId> = profiles.iter().map(|p| p.user_id).collect();
    expected.reverse();

    let mut excluded = HashSet::new();
    let mut seen = Vec::new();
    while let Some(candidate) = select_candidate(profiles.clone(), &excluded) {
        excluded.insert(candidate.user_id);
        seen.push(candidate.user_id);
    }

    assert_eq!(seen, expected);
}

#[test]
fn test_select_candidate_respects_exclusions() {
    let profiles: Vec<Profile> = (0..3).map(profile_updated_at).collect();
    let excluded: HashSet<UserId> = profiles.iter().map(|p| p.user_id).collect();

    assert!(select_candidate(profiles, &excluded).is_none());
}

#[test]
fn test_decision_wire_format() {
    assert_eq!(serde_json::to_value(Decision::Like).unwrap(), "like");
    let parsed: Decision = serde_json::from_value(serde_json::json!("dislike")).unwrap();
    assert_eq!(parsed, Decision::Dislike);
}

#[test]
fn test_exhausted_discovery_response_shape() {
    let json = serde_json::to_value(NextProfileResponse::exhausted()).unwrap();
    assert_eq!(json, serde_json::json!({ "message": "No more profiles" }));
}

#[test]
fn test_candidate_discovery_response_is_bare_profile() {
    let profile = profile_updated_at(0);
    let user_id = profile.user_id;

    let json = serde_json::to_value(NextProfileResponse::Candidate(profile)).unwrap();
    assert_eq!(json["user_id"], serde_json::json!(user_id.to_string()));
    assert_eq!(json["nickname"], "User 0");
}
