use std::collections::HashSet;
use std::sync::Arc;

use crate::core::{ActionLedger, EngineError};
use crate::models::{Profile, UserId};
use crate::services::ProfileStore;

/// Pick the next profile to show from `profiles`
///
/// Skips every profile owned by a user in `excluded`, then returns the most
/// recently updated one. Ties go to the smaller user id so the answer is
/// deterministic.
pub fn select_candidate<I>(profiles: I, excluded: &HashSet<UserId>) -> Option<Profile>
where
    I: IntoIterator<Item = Profile>,
{
    profiles
        .into_iter()
        .filter(|profile| !excluded.contains(&profile.user_id))
        .max_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| b.user_id.cmp(&a.user_id))
        })
}

/// Discovery candidate selection
///
/// The exclusion set is rebuilt from the ledger on every request:
/// O(decisions by the user + stored profiles). Decisions are final, so a
/// decided-upon target never comes back.
#[derive(Clone)]
pub struct DiscoverySelector {
    ledger: ActionLedger,
    profiles: Arc<dyn ProfileStore>,
}

impl DiscoverySelector {
    pub fn new(ledger: ActionLedger, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { ledger, profiles }
    }

    /// Next candidate for `user_id`, or `None` once the pool is exhausted
    pub async fn next_candidate(&self, user_id: &UserId) -> Result<Option<Profile>, EngineError> {
        let mut excluded: HashSet<UserId> = self
            .ledger
            .decided_targets(user_id)
            .await?
            .into_iter()
            .collect();
        excluded.insert(*user_id);

        let profiles = self.profiles.list_profiles().await?;
        let pool_size = profiles.len();
        let candidate = select_candidate(profiles, &excluded);

        tracing::debug!(
            "Discovery for {}: {} excluded, {} profiles, candidate={:?}",
            user_id,
            excluded.len(),
            pool_size,
            candidate.as_ref().map(|p| p.user_id)
        );

        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn profile(updated_offset_secs: i64) -> Profile {
        let base = Utc::now();
        Profile {
            user_id: UserId::new(),
            nickname: "Candidate".to_string(),
            bio: None,
            tags: vec![],
            photos: vec![],
            age: None,
            created_at: base,
            updated_at: base + Duration::seconds(updated_offset_secs),
        }
    }

    #[test]
    fn test_most_recently_updated_first() {
        let older = profile(0);
        let newer = profile(60);
        let expected = newer.user_id;

        let picked = select_candidate(vec![older, newer], &HashSet::new()).unwrap();
        assert_eq!(picked.user_id, expected);
    }

    #[test]
    fn test_excluded_profiles_skipped() {
        let older = profile(0);
        let newer = profile(60);
        let expected = older.user_id;
        let excluded: HashSet<UserId> = [newer.user_id].into_iter().collect();

        let picked = select_candidate(vec![older, newer], &excluded).unwrap();
        assert_eq!(picked.user_id, expected);
    }

    #[test]
    fn test_empty_pool_is_none() {
        let only = profile(0);
        let excluded: HashSet<UserId> = [only.user_id].into_iter().collect();

        assert!(select_candidate(vec![only], &excluded).is_none());
        assert!(select_candidate(Vec::new(), &HashSet::new()).is_none());
    }

    #[test]
    fn test_ties_break_on_user_id() {
        let mut a = profile(0);
        let mut b = profile(0);
        b.updated_at = a.updated_at;
        if b.user_id < a.user_id {
            std::mem::swap(&mut a, &mut b);
        }
        let expected = a.user_id;

        let picked = select_candidate(vec![b, a], &HashSet::new()).unwrap();
        assert_eq!(picked.user_id, expected);
    }
}
