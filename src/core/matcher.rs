use crate::core::{ActionLedger, EngineError};
use crate::models::{Decision, UserId};

/// Mutual-like detection over the ledger
///
/// Matches are never stored; every answer is computed from the two ledger
/// directions at call time, so a later dislike breaks a match immediately.
#[derive(Clone)]
pub struct MatchDetector {
    ledger: ActionLedger,
}

impl MatchDetector {
    pub fn new(ledger: ActionLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    /// True when both users currently like each other
    pub async fn is_match(&self, user_a: &UserId, user_b: &UserId) -> Result<bool, EngineError> {
        if self.ledger.get_decision(user_a, user_b).await? != Some(Decision::Like) {
            return Ok(false);
        }
        Ok(self.ledger.get_decision(user_b, user_a).await? == Some(Decision::Like))
    }

    /// Record a like and report whether the pair is now matched
    ///
    /// The reciprocal direction is read only after the like is committed, so
    /// of two simultaneous reciprocal likes at least one observes the match.
    pub async fn record_like_and_check_match(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
    ) -> Result<bool, EngineError> {
        self.ledger
            .record_decision(actor_id, target_id, Decision::Like)
            .await?;

        let matched = self.is_match(actor_id, target_id).await?;
        if matched {
            tracing::info!("Match established: {} <-> {}", actor_id, target_id);
        }

        Ok(matched)
    }

    /// Record any decision; returns the post-write match status for a like
    /// and `false` for a dislike
    pub async fn submit_decision(
        &self,
        actor_id: &UserId,
        target_id: &UserId,
        decision: Decision,
    ) -> Result<bool, EngineError> {
        match decision {
            Decision::Like => self.record_like_and_check_match(actor_id, target_id).await,
            Decision::Dislike => {
                self.ledger
                    .record_decision(actor_id, target_id, Decision::Dislike)
                    .await?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;
    use std::sync::Arc;

    fn detector() -> MatchDetector {
        MatchDetector::new(ActionLedger::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_second_like_matches() {
        let detector = detector();
        let a = UserId::new();
        let b = UserId::new();

        assert!(!detector.record_like_and_check_match(&a, &b).await.unwrap());
        assert!(detector.record_like_and_check_match(&b, &a).await.unwrap());
        assert!(detector.is_match(&a, &b).await.unwrap());
        assert!(detector.is_match(&b, &a).await.unwrap());
    }

    #[tokio::test]
    async fn test_dislike_breaks_match() {
        let detector = detector();
        let a = UserId::new();
        let b = UserId::new();

        detector.record_like_and_check_match(&a, &b).await.unwrap();
        detector.record_like_and_check_match(&b, &a).await.unwrap();

        assert!(!detector.submit_decision(&a, &b, Decision::Dislike).await.unwrap());
        assert!(!detector.is_match(&a, &b).await.unwrap());
        assert!(!detector.is_match(&b, &a).await.unwrap());
    }

    #[tokio::test]
    async fn test_one_sided_like_is_not_match() {
        let detector = detector();
        let a = UserId::new();
        let b = UserId::new();

        detector.submit_decision(&a, &b, Decision::Like).await.unwrap();
        detector.submit_decision(&b, &a, Decision::Dislike).await.unwrap();

        assert!(!detector.is_match(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_reciprocal_likes_detect_match() {
        let detector = detector();
        let a = UserId::new();
        let b = UserId::new();

        let (left, right) = tokio::join!(
            detector.record_like_and_check_match(&a, &b),
            detector.record_like_and_check_match(&b, &a),
        );

        assert!(left.unwrap() || right.unwrap());
        assert!(detector.is_match(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_self_like_rejected() {
        let detector = detector();
        let a = UserId::new();

        let result = detector.record_like_and_check_match(&a, &a).await;
        assert!(matches!(result, Err(EngineError::InvalidAction(_))));
    }
}
