use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::Arc;
use thiserror::Error;

use crate::models::Account;
use crate::services::store::{AccountStore, StoreError};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Signup and credential check on top of an `AccountStore`
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let hash = hash_password(password)?;

        let account = self
            .store
            .create_account(email, &hash)
            .await?
            .ok_or(AccountError::EmailTaken)?;

        tracing::info!("Registered account {}", account.id);
        Ok(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let account = self
            .store
            .find_account_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            tracing::debug!("Password mismatch for account {}", account.id);
            return Err(AccountError::InvalidCredentials);
        }

        Ok(account)
    }
}

/// Hash a plain password with argon2id into a PHC string
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC string. Unparseable hashes never
/// verify.
fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;

    #[test]
    fn test_hash_is_salted_phc_string() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
        assert!(!verify_password("hunter3", &a));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("pw", "not-a-phc-string"));
        assert!(!verify_password("pw", ""));
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let service = AccountService::new(Arc::new(MemoryStore::new()));

        let account = service.signup("lee@example.com", "pw").await.unwrap();
        assert_ne!(account.password_hash, "pw");
        assert!(account.password_hash.starts_with("$argon2id$"));

        let logged_in = service.login("lee@example.com", "pw").await.unwrap();
        assert_eq!(logged_in.id, account.id);

        assert!(matches!(
            service.login("lee@example.com", "wrong").await,
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody@example.com", "pw").await,
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            service.signup("lee@example.com", "other").await,
            Err(AccountError::EmailTaken)
        ));
    }
}
