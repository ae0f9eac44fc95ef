//! User registry with argon2id password hashes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::db::models::UserSummary;
use crate::db::repo::UserRepo;
use crate::error::{QuizError, StoreError};

pub fn hash_password(password: &str) -> Result<String, QuizError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| QuizError::PasswordHash(e.to_string()))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("unreadable password hash: {e}");
            false
        }
    }
}

pub struct UsersManager<'a, R: ?Sized> {
    repo: &'a mut R,
}

impl<'a, R> UsersManager<'a, R>
where
    R: UserRepo + ?Sized,
{
    pub fn new(repo: &'a mut R) -> Self {
        UsersManager { repo }
    }

    pub async fn register(&mut self, username: &str, password: &str) -> Result<i64, QuizError> {
        let hash = hash_password(password)?;
        match self.repo.put_user(username, &hash).await? {
            Some(id) => {
                log::info!("registered user {id}");
                Ok(id)
            }
            None => Err(QuizError::UserExists(username.to_string())),
        }
    }

    /// Inactive users never verify.
    pub async fn verify(&mut self, username: &str, password: &str) -> Result<bool, StoreError> {
        let Some(user) = self.repo.user_by_username(username).await? else {
            return Ok(false);
        };
        Ok(user.active && verify_password(password, &user.password))
    }

    pub async fn list(&mut self) -> Result<Vec<UserSummary>, StoreError> {
        self.repo.list_users().await
    }

    pub async fn remove(&mut self, id: i64) -> Result<u64, StoreError> {
        self.repo.remove_user(id).await
    }
}
