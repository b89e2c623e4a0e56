//! Salted-hash credential verifier over the user repository.
//!
//! The domain treats credential handling as an opaque capability; this
//! adapter implements it locally with per-user random salts and SHA-256.
//! Lookup failures and bad passwords collapse into one `InvalidCredentials`
//! answer so login responses do not reveal which half was wrong.

use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::domain::auth::{CredentialRecord, Credentials, Identity, RegistrationDetails};
use crate::domain::ports::{
    CredentialError, CredentialVerifier, IdentityField, RepositoryError, UserRepository,
};
use crate::domain::user::{User, UserId};

const SALT_LEN: usize = 16;

fn map_repository_error(error: RepositoryError) -> CredentialError {
    CredentialError::backend(format!("user repository failure: {error}"))
}

fn digest_password(salt_hex: &str, password: &str) -> Result<String, CredentialError> {
    let salt = hex::decode(salt_hex)
        .map_err(|error| CredentialError::backend(format!("malformed salt: {error}")))?;
    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Credential verifier backed by salted SHA-256 records in the user store.
#[derive(Clone)]
pub struct Sha256CredentialVerifier {
    users: Arc<dyn UserRepository>,
}

impl Sha256CredentialVerifier {
    /// Create a verifier over the given user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    fn mint_record(password: &str) -> Result<CredentialRecord, CredentialError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt_hex = hex::encode(salt);
        let hash = digest_password(&salt_hex, password)?;
        Ok(CredentialRecord {
            salt: salt_hex,
            hash,
        })
    }
}

#[async_trait]
impl CredentialVerifier for Sha256CredentialVerifier {
    async fn register(&self, details: &RegistrationDetails) -> Result<User, CredentialError> {
        if self
            .users
            .find_by_email(details.email())
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(CredentialError::duplicate(IdentityField::Email));
        }
        if self
            .users
            .find_by_username(details.username())
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(CredentialError::duplicate(IdentityField::Username));
        }

        let user = User::new(
            UserId::random(),
            details.username().clone(),
            details.email().clone(),
        );
        let record = Self::mint_record(details.password())?;
        self.users
            .insert(&user, &record)
            .await
            .map_err(map_repository_error)?;
        Ok(user)
    }

    async fn verify(&self, credentials: &Credentials) -> Result<Identity, CredentialError> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?
            .ok_or(CredentialError::InvalidCredentials)?;

        let record = match self
            .users
            .credential_for(user.id())
            .await
            .map_err(map_repository_error)?
        {
            Some(record) => record,
            None => {
                warn!(user = %user.id(), "no credential record for stored user");
                return Err(CredentialError::InvalidCredentials);
            }
        };

        let candidate = digest_password(&record.salt, credentials.password())?;
        if candidate == record.hash {
            Ok(Identity::from(&user))
        } else {
            Err(CredentialError::InvalidCredentials)
        }
    }
}
