//! Authentication value objects: credentials, registration, session identity.
//!
//! Payload parsing stays in the inbound layer; these types carry inputs that
//! already passed shape validation into the credential verifier port.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::user::{Email, User, UserId, Username};

/// Login credentials as submitted to the verifier.
///
/// The password retains caller-provided whitespace to avoid surprising
/// credential comparisons, and is zeroed on drop.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Bundle a username with its raw password.
    pub fn new(username: Username, password: impl Into<String>) -> Self {
        Self {
            username,
            password: Zeroizing::new(password.into()),
        }
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Raw password for verification.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload handed to the credential verifier.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    email: Email,
    username: Username,
    password: Zeroizing<String>,
}

impl RegistrationDetails {
    /// Bundle the registration fields.
    pub fn new(email: Email, username: Username, password: impl Into<String>) -> Self {
        Self {
            email,
            username,
            password: Zeroizing::new(password.into()),
        }
    }

    /// Contact address to register.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Login name to register.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Raw password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Salted credential hash stored alongside a user record.
///
/// Opaque to everything except the verifier adapter that minted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub salt: String,
    pub hash: String,
}

/// Resolved session principal.
///
/// Serialisable so the session cookie can round-trip it between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: UserId,
    username: Username,
}

impl Identity {
    /// Build an identity from its components.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Acting user's identifier, compared against resource authors.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Acting user's login name, used in greetings and page chrome.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::new(*user.id(), user.username().clone())
    }
}
