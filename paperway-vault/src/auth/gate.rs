//! AuthGate — verifies credentials and reconstructs the request actor
//!
//! Verification is two-step with two distinct failure kinds:
//!
//! 1. cryptographic check of signature and expiry against the server secret
//!    (tamper/expiry concern) — fails with "You are not authenticated!";
//! 2. re-check that the claimed username *and* id still match a stored
//!    account (account-lifecycle concern, so a deleted user's token does not
//!    stay valid merely because its signature is intact) — fails with
//!    "Invalid user, you are not authenticated!".
//!
//! Both failures are terminal for the request; the caller must sign in again
//! rather than retry the same token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};

use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::types::{Actor, JwtClaims, RoleType, UserRecord};

/// Account-existence lookup the gate delegates to.
///
/// The stricter variant is canonical: a match requires both the username and
/// the user id from the verified claims.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_account(&self, username: &str, user_id: i64) -> Result<Option<UserRecord>>;
}

/// Select the raw token from its three carriers.
///
/// Precedence: body field, then query parameter, then header; the first
/// non-empty carrier wins and absence is an empty string.
pub fn token_from_carriers(
    body: Option<&str>,
    query: Option<&str>,
    header: Option<&str>,
) -> String {
    [body, query, header]
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Authentication gate — issues and verifies signed credentials.
///
/// Stateless apart from the injected secret and the single account-lookup
/// read; safe to share across tasks via `Arc`.
pub struct AuthGate {
    jwt_secret: String,
    token_expiry_days: i64,
    super_admin_name: String,
    directory: Arc<dyn AccountDirectory>,
}

impl AuthGate {
    pub fn new(config: &VaultConfig, directory: Arc<dyn AccountDirectory>) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_expiry_days: config.token_expiry_days,
            super_admin_name: config.super_admin_name.clone(),
            directory,
        }
    }

    /// Sign `{user_id, username, role}` into a credential string.
    ///
    /// Exact inverse of the verification step in [`authenticate`].
    ///
    /// [`authenticate`]: AuthGate::authenticate
    pub fn issue_token(&self, user: &UserRecord) -> Result<String> {
        let exp = (Utc::now() + Duration::days(self.token_expiry_days)).timestamp() as usize;
        let iat = Utc::now().timestamp() as usize;

        let claims = JwtClaims {
            sub: user.user_id,
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            exp,
            iat,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify a raw token and reconstruct the request [`Actor`].
    pub async fn authenticate(&self, raw_token: &str) -> Result<Actor> {
        let claims = decode::<JwtClaims>(
            raw_token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|err| {
            debug!(error = %err, "Token verification failed");
            VaultError::not_authenticated()
        })?
        .claims;

        let role = RoleType::parse(&claims.role).ok_or_else(|| {
            warn!(role = %claims.role, "Verified token carries an unknown role");
            VaultError::not_authenticated()
        })?;

        // Stale-token defense: the claimed identity must still exist.
        let account = self
            .directory
            .find_account(&claims.username, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(username = %claims.username, user_id = claims.sub, "Token references no stored account");
                VaultError::invalid_user()
            })?;

        Ok(Actor {
            user_id: claims.sub,
            username: claims.username,
            role,
            is_active: account.is_active,
        })
    }

    /// Two-factor admin guard: role Admin *and* the reserved account name.
    pub fn require_admin(&self, actor: &Actor) -> Result<()> {
        if actor.role == RoleType::Admin && actor.username == self.super_admin_name {
            Ok(())
        } else {
            Err(VaultError::access_denied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_precedence() {
        assert_eq!(
            token_from_carriers(Some("from-body"), Some("from-query"), Some("from-header")),
            "from-body"
        );
        assert_eq!(
            token_from_carriers(Some(""), Some("from-query"), Some("from-header")),
            "from-query"
        );
        assert_eq!(
            token_from_carriers(None, None, Some("from-header")),
            "from-header"
        );
    }

    #[test]
    fn test_carrier_absence_is_empty() {
        assert_eq!(token_from_carriers(None, None, None), "");
        assert_eq!(token_from_carriers(Some(""), Some(""), Some("")), "");
    }
}
