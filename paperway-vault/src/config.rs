//! Configuration for the Paperway vault

/// Vault configuration
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// JWT secret for token signing
    pub jwt_secret: String,

    /// Token expiry in days
    pub token_expiry_days: i64,

    /// Reserved super-administrator account name.
    ///
    /// `require_admin` passes only for an Admin holding exactly this
    /// username; an ordinary Admin account is not enough.
    pub super_admin_name: String,
}

impl VaultConfig {
    /// Create config with sensible defaults.
    ///
    /// The JWT secret falls back to `PAPERWAY_JWT_SECRET` from the
    /// environment; override it in production via [`with_jwt_secret`].
    ///
    /// [`with_jwt_secret`]: VaultConfig::with_jwt_secret
    pub fn new() -> Self {
        Self {
            jwt_secret: std::env::var("PAPERWAY_JWT_SECRET")
                .unwrap_or_else(|_| "paperway-vault-default-secret-change-me".to_string()),
            token_expiry_days: 7,
            super_admin_name: "touchstone".to_string(),
        }
    }

    /// Override JWT secret
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Override token expiry
    pub fn with_token_expiry_days(mut self, days: i64) -> Self {
        self.token_expiry_days = days;
        self
    }

    /// Override the reserved super-administrator account name
    pub fn with_super_admin_name(mut self, name: impl Into<String>) -> Self {
        self.super_admin_name = name.into();
        self
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = VaultConfig::new();
        assert_eq!(cfg.token_expiry_days, 7);
        assert_eq!(cfg.super_admin_name, "touchstone");
    }

    #[test]
    fn test_builder_pattern() {
        let cfg = VaultConfig::new()
            .with_jwt_secret("my-secret")
            .with_token_expiry_days(30)
            .with_super_admin_name("overseer");

        assert_eq!(cfg.jwt_secret, "my-secret");
        assert_eq!(cfg.token_expiry_days, 30);
        assert_eq!(cfg.super_admin_name, "overseer");
    }
}
