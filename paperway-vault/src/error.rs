//! Error types for paperway-vault — Railway Programming
//!
//! All operations return `Result<T, VaultError>`.
//! No panics, no unwraps in production code paths.
//!
//! The soft denial for anonymous reads of Public documents is deliberately
//! *not* an error variant — it is a value (`ReadGrant::Empty`) so callers can
//! tell it apart from "document not found".

use thiserror::Error;

/// Unified error type for all vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    // ─── Authentication Errors ───

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled: {0}")]
    AccountDisabled(String),

    #[error("Token invalid: {0}")]
    TokenInvalid(String),

    // ─── Access Errors ───

    #[error("{0}")]
    AccessDenied(String),

    // ─── User Errors ───

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("No new value to update user!")]
    NothingToUpdateUser,

    // ─── Document Errors ───

    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("Document already exist!")]
    DocumentAlreadyExists(String),

    #[error("No new value to update document!")]
    NothingToUpdate,

    // ─── Infrastructure Errors ───

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Denial for tokens that fail signature or expiry verification
    pub fn not_authenticated() -> Self {
        Self::Unauthenticated("You are not authenticated!".into())
    }

    /// Denial for verified tokens whose account no longer exists
    pub fn invalid_user() -> Self {
        Self::Unauthenticated("Invalid user, you are not authenticated!".into())
    }

    /// The generic hard denial
    pub fn access_denied() -> Self {
        Self::AccessDenied("Access denied!".into())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for VaultError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        VaultError::TokenInvalid(err.to_string())
    }
}

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;
