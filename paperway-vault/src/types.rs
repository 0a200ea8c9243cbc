//! Vault domain types — RoleType, AccessTier, UserRecord, Document, Actor
//!
//! Serializable, cloneable, and cheap to pass around.

use serde::{Deserialize, Serialize};

/// Role tiers assigned to user accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleType {
    Admin,
    SuperAdmin,
    Fellow,
    Learning,
    Devops,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::SuperAdmin => "SuperAdmin",
            Self::Fellow => "Fellow",
            Self::Learning => "Learning",
            Self::Devops => "Devops",
        }
    }

    /// Parse a role from its wire string. Unknown strings are not a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Self::Admin),
            "SuperAdmin" => Some(Self::SuperAdmin),
            "Fellow" => Some(Self::Fellow),
            "Learning" => Some(Self::Learning),
            "Devops" => Some(Self::Devops),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access tier attached to a document.
///
/// `Public` and `Private` are the two literal tiers; everything else is a
/// role tier whose readers are exactly the actors holding that role (plus
/// the fallback rules in the decision engine). On the wire this is a single
/// string: `"Public"`, `"Private"`, or the role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AccessTier {
    Public,
    Private,
    Role(RoleType),
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Role(role) => role.as_str(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Public" => Some(Self::Public),
            "Private" => Some(Self::Private),
            other => RoleType::parse(other).map(Self::Role),
        }
    }
}

impl From<AccessTier> for String {
    fn from(tier: AccessTier) -> Self {
        tier.as_str().to_string()
    }
}

impl TryFrom<String> for AccessTier {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        AccessTier::parse(&s).ok_or_else(|| format!("unknown access tier: {s}"))
    }
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record — account data as held by the user store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: RoleType,
    pub is_active: bool,
    pub created_at: String,
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub access: AccessTier,
    pub owner_id: i64,
    pub created_at: String,
}

/// Partial update for a document. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub access: Option<AccessTier>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.access.is_none()
    }
}

/// Partial update for a user account. Unset fields keep their stored value.
///
/// A set `password` arrives in the clear and is hashed before storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// The authenticated identity behind one request.
///
/// Reconstructed from a verified credential on every request and discarded
/// afterwards; never persisted. `is_active` comes from the stored account at
/// verification time, not from the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
    pub role: RoleType,
    pub is_active: bool,
}

/// JWT claims for issued credentials
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user id)
    pub sub: i64,
    /// Username
    pub username: String,
    /// Role string
    pub role: String,
    /// Expiry (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Pagination window applied after access filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}
