//! Single-document decisions — read, update, delete
//!
//! Read precedence: Private, then Public, then matching role tier, then the
//! Admin-only fallback. The Public branch soft-denies anonymous or inactive
//! actors with an empty grant instead of an error; callers must keep that
//! distinguishable from "document not found".

use crate::error::{Result, VaultError};
use crate::types::{AccessTier, Actor, Document, RoleType};

/// Outcome of a permitted read.
///
/// `Empty` is the soft denial: the request was authorized to *ask*, but the
/// actor is anonymous or inactive, so a Public document comes back blank.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadGrant {
    Document(Document),
    Empty,
}

/// Decide whether `actor` may read `doc`.
pub fn can_read(actor: &Actor, doc: &Document) -> Result<ReadGrant> {
    match doc.access {
        AccessTier::Private => {
            if actor.user_id == doc.owner_id || actor.role == RoleType::Admin {
                Ok(ReadGrant::Document(doc.clone()))
            } else {
                Err(VaultError::access_denied())
            }
        }
        AccessTier::Public => {
            if actor.user_id > 0 && actor.is_active {
                Ok(ReadGrant::Document(doc.clone()))
            } else {
                Ok(ReadGrant::Empty)
            }
        }
        AccessTier::Role(tier) if tier == actor.role => Ok(ReadGrant::Document(doc.clone())),
        // Tier differs from the actor's own role: Admin only.
        AccessTier::Role(_) => {
            if actor.role == RoleType::Admin {
                Ok(ReadGrant::Document(doc.clone()))
            } else {
                Err(VaultError::access_denied())
            }
        }
    }
}

/// Decide whether `actor` may update `doc`: owner or Admin.
pub fn can_write(actor: &Actor, doc: &Document) -> Result<()> {
    if actor.user_id == doc.owner_id || actor.role == RoleType::Admin {
        Ok(())
    } else {
        Err(VaultError::AccessDenied("Restricted document!".into()))
    }
}

/// Decide whether `actor` may delete `doc`: owner only.
///
/// Unlike update and read, there is no Admin override here; delete stays
/// strictly owner-scoped.
pub fn can_delete(actor: &Actor, doc: &Document) -> Result<()> {
    if actor.user_id == doc.owner_id {
        Ok(())
    } else {
        Err(VaultError::access_denied())
    }
}
