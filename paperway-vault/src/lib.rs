//! # Paperway Vault
//!
//! Document vault for Paperway — user accounts, signed credentials, and the
//! role/ownership access decision engine behind the document REST API.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │             paperway-vault                │
//! ├────────────────────┬──────────────────────┤
//! │     UserActor      │    DocumentActor     │
//! │  (sign-up/sign-in, │  (create, find,      │
//! │   accounts)        │   list, search, ...) │
//! ├──────────┬─────────┴─────────┬────────────┤
//! │ AuthGate │      policy       │            │
//! │ (tokens, │ (can_read/write,  │            │
//! │  actors) │  query criteria)  │            │
//! ├──────────┴───────────────────┴────────────┤
//! │               MemoryStore                 │
//! │   (accounts, documents, criteria exec)    │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paperway_vault::{
//!     AuthGate, DocumentActor, MemoryStore, RoleType, UserActor, VaultConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> paperway_vault::Result<()> {
//!     let config = VaultConfig::new().with_jwt_secret("my-production-secret");
//!     let store = Arc::new(MemoryStore::new());
//!     let gate = Arc::new(AuthGate::new(&config, store.clone()));
//!
//!     let users = UserActor::spawn(store.clone(), gate.clone());
//!     let documents = DocumentActor::spawn(store);
//!
//!     // Sign up → token
//!     let (token, _user) = users
//!         .sign_up("alice".into(), "alice@example.com".into(),
//!                  "SecureP@ss1".into(), RoleType::Fellow)
//!         .await?;
//!
//!     // Authenticate on each request, then consult the policy
//!     let actor = gate.authenticate(&token).await?;
//!     let _mine = documents.user_documents(actor.clone(), actor.user_id, None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Access policy in one paragraph
//!
//! A document carries an access tier: `Public`, `Private`, or a role name.
//! Private documents are readable by their owner and Admins; Public
//! documents by any active signed-in actor (anonymous or disabled actors get
//! an empty document back, not an error); role-tier documents by actors
//! holding that role, with Admin as the fallback. Updates go to the owner or
//! an Admin; deletes go to the owner only. Listing and search never touch
//! documents outside the actor's visible set — the policy builds the filter,
//! the store merely executes it.

pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod policy;
pub mod store;
pub mod types;
pub mod users;

// Re-exports for convenience
pub use auth::{token_from_carriers, AccountDirectory, AuthGate};
pub use config::VaultConfig;
pub use documents::{DocumentActor, DocumentHandle, DocumentSet};
pub use error::{Result, VaultError};
pub use policy::{
    build_list_filter, build_search_filter, can_delete, can_read, can_write, DocClause, ListScope,
    QueryCriteria, ReadGrant,
};
pub use store::MemoryStore;
pub use types::{
    AccessTier, Actor, Document, DocumentPatch, JwtClaims, Page, RoleType, UserPatch, UserRecord,
};
pub use users::{hash_password, UserActor, UserHandle};
