//! UserActor — Tokio actor for account operations
//!
//! All operations are processed sequentially via an mpsc channel, keeping
//! account writes serializable while reads stay concurrent through the
//! shared [`MemoryStore`].

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::auth::AuthGate;
use crate::error::{Result, VaultError};
use crate::store::MemoryStore;
use crate::types::{Actor, Page, RoleType, UserPatch, UserRecord};

/// Hash a password for storage with Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VaultError::Internal(e.to_string()))?
        .to_string();
    Ok(hash)
}

// ─── Actor Messages ───

enum UserMsg {
    SignUp {
        username: String,
        email: String,
        password: String,
        role: RoleType,
        reply: oneshot::Sender<Result<(String, UserRecord)>>,
    },
    SignIn {
        username: String,
        password: String,
        reply: oneshot::Sender<Result<(String, UserRecord)>>,
    },
    FindUser {
        user_id: i64,
        reply: oneshot::Sender<Option<UserRecord>>,
    },
    AllUsers {
        reply: oneshot::Sender<Vec<UserRecord>>,
    },
    UpdateUser {
        actor: Actor,
        user_id: i64,
        patch: UserPatch,
        reply: oneshot::Sender<Result<UserRecord>>,
    },
    SearchUsers {
        query: String,
        page: Option<Page>,
        reply: oneshot::Sender<(usize, Vec<UserRecord>)>,
    },
    DeleteUser {
        actor: Actor,
        user_id: i64,
        reply: oneshot::Sender<Result<UserRecord>>,
    },
}

// ─── Actor ───

/// Account actor — processes user operations sequentially
pub struct UserActor {
    store: Arc<MemoryStore>,
    gate: Arc<AuthGate>,
    rx: mpsc::Receiver<UserMsg>,
}

impl UserActor {
    /// Spawn the user actor and return a handle for sending messages
    pub fn spawn(store: Arc<MemoryStore>, gate: Arc<AuthGate>) -> UserHandle {
        let (tx, rx) = mpsc::channel(256);
        let actor = Self { store, gate, rx };

        tokio::spawn(actor.run());
        info!("UserActor spawned");
        UserHandle { tx }
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                UserMsg::SignUp { username, email, password, role, reply } => {
                    let _ = reply.send(self.handle_sign_up(username, email, password, role).await);
                }
                UserMsg::SignIn { username, password, reply } => {
                    let _ = reply.send(self.handle_sign_in(&username, &password).await);
                }
                UserMsg::FindUser { user_id, reply } => {
                    let _ = reply.send(self.store.find_user(user_id).await);
                }
                UserMsg::AllUsers { reply } => {
                    let _ = reply.send(self.store.all_users().await);
                }
                UserMsg::UpdateUser { actor, user_id, patch, reply } => {
                    let _ = reply.send(self.handle_update(&actor, user_id, patch).await);
                }
                UserMsg::SearchUsers { query, page, reply } => {
                    let _ = reply.send(self.store.search_users(&query, page).await);
                }
                UserMsg::DeleteUser { actor, user_id, reply } => {
                    let _ = reply.send(self.handle_delete(&actor, user_id).await);
                }
            }
        }
        info!("UserActor stopped");
    }

    // ─── Handler Implementations ───

    async fn handle_sign_up(
        &self,
        username: String,
        email: String,
        password: String,
        role: RoleType,
    ) -> Result<(String, UserRecord)> {
        // Admin tiers are never self-assigned at sign-up.
        if matches!(role, RoleType::Admin | RoleType::SuperAdmin) {
            return Err(VaultError::AccessDenied("Invalid role!".into()));
        }

        let password_hash = hash_password(&password)?;

        let user = self
            .store
            .insert_user(username, email, role, password_hash)
            .await?;

        let token = self.gate.issue_token(&user)?;
        info!(user_id = user.user_id, username = %user.username, role = %user.role, "User registered");
        Ok((token, user))
    }

    async fn handle_sign_in(&self, username: &str, password: &str) -> Result<(String, UserRecord)> {
        let (user, stored_hash) = self
            .store
            .find_user_by_username(username)
            .await
            .ok_or(VaultError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&stored_hash)
            .map_err(|e| VaultError::Internal(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| VaultError::InvalidCredentials)?;

        if !user.is_active {
            warn!(username, "Sign-in attempt on disabled account");
            return Err(VaultError::AccountDisabled(username.to_string()));
        }

        let token = self.gate.issue_token(&user)?;
        info!(username, "Sign-in successful");
        Ok((token, user))
    }

    async fn handle_update(
        &self,
        actor: &Actor,
        user_id: i64,
        patch: UserPatch,
    ) -> Result<UserRecord> {
        // Self-update, or the reserved super-administrator.
        if actor.user_id != user_id {
            self.gate.require_admin(actor)?;
        }
        if patch.is_empty() {
            return Err(VaultError::NothingToUpdateUser);
        }

        let password_hash = match &patch.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let updated = self
            .store
            .update_user(user_id, patch.username, patch.email, password_hash)
            .await?;
        info!(user_id, by = actor.user_id, "User updated");
        Ok(updated)
    }

    async fn handle_delete(&self, actor: &Actor, user_id: i64) -> Result<UserRecord> {
        // Self-removal, or the reserved super-administrator.
        if actor.user_id != user_id {
            self.gate.require_admin(actor)?;
        }
        let removed = self.store.remove_user(user_id).await?;
        info!(user_id, by = actor.user_id, "User removed");
        Ok(removed)
    }
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to communicate with the UserActor
#[derive(Clone)]
pub struct UserHandle {
    tx: mpsc::Sender<UserMsg>,
}

impl UserHandle {
    pub async fn sign_up(
        &self,
        username: String,
        email: String,
        password: String,
        role: RoleType,
    ) -> Result<(String, UserRecord)> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(UserMsg::SignUp { username, email, password, role, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("UserActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("UserActor dropped".into()))?
    }

    pub async fn sign_in(&self, username: String, password: String) -> Result<(String, UserRecord)> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(UserMsg::SignIn { username, password, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("UserActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("UserActor dropped".into()))?
    }

    pub async fn find_user(&self, user_id: i64) -> Option<UserRecord> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(UserMsg::FindUser { user_id, reply }).await.ok()?;
        rx.await.ok()?
    }

    pub async fn all_users(&self) -> Vec<UserRecord> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(UserMsg::AllUsers { reply }).await.is_err() {
            return vec![];
        }
        rx.await.unwrap_or_default()
    }

    pub async fn update_user(
        &self,
        actor: Actor,
        user_id: i64,
        patch: UserPatch,
    ) -> Result<UserRecord> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(UserMsg::UpdateUser { actor, user_id, patch, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("UserActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("UserActor dropped".into()))?
    }

    pub async fn search_users(&self, query: String, page: Option<Page>) -> (usize, Vec<UserRecord>) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(UserMsg::SearchUsers { query, page, reply }).await.is_err() {
            return (0, vec![]);
        }
        rx.await.unwrap_or((0, vec![]))
    }

    pub async fn delete_user(&self, actor: Actor, user_id: i64) -> Result<UserRecord> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(UserMsg::DeleteUser { actor, user_id, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("UserActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("UserActor dropped".into()))?
    }
}
