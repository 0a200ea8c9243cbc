//! MemoryStore — in-process store standing in for the persistence layer
//!
//! Holds users and documents in hash maps behind async read/write locks.
//! Concurrent reads are fine; all mutation is routed through the actors, so
//! writes observe a serial order. The store also executes the
//! [`QueryCriteria`] the policy engine builds — it never makes access
//! decisions of its own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::AccountDirectory;
use crate::error::{Result, VaultError};
use crate::policy::QueryCriteria;
use crate::types::{AccessTier, Document, DocumentPatch, Page, RoleType, UserRecord};

struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

/// In-memory user and document store.
///
/// Thread-safe: share across tokio tasks via `Arc<MemoryStore>`.
pub struct MemoryStore {
    users: RwLock<HashMap<i64, StoredUser>>,
    documents: RwLock<HashMap<i64, Document>>,
    next_user_id: AtomicI64,
    next_document_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
            next_document_id: AtomicI64::new(1),
        }
    }

    // ─── Users ───

    /// Insert a new user; username and email must be unique.
    pub async fn insert_user(
        &self,
        username: String,
        email: String,
        role: RoleType,
        password_hash: String,
    ) -> Result<UserRecord> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.record.username == username) {
            return Err(VaultError::UserAlreadyExists(username));
        }
        if users.values().any(|u| u.record.email == email) {
            return Err(VaultError::UserAlreadyExists(email));
        }

        let user_id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let record = UserRecord {
            user_id,
            username,
            email,
            role,
            is_active: true,
            created_at: Utc::now().to_rfc3339(),
        };
        users.insert(
            user_id,
            StoredUser {
                record: record.clone(),
                password_hash,
            },
        );
        debug!(user_id, username = %record.username, "User stored");
        Ok(record)
    }

    /// Look up a user and their password hash by username
    pub async fn find_user_by_username(&self, username: &str) -> Option<(UserRecord, String)> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.record.username == username)
            .map(|u| (u.record.clone(), u.password_hash.clone()))
    }

    pub async fn find_user(&self, user_id: i64) -> Option<UserRecord> {
        let users = self.users.read().await;
        users.get(&user_id).map(|u| u.record.clone())
    }

    /// All active users
    pub async fn all_users(&self) -> Vec<UserRecord> {
        let users = self.users.read().await;
        let mut records: Vec<UserRecord> = users
            .values()
            .filter(|u| u.record.is_active)
            .map(|u| u.record.clone())
            .collect();
        records.sort_by_key(|u| u.user_id);
        records
    }

    /// Apply a partial update to a stored account; changed username/email
    /// must stay unique. The password arrives pre-hashed.
    pub async fn update_user(
        &self,
        user_id: i64,
        username: Option<String>,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> Result<UserRecord> {
        let mut users = self.users.write().await;

        // Existence before uniqueness: a missing id is not a name clash.
        if !users.contains_key(&user_id) {
            return Err(VaultError::UserNotFound(user_id.to_string()));
        }

        if let Some(username) = &username {
            let clash = users
                .values()
                .any(|u| u.record.user_id != user_id && u.record.username == *username);
            if clash {
                return Err(VaultError::UserAlreadyExists(username.clone()));
            }
        }
        if let Some(email) = &email {
            let clash = users
                .values()
                .any(|u| u.record.user_id != user_id && u.record.email == *email);
            if clash {
                return Err(VaultError::UserAlreadyExists(email.clone()));
            }
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| VaultError::UserNotFound(user_id.to_string()))?;

        if let Some(username) = username {
            user.record.username = username;
        }
        if let Some(email) = email {
            user.record.email = email;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        debug!(user_id, "User updated");
        Ok(user.record.clone())
    }

    /// Active users whose username contains `needle` (case-insensitive),
    /// paginated. An empty needle matches every active user.
    pub async fn search_users(&self, needle: &str, page: Option<Page>) -> (usize, Vec<UserRecord>) {
        let needle = needle.to_lowercase();
        let users = self.users.read().await;
        let mut matched: Vec<UserRecord> = users
            .values()
            .filter(|u| u.record.is_active && u.record.username.to_lowercase().contains(&needle))
            .map(|u| u.record.clone())
            .collect();
        matched.sort_by_key(|u| u.user_id);

        let total = matched.len();
        let rows = match page {
            Some(page) => matched
                .into_iter()
                .skip(page.offset)
                .take(page.limit)
                .collect(),
            None => matched,
        };
        (total, rows)
    }

    /// Enable or disable an account. Disabled accounts keep their documents
    /// but fail sign-in and soft-fail Public reads.
    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| VaultError::UserNotFound(user_id.to_string()))?;
        user.record.is_active = is_active;
        Ok(user.record.clone())
    }

    pub async fn remove_user(&self, user_id: i64) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        users
            .remove(&user_id)
            .map(|u| u.record)
            .ok_or_else(|| VaultError::UserNotFound(user_id.to_string()))
    }

    // ─── Documents ───

    /// Insert a new document; the title must be unique across all documents.
    pub async fn insert_document(
        &self,
        title: String,
        body: String,
        access: AccessTier,
        owner_id: i64,
    ) -> Result<Document> {
        let mut documents = self.documents.write().await;

        if documents.values().any(|d| d.title == title) {
            return Err(VaultError::DocumentAlreadyExists(title));
        }

        let id = self.next_document_id.fetch_add(1, Ordering::SeqCst);
        let document = Document {
            id,
            title,
            body,
            access,
            owner_id,
            created_at: Utc::now().to_rfc3339(),
        };
        documents.insert(id, document.clone());
        debug!(document_id = id, owner_id, access = %document.access, "Document stored");
        Ok(document)
    }

    pub async fn find_document(&self, document_id: i64) -> Option<Document> {
        let documents = self.documents.read().await;
        documents.get(&document_id).cloned()
    }

    /// Execute a policy-built criteria: total match count plus one page.
    ///
    /// Pagination windows the *filtered* set; a `None` page returns all
    /// matches.
    pub async fn select_documents(
        &self,
        criteria: &QueryCriteria,
        page: Option<Page>,
    ) -> (usize, Vec<Document>) {
        let documents = self.documents.read().await;
        let mut matched: Vec<Document> = documents
            .values()
            .filter(|d| criteria.matches(d))
            .cloned()
            .collect();
        matched.sort_by_key(|d| d.id);

        let total = matched.len();
        let rows = match page {
            Some(page) => matched
                .into_iter()
                .skip(page.offset)
                .take(page.limit)
                .collect(),
            None => matched,
        };
        (total, rows)
    }

    /// Documents owned by one user, paginated
    pub async fn documents_owned_by(
        &self,
        owner_id: i64,
        page: Option<Page>,
    ) -> (usize, Vec<Document>) {
        let criteria = QueryCriteria {
            any_of: vec![crate::policy::DocClause {
                owner_id: Some(owner_id),
                ..Default::default()
            }],
        };
        self.select_documents(&criteria, page).await
    }

    /// Apply a partial update to a stored document
    pub async fn update_document(
        &self,
        document_id: i64,
        patch: &DocumentPatch,
    ) -> Result<Document> {
        let mut documents = self.documents.write().await;

        // Existence before uniqueness: a missing id is not a title clash.
        if !documents.contains_key(&document_id) {
            return Err(VaultError::DocumentNotFound(document_id));
        }

        if let Some(title) = &patch.title {
            let clash = documents
                .values()
                .any(|d| d.id != document_id && d.title == *title);
            if clash {
                return Err(VaultError::DocumentAlreadyExists(title.clone()));
            }
        }

        let document = documents
            .get_mut(&document_id)
            .ok_or(VaultError::DocumentNotFound(document_id))?;

        if let Some(title) = &patch.title {
            document.title = title.clone();
        }
        if let Some(body) = &patch.body {
            document.body = body.clone();
        }
        if let Some(access) = patch.access {
            document.access = access;
        }
        Ok(document.clone())
    }

    pub async fn remove_document(&self, document_id: i64) -> Result<Document> {
        let mut documents = self.documents.write().await;
        documents
            .remove(&document_id)
            .ok_or(VaultError::DocumentNotFound(document_id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountDirectory for MemoryStore {
    /// Strict match: both the claimed username and id must line up.
    async fn find_account(&self, username: &str, user_id: i64) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .filter(|u| u.record.username == username)
            .map(|u| u.record.clone()))
    }
}
