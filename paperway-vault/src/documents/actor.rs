//! DocumentActor — Tokio actor for document operations
//!
//! Every operation takes the already-authenticated [`Actor`] and consults
//! the policy engine exactly once: `can_read`/`can_write`/`can_delete` for
//! single documents, `build_list_filter`/`build_search_filter` for
//! collections. The store only executes what the policy returns.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::{Result, VaultError};
use crate::policy::{
    build_list_filter, build_search_filter, can_delete, can_read, can_write, ListScope, ReadGrant,
};
use crate::store::MemoryStore;
use crate::types::{AccessTier, Actor, Document, DocumentPatch, Page};

/// One page of an authorized collection query
#[derive(Debug, Clone)]
pub struct DocumentSet {
    pub total: usize,
    pub documents: Vec<Document>,
}

// ─── Actor Messages ───

enum DocMsg {
    Create {
        actor: Actor,
        title: String,
        body: String,
        access: AccessTier,
        reply: oneshot::Sender<Result<Document>>,
    },
    Find {
        actor: Actor,
        document_id: i64,
        reply: oneshot::Sender<Result<ReadGrant>>,
    },
    List {
        actor: Actor,
        scope: ListScope,
        page: Option<Page>,
        reply: oneshot::Sender<Result<DocumentSet>>,
    },
    Search {
        actor: Actor,
        query: String,
        page: Option<Page>,
        reply: oneshot::Sender<Result<DocumentSet>>,
    },
    UserDocuments {
        actor: Actor,
        user_id: i64,
        page: Option<Page>,
        reply: oneshot::Sender<Result<DocumentSet>>,
    },
    Update {
        actor: Actor,
        document_id: i64,
        patch: DocumentPatch,
        reply: oneshot::Sender<Result<Document>>,
    },
    Delete {
        actor: Actor,
        document_id: i64,
        reply: oneshot::Sender<Result<Document>>,
    },
}

// ─── Actor ───

/// Document actor — processes document operations sequentially
pub struct DocumentActor {
    store: Arc<MemoryStore>,
    rx: mpsc::Receiver<DocMsg>,
}

impl DocumentActor {
    /// Spawn the document actor and return a handle for sending messages
    pub fn spawn(store: Arc<MemoryStore>) -> DocumentHandle {
        let (tx, rx) = mpsc::channel(256);
        let actor = Self { store, rx };

        tokio::spawn(actor.run());
        info!("DocumentActor spawned");
        DocumentHandle { tx }
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                DocMsg::Create { actor, title, body, access, reply } => {
                    let _ = reply.send(self.handle_create(&actor, title, body, access).await);
                }
                DocMsg::Find { actor, document_id, reply } => {
                    let _ = reply.send(self.handle_find(&actor, document_id).await);
                }
                DocMsg::List { actor, scope, page, reply } => {
                    let _ = reply.send(self.handle_list(&actor, scope, page).await);
                }
                DocMsg::Search { actor, query, page, reply } => {
                    let _ = reply.send(self.handle_search(&actor, &query, page).await);
                }
                DocMsg::UserDocuments { actor, user_id, page, reply } => {
                    let _ = reply.send(self.handle_user_documents(&actor, user_id, page).await);
                }
                DocMsg::Update { actor, document_id, patch, reply } => {
                    let _ = reply.send(self.handle_update(&actor, document_id, patch).await);
                }
                DocMsg::Delete { actor, document_id, reply } => {
                    let _ = reply.send(self.handle_delete(&actor, document_id).await);
                }
            }
        }
        info!("DocumentActor stopped");
    }

    // ─── Handler Implementations ───

    async fn handle_create(
        &self,
        actor: &Actor,
        title: String,
        body: String,
        access: AccessTier,
    ) -> Result<Document> {
        let document = self
            .store
            .insert_document(title, body, access, actor.user_id)
            .await?;
        info!(document_id = document.id, owner_id = actor.user_id, "Document created");
        Ok(document)
    }

    async fn handle_find(&self, actor: &Actor, document_id: i64) -> Result<ReadGrant> {
        let document = self
            .store
            .find_document(document_id)
            .await
            .ok_or(VaultError::DocumentNotFound(document_id))?;
        can_read(actor, &document)
    }

    async fn handle_list(
        &self,
        actor: &Actor,
        scope: ListScope,
        page: Option<Page>,
    ) -> Result<DocumentSet> {
        // None means the whole request is denied, not an empty page.
        let criteria =
            build_list_filter(actor, scope).ok_or_else(VaultError::access_denied)?;
        let (total, documents) = self.store.select_documents(&criteria, page).await;
        debug!(actor_id = actor.user_id, ?scope, total, "List filter executed");
        Ok(DocumentSet { total, documents })
    }

    async fn handle_search(
        &self,
        actor: &Actor,
        query: &str,
        page: Option<Page>,
    ) -> Result<DocumentSet> {
        let criteria = build_search_filter(actor, query);
        let (total, documents) = self.store.select_documents(&criteria, page).await;
        debug!(actor_id = actor.user_id, query, total, "Search filter executed");
        Ok(DocumentSet { total, documents })
    }

    async fn handle_user_documents(
        &self,
        actor: &Actor,
        user_id: i64,
        page: Option<Page>,
    ) -> Result<DocumentSet> {
        // Own-shelf listing only; other shelves go through list/search.
        if actor.user_id != user_id {
            return Err(VaultError::access_denied());
        }
        let (total, documents) = self.store.documents_owned_by(user_id, page).await;
        Ok(DocumentSet { total, documents })
    }

    async fn handle_update(
        &self,
        actor: &Actor,
        document_id: i64,
        patch: DocumentPatch,
    ) -> Result<Document> {
        let document = self
            .store
            .find_document(document_id)
            .await
            .ok_or(VaultError::DocumentNotFound(document_id))?;

        can_write(actor, &document)?;

        if patch.is_empty() {
            return Err(VaultError::NothingToUpdate);
        }

        let updated = self.store.update_document(document_id, &patch).await?;
        info!(document_id, by = actor.user_id, "Document updated");
        Ok(updated)
    }

    async fn handle_delete(&self, actor: &Actor, document_id: i64) -> Result<Document> {
        let document = self
            .store
            .find_document(document_id)
            .await
            .ok_or(VaultError::DocumentNotFound(document_id))?;

        can_delete(actor, &document)?;

        let removed = self.store.remove_document(document_id).await?;
        info!(document_id, by = actor.user_id, title = %removed.title, "Document deleted");
        Ok(removed)
    }
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to communicate with the DocumentActor
#[derive(Clone)]
pub struct DocumentHandle {
    tx: mpsc::Sender<DocMsg>,
}

impl DocumentHandle {
    pub async fn create(
        &self,
        actor: Actor,
        title: String,
        body: String,
        access: AccessTier,
    ) -> Result<Document> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::Create { actor, title, body, access, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }

    pub async fn find(&self, actor: Actor, document_id: i64) -> Result<ReadGrant> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::Find { actor, document_id, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }

    pub async fn list(
        &self,
        actor: Actor,
        scope: ListScope,
        page: Option<Page>,
    ) -> Result<DocumentSet> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::List { actor, scope, page, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }

    pub async fn search(
        &self,
        actor: Actor,
        query: String,
        page: Option<Page>,
    ) -> Result<DocumentSet> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::Search { actor, query, page, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }

    pub async fn user_documents(
        &self,
        actor: Actor,
        user_id: i64,
        page: Option<Page>,
    ) -> Result<DocumentSet> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::UserDocuments { actor, user_id, page, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }

    pub async fn update(
        &self,
        actor: Actor,
        document_id: i64,
        patch: DocumentPatch,
    ) -> Result<Document> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::Update { actor, document_id, patch, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }

    pub async fn delete(&self, actor: Actor, document_id: i64) -> Result<Document> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DocMsg::Delete { actor, document_id, reply })
            .await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor".into()))?;
        rx.await
            .map_err(|_| VaultError::ActorUnavailable("DocumentActor dropped".into()))?
    }
}
