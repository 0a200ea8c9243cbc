//! DocumentActor integration tests — CRUD, listing, and search under policy

use std::sync::Arc;

use paperway_vault::{
    AccessTier, Actor, AuthGate, DocumentActor, DocumentHandle, DocumentPatch, ListScope,
    MemoryStore, Page, ReadGrant, RoleType, UserActor, UserHandle, VaultConfig, VaultError,
};

struct Vault {
    store: Arc<MemoryStore>,
    users: UserHandle,
    documents: DocumentHandle,
}

fn spawn_vault() -> Vault {
    let store = Arc::new(MemoryStore::new());
    let config = VaultConfig::new().with_jwt_secret("test-secret-jwt-key-min-32-chars!!");
    let gate = Arc::new(AuthGate::new(&config, store.clone()));
    let users = UserActor::spawn(store.clone(), gate);
    let documents = DocumentActor::spawn(store.clone());
    Vault { store, users, documents }
}

async fn signed_up(vault: &Vault, name: &str, role: RoleType) -> Actor {
    let (_, user) = vault
        .users
        .sign_up(
            name.into(),
            format!("{name}@example.com"),
            "StrongP@ss123".into(),
            role,
        )
        .await
        .unwrap();
    Actor {
        user_id: user.user_id,
        username: user.username,
        role: user.role,
        is_active: user.is_active,
    }
}

/// Admin accounts cannot come from sign-up; seed them in the store.
async fn seeded_admin(vault: &Vault, name: &str) -> Actor {
    let user = vault
        .store
        .insert_user(
            name.into(),
            format!("{name}@example.com"),
            RoleType::Admin,
            "unused-hash".into(),
        )
        .await
        .unwrap();
    Actor {
        user_id: user.user_id,
        username: user.username,
        role: user.role,
        is_active: true,
    }
}

#[tokio::test]
async fn test_create_find_roundtrip() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "alice", RoleType::Fellow).await;

    let doc = vault
        .documents
        .create(owner.clone(), "Field notes".into(), "day one".into(), AccessTier::Private)
        .await
        .unwrap();

    let grant = vault.documents.find(owner, doc.id).await.unwrap();
    match grant {
        ReadGrant::Document(found) => assert_eq!(found.title, "Field notes"),
        ReadGrant::Empty => panic!("owner read must return the document"),
    }
}

#[tokio::test]
async fn test_duplicate_title_rejected() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "alice", RoleType::Fellow).await;

    vault
        .documents
        .create(owner.clone(), "Plan".into(), "v1".into(), AccessTier::Public)
        .await
        .unwrap();
    let dup = vault
        .documents
        .create(owner, "Plan".into(), "v2".into(), AccessTier::Public)
        .await;
    assert!(matches!(dup, Err(VaultError::DocumentAlreadyExists(_))));
}

#[tokio::test]
async fn test_private_document_denied_to_stranger_granted_to_admin() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "owner", RoleType::Learning).await;
    let stranger = signed_up(&vault, "stranger", RoleType::Fellow).await;
    let admin = seeded_admin(&vault, "root").await;

    let doc = vault
        .documents
        .create(owner, "Diary".into(), "secret".into(), AccessTier::Private)
        .await
        .unwrap();

    let denied = vault.documents.find(stranger, doc.id).await;
    assert!(matches!(denied, Err(VaultError::AccessDenied(_))));

    let granted = vault.documents.find(admin, doc.id).await.unwrap();
    assert!(matches!(granted, ReadGrant::Document(_)));
}

#[tokio::test]
async fn test_public_read_soft_denied_for_inactive_actor() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "owner", RoleType::Learning).await;
    let mut reader = signed_up(&vault, "reader", RoleType::Fellow).await;

    let doc = vault
        .documents
        .create(owner, "Bulletin".into(), "open news".into(), AccessTier::Public)
        .await
        .unwrap();

    reader.is_active = false;
    let grant = vault.documents.find(reader, doc.id).await.unwrap();
    // Soft denial: empty grant, never an error and never the body.
    assert_eq!(grant, ReadGrant::Empty);
}

#[tokio::test]
async fn test_soft_denial_differs_from_not_found() {
    let vault = spawn_vault();
    let mut reader = signed_up(&vault, "reader", RoleType::Fellow).await;
    reader.is_active = false;

    let missing = vault.documents.find(reader, 9999).await;
    assert!(matches!(missing, Err(VaultError::DocumentNotFound(9999))));
}

#[tokio::test]
async fn test_update_owner_or_admin_only() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "owner", RoleType::Devops).await;
    let stranger = signed_up(&vault, "stranger", RoleType::Fellow).await;
    let admin = seeded_admin(&vault, "root").await;

    let doc = vault
        .documents
        .create(owner.clone(), "Runbook".into(), "v1".into(), AccessTier::Private)
        .await
        .unwrap();

    let patch = DocumentPatch {
        body: Some("v2".into()),
        ..Default::default()
    };

    let denied = vault
        .documents
        .update(stranger, doc.id, patch.clone())
        .await
        .unwrap_err();
    assert_eq!(denied.to_string(), "Restricted document!");

    let by_admin = vault.documents.update(admin, doc.id, patch).await.unwrap();
    assert_eq!(by_admin.body, "v2");

    let empty = vault
        .documents
        .update(owner, doc.id, DocumentPatch::default())
        .await;
    assert!(matches!(empty, Err(VaultError::NothingToUpdate)));
}

#[tokio::test]
async fn test_delete_is_owner_only_even_for_admin() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "owner", RoleType::Devops).await;
    let admin = seeded_admin(&vault, "root").await;

    let doc = vault
        .documents
        .create(owner.clone(), "Scratch".into(), "tmp".into(), AccessTier::Private)
        .await
        .unwrap();

    // Admin may update this document but not delete it.
    let denied = vault.documents.delete(admin, doc.id).await;
    assert!(matches!(denied, Err(VaultError::AccessDenied(_))));

    let removed = vault.documents.delete(owner, doc.id).await.unwrap();
    assert_eq!(removed.title, "Scratch");
}

#[tokio::test]
async fn test_list_scopes() {
    let vault = spawn_vault();
    let fellow = signed_up(&vault, "fellow", RoleType::Fellow).await;
    let learner = signed_up(&vault, "learner", RoleType::Learning).await;
    let admin = seeded_admin(&vault, "root").await;

    for (title, actor, access) in [
        ("open", &fellow, AccessTier::Public),
        ("fellow only", &fellow, AccessTier::Role(RoleType::Fellow)),
        ("learner diary", &learner, AccessTier::Private),
        ("learner notes", &learner, AccessTier::Role(RoleType::Learning)),
    ] {
        vault
            .documents
            .create(actor.clone(), title.into(), "b".into(), access)
            .await
            .unwrap();
    }

    // Public scope works for everyone.
    let set = vault
        .documents
        .list(learner.clone(), ListScope::Public, None)
        .await
        .unwrap();
    assert_eq!(set.total, 1);

    // Tier scope requires the matching role.
    let denied = vault
        .documents
        .list(fellow.clone(), ListScope::Tier(RoleType::Learning), None)
        .await;
    assert!(matches!(denied, Err(VaultError::AccessDenied(_))));

    // All: admin sees everything, a fellow sees own ∪ tier ∪ public.
    let everything = vault
        .documents
        .list(admin, ListScope::All, None)
        .await
        .unwrap();
    assert_eq!(everything.total, 4);

    let visible = vault
        .documents
        .list(fellow.clone(), ListScope::All, None)
        .await
        .unwrap();
    assert_eq!(visible.total, 2);

    // Unspecified scope denies non-admins outright.
    let unspecified = vault.documents.list(fellow, ListScope::Unspecified, None).await;
    assert!(matches!(unspecified, Err(VaultError::AccessDenied(_))));
}

#[tokio::test]
async fn test_search_scoping_and_empty_query() {
    let vault = spawn_vault();
    let fellow = signed_up(&vault, "fellow", RoleType::Fellow).await;
    let learner = signed_up(&vault, "learner", RoleType::Learning).await;

    vault
        .documents
        .create(fellow.clone(), "My Report".into(), "b".into(), AccessTier::Private)
        .await
        .unwrap();
    vault
        .documents
        .create(learner.clone(), "Hidden Report".into(), "b".into(), AccessTier::Private)
        .await
        .unwrap();
    vault
        .documents
        .create(learner.clone(), "Open Report".into(), "b".into(), AccessTier::Public)
        .await
        .unwrap();

    let set = vault
        .documents
        .search(fellow.clone(), "report".into(), None)
        .await
        .unwrap();
    assert_eq!(set.total, 2); // own private + public, never the foreign private

    let titles: Vec<&str> = set.documents.iter().map(|d| d.title.as_str()).collect();
    assert!(!titles.contains(&"Hidden Report"));

    // Empty query falls back to the visible union.
    let all_visible = vault
        .documents
        .search(fellow, String::new(), None)
        .await
        .unwrap();
    assert_eq!(all_visible.total, 2);
}

#[tokio::test]
async fn test_user_documents_own_shelf_only() {
    let vault = spawn_vault();
    let owner = signed_up(&vault, "owner", RoleType::Fellow).await;
    let other = signed_up(&vault, "other", RoleType::Fellow).await;

    for i in 0..3 {
        vault
            .documents
            .create(owner.clone(), format!("doc {i}"), "b".into(), AccessTier::Private)
            .await
            .unwrap();
    }

    let own = vault
        .documents
        .user_documents(owner.clone(), owner.user_id, Some(Page { offset: 1, limit: 1 }))
        .await
        .unwrap();
    assert_eq!(own.total, 3);
    assert_eq!(own.documents.len(), 1);

    let foreign = vault
        .documents
        .user_documents(other, owner.user_id, None)
        .await;
    assert!(matches!(foreign, Err(VaultError::AccessDenied(_))));
}
