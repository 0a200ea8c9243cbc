//! AuthGate integration tests — issue, verify, stale tokens, admin guard

use std::sync::Arc;

use paperway_vault::{
    AuthGate, MemoryStore, RoleType, UserActor, UserHandle, UserPatch, VaultConfig, VaultError,
};

fn test_config() -> VaultConfig {
    VaultConfig::new().with_jwt_secret("test-secret-jwt-key-min-32-chars!!")
}

fn spawn_vault() -> (Arc<MemoryStore>, Arc<AuthGate>, UserHandle) {
    let store = Arc::new(MemoryStore::new());
    let gate = Arc::new(AuthGate::new(&test_config(), store.clone()));
    let users = UserActor::spawn(store.clone(), gate.clone());
    (store, gate, users)
}

#[tokio::test]
async fn test_token_roundtrip() {
    let (_store, gate, users) = spawn_vault();

    let (token, user) = users
        .sign_up(
            "alice".into(),
            "alice@example.com".into(),
            "StrongP@ss123".into(),
            RoleType::Fellow,
        )
        .await
        .unwrap();

    let actor = gate.authenticate(&token).await.unwrap();
    assert_eq!(actor.user_id, user.user_id);
    assert_eq!(actor.username, "alice");
    assert_eq!(actor.role, RoleType::Fellow);
    assert!(actor.is_active);
}

#[tokio::test]
async fn test_empty_token_is_unauthenticated() {
    let (_store, gate, _users) = spawn_vault();

    let err = gate.authenticate("").await.unwrap_err();
    match err {
        VaultError::Unauthenticated(msg) => assert_eq!(msg, "You are not authenticated!"),
        other => panic!("expected Unauthenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let (_store, gate, _users) = spawn_vault();

    let err = gate.authenticate("invalid.token.here").await.unwrap_err();
    assert_eq!(err.to_string(), "You are not authenticated!");
}

#[tokio::test]
async fn test_foreign_secret_is_unauthenticated() {
    let (_store, gate, users) = spawn_vault();
    let (token, _) = users
        .sign_up(
            "bob".into(),
            "bob@example.com".into(),
            "SecureP@ss99".into(),
            RoleType::Learning,
        )
        .await
        .unwrap();

    // Same token against a gate holding a different secret.
    let other_store = Arc::new(MemoryStore::new());
    let other_gate = AuthGate::new(
        &VaultConfig::new().with_jwt_secret("a-completely-different-secret!!"),
        other_store,
    );
    let err = other_gate.authenticate(&token).await.unwrap_err();
    assert_eq!(err.to_string(), "You are not authenticated!");
}

#[tokio::test]
async fn test_deleted_account_token_is_invalid_user() {
    let (store, gate, users) = spawn_vault();

    let (token, user) = users
        .sign_up(
            "charlie".into(),
            "charlie@example.com".into(),
            "MyP@ssword1".into(),
            RoleType::Devops,
        )
        .await
        .unwrap();

    // Valid signature, but the account is gone.
    store.remove_user(user.user_id).await.unwrap();

    let err = gate.authenticate(&token).await.unwrap_err();
    match err {
        VaultError::Unauthenticated(msg) => {
            assert_eq!(msg, "Invalid user, you are not authenticated!")
        }
        other => panic!("expected Unauthenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deactivated_account_still_authenticates() {
    let (store, gate, users) = spawn_vault();

    let (token, user) = users
        .sign_up(
            "diana".into(),
            "diana@example.com".into(),
            "Tr@derPass1".into(),
            RoleType::Fellow,
        )
        .await
        .unwrap();

    store.set_user_active(user.user_id, false).await.unwrap();

    // The account exists, so authentication passes; the inactive flag is
    // carried on the actor for the policy layer to act on.
    let actor = gate.authenticate(&token).await.unwrap();
    assert!(!actor.is_active);
}

#[tokio::test]
async fn test_sign_in_rejects_wrong_password_and_disabled_account() {
    let (store, _gate, users) = spawn_vault();

    let (_, user) = users
        .sign_up(
            "frank".into(),
            "frank@example.com".into(),
            "Correct!Pass1".into(),
            RoleType::Learning,
        )
        .await
        .unwrap();

    let wrong = users.sign_in("frank".into(), "WrongPassword".into()).await;
    assert!(matches!(wrong, Err(VaultError::InvalidCredentials)));

    store.set_user_active(user.user_id, false).await.unwrap();
    let disabled = users.sign_in("frank".into(), "Correct!Pass1".into()).await;
    assert!(matches!(disabled, Err(VaultError::AccountDisabled(_))));
}

#[tokio::test]
async fn test_sign_up_rejects_admin_roles() {
    let (_store, _gate, users) = spawn_vault();

    let result = users
        .sign_up(
            "mallory".into(),
            "mallory@example.com".into(),
            "P@ssword123".into(),
            RoleType::Admin,
        )
        .await;
    assert!(matches!(result, Err(VaultError::AccessDenied(_))));
}

#[tokio::test]
async fn test_update_user_is_self_or_super_admin_scoped() {
    let (store, gate, users) = spawn_vault();

    let (_, grace) = users
        .sign_up(
            "grace".into(),
            "grace@example.com".into(),
            "Gr@cePass1".into(),
            RoleType::Fellow,
        )
        .await
        .unwrap();
    let (stranger_token, _) = users
        .sign_up(
            "heidi".into(),
            "heidi@example.com".into(),
            "He1di!Pass".into(),
            RoleType::Devops,
        )
        .await
        .unwrap();

    // A stranger cannot touch someone else's account.
    let stranger = gate.authenticate(&stranger_token).await.unwrap();
    let denied = users
        .update_user(
            stranger,
            grace.user_id,
            UserPatch { email: Some("hijack@example.com".into()), ..Default::default() },
        )
        .await;
    assert!(matches!(denied, Err(VaultError::AccessDenied(_))));

    // Self-update works; an empty patch does not.
    let grace_token = users
        .sign_in("grace".into(), "Gr@cePass1".into())
        .await
        .unwrap()
        .0;
    let grace_actor = gate.authenticate(&grace_token).await.unwrap();

    let empty = users
        .update_user(grace_actor.clone(), grace.user_id, UserPatch::default())
        .await;
    assert!(matches!(empty, Err(VaultError::NothingToUpdateUser)));

    let updated = users
        .update_user(
            grace_actor,
            grace.user_id,
            UserPatch { email: Some("grace@paperway.dev".into()), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "grace@paperway.dev");

    // The reserved super-administrator may update anyone.
    let touchstone = store
        .insert_user(
            "touchstone".into(),
            "touchstone@example.com".into(),
            RoleType::Admin,
            "unused-hash".into(),
        )
        .await
        .unwrap();
    let admin_token = gate.issue_token(&touchstone).unwrap();
    let admin = gate.authenticate(&admin_token).await.unwrap();
    let renamed = users
        .update_user(
            admin,
            grace.user_id,
            UserPatch { username: Some("grace-h".into()), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(renamed.username, "grace-h");
}

#[tokio::test]
async fn test_update_user_rejects_taken_username() {
    let (_store, gate, users) = spawn_vault();

    users
        .sign_up(
            "ivan".into(),
            "ivan@example.com".into(),
            "Iv@nPass12".into(),
            RoleType::Fellow,
        )
        .await
        .unwrap();
    let (judy_token, judy) = users
        .sign_up(
            "judy".into(),
            "judy@example.com".into(),
            "Judy!Pass12".into(),
            RoleType::Fellow,
        )
        .await
        .unwrap();

    let judy_actor = gate.authenticate(&judy_token).await.unwrap();
    let clash = users
        .update_user(
            judy_actor,
            judy.user_id,
            UserPatch { username: Some("ivan".into()), ..Default::default() },
        )
        .await;
    assert!(matches!(clash, Err(VaultError::UserAlreadyExists(_))));
}

#[tokio::test]
async fn test_password_update_rotates_credentials() {
    let (_store, gate, users) = spawn_vault();

    let (token, kim) = users
        .sign_up(
            "kim".into(),
            "kim@example.com".into(),
            "OldP@ssword1".into(),
            RoleType::Learning,
        )
        .await
        .unwrap();

    let actor = gate.authenticate(&token).await.unwrap();
    users
        .update_user(
            actor,
            kim.user_id,
            UserPatch { password: Some("NewP@ssword2".into()), ..Default::default() },
        )
        .await
        .unwrap();

    let stale = users.sign_in("kim".into(), "OldP@ssword1".into()).await;
    assert!(matches!(stale, Err(VaultError::InvalidCredentials)));

    let fresh = users.sign_in("kim".into(), "NewP@ssword2".into()).await;
    assert!(fresh.is_ok());
}

#[tokio::test]
async fn test_search_users_matches_username_substring() {
    let (store, _gate, users) = spawn_vault();

    users
        .sign_up(
            "marina".into(),
            "marina@example.com".into(),
            "M@rinaPass1".into(),
            RoleType::Fellow,
        )
        .await
        .unwrap();
    users
        .sign_up(
            "Martin".into(),
            "martin@example.com".into(),
            "M@rtinPass1".into(),
            RoleType::Devops,
        )
        .await
        .unwrap();
    let (_, nils) = users
        .sign_up(
            "nils-marlow".into(),
            "nils@example.com".into(),
            "N1ls!Passwd".into(),
            RoleType::Learning,
        )
        .await
        .unwrap();
    store.set_user_active(nils.user_id, false).await.unwrap();

    // Case-insensitive substring, disabled accounts excluded.
    let (total, rows) = users.search_users("mar".into(), None).await;
    assert_eq!(total, 2);
    let names: Vec<&str> = rows.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["marina", "Martin"]);

    let (none, _) = users.search_users("zebra".into(), None).await;
    assert_eq!(none, 0);
}

#[tokio::test]
async fn test_require_admin_needs_role_and_reserved_name() {
    let (store, gate, _users) = spawn_vault();

    // Seed admins directly; sign-up never grants Admin.
    let touchstone = store
        .insert_user(
            "touchstone".into(),
            "touchstone@example.com".into(),
            RoleType::Admin,
            "unused-hash".into(),
        )
        .await
        .unwrap();
    let other_admin = store
        .insert_user(
            "ordinary-admin".into(),
            "oa@example.com".into(),
            RoleType::Admin,
            "unused-hash".into(),
        )
        .await
        .unwrap();

    let reserved = gate.issue_token(&touchstone).unwrap();
    let reserved_actor = gate.authenticate(&reserved).await.unwrap();
    assert!(gate.require_admin(&reserved_actor).is_ok());

    // Admin role alone is not enough.
    let plain = gate.issue_token(&other_admin).unwrap();
    let plain_actor = gate.authenticate(&plain).await.unwrap();
    assert!(matches!(
        gate.require_admin(&plain_actor),
        Err(VaultError::AccessDenied(_))
    ));
}
