//! Paperway HTTP server binary
//!
//! Wires the vault actors behind axum routes. Configuration comes from the
//! environment: `PAPERWAY_JWT_SECRET`, `PAPERWAY_ADMIN_PASSWORD` (seeds the
//! reserved super-administrator account), and `PORT`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paperway_server::{api, AppState};
use paperway_vault::{
    hash_password, AuthGate, DocumentActor, MemoryStore, RoleType, UserActor, VaultConfig,
};

/// Seed the reserved super-administrator so `require_admin` can ever pass.
async fn seed_super_admin(store: &MemoryStore, config: &VaultConfig) {
    let password = match std::env::var("PAPERWAY_ADMIN_PASSWORD") {
        Ok(password) => password,
        Err(_) => {
            tracing::warn!("PAPERWAY_ADMIN_PASSWORD not set; no super-administrator seeded");
            return;
        }
    };
    let hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "Could not hash the admin password");
            return;
        }
    };
    match store
        .insert_user(
            config.super_admin_name.clone(),
            format!("{}@paperway.local", config.super_admin_name),
            RoleType::Admin,
            hash,
        )
        .await
    {
        Ok(admin) => tracing::info!(username = %admin.username, "Super-administrator seeded"),
        Err(err) => tracing::error!(error = %err, "Could not seed the super-administrator"),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "paperway_server=debug,paperway_vault=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VaultConfig::new();
    let store = Arc::new(MemoryStore::new());
    seed_super_admin(&store, &config).await;

    let gate = Arc::new(AuthGate::new(&config, store.clone()));
    let users = UserActor::spawn(store.clone(), gate.clone());
    let documents = DocumentActor::spawn(store);

    let app = api::router(AppState { gate, users, documents });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Paperway HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
