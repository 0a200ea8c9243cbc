//! REST handlers — token extraction, auth, and translation to vault calls
//!
//! The transport layer only moves bytes: every handler extracts the raw
//! token from its three carriers, runs the authentication gate, and hands
//! the resulting actor to the vault. Denials come back as 400-class
//! responses in the `{status, message}` shape the client expects.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use paperway_vault::{
    token_from_carriers, AccessTier, Actor, AuthGate, DocumentHandle, DocumentPatch, ListScope,
    Page, ReadGrant, RoleType, UserHandle, UserPatch, VaultError,
};

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub users: UserHandle,
    pub documents: DocumentHandle,
}

/// The full route table, with tracing and permissive CORS
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(sign_up).get(all_users))
        .route("/api/users/login", post(sign_in))
        .route(
            "/api/users/:id",
            get(find_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/:id/documents", get(user_documents))
        .route("/api/documents", post(create_document).get(list_documents))
        .route(
            "/api/documents/:id",
            get(find_document)
                .put(update_document)
                .delete(delete_document),
        )
        .route("/api/search/users", get(search_users))
        .route("/api/search/documents", get(search_documents))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Responses ───

fn success(mut payload: Value) -> Response {
    if let Some(map) = payload.as_object_mut() {
        map.insert("status".into(), json!("successful"));
    }
    (StatusCode::OK, Json(payload)).into_response()
}

fn failure(err: VaultError) -> Response {
    let status = match &err {
        VaultError::Serialization(_)
        | VaultError::TokenInvalid(_)
        | VaultError::ActorUnavailable(_)
        | VaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(json!({ "status": "unsuccessful", "message": err.to_string() })),
    )
        .into_response()
}

// ─── Token plumbing ───

fn raw_token(body: Option<&Value>, query: &HashMap<String, String>, headers: &HeaderMap) -> String {
    let from_body = body.and_then(|b| b.get("token")).and_then(Value::as_str);
    let from_query = query.get("token").map(String::as_str);
    let from_header = headers.get("token").and_then(|v| v.to_str().ok());
    token_from_carriers(from_body, from_query, from_header)
}

async fn authenticate(
    state: &AppState,
    body: Option<&Value>,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
) -> Result<Actor, Response> {
    let token = raw_token(body, query, headers);
    state.gate.authenticate(&token).await.map_err(failure)
}

fn page_from_query(query: &HashMap<String, String>) -> Option<Page> {
    let offset = query.get("offset")?.parse().ok()?;
    let limit = query.get("limit")?.parse().ok()?;
    Some(Page { offset, limit })
}

fn string_field(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

// ─── User routes ───

/// POST /api/users — sign up, returns a fresh credential
pub async fn sign_up(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let role = match RoleType::parse(&string_field(&body, "role")) {
        Some(role) => role,
        None => return failure(VaultError::AccessDenied("Invalid role!".into())),
    };
    let result = state
        .users
        .sign_up(
            string_field(&body, "username"),
            string_field(&body, "email"),
            string_field(&body, "password"),
            role,
        )
        .await;
    match result {
        Ok((token, user)) => success(json!({ "token": token, "user": user })),
        Err(err) => failure(err),
    }
}

/// POST /api/users/login — sign in, returns a fresh credential
pub async fn sign_in(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let result = state
        .users
        .sign_in(string_field(&body, "username"), string_field(&body, "password"))
        .await;
    match result {
        Ok((token, user)) => success(json!({ "token": token, "user": user })),
        Err(err) => failure(err),
    }
}

/// GET /api/users — all active users
pub async fn all_users(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    match authenticate(&state, None, &query, &headers).await {
        Ok(_actor) => {
            let users = state.users.all_users().await;
            success(json!({ "count": users.len(), "users": users }))
        }
        Err(denied) => denied,
    }
}

/// GET /api/users/:id — one user
pub async fn find_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    match authenticate(&state, None, &query, &headers).await {
        Ok(_actor) => match state.users.find_user(user_id).await {
            Some(user) => success(json!({ "user": user })),
            None => failure(VaultError::UserNotFound(user_id.to_string())),
        },
        Err(denied) => denied,
    }
}

/// DELETE /api/users/:id — self-removal or the reserved super-administrator
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    match authenticate(&state, None, &query, &headers).await {
        Ok(actor) => match state.users.delete_user(actor, user_id).await {
            Ok(removed) => success(json!({ "message": format!("{} removed", removed.username) })),
            Err(err) => failure(err),
        },
        Err(denied) => denied,
    }
}

/// PUT /api/users/:id — self-update or the reserved super-administrator
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match authenticate(&state, Some(&body), &query, &headers).await {
        Ok(actor) => {
            let patch = UserPatch {
                username: body.get("username").and_then(Value::as_str).map(String::from),
                email: body.get("email").and_then(Value::as_str).map(String::from),
                password: body.get("password").and_then(Value::as_str).map(String::from),
            };
            match state.users.update_user(actor, user_id, patch).await {
                Ok(user) => success(json!({ "user": user })),
                Err(err) => failure(err),
            }
        }
        Err(denied) => denied,
    }
}

/// GET /api/search/users?q= — username substring search over active users
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let needle = query.get("q").cloned().unwrap_or_default();
    let page = page_from_query(&query);
    match authenticate(&state, None, &query, &headers).await {
        Ok(_actor) => {
            let (total, users) = state.users.search_users(needle, page).await;
            success(json!({ "count": total, "users": users }))
        }
        Err(denied) => denied,
    }
}

/// GET /api/users/:id/documents — the actor's own shelf
pub async fn user_documents(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let page = page_from_query(&query);
    match authenticate(&state, None, &query, &headers).await {
        Ok(actor) => match state.documents.user_documents(actor, user_id, page).await {
            Ok(set) => success(json!({ "count": set.total, "documents": set.documents })),
            Err(err) => failure(err),
        },
        Err(denied) => denied,
    }
}

// ─── Document routes ───

/// POST /api/documents — create a document owned by the actor
pub async fn create_document(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    // Gate before field validation: denial precedes "Unknown access tier!".
    let actor = match authenticate(&state, Some(&body), &query, &headers).await {
        Ok(actor) => actor,
        Err(denied) => return denied,
    };
    let access = match AccessTier::parse(&string_field(&body, "access")) {
        Some(access) => access,
        None => {
            return failure(VaultError::AccessDenied("Unknown access tier!".into()));
        }
    };
    let result = state
        .documents
        .create(
            actor,
            string_field(&body, "title"),
            string_field(&body, "body"),
            access,
        )
        .await;
    match result {
        Ok(doc) => success(json!({ "documentId": doc.id })),
        Err(err) => failure(err),
    }
}

/// GET /api/documents — list under a requested scope
///
/// `?access=` selects the scope; absence or an unknown value is the
/// unspecified scope (Admin only).
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let scope = ListScope::parse(query.get("access").map(String::as_str).unwrap_or(""));
    let page = page_from_query(&query);
    match authenticate(&state, None, &query, &headers).await {
        Ok(actor) => {
            debug!(actor_id = actor.user_id, ?scope, "Listing documents");
            match state.documents.list(actor, scope, page).await {
                Ok(set) => success(json!({ "count": set.total, "documents": set.documents })),
                Err(err) => failure(err),
            }
        }
        Err(denied) => denied,
    }
}

/// GET /api/documents/:id — a single document through the read policy
pub async fn find_document(
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    match authenticate(&state, None, &query, &headers).await {
        Ok(actor) => match state.documents.find(actor, document_id).await {
            // Soft denial: an authorized ask with an empty document.
            Ok(ReadGrant::Empty) => success(json!({ "document": {} })),
            Ok(ReadGrant::Document(doc)) => success(json!({ "document": doc })),
            Err(err) => failure(err),
        },
        Err(denied) => denied,
    }
}

/// PUT /api/documents/:id — partial update through the write policy
pub async fn update_document(
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    // Gate before field validation: denial precedes "Unknown access tier!".
    let actor = match authenticate(&state, Some(&body), &query, &headers).await {
        Ok(actor) => actor,
        Err(denied) => return denied,
    };
    let access = match body.get("access").and_then(Value::as_str) {
        Some(raw) => match AccessTier::parse(raw) {
            Some(access) => Some(access),
            None => return failure(VaultError::AccessDenied("Unknown access tier!".into())),
        },
        None => None,
    };
    let patch = DocumentPatch {
        title: body.get("title").and_then(Value::as_str).map(String::from),
        body: body.get("body").and_then(Value::as_str).map(String::from),
        access,
    };
    match state.documents.update(actor, document_id, patch).await {
        Ok(doc) => success(json!({ "document": doc })),
        Err(err) => failure(err),
    }
}

/// DELETE /api/documents/:id — owner-only removal
pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    match authenticate(&state, None, &query, &headers).await {
        Ok(actor) => match state.documents.delete(actor, document_id).await {
            Ok(doc) => success(json!({ "message": format!("\"{}\" has been deleted!", doc.title) })),
            Err(err) => failure(err),
        },
        Err(denied) => denied,
    }
}

/// GET /api/search/documents?q= — title search within the visible set
pub async fn search_documents(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let needle = query.get("q").cloned().unwrap_or_default();
    let page = page_from_query(&query);
    match authenticate(&state, None, &query, &headers).await {
        Ok(actor) => match state.documents.search(actor, needle, page).await {
            Ok(set) => success(json!({ "count": set.total, "documents": set.documents })),
            Err(err) => failure(err),
        },
        Err(denied) => denied,
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
