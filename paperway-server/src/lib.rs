//! Paperway HTTP server — REST front for the document vault
//!
//! The [`api`] module holds the handlers and the route table; the binary in
//! `main.rs` wires configuration, the vault actors, and the listener.

pub mod api;

pub use api::{router, AppState};
