//! Authentication gate — token issuing, verification, and the admin guard
//!
//! Leaf component: it knows nothing about the decision engine. Every
//! protected operation passes through [`AuthGate::authenticate`] first; only
//! on success does control reach the access policy.

pub mod gate;

pub use gate::{token_from_carriers, AccountDirectory, AuthGate};
