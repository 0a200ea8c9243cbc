//! Document operations — CRUD, listing, and search under the access policy

pub mod actor;

pub use actor::{DocumentActor, DocumentHandle, DocumentSet};
