//! User operations — sign-up, sign-in, lookup, and removal

pub mod actor;

pub use actor::{hash_password, UserActor, UserHandle};
