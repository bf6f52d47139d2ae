//! This module defines the core data structures used across the user indexer.
//! It re-exports specific types like `User`.

pub mod user;

pub use user::User;
