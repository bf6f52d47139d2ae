//! # User Indexer Shared
//!
//! This crate defines shared data structures used across the user indexer.
//! It includes the `User` record that flows from the message log into the search index.

pub mod types;

pub use types::user::User;
