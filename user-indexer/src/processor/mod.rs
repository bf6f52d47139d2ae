//! Processor module for the user indexer ingest.
//!
//! Decodes raw message payloads into users.

mod user_processor;

pub use user_processor::{UserProcessor, UNKNOWN_DOB};
