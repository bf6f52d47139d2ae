//! User record decoder.
//!
//! Turns one message payload into a `User` and applies the upstream date normalization.

use tracing::trace;

use crate::errors::IngestError;
use user_indexer_shared::User;

/// Date of birth published upstream when the real date is unknown.
pub const UNKNOWN_DOB: &str = "0000-00-00";

/// Processor that decodes message payloads into users.
///
/// Decoding has no side effects beyond the returned value. A payload that is not a valid
/// user record is a `DecodeError`; the pipeline does not skip poison messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserProcessor;

impl UserProcessor {
    /// Create a new user processor.
    pub fn new() -> Self {
        Self
    }

    /// Decode a JSON payload into a user.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The decoded user, with an unknown `dob` mapped to `None`
    /// * `Err(IngestError::DecodeError)` - If the payload is not a valid user record
    pub fn decode(&self, payload: &[u8]) -> Result<User, IngestError> {
        let user: User = serde_json::from_slice(payload)
            .map_err(|e| IngestError::decode(format!("Can't unmarshal user: {}", e)))?;

        trace!(pnum = user.pnum, "Decoded user");
        Ok(Self::normalize(user))
    }

    fn normalize(mut user: User) -> User {
        if user.dob.as_deref() == Some(UNKNOWN_DOB) {
            user.dob = None;
        }
        user
    }
}
