//! User record types.
//!
//! This module defines the record read from the message log and written, unchanged in
//! shape, into the search index.

use serde::{Deserialize, Serialize};

/// A user record as published on the users topic.
///
/// `pnum` is the unique numeric identifier and doubles as the document ID in the
/// search index. Every other attribute is optional on the wire; absent attributes are
/// omitted when the record is serialized as a search document.
///
/// # Fields
///
/// - `pnum`: Unique numeric identifier
/// - `nickname`, `email`: Account attributes
/// - `first_name`, `last_name`: Personal names
/// - `street`, `city`, `zip`, `state`, `country`: Postal address
/// - `gender`: Free-form gender attribute
/// - `dob`: Date of birth as `YYYY-MM-DD`, `None` when unknown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub pnum: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Date of birth. Upstream publishes `"0000-00-00"` for unknown dates; the decoder
    /// maps that to `None` before the record leaves the intake stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
}

impl User {
    /// Create a user with only the identifier set.
    ///
    /// # Example
    ///
    /// ```
    /// use user_indexer_shared::User;
    ///
    /// let user = User::new(42);
    /// assert_eq!(user.document_id(), "42");
    /// assert!(user.dob.is_none());
    /// ```
    pub fn new(pnum: i64) -> Self {
        Self {
            pnum,
            nickname: None,
            email: None,
            first_name: None,
            last_name: None,
            street: None,
            city: None,
            zip: None,
            state: None,
            country: None,
            gender: None,
            dob: None,
        }
    }

    /// Generate the document ID used in the search index.
    pub fn document_id(&self) -> String {
        self.pnum.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(7);

        assert_eq!(user.pnum, 7);
        assert!(user.nickname.is_none());
        assert!(user.email.is_none());
        assert!(user.dob.is_none());
    }

    #[test]
    fn test_document_id() {
        assert_eq!(User::new(1234567).document_id(), "1234567");
        assert_eq!(User::new(-1).document_id(), "-1");
    }

    #[test]
    fn test_deserialize_partial_payload() {
        let user: User =
            serde_json::from_str(r#"{"pnum": 10, "email": "a@example.com"}"#).unwrap();

        assert_eq!(user.pnum, 10);
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert!(user.city.is_none());
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let mut user = User::new(3);
        user.nickname = Some("neo".to_string());

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["pnum"], 3);
        assert_eq!(json["nickname"], "neo");
        assert!(json.get("dob").is_none());
        assert!(json.get("email").is_none());
    }
}
