//! Object identities.
//!
//! Every object carries a URI identity. Identities start out
//! [`Identity::Provisional`] and become [`Identity::Final`] when the object
//! is attached to a parent or added to a document. Owned children get a
//! derived identity at that moment:
//!
//! ```text
//! child = join(parent.identity, child.display_id)
//! ```
//!
//! where `join` follows POSIX path-join rules. This convention ends up in
//! serialized documents and must be reproduced exactly.

use lazy_static::lazy_static;
use regex_lite::Regex;
use uuid::Uuid;

use crate::error::IdentityError;

lazy_static! {
    static ref URI_PATTERN: Regex =
        Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|\\^`]+$"#).unwrap();
    static ref DISPLAY_ID_PATTERN: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Prefix of opaque UUID identities. These are never treated as
/// hierarchical parents.
pub const UUID_URN_PREFIX: &str = "urn:uuid:";

/// Identity lifecycle of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Not yet attached; may be rewritten once.
    Provisional(String),
    /// Attached to a parent or document; immutable.
    Final(String),
}

impl Identity {
    /// Creates a fresh provisional `urn:uuid:` identity.
    pub fn generate() -> Self {
        Identity::Provisional(format!("{}{}", UUID_URN_PREFIX, Uuid::new_v4()))
    }

    /// Returns the identity string.
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Provisional(s) | Identity::Final(s) => s,
        }
    }

    /// Returns true once the identity can no longer change.
    pub fn is_final(&self) -> bool {
        matches!(self, Identity::Final(_))
    }

    /// Replaces a provisional identity with `identity` and finalizes it.
    pub fn finalize_as(&mut self, identity: String) -> Result<(), IdentityError> {
        if let Identity::Final(current) = self {
            return Err(IdentityError::Finalized {
                identity: current.clone(),
            });
        }
        if !is_valid_uri(&identity) {
            return Err(IdentityError::InvalidUri { identity });
        }
        *self = Identity::Final(identity);
        Ok(())
    }

    /// Finalizes the current identity without changing it.
    pub fn finalize(&mut self) -> Result<(), IdentityError> {
        let identity = self.as_str().to_string();
        self.finalize_as(identity)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `s` is a syntactically valid absolute URI.
pub fn is_valid_uri(s: &str) -> bool {
    URI_PATTERN.is_match(s)
}

/// Returns true if `s` is a valid display id (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_display_id(s: &str) -> bool {
    DISPLAY_ID_PATTERN.is_match(s)
}

/// Returns true if children can derive their identity from `identity`.
///
/// Any absolute URI qualifies except opaque `urn:uuid:` identities.
pub fn is_hierarchical(identity: &str) -> bool {
    is_valid_uri(identity) && !identity.starts_with(UUID_URN_PREFIX)
}

/// Joins a parent identity and a local name with POSIX path-join rules.
///
/// - an absolute `name` replaces the parent entirely
/// - a parent ending in `/` is extended directly
/// - otherwise a single `/` separates the two
pub fn join_identity(parent: &str, name: &str) -> String {
    if name.starts_with('/') {
        return name.to_string();
    }
    if parent.is_empty() || parent.ends_with('/') {
        return format!("{}{}", parent, name);
    }
    format!("{}/{}", parent, name)
}

/// Extracts a display id from the last path segment of an identity.
///
/// Returns `None` when the identity has no path segment or the segment is
/// not a valid display id.
pub fn display_id_from_identity(identity: &str) -> Option<&str> {
    if !is_hierarchical(identity) {
        return None;
    }
    let (_, last) = identity.rsplit_once('/')?;
    is_valid_display_id(last).then_some(last)
}

/// Parses a user-supplied identity.
///
/// Accepts absolute URIs and bare display ids (local aliases that become a
/// real identity once the object is attached to a hierarchical parent).
pub fn parse_identity(s: &str) -> Result<Identity, IdentityError> {
    if is_valid_uri(s) || is_valid_display_id(s) {
        Ok(Identity::Provisional(s.to_string()))
    } else {
        Err(IdentityError::InvalidUri {
            identity: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_identity_posix_rules() {
        assert_eq!(join_identity("urn:p", "x"), "urn:p/x");
        assert_eq!(join_identity("https://example.org/lab/", "x"), "https://example.org/lab/x");
        assert_eq!(join_identity("https://example.org/lab", "x"), "https://example.org/lab/x");
        assert_eq!(join_identity("https://example.org/lab", "/abs"), "/abs");
        assert_eq!(join_identity("", "x"), "x");
    }

    #[test]
    fn test_uri_validation() {
        assert!(is_valid_uri("urn:p"));
        assert!(is_valid_uri("https://example.org/a/b"));
        assert!(!is_valid_uri("x"));
        assert!(!is_valid_uri(""));
        assert!(!is_valid_uri("urn:has space"));
        assert!(!is_valid_uri("1abc:foo"));
    }

    #[test]
    fn test_hierarchical() {
        assert!(is_hierarchical("urn:p"));
        assert!(is_hierarchical("https://example.org/p"));
        assert!(!is_hierarchical("urn:uuid:550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_hierarchical("local_name"));
    }

    #[test]
    fn test_display_id_from_identity() {
        assert_eq!(display_id_from_identity("https://example.org/lab/gfp"), Some("gfp"));
        assert_eq!(display_id_from_identity("urn:p/x"), Some("x"));
        assert_eq!(display_id_from_identity("urn:p"), None);
        assert_eq!(display_id_from_identity("https://example.org/lab/1bad"), None);
    }

    #[test]
    fn test_finalize_once() {
        let mut id = Identity::Provisional("x".to_string());
        assert!(matches!(id.finalize(), Err(IdentityError::InvalidUri { .. })));
        assert!(!id.is_final());

        id.finalize_as("urn:p/x".to_string()).unwrap();
        assert!(id.is_final());
        assert_eq!(id.as_str(), "urn:p/x");

        let err = id.finalize_as("urn:q/x".to_string()).unwrap_err();
        assert_eq!(
            err,
            IdentityError::Finalized {
                identity: "urn:p/x".to_string()
            }
        );
        assert_eq!(id.as_str(), "urn:p/x");
    }

    #[test]
    fn test_generated_identity_is_opaque() {
        let id = Identity::generate();
        assert!(id.as_str().starts_with(UUID_URN_PREFIX));
        assert!(is_valid_uri(id.as_str()));
        assert!(!is_hierarchical(id.as_str()));
    }

    #[test]
    fn test_parse_identity() {
        assert!(parse_identity("urn:p").is_ok());
        assert!(parse_identity("local_name").is_ok());
        assert!(parse_identity("not a uri").is_err());
    }
}
