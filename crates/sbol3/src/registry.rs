//! Builder registry.
//!
//! Reading a graph requires turning a type URI into a concrete entity. The
//! registry maps type URIs to [`Builder`] functions that produce an empty
//! shell: an object with its properties declared and no values stored.
//! The document loader then bulk-loads the graph's values into the shell,
//! and minimum cardinality is left to validation.
//!
//! The registry is process-wide and append-only. Built-in entity types are
//! installed when it is first touched; further types can be added with
//! [`register_builder`].

use std::sync::{PoisonError, RwLock};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::entity;
use crate::error::RegistryError;
use crate::model::SbolObject;

/// Produces an empty shell for `(identity, type_uri)`.
pub type Builder = fn(identity: &str, type_uri: &str) -> Box<dyn SbolObject>;

lazy_static! {
    static ref BUILDERS: RwLock<FxHashMap<String, Builder>> = {
        let mut builders: FxHashMap<String, Builder> = FxHashMap::default();
        for (type_uri, builder) in entity::builtin_builders() {
            builders.insert(type_uri.to_string(), builder);
        }
        RwLock::new(builders)
    };
}

/// Registers `builder` for `type_uri`.
///
/// Fails if a builder is already registered for that type, built-ins
/// included.
pub fn register_builder(type_uri: &str, builder: Builder) -> Result<(), RegistryError> {
    let mut builders = BUILDERS.write().unwrap_or_else(PoisonError::into_inner);
    if builders.contains_key(type_uri) {
        return Err(RegistryError::DuplicateBuilder {
            type_uri: type_uri.to_string(),
        });
    }
    builders.insert(type_uri.to_string(), builder);
    debug!(type_uri, "registered builder");
    Ok(())
}

/// Returns true if a builder is registered for `type_uri`.
pub fn is_registered(type_uri: &str) -> bool {
    BUILDERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(type_uri)
}

/// Builds an empty shell of type `type_uri` with identity `identity`.
pub fn build(type_uri: &str, identity: &str) -> Result<Box<dyn SbolObject>, RegistryError> {
    let builder = BUILDERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(type_uri)
        .copied()
        .ok_or_else(|| RegistryError::UnknownType {
            type_uri: type_uri.to_string(),
        })?;
    Ok(builder(identity, type_uri))
}

/// Returns every registered type URI, sorted.
pub fn registered_types() -> Vec<String> {
    let mut types: Vec<String> = BUILDERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect();
    types.sort();
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Range;
    use crate::model::Identified;
    use crate::vocab::types;

    fn build_plain(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
        Box::new(Identified::shell(identity, type_uri))
    }

    #[test]
    fn test_builtins_are_installed() {
        assert!(is_registered(types::RANGE));
        assert!(is_registered(types::SEQUENCE_FEATURE));
        let types = registered_types();
        assert!(types.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_build_returns_empty_shell() {
        let obj = build(types::RANGE, "https://example.org/f/r1").unwrap();
        assert_eq!(obj.type_uri(), types::RANGE);
        assert_eq!(obj.identity(), "https://example.org/f/r1");
        assert!(obj.identified().property_values().next().is_none());
        assert!(obj.downcast_ref::<Range>().is_some());
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            build("urn:registry-test:Unknown", "urn:x"),
            Err(RegistryError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        register_builder("urn:registry-test:Plain", build_plain).unwrap();
        assert!(matches!(
            register_builder("urn:registry-test:Plain", build_plain),
            Err(RegistryError::DuplicateBuilder { .. })
        ));
        assert!(matches!(
            register_builder(types::RANGE, build_plain),
            Err(RegistryError::DuplicateBuilder { .. })
        ));
        let obj = build("urn:registry-test:Plain", "urn:x").unwrap();
        assert_eq!(obj.type_uri(), "urn:registry-test:Plain");
    }
}
