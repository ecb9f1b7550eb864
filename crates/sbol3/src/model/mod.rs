//! The typed object model.
//!
//! This module contains the building blocks every entity is made of:
//! - Identities and the child-identity join rule
//! - Stored values and their user-facing kinds
//! - Property declarations, handles and list machinery
//! - Ownership and reference properties
//! - The shared [`Identified`] state and the [`SbolObject`] trait

pub mod identity;
pub mod object;
pub mod owned;
pub mod property;
pub mod reference;
pub mod value;

pub use identity::{
    Identity, UUID_URN_PREFIX, is_hierarchical, is_valid_display_id, is_valid_uri, join_identity,
};
pub use object::{Identified, SbolObject};
pub use owned::{OwnedList, OwnedSingleton};
pub use property::{Cardinality, List, PropertyDef, PropertyKind, PropertySlot, Rule, Singleton};
pub use reference::{ReferencedObject, ReferencedObjects, dangling_references};
pub use value::{BoolKind, DataType, FloatKind, IntKind, RefKind, TextKind, UriKind, Value, ValueKind};
