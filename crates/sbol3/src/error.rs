//! Error types for property access, identity management, the builder
//! registry and documents.
//!
//! These are the *immediate* failures: wrong value kinds, cardinality
//! overflow, identity conflicts. Document-consistency problems are never
//! returned as errors; they are collected in a
//! [`ValidationReport`](crate::validate::ValidationReport).

use thiserror::Error;

use crate::model::{DataType, PropertyKind};

/// Error codes carried in the message of every error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Value or object of the wrong kind
    TypeMismatch,
    /// E002: Cardinality or position out of range
    Cardinality,
    /// E003: Malformed or immutable identity
    Identity,
    /// E004: Derived identity collides with a sibling
    DuplicateUri,
    /// E005: Builder registry lookup or registration failure
    Registry,
    /// E006: Document-level conflict
    Document,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::TypeMismatch => "E001",
            ErrorCode::Cardinality => "E002",
            ErrorCode::Identity => "E003",
            ErrorCode::DuplicateUri => "E004",
            ErrorCode::Registry => "E005",
            ErrorCode::Document => "E006",
        }
    }
}

/// Error computing, parsing or changing an object identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("[E003] invalid identity URI: {identity:?}")]
    InvalidUri { identity: String },

    #[error("[E003] invalid display id: {display_id:?}")]
    InvalidDisplayId { display_id: String },

    #[error("[E003] identity {identity:?} is final and cannot be changed")]
    Finalized { identity: String },
}

impl IdentityError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Identity
    }
}

/// Error reading or writing a property.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    // === E001: Type errors ===
    #[error("[E001] property {property}: expected {expected:?} value, found {found:?}")]
    TypeMismatch {
        property: String,
        expected: DataType,
        found: DataType,
    },

    #[error("[E001] property {property} does not accept objects of type {found}")]
    WrongObjectType { property: String, found: String },

    #[error("[E001] property {property} is {kind:?}, not usable through this accessor")]
    KindMismatch { property: String, kind: PropertyKind },

    #[error("[E001] property {property} is not declared on {owner}")]
    NotDeclared { property: String, owner: String },

    // === E002: Cardinality / position ===
    #[error("[E002] property {property} allows at most {upper} values, got {attempted}")]
    TooManyValues {
        property: String,
        upper: usize,
        attempted: usize,
    },

    #[error("[E002] property {property} index {index} out of bounds (len: {len})")]
    IndexOutOfBounds {
        property: String,
        index: usize,
        len: usize,
    },

    // === E003: Identity ===
    #[error("[E003] object {child} added to {property} has no display id")]
    MissingDisplayId { property: String, child: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    // === E004: Uniqueness ===
    #[error("[E004] duplicate URI {uri} under property {property}")]
    DuplicateUri { property: String, uri: String },
}

impl PropertyError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PropertyError::TypeMismatch { .. }
            | PropertyError::WrongObjectType { .. }
            | PropertyError::KindMismatch { .. }
            | PropertyError::NotDeclared { .. } => ErrorCode::TypeMismatch,
            PropertyError::TooManyValues { .. } | PropertyError::IndexOutOfBounds { .. } => {
                ErrorCode::Cardinality
            }
            PropertyError::MissingDisplayId { .. } | PropertyError::Identity(_) => {
                ErrorCode::Identity
            }
            PropertyError::DuplicateUri { .. } => ErrorCode::DuplicateUri,
        }
    }
}

/// Error registering or invoking an object builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("[E005] a builder is already registered for {type_uri}")]
    DuplicateBuilder { type_uri: String },

    #[error("[E005] no builder registered for {type_uri}")]
    UnknownType { type_uri: String },
}

impl RegistryError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Registry
    }
}

/// Error adding objects to a document or loading one from a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("[E006] document already contains an object with identity {identity}")]
    DuplicateIdentity { identity: String },

    #[error("[E006] subject {subject} has no rdf:type")]
    MissingType { subject: String },

    #[error("[E006] subject {subject} is owned by more than one parent")]
    SharedOwnership { subject: String },

    #[error("[E006] subject {subject} is part of an ownership cycle")]
    OwnershipCycle { subject: String },

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl DocumentError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::Property(e) => e.code(),
            DocumentError::Identity(e) => e.code(),
            DocumentError::Registry(_) => ErrorCode::Registry,
            _ => ErrorCode::Document,
        }
    }
}
