//! SBOL3: a typed object model over a triple graph.
//!
//! This crate binds strongly typed, cardinality-constrained properties onto
//! graph-backed objects, validates them, and reads and writes them through a
//! generic triple graph.
//!
//! # Overview
//!
//! The object model distinguishes three kinds of properties:
//! - **Scalar** properties hold literal values or vocabulary URIs
//! - **Owned** properties hold child objects whose identity is derived from
//!   the parent and whose lifetime is bound to it
//! - **Referenced** properties hold the identity of another object and are
//!   resolved on demand
//!
//! # Quick Start
//!
//! ```rust
//! use sbol3::{Document, Range, SequenceFeature};
//! use sbol3::validate::rules;
//!
//! let seq = "https://example.org/lab/seq1";
//! let mut feature = SequenceFeature::new(Some("https://example.org/lab/f1")).unwrap();
//!
//! // The location takes its identity from the feature.
//! feature.add_location(Range::new(Some("r1"), seq, 10, 5).unwrap()).unwrap();
//!
//! let mut doc = Document::new();
//! doc.add(feature).unwrap();
//! assert!(doc.contains("https://example.org/lab/f1/r1"));
//!
//! // Findings are collected, never raised.
//! let report = doc.validate();
//! assert!(report.has_rule(rules::RANGE_ORDER));
//!
//! // Documents round-trip through a triple graph.
//! let graph = doc.to_graph();
//! let read = sbol3::Document::from_graph(&graph).unwrap();
//! assert_eq!(read.to_graph().triples(), graph.triples());
//! ```
//!
//! # Modules
//!
//! - [`model`]: Identities, values, property handles and [`Identified`]
//! - [`entity`]: Bundled entity types (locations, features, interactions)
//! - [`validate`]: Validation reports, rule codes and options
//! - [`registry`]: Type URI to builder mapping used when reading graphs
//! - [`document`]: Top-level object container and graph conversion
//! - [`graph`]: Minimal in-memory triple graph
//! - [`vocab`]: Well-known URIs
//! - [`error`]: Error types
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (attachment, builder registration,
//! graph loading) and installs no subscriber of its own.

pub mod document;
pub mod entity;
pub mod error;
pub mod graph;
pub mod model;
pub mod registry;
pub mod validate;
pub mod vocab;

// Re-export commonly used types at crate root
pub use document::Document;
pub use entity::{Cut, EntireSequence, Interaction, Location, Participation, Range, SequenceFeature};
pub use error::{DocumentError, ErrorCode, IdentityError, PropertyError, RegistryError};
pub use graph::{Graph, Triple};
pub use model::{
    Cardinality, DataType, Identified, Identity, List, OwnedList, OwnedSingleton, PropertyDef,
    PropertyKind, ReferencedObject, ReferencedObjects, Rule, SbolObject, Singleton, Value,
};
pub use registry::{Builder, register_builder};
pub use validate::{Severity, ValidationIssue, ValidationOptions, ValidationReport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
