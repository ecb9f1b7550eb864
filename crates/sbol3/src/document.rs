//! Documents: the top-level container of objects.
//!
//! A document holds top-level objects by identity and finds nested owned
//! objects by walking ownership. It converts to and from a [`Graph`]:
//!
//! - writing emits `rdf:type`, every stored value, and one link triple per
//!   owned child followed by the child's own triples
//! - reading builds a shell per subject through the builder registry,
//!   bulk-loads its values, then attaches owned children bottom-up

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::entity::build_identified;
use crate::error::{DocumentError, RegistryError};
use crate::graph::{Graph, Triple};
use crate::model::{PropertyKind, SbolObject, Value};
use crate::registry;
use crate::validate::{self, ValidationOptions, ValidationReport};
use crate::vocab::RDF_TYPE;

/// A collection of top-level objects.
///
/// Objects cannot be mutated once added, so the identities of nested owned
/// objects are indexed alongside the top-level ones.
#[derive(Debug, Default)]
pub struct Document {
    objects: Vec<Box<dyn SbolObject>>,
    /// Identity of every object, nested ones included -> position of its
    /// top-level object in `objects`.
    index: FxHashMap<String, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level object and finalizes its identity.
    ///
    /// Neither the identity nor that of any object it owns may name an
    /// object already in the document, nested ones included.
    pub fn add<T: SbolObject>(&mut self, obj: T) -> Result<(), DocumentError> {
        self.add_boxed(Box::new(obj))
    }

    pub fn add_boxed(&mut self, mut obj: Box<dyn SbolObject>) -> Result<(), DocumentError> {
        let mut identities = Vec::new();
        collect_identities(obj.as_ref(), &mut identities);
        if let Some(duplicate) = identities.iter().find(|id| self.index.contains_key(id.as_str())) {
            return Err(DocumentError::DuplicateIdentity {
                identity: duplicate.clone(),
            });
        }
        if !obj.identified().identity_state().is_final() {
            obj.identified_mut().finalize_identity(None)?;
        }

        debug!(identity = obj.identity(), type_uri = obj.type_uri(), "added object to document");
        let position = self.objects.len();
        for identity in identities {
            self.index.insert(identity, position);
        }
        self.objects.push(obj);
        Ok(())
    }

    /// Finds an object by identity, searching owned objects too.
    pub fn find(&self, identity: &str) -> Option<&dyn SbolObject> {
        let root = self.objects[*self.index.get(identity)?].as_ref();
        if root.identity() == identity {
            return Some(root);
        }
        find_owned(root, identity)
    }

    /// Finds an object of type `T`, searching owned objects too.
    pub fn find_as<T: SbolObject>(&self, identity: &str) -> Option<&T> {
        self.find(identity).and_then(|obj| obj.downcast_ref::<T>())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    /// Removes a top-level object and returns it.
    ///
    /// Nested objects cannot be removed this way.
    pub fn remove(&mut self, identity: &str) -> Option<Box<dyn SbolObject>> {
        let position = *self.index.get(identity)?;
        if self.objects[position].identity() != identity {
            return None;
        }
        let removed = self.objects.remove(position);
        self.index.retain(|_, slot| *slot != position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Iterates over top-level objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &dyn SbolObject> {
        self.objects.iter().map(|obj| obj.as_ref())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Validates with the default options.
    pub fn validate(&self) -> ValidationReport {
        self.validate_with(&ValidationOptions::default())
    }

    pub fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        validate::validate_document(self, options)
    }

    // =========================================================================
    // Graph conversion
    // =========================================================================

    /// Writes every object to a new graph.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        for obj in &self.objects {
            write_object(obj.as_ref(), &mut graph);
        }
        graph
    }

    /// Reads a document from `graph`.
    ///
    /// Subjects whose type has no registered builder are read as plain
    /// `Identified` objects. Every subject needs an `rdf:type`, and each
    /// owned subject must have exactly one owner.
    pub fn from_graph(graph: &Graph) -> Result<Self, DocumentError> {
        let mut shells: FxHashMap<String, Box<dyn SbolObject>> = FxHashMap::default();
        let mut links: FxHashMap<String, Vec<(&'static str, String)>> = FxHashMap::default();
        let mut owned: FxHashSet<String> = FxHashSet::default();

        for subject in graph.subjects() {
            let type_uri = graph.type_of(subject).ok_or_else(|| DocumentError::MissingType {
                subject: subject.to_string(),
            })?;
            let mut shell = match registry::build(type_uri, subject) {
                Ok(shell) => shell,
                Err(RegistryError::UnknownType { .. }) => {
                    warn!(subject, type_uri, "no builder registered; reading as Identified");
                    build_identified(subject, type_uri)
                }
                Err(e) => return Err(e.into()),
            };

            let mut values: Vec<(&str, Vec<Value>)> = Vec::new();
            let mut type_consumed = false;
            for triple in graph.triples_of(subject) {
                if !type_consumed
                    && triple.predicate == RDF_TYPE
                    && triple.object.as_uri() == Some(type_uri)
                {
                    type_consumed = true;
                    continue;
                }
                let owned_def = shell
                    .identified()
                    .property_def(&triple.predicate)
                    .filter(|def| def.kind == PropertyKind::Owned)
                    .map(|def| def.uri);
                match (owned_def, triple.object.as_uri()) {
                    (Some(property), Some(child)) => {
                        if !owned.insert(child.to_string()) {
                            return Err(DocumentError::SharedOwnership {
                                subject: child.to_string(),
                            });
                        }
                        links
                            .entry(subject.to_string())
                            .or_default()
                            .push((property, child.to_string()));
                    }
                    _ => match values.iter_mut().find(|(p, _)| *p == triple.predicate) {
                        Some((_, slot)) => slot.push(triple.object.clone()),
                        None => values.push((triple.predicate.as_str(), vec![triple.object.clone()])),
                    },
                }
            }
            for (predicate, loaded) in values {
                shell.identified_mut().load_values(predicate, loaded);
            }
            shells.insert(subject.to_string(), shell);
        }

        let mut document = Document::new();
        let roots: Vec<&str> = graph.subjects().filter(|s| !owned.contains(*s)).collect();
        for root in roots {
            let obj = assemble(root, &mut shells, &links)?;
            document.add_boxed(obj)?;
        }
        if let Some(subject) = graph.subjects().find(|s| shells.contains_key(*s)) {
            return Err(DocumentError::OwnershipCycle {
                subject: subject.to_string(),
            });
        }

        debug!(
            subjects = graph.subjects().count(),
            objects = document.len(),
            "read document from graph"
        );
        Ok(document)
    }
}

fn collect_identities(obj: &dyn SbolObject, identities: &mut Vec<String>) {
    identities.push(obj.identity().to_string());
    for (_, child) in obj.identified().owned_objects() {
        collect_identities(child, identities);
    }
}

fn find_owned<'a>(obj: &'a dyn SbolObject, identity: &str) -> Option<&'a dyn SbolObject> {
    for (_, child) in obj.identified().owned_objects() {
        if child.identity() == identity {
            return Some(child);
        }
        if let Some(found) = find_owned(child, identity) {
            return Some(found);
        }
    }
    None
}

fn write_object(obj: &dyn SbolObject, graph: &mut Graph) {
    let subject = obj.identity();
    graph.add(subject, RDF_TYPE, Value::Uri(obj.type_uri().to_string()));
    for (property, values) in obj.identified().property_values() {
        for value in values {
            graph.insert(Triple::new(subject, property, value.clone()));
        }
    }
    for (property, child) in obj.identified().owned_objects() {
        graph.add(subject, property, Value::Uri(child.identity().to_string()));
    }
    for (_, child) in obj.identified().owned_objects() {
        write_object(child, graph);
    }
}

/// Takes `subject` out of `shells` and attaches its owned children,
/// recursively.
fn assemble(
    subject: &str,
    shells: &mut FxHashMap<String, Box<dyn SbolObject>>,
    links: &FxHashMap<String, Vec<(&'static str, String)>>,
) -> Result<Box<dyn SbolObject>, DocumentError> {
    let mut obj = shells.remove(subject).ok_or_else(|| DocumentError::OwnershipCycle {
        subject: subject.to_string(),
    })?;
    for (property, child) in links.get(subject).into_iter().flatten() {
        if !shells.contains_key(child.as_str()) {
            return Err(DocumentError::MissingType {
                subject: child.clone(),
            });
        }
        let child = assemble(child, shells, links)?;
        obj.identified_mut().attach_loaded(property, child)?;
    }
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Range, SequenceFeature};
    use crate::model::Identified;
    use crate::vocab::{properties, types};

    const SEQ: &str = "https://example.org/lab/seq1";

    fn feature() -> SequenceFeature {
        let mut feature = SequenceFeature::new(Some("https://example.org/lab/f1")).unwrap();
        feature.add_location(Range::new(Some("r1"), SEQ, 1, 10).unwrap()).unwrap();
        feature
    }

    #[test]
    fn test_add_and_find_nested() {
        let mut doc = Document::new();
        doc.add(feature()).unwrap();

        assert!(doc.contains("https://example.org/lab/f1"));
        let range = doc.find("https://example.org/lab/f1/r1").unwrap();
        assert_eq!(range.type_uri(), types::RANGE);
        assert!(doc.find_as::<SequenceFeature>("https://example.org/lab/f1").is_some());
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut doc = Document::new();
        doc.add(feature()).unwrap();
        assert!(matches!(
            doc.add(feature()),
            Err(DocumentError::DuplicateIdentity { .. })
        ));
        let nested = Identified::new(Some("https://example.org/lab/f1/r1"), "urn:T").unwrap();
        assert!(matches!(
            doc.add(nested),
            Err(DocumentError::DuplicateIdentity { .. })
        ));
    }

    #[test]
    fn test_nested_identity_of_incoming_object_rejected() {
        let mut doc = Document::new();
        doc.add(Range::new(Some("https://example.org/lab/f1/r1"), SEQ, 1, 2).unwrap())
            .unwrap();
        assert!(matches!(
            doc.add(feature()),
            Err(DocumentError::DuplicateIdentity { identity }) if identity == "https://example.org/lab/f1/r1"
        ));
        assert_eq!(doc.len(), 1);
        assert!(!doc.contains("https://example.org/lab/f1"));
    }

    #[test]
    fn test_bare_display_id_cannot_be_top_level() {
        let mut doc = Document::new();
        let local = Identified::new(Some("local"), "urn:T").unwrap();
        assert!(matches!(doc.add(local), Err(DocumentError::Identity(_))));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut doc = Document::new();
        doc.add(Identified::new(Some("urn:a"), "urn:T").unwrap()).unwrap();
        doc.add(Identified::new(Some("urn:b"), "urn:T").unwrap()).unwrap();
        doc.add(Identified::new(Some("urn:c"), "urn:T").unwrap()).unwrap();

        let removed = doc.remove("urn:a").unwrap();
        assert!(removed.identified().identity_state().is_final());
        assert!(doc.remove("urn:a").is_none());
        assert_eq!(doc.find("urn:c").map(|o| o.identity()), Some("urn:c"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_graph_round_trip() {
        let mut doc = Document::new();
        doc.add(feature()).unwrap();
        let graph = doc.to_graph();
        assert_eq!(
            graph.objects("https://example.org/lab/f1", properties::HAS_LOCATION).count(),
            1
        );

        let read = Document::from_graph(&graph).unwrap();
        assert_eq!(read.len(), 1);
        let feature = read.find_as::<SequenceFeature>("https://example.org/lab/f1").unwrap();
        assert_eq!(feature.locations().len(), 1);
        let range = read.find_as::<Range>("https://example.org/lab/f1/r1").unwrap();
        assert_eq!(range.start().unwrap(), Some(1));
        assert_eq!(range.end().unwrap(), Some(10));
        assert_eq!(read.to_graph().triples(), graph.triples());
    }

    #[test]
    fn test_from_graph_keeps_repeated_type_triples() {
        let mut graph = Graph::new();
        graph.add("urn:a", RDF_TYPE, Value::Uri("urn:document-test:Thing".to_string()));
        graph.add("urn:a", RDF_TYPE, Value::Uri("urn:document-test:Thing".to_string()));

        let doc = Document::from_graph(&graph).unwrap();
        let obj = doc.find("urn:a").unwrap();
        assert_eq!(obj.type_uri(), "urn:document-test:Thing");
        assert_eq!(doc.to_graph().objects("urn:a", RDF_TYPE).count(), 2);
    }

    #[test]
    fn test_remove_drops_nested_identities() {
        let mut doc = Document::new();
        doc.add(feature()).unwrap();
        assert!(doc.remove("https://example.org/lab/f1/r1").is_none());

        assert!(doc.remove("https://example.org/lab/f1").is_some());
        assert!(!doc.contains("https://example.org/lab/f1/r1"));
        doc.add(feature()).unwrap();
        assert!(doc.find("https://example.org/lab/f1/r1").is_some());
    }

    #[test]
    fn test_from_graph_missing_type() {
        let mut graph = Graph::new();
        graph.add("urn:a", properties::NAME, Value::Text("a".to_string()));
        assert!(matches!(
            Document::from_graph(&graph),
            Err(DocumentError::MissingType { .. })
        ));
    }

    #[test]
    fn test_from_graph_unknown_type_falls_back() {
        let mut graph = Graph::new();
        graph.add("urn:a", RDF_TYPE, Value::Uri("urn:document-test:Unknown".to_string()));
        graph.add("urn:a", "urn:document-test:extra", Value::Int(7));

        let doc = Document::from_graph(&graph).unwrap();
        let obj = doc.find("urn:a").unwrap();
        assert!(obj.downcast_ref::<Identified>().is_some());
        assert_eq!(obj.identified().values("urn:document-test:extra"), &[Value::Int(7)]);
    }

    #[test]
    fn test_from_graph_shared_ownership() {
        let mut graph = Graph::new();
        for f in ["urn:f1", "urn:f2"] {
            graph.add(f, RDF_TYPE, Value::Uri(types::SEQUENCE_FEATURE.to_string()));
            graph.add(f, properties::HAS_LOCATION, Value::Uri("urn:f1/r".to_string()));
        }
        graph.add("urn:f1/r", RDF_TYPE, Value::Uri(types::RANGE.to_string()));
        assert!(matches!(
            Document::from_graph(&graph),
            Err(DocumentError::SharedOwnership { .. })
        ));
    }

    #[test]
    fn test_from_graph_ownership_cycle() {
        let mut graph = Graph::new();
        for (f, g) in [("urn:f1", "urn:f2"), ("urn:f2", "urn:f1")] {
            graph.add(f, RDF_TYPE, Value::Uri(types::SEQUENCE_FEATURE.to_string()));
            graph.add(f, properties::HAS_LOCATION, Value::Uri(g.to_string()));
        }
        assert!(matches!(
            Document::from_graph(&graph),
            Err(DocumentError::OwnershipCycle { .. })
        ));
    }
}
