//! A minimal in-memory triple graph.
//!
//! This is the storage collaborator documents are loaded from and written
//! to. Triples keep their insertion order, and duplicate triples are kept,
//! so list-valued properties survive a round trip unchanged.

use rustc_hash::FxHashMap;

use crate::model::Value;
use crate::vocab::RDF_TYPE;

/// A single `(subject, predicate, object)` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Value,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Value) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// An ordered collection of triples indexed by subject.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    /// Subject -> positions in `triples`.
    by_subject: FxHashMap<String, Vec<usize>>,
    /// Subjects in order of first appearance.
    subjects: Vec<String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a triple.
    pub fn insert(&mut self, triple: Triple) {
        let position = self.triples.len();
        match self.by_subject.get_mut(&triple.subject) {
            Some(positions) => positions.push(position),
            None => {
                self.subjects.push(triple.subject.clone());
                self.by_subject.insert(triple.subject.clone(), vec![position]);
            }
        }
        self.triples.push(triple);
    }

    /// Appends `(subject, predicate, object)`.
    pub fn add(&mut self, subject: &str, predicate: &str, object: Value) {
        self.insert(Triple::new(subject, predicate, object));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns every triple in insertion order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Returns every distinct subject in order of first appearance.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(String::as_str)
    }

    /// Returns the triples whose subject is `subject`, in insertion order.
    pub fn triples_of<'a>(&'a self, subject: &str) -> impl Iterator<Item = &'a Triple> {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(|&position| &self.triples[position])
    }

    /// Returns the objects of `(subject, predicate, *)` in insertion order.
    pub fn objects<'a>(&'a self, subject: &str, predicate: &'a str) -> impl Iterator<Item = &'a Value> {
        self.triples_of(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Returns the first `rdf:type` of `subject`.
    pub fn type_of(&self, subject: &str) -> Option<&str> {
        self.objects(subject, RDF_TYPE).find_map(Value::as_uri)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        for triple in iter {
            graph.insert(triple);
        }
        graph
    }
}
