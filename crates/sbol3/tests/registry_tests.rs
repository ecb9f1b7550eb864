use proptest::prelude::*;
use sbol3::model::{IntKind, List, TextKind, UriKind};
use sbol3::registry::{build, is_registered};
use sbol3::vocab::{RDF_TYPE, types};
use sbol3::{
    Document, Graph, Identified, Range, RegistryError, SbolObject, Singleton, Value,
    register_builder,
};

const TYPE_A: &str = "urn:TypeA";
const COUNT: &str = "urn:TypeA#count";
const LABELS: &str = "urn:TypeA#label";

/// A custom entity type with required properties.
#[derive(Debug)]
struct TypeA {
    identified: Identified,
    count: Singleton<IntKind>,
    labels: List<TextKind>,
}

impl TypeA {
    fn shell(identity: &str, type_uri: &str) -> Self {
        let mut identified = Identified::shell(identity, type_uri);
        let count = Singleton::declare(&mut identified, COUNT, 1);
        let labels = List::declare(&mut identified, LABELS, 1, Some(3));
        Self {
            identified,
            count,
            labels,
        }
    }
}

impl SbolObject for TypeA {
    fn identified(&self) -> &Identified {
        &self.identified
    }

    fn identified_mut(&mut self) -> &mut Identified {
        &mut self.identified
    }

    fn validate(&self, report: Option<sbol3::ValidationReport>) -> sbol3::ValidationReport {
        self.identified.validate(report)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

fn build_type_a(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(TypeA::shell(identity, type_uri))
}

fn ensure_type_a() {
    match register_builder(TYPE_A, build_type_a) {
        Ok(()) | Err(RegistryError::DuplicateBuilder { .. }) => {}
        Err(e) => panic!("unexpected registry error: {}", e),
    }
}

#[test]
fn test_builder_produces_empty_shell() {
    ensure_type_a();
    assert!(is_registered(TYPE_A));

    let obj = build(TYPE_A, "urn:obj1").unwrap();
    assert_eq!(obj.identity(), "urn:obj1");
    assert_eq!(obj.type_uri(), TYPE_A);
    assert!(obj.identified().values(COUNT).is_empty());
    assert!(obj.identified().values(LABELS).is_empty());

    let report = obj.validate(None);
    assert_eq!(report.errors().count(), 2);
}

#[test]
fn test_duplicate_registration_is_rejected() {
    ensure_type_a();
    assert!(matches!(
        register_builder(TYPE_A, build_type_a),
        Err(RegistryError::DuplicateBuilder { .. })
    ));
}

#[test]
fn test_custom_type_reads_from_graph() {
    ensure_type_a();
    let mut graph = Graph::new();
    graph.add("urn:obj1", RDF_TYPE, Value::Uri(TYPE_A.to_string()));
    graph.add("urn:obj1", COUNT, Value::Int(3));
    graph.add("urn:obj1", LABELS, Value::Text("b".to_string()));
    graph.add("urn:obj1", LABELS, Value::Text("a".to_string()));

    let doc = Document::from_graph(&graph).unwrap();
    let obj = doc.find_as::<TypeA>("urn:obj1").unwrap();
    assert_eq!(obj.count.get(&obj.identified).unwrap(), Some(3));
    assert_eq!(obj.labels.get(&obj.identified).unwrap(), vec!["b", "a"]);
    assert!(doc.validate().is_empty());
}

proptest! {
    #[test]
    fn prop_range_values_survive_rebuild(
        start in -5i64..500,
        end in -5i64..500,
        order in proptest::option::of(0i64..10),
        inline in any::<bool>(),
    ) {
        let mut original = Range::new(Some("https://example.org/lab/r1"), "urn:seq1", start, end).unwrap();
        original.location_mut().set_order(order).unwrap();
        let orientation = if inline {
            sbol3::vocab::orientation::INLINE
        } else {
            sbol3::vocab::orientation::REVERSE_COMPLEMENT
        };
        original.location_mut().set_orientation(Some(orientation)).unwrap();

        let mut rebuilt = build(types::RANGE, original.identity()).unwrap();
        for (uri, values) in original.identified().property_values() {
            rebuilt.identified_mut().load_values(uri, values.to_vec());
        }

        for def in original.identified().property_defs() {
            prop_assert_eq!(rebuilt.identified().values(def.uri), original.identified().values(def.uri));
        }
        let range = rebuilt.downcast_ref::<Range>().unwrap();
        prop_assert_eq!(range.start().unwrap(), Some(start));
        prop_assert_eq!(range.end().unwrap(), Some(end));
        prop_assert_eq!(range.location().order().unwrap(), order);
    }

    #[test]
    fn prop_labels_keep_insertion_order(labels in proptest::collection::vec("[a-z]{1,6}", 0..8)) {
        let mut obj = Identified::new(Some("urn:obj"), "urn:T").unwrap();
        let tags = List::<UriKind>::declare(&mut obj, "urn:tag", 0, None);
        for label in &labels {
            tags.add(&mut obj, format!("urn:{}", label)).unwrap();
        }
        let expected: Vec<String> = labels.iter().map(|l| format!("urn:{}", l)).collect();
        prop_assert_eq!(tags.get(&obj).unwrap(), expected);
    }
}
