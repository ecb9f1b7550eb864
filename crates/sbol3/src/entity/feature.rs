//! Sequence features, which own their locations.

use crate::error::PropertyError;
use crate::model::{Identified, List, OwnedList, SbolObject, UriKind};
use crate::validate::ValidationReport;
use crate::vocab::{properties, types};

use super::location::{Location, as_location};

/// Location types a feature may own.
pub const LOCATION_TYPES: &[&str] = &[types::RANGE, types::CUT, types::ENTIRE_SEQUENCE];

/// A region of a sequence, described by one or more locations.
#[derive(Debug)]
pub struct SequenceFeature {
    identified: Identified,
    locations: OwnedList,
    roles: List<UriKind>,
}

impl SequenceFeature {
    fn declare(mut identified: Identified) -> Self {
        let locations = OwnedList::declare(&mut identified, properties::HAS_LOCATION, 1, None)
            .restricted_to(&mut identified, LOCATION_TYPES);
        let roles = List::declare(&mut identified, properties::ROLE, 0, None);
        Self {
            identified,
            locations,
            roles,
        }
    }

    /// Creates a feature with no locations yet. At least one must be added
    /// before the feature validates.
    pub fn new(identity: Option<&str>) -> Result<Self, PropertyError> {
        Ok(Self::declare(Identified::new(identity, types::SEQUENCE_FEATURE)?))
    }

    /// Empty shell used by the builder registry.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self::declare(Identified::shell(identity, type_uri))
    }

    pub fn identified(&self) -> &Identified {
        &self.identified
    }

    /// Attaches a location (a [`Range`](super::Range), [`Cut`](super::Cut) or
    /// [`EntireSequence`](super::EntireSequence)).
    pub fn add_location<T: SbolObject>(&mut self, location: T) -> Result<(), PropertyError> {
        self.locations.add(&mut self.identified, location)
    }

    /// Returns the attached locations in order.
    pub fn locations(&self) -> &[Box<dyn SbolObject>] {
        self.locations.get(&self.identified)
    }

    /// Returns the shared state of every attached location.
    pub fn location_states(&self) -> Vec<&Location> {
        self.locations()
            .iter()
            .filter_map(|child| as_location(&**child))
            .collect()
    }

    pub fn remove_location(&mut self, index: usize) -> Result<Box<dyn SbolObject>, PropertyError> {
        self.locations.remove(&mut self.identified, index)
    }

    pub fn roles(&self) -> Result<Vec<String>, PropertyError> {
        self.roles.get(&self.identified)
    }

    pub fn add_role(&mut self, role: &str) -> Result<(), PropertyError> {
        self.roles.add(&mut self.identified, role.to_string())
    }

    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        self.identified.validate(report)
    }
}

impl_sbol_object!(SequenceFeature, identified);
