//! Locations: where on a sequence a feature sits.
//!
//! [`Location`] holds the properties every location shares and is embedded
//! in the concrete variants [`Range`], [`Cut`] and [`EntireSequence`].

use crate::error::PropertyError;
use crate::model::{
    Identified, IntKind, ReferencedObject, SbolObject, Singleton, UriKind, is_valid_display_id,
    is_valid_uri,
};
use crate::validate::{ValidationReport, rules};
use crate::vocab::{properties, types};

/// State shared by every location variant.
#[derive(Debug)]
pub struct Location {
    identified: Identified,
    sequence: ReferencedObject,
    orientation: Singleton<UriKind>,
    order: Singleton<IntKind>,
}

impl Location {
    fn declare(mut identified: Identified) -> Self {
        let sequence = ReferencedObject::declare(&mut identified, properties::SEQUENCES, 1);
        let orientation = Singleton::declare(&mut identified, properties::ORIENTATION, 0);
        let order = Singleton::declare(&mut identified, properties::ORDER, 0);
        Self {
            identified,
            sequence,
            orientation,
            order,
        }
    }

    fn new(identity: Option<&str>, type_uri: &str, sequence: &str) -> Result<Self, PropertyError> {
        let mut location = Self::declare(Identified::new(identity, type_uri)?);
        location.set_sequence(sequence)?;
        Ok(location)
    }

    pub fn identified(&self) -> &Identified {
        &self.identified
    }

    pub fn identified_mut(&mut self) -> &mut Identified {
        &mut self.identified
    }

    /// Identity of the sequence this location refers to.
    pub fn sequence(&self) -> Result<Option<String>, PropertyError> {
        self.sequence.get(&self.identified)
    }

    pub fn set_sequence(&mut self, sequence: &str) -> Result<(), PropertyError> {
        self.sequence.set(&mut self.identified, sequence.to_string())
    }

    pub fn set_sequence_object(&mut self, sequence: &dyn SbolObject) -> Result<(), PropertyError> {
        self.sequence.set_object(&mut self.identified, sequence)
    }

    pub fn orientation(&self) -> Result<Option<String>, PropertyError> {
        self.orientation.get(&self.identified)
    }

    pub fn set_orientation(&mut self, orientation: Option<&str>) -> Result<(), PropertyError> {
        match orientation {
            Some(orientation) => self.orientation.set(&mut self.identified, orientation.to_string()),
            None => {
                self.orientation.clear(&mut self.identified);
                Ok(())
            }
        }
    }

    pub fn order(&self) -> Result<Option<i64>, PropertyError> {
        self.order.get(&self.identified)
    }

    pub fn set_order(&mut self, order: Option<i64>) -> Result<(), PropertyError> {
        match order {
            Some(order) => self.order.set(&mut self.identified, order),
            None => {
                self.order.clear(&mut self.identified);
                Ok(())
            }
        }
    }

    /// Runs the generic checks, then requires the sequence reference to be
    /// a URI or a local display id. A missing sequence is a cardinality
    /// finding.
    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        let mut report = self.identified.validate(report);
        if let Ok(Some(sequence)) = self.sequence() {
            if !is_valid_uri(&sequence) && !is_valid_display_id(&sequence) {
                report.add_error(
                    self.identified.identity(),
                    None,
                    format!("location sequence {:?} is neither a URI nor a display id", sequence),
                );
            }
        }
        report
    }
}

/// Returns the shared location state of any location variant.
pub fn as_location(obj: &dyn SbolObject) -> Option<&Location> {
    if let Some(range) = obj.downcast_ref::<Range>() {
        return Some(&range.location);
    }
    if let Some(cut) = obj.downcast_ref::<Cut>() {
        return Some(&cut.location);
    }
    obj.downcast_ref::<EntireSequence>().map(|entire| &entire.location)
}

// =============================================================================
// Range
// =============================================================================

/// An inclusive, 1-based interval `[start, end]` of a sequence.
#[derive(Debug)]
pub struct Range {
    location: Location,
    start: Singleton<IntKind>,
    end: Singleton<IntKind>,
}

impl Range {
    fn declare(mut location: Location) -> Self {
        let start = Singleton::declare(&mut location.identified, properties::START, 1);
        let end = Singleton::declare(&mut location.identified, properties::END, 1);
        Self { location, start, end }
    }

    /// Creates a range over `sequence`.
    ///
    /// Bounds are stored as given; whether they make sense is a validation
    /// question.
    pub fn new(identity: Option<&str>, sequence: &str, start: i64, end: i64) -> Result<Self, PropertyError> {
        let mut range = Self::declare(Location::new(identity, types::RANGE, sequence)?);
        range.set_start(start)?;
        range.set_end(end)?;
        Ok(range)
    }

    /// Empty shell used by the builder registry.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self::declare(Location::declare(Identified::shell(identity, type_uri)))
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn start(&self) -> Result<Option<i64>, PropertyError> {
        self.start.get(&self.location.identified)
    }

    pub fn set_start(&mut self, start: i64) -> Result<(), PropertyError> {
        self.start.set(&mut self.location.identified, start)
    }

    pub fn end(&self) -> Result<Option<i64>, PropertyError> {
        self.end.get(&self.location.identified)
    }

    pub fn set_end(&mut self, end: i64) -> Result<(), PropertyError> {
        self.end.set(&mut self.location.identified, end)
    }

    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        let mut report = self.location.validate(report);
        let subject = self.location.identified.identity();
        let start = self.start().ok().flatten();
        let end = self.end().ok().flatten();

        if let Some(start) = start {
            if start < 1 {
                report.add_error(
                    subject,
                    Some(rules::RANGE_START),
                    format!("range start {} must be greater than 0", start),
                );
            }
        }
        if let Some(end) = end {
            if end < 1 {
                report.add_error(
                    subject,
                    Some(rules::RANGE_END),
                    format!("range end {} must be greater than 0", end),
                );
            }
        }
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                report.add_error(
                    subject,
                    Some(rules::RANGE_ORDER),
                    format!("range end {} precedes start {}", end, start),
                );
            }
        }
        report
    }
}

// =============================================================================
// Cut
// =============================================================================

/// A point between two bases; `at = 0` is before the first base.
#[derive(Debug)]
pub struct Cut {
    location: Location,
    at: Singleton<IntKind>,
}

impl Cut {
    fn declare(mut location: Location) -> Self {
        let at = Singleton::declare(&mut location.identified, properties::AT, 1);
        Self { location, at }
    }

    pub fn new(identity: Option<&str>, sequence: &str, at: i64) -> Result<Self, PropertyError> {
        let mut cut = Self::declare(Location::new(identity, types::CUT, sequence)?);
        cut.set_at(at)?;
        Ok(cut)
    }

    /// Empty shell used by the builder registry.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self::declare(Location::declare(Identified::shell(identity, type_uri)))
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn at(&self) -> Result<Option<i64>, PropertyError> {
        self.at.get(&self.location.identified)
    }

    pub fn set_at(&mut self, at: i64) -> Result<(), PropertyError> {
        self.at.set(&mut self.location.identified, at)
    }

    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        let mut report = self.location.validate(report);
        if let Ok(Some(at)) = self.at() {
            if at < 0 {
                report.add_error(
                    self.location.identified.identity(),
                    None,
                    format!("cut position {} must be 0 or greater", at),
                );
            }
        }
        report
    }
}

// =============================================================================
// EntireSequence
// =============================================================================

/// The whole of a sequence.
#[derive(Debug)]
pub struct EntireSequence {
    location: Location,
}

impl EntireSequence {
    pub fn new(identity: Option<&str>, sequence: &str) -> Result<Self, PropertyError> {
        Ok(Self {
            location: Location::new(identity, types::ENTIRE_SEQUENCE, sequence)?,
        })
    }

    /// Empty shell used by the builder registry.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self {
            location: Location::declare(Identified::shell(identity, type_uri)),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        self.location.validate(report)
    }
}

impl_sbol_object!(Range, location.identified);
impl_sbol_object!(Cut, location.identified);
impl_sbol_object!(EntireSequence, location.identified);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    const SEQ: &str = "https://example.org/lab/seq1";

    #[test]
    fn test_valid_range() {
        let range = Range::new(Some("https://example.org/lab/r1"), SEQ, 1, 10).unwrap();
        assert_eq!(range.start().unwrap(), Some(1));
        assert_eq!(range.end().unwrap(), Some(10));
        assert_eq!(range.location().sequence().unwrap().as_deref(), Some(SEQ));
        assert!(range.validate(None).is_empty());
    }

    #[test]
    fn test_range_start_after_end() {
        let range = Range::new(Some("https://example.org/lab/r1"), SEQ, 10, 5).unwrap();
        let report = range.validate(None);
        assert_eq!(report.len(), 1);
        assert!(report.has_rule(rules::RANGE_ORDER));
    }

    #[test]
    fn test_range_non_positive_bounds() {
        let range = Range::new(Some("https://example.org/lab/r1"), SEQ, 0, 0).unwrap();
        let report = range.validate(None);
        assert!(report.has_rule(rules::RANGE_START));
        assert!(report.has_rule(rules::RANGE_END));
        assert!(!report.has_rule(rules::RANGE_ORDER));
    }

    #[test]
    fn test_range_shell_reports_missing_values() {
        let shell = Range::shell("https://example.org/lab/r1", types::RANGE);
        let report = shell.validate(None);
        assert_eq!(
            report
                .issues()
                .iter()
                .filter(|i| i.rule.as_deref() == Some(rules::MIN_CARDINALITY))
                .count(),
            3
        );
    }

    #[test]
    fn test_optional_location_fields() {
        let mut cut = Cut::new(Some("https://example.org/lab/c1"), SEQ, 0).unwrap();
        assert!(cut.validate(None).is_empty());

        let location = cut.location_mut();
        location
            .set_orientation(Some(crate::vocab::orientation::INLINE))
            .unwrap();
        location.set_order(Some(2)).unwrap();
        assert_eq!(cut.location().order().unwrap(), Some(2));

        cut.location_mut().set_order(None).unwrap();
        assert_eq!(cut.location().order().unwrap(), None);
    }

    #[test]
    fn test_negative_cut() {
        let cut = Cut::new(Some("https://example.org/lab/c1"), SEQ, -1).unwrap();
        let report = cut.validate(None);
        assert_eq!(report.len(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn test_sequence_must_be_uri_or_local_name() {
        let entire = EntireSequence::new(Some("https://example.org/lab/e1"), "not a uri").unwrap();
        let report = entire.validate(None);
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].rule, None);

        let local = Range::new(None, "seq1", 5, 10).unwrap();
        assert!(local.validate(None).is_empty());
    }

    #[test]
    fn test_wrongly_typed_start_is_reported() {
        let mut range = Range::new(Some("https://example.org/lab/r1"), SEQ, 1, 2).unwrap();
        range
            .location_mut()
            .identified_mut()
            .load_values(properties::START, vec![Value::Text("one".to_string())]);
        assert!(range.start().is_err());
        assert!(range.validate(None).has_rule(rules::INVALID_VALUE));
    }

    #[test]
    fn test_as_location() {
        let range = Range::new(Some("https://example.org/lab/r1"), SEQ, 1, 2).unwrap();
        let obj: &dyn SbolObject = &range;
        assert!(as_location(obj).is_some());

        let plain = Identified::new(Some("urn:x"), "urn:T").unwrap();
        assert!(as_location(&plain).is_none());
    }
}
