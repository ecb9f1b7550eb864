//! Validation of objects and documents.
//!
//! Validation never fails: every finding is collected into a
//! [`ValidationReport`] that is returned to the caller. Immediate problems
//! (wrong value kinds, upper-bound overflow, identity conflicts) are
//! rejected at the call site as errors instead; see [`crate::error`].
//!
//! Checks run in a fixed order per object:
//! 1. identity and display id
//! 2. every declared property (cardinality, stored data type, value rules)
//! 3. owned children, recursively
//! 4. entity-specific rules, parent entity first
//!
//! Document validation additionally checks that references resolve.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::document::Document;
use crate::model::reference::dangling_references;
use crate::model::{Identified, PropertyKind, SbolObject};

/// Stable codes for framework and entity rules.
pub mod rules {
    /// Identity is not a valid absolute URI.
    pub const INVALID_IDENTITY: &str = "V001";
    /// Display id does not match `[A-Za-z_][A-Za-z0-9_]*`.
    pub const INVALID_DISPLAY_ID: &str = "V002";
    /// Fewer values than the property's lower bound.
    pub const MIN_CARDINALITY: &str = "V003";
    /// More values than the property's upper bound.
    pub const MAX_CARDINALITY: &str = "V004";
    /// A stored value has the wrong data type or is invalid on its own.
    pub const INVALID_VALUE: &str = "V005";
    /// A reference names an object the document does not contain.
    pub const DANGLING_REFERENCE: &str = "V006";

    /// Range start must be at least 1.
    pub const RANGE_START: &str = "sbol3-11401";
    /// Range end must be at least 1.
    pub const RANGE_END: &str = "sbol3-11402";
    /// Range end must not precede start.
    pub const RANGE_ORDER: &str = "sbol3-11403";
}

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Identity of the offending object.
    pub subject: String,
    /// Rule code, if the rule has one.
    pub rule: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "{} [{}] {}: {}", self.severity, rule, self.subject, self.message),
            None => write!(f, "{} {}: {}", self.severity, self.subject, self.message),
        }
    }
}

/// Accumulated findings, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding.
    pub fn add(
        &mut self,
        severity: Severity,
        subject: &str,
        rule: Option<&str>,
        message: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            subject: subject.to_string(),
            rule: rule.map(str::to_string),
            message: message.into(),
            severity,
        });
    }

    pub fn add_error(&mut self, subject: &str, rule: Option<&str>, message: impl Into<String>) {
        self.add(Severity::Error, subject, rule, message);
    }

    pub fn add_warning(&mut self, subject: &str, rule: Option<&str>, message: impl Into<String>) {
        self.add(Severity::Warning, subject, rule, message);
    }

    /// Returns all findings.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Returns true if any finding carries `rule`.
    pub fn has_rule(&self, rule: &str) -> bool {
        self.issues.iter().any(|i| i.rule.as_deref() == Some(rule))
    }

    /// Returns the findings about `subject`.
    pub fn for_subject<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.subject == subject)
    }

    /// Appends every finding of `other`.
    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Checks every declared property of `obj`.
///
/// For each definition: the lower and upper cardinality bounds, the type of
/// each owned child against the property's restriction, the data type of
/// each stored value against the declared kind, the value's own validity,
/// and any rules attached to the definition.
pub fn check_properties(obj: &Identified, report: &mut ValidationReport) {
    let subject = obj.identity();

    for def in obj.property_defs() {
        let count = obj.count(def);
        if count < def.cardinality.lower {
            report.add_error(
                subject,
                Some(rules::MIN_CARDINALITY),
                format!(
                    "{} requires at least {} value(s), found {}",
                    def.uri, def.cardinality.lower, count
                ),
            );
        }
        if let Some(upper) = def.cardinality.upper {
            if count > upper {
                report.add_error(
                    subject,
                    Some(rules::MAX_CARDINALITY),
                    format!("{} allows at most {} value(s), found {}", def.uri, upper, count),
                );
            }
        }

        if def.kind == PropertyKind::Owned && !def.allowed_types.is_empty() {
            for child in obj.owned(def.uri) {
                if !def.allowed_types.contains(&child.type_uri()) {
                    report.add_error(
                        subject,
                        Some(rules::INVALID_VALUE),
                        format!(
                            "{} does not accept {} objects, found {}",
                            def.uri,
                            child.type_uri(),
                            child.identity()
                        ),
                    );
                }
            }
        }

        let Some(expected) = def.kind.data_type() else {
            continue;
        };
        for value in obj.values(def.uri) {
            if value.data_type() != expected {
                report.add_error(
                    subject,
                    Some(rules::INVALID_VALUE),
                    format!(
                        "{} expects {:?} values, found {:?}",
                        def.uri,
                        expected,
                        value.data_type()
                    ),
                );
                continue;
            }
            if let Some(problem) = value.validate() {
                report.add_error(
                    subject,
                    Some(rules::INVALID_VALUE),
                    format!("{}: {}", def.uri, problem),
                );
                continue;
            }
            for rule in &def.rules {
                if let Some(message) = (rule.check)(value) {
                    report.add(rule.severity, subject, rule.code, format!("{}: {}", def.uri, message));
                }
            }
        }
    }
}

/// Options for document validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Report references to objects the document does not contain.
    pub check_references: bool,
    /// Severity used for dangling references.
    ///
    /// Documents are routinely built from fragments that point at objects
    /// stored elsewhere, so the default is [`Severity::Warning`].
    pub dangling_severity: Severity,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_references: true,
            dangling_severity: Severity::Warning,
        }
    }
}

impl ValidationOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that treat dangling references as errors.
    pub fn strict() -> Self {
        Self {
            check_references: true,
            dangling_severity: Severity::Error,
        }
    }

    /// Options that skip reference resolution entirely.
    pub fn local() -> Self {
        Self {
            check_references: false,
            ..Self::default()
        }
    }
}

/// Validates every object in `document`, then its references.
pub fn validate_document(document: &Document, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    for obj in document.objects() {
        report = obj.validate(Some(report));
    }

    if options.check_references {
        let mut seen = FxHashSet::default();
        for obj in document.objects() {
            check_references(obj, document, options, &mut seen, &mut report);
        }
    }

    debug!(
        objects = document.len(),
        issues = report.len(),
        "validated document"
    );
    report
}

fn check_references(
    obj: &dyn SbolObject,
    document: &Document,
    options: &ValidationOptions,
    seen: &mut FxHashSet<(String, String, String)>,
    report: &mut ValidationReport,
) {
    for (property, target) in dangling_references(obj.identified(), document) {
        let key = (obj.identity().to_string(), property.to_string(), target.clone());
        if seen.insert(key) {
            report.add(
                options.dangling_severity,
                obj.identity(),
                Some(rules::DANGLING_REFERENCE),
                format!("{} refers to {}, which is not in the document", property, target),
            );
        }
    }
    for (_, child) in obj.identified().owned_objects() {
        check_references(child, document, options, seen, report);
    }
}
