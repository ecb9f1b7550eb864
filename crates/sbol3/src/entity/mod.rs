//! Bundled entity types.
//!
//! Each entity embeds [`Identified`] (directly or through [`Location`]),
//! declares its properties when constructed and chains its validation to
//! its parent type. Every type has an empty-shell constructor that the
//! builder registry uses during deserialization.

use crate::model::{Identified, SbolObject};
use crate::registry::Builder;
use crate::vocab::types;

/// Implements [`SbolObject`] for an entity whose shared state lives at the
/// given field path and whose inherent `validate` runs its checks.
macro_rules! impl_sbol_object {
    ($ty:ty, $($field:ident).+) => {
        impl $crate::model::SbolObject for $ty {
            fn identified(&self) -> &$crate::model::Identified {
                &self.$($field).+
            }

            fn identified_mut(&mut self) -> &mut $crate::model::Identified {
                &mut self.$($field).+
            }

            fn validate(
                &self,
                report: Option<$crate::validate::ValidationReport>,
            ) -> $crate::validate::ValidationReport {
                <$ty>::validate(self, report)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
    };
}

pub mod feature;
pub mod interaction;
pub mod location;
pub mod participation;

pub use feature::SequenceFeature;
pub use interaction::Interaction;
pub use location::{Cut, EntireSequence, Location, Range, as_location};
pub use participation::Participation;

fn build_range(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(Range::shell(identity, type_uri))
}

fn build_cut(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(Cut::shell(identity, type_uri))
}

fn build_entire_sequence(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(EntireSequence::shell(identity, type_uri))
}

fn build_participation(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(Participation::shell(identity, type_uri))
}

fn build_interaction(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(Interaction::shell(identity, type_uri))
}

fn build_sequence_feature(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(SequenceFeature::shell(identity, type_uri))
}

/// Builds a plain [`Identified`] shell. Used for graph subjects whose type
/// has no registered builder.
pub(crate) fn build_identified(identity: &str, type_uri: &str) -> Box<dyn SbolObject> {
    Box::new(Identified::shell(identity, type_uri))
}

/// Builders installed in the registry before any other registration.
pub(crate) fn builtin_builders() -> [(&'static str, Builder); 6] {
    [
        (types::RANGE, build_range),
        (types::CUT, build_cut),
        (types::ENTIRE_SEQUENCE, build_entire_sequence),
        (types::PARTICIPATION, build_participation),
        (types::INTERACTION, build_interaction),
        (types::SEQUENCE_FEATURE, build_sequence_feature),
    ]
}
