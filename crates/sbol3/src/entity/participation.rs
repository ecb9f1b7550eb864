//! Participations: the role an object plays in an interaction.

use crate::error::PropertyError;
use crate::model::{Identified, List, ReferencedObject, Rule, SbolObject, UriKind, Value, is_valid_uri};
use crate::validate::{ValidationReport, rules};
use crate::vocab::{properties, types};

fn role_is_uri(value: &Value) -> Option<String> {
    match value.as_uri() {
        Some(role) if !is_valid_uri(role) => Some(format!("role {:?} is not a valid URI", role)),
        _ => None,
    }
}

/// One participant of an interaction and the roles it plays there.
#[derive(Debug)]
pub struct Participation {
    identified: Identified,
    roles: List<UriKind>,
    participant: ReferencedObject,
}

impl Participation {
    fn declare(mut identified: Identified) -> Self {
        let roles = List::declare_with_rules(
            &mut identified,
            properties::ROLE,
            1,
            None,
            vec![Rule::error(Some(rules::INVALID_VALUE), role_is_uri)],
        );
        let participant = ReferencedObject::declare(&mut identified, properties::PARTICIPANT, 1);
        Self {
            identified,
            roles,
            participant,
        }
    }

    /// Creates a participation of `participant` in the given roles.
    pub fn new(identity: Option<&str>, roles: Vec<String>, participant: &str) -> Result<Self, PropertyError> {
        let mut participation = Self::declare(Identified::new(identity, types::PARTICIPATION)?);
        participation.set_roles(roles)?;
        participation.set_participant(participant)?;
        Ok(participation)
    }

    /// Empty shell used by the builder registry.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self::declare(Identified::shell(identity, type_uri))
    }

    pub fn roles(&self) -> Result<Vec<String>, PropertyError> {
        self.roles.get(&self.identified)
    }

    pub fn set_roles(&mut self, roles: Vec<String>) -> Result<(), PropertyError> {
        self.roles.set(&mut self.identified, roles)
    }

    pub fn add_role(&mut self, role: &str) -> Result<(), PropertyError> {
        self.roles.add(&mut self.identified, role.to_string())
    }

    /// Identity of the participating object.
    pub fn participant(&self) -> Result<Option<String>, PropertyError> {
        self.participant.get(&self.identified)
    }

    pub fn set_participant(&mut self, participant: &str) -> Result<(), PropertyError> {
        self.participant.set(&mut self.identified, participant.to_string())
    }

    pub fn set_participant_object(&mut self, participant: &dyn SbolObject) -> Result<(), PropertyError> {
        self.participant.set_object(&mut self.identified, participant)
    }

    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        self.identified.validate(report)
    }
}

impl_sbol_object!(Participation, identified);
