//! Interactions, which own their participations.

use crate::error::PropertyError;
use crate::model::{Identified, List, OwnedList, UriKind};
use crate::validate::ValidationReport;
use crate::vocab::{properties, types};

use super::Participation;

/// A typed interaction between participants.
#[derive(Debug)]
pub struct Interaction {
    identified: Identified,
    types: List<UriKind>,
    participations: OwnedList,
}

impl Interaction {
    fn declare(mut identified: Identified) -> Self {
        let interaction_types = List::declare(&mut identified, properties::TYPE, 1, None);
        let participations = OwnedList::declare(&mut identified, properties::HAS_PARTICIPATION, 0, None)
            .restricted_to(&mut identified, &[types::PARTICIPATION]);
        Self {
            identified,
            types: interaction_types,
            participations,
        }
    }

    pub fn new(identity: Option<&str>, interaction_types: Vec<String>) -> Result<Self, PropertyError> {
        let mut interaction = Self::declare(Identified::new(identity, types::INTERACTION)?);
        interaction.set_types(interaction_types)?;
        Ok(interaction)
    }

    /// Empty shell used by the builder registry.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self::declare(Identified::shell(identity, type_uri))
    }

    pub fn types(&self) -> Result<Vec<String>, PropertyError> {
        self.types.get(&self.identified)
    }

    pub fn set_types(&mut self, interaction_types: Vec<String>) -> Result<(), PropertyError> {
        self.types.set(&mut self.identified, interaction_types)
    }

    /// Attaches a participation, deriving its identity from this one.
    pub fn add_participation(&mut self, participation: Participation) -> Result<(), PropertyError> {
        self.participations.add(&mut self.identified, participation)
    }

    pub fn participations(&self) -> Vec<&Participation> {
        self.participations.get_as::<Participation>(&self.identified)
    }

    /// Detaches the participation at `index`.
    pub fn remove_participation(&mut self, index: usize) -> Result<(), PropertyError> {
        self.participations.remove(&mut self.identified, index).map(drop)
    }

    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        self.identified.validate(report)
    }
}

impl_sbol_object!(Interaction, identified);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SbolObject;
    use crate::validate::rules;

    const INHIBITION: &str = "https://identifiers.org/SBO:0000169";
    const INHIBITOR: &str = "https://identifiers.org/SBO:0000020";

    fn participation(display_id: &str) -> Participation {
        Participation::new(
            Some(display_id),
            vec![INHIBITOR.to_string()],
            "https://example.org/lab/lacI",
        )
        .unwrap()
    }

    #[test]
    fn test_participations_get_child_identities() {
        let mut interaction =
            Interaction::new(Some("https://example.org/lab/i1"), vec![INHIBITION.to_string()]).unwrap();
        interaction.add_participation(participation("p1")).unwrap();
        interaction.add_participation(participation("p2")).unwrap();

        let ids: Vec<&str> = interaction
            .participations()
            .iter()
            .map(|p| p.identity())
            .collect();
        assert_eq!(ids, vec!["https://example.org/lab/i1/p1", "https://example.org/lab/i1/p2"]);
        assert!(interaction.validate(None).is_empty());

        interaction.remove_participation(0).unwrap();
        assert_eq!(interaction.participations().len(), 1);
    }

    #[test]
    fn test_child_findings_land_in_parent_report() {
        let mut interaction =
            Interaction::new(Some("https://example.org/lab/i1"), vec![INHIBITION.to_string()]).unwrap();
        let mut p = participation("p1");
        p.set_roles(vec!["not-a-uri".to_string()]).unwrap();
        interaction.add_participation(p).unwrap();

        let report = interaction.validate(None);
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].subject, "https://example.org/lab/i1/p1");
        assert!(report.has_rule(rules::INVALID_VALUE));
    }
}
