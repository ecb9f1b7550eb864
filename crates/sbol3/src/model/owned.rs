//! Ownership properties.
//!
//! Owned properties hold whole child objects rather than values. Attaching
//! a child finalizes its identity: under a hierarchical parent the child is
//! renamed to `join(parent, display_id)`, and the new name must not collide
//! with any sibling already stored under the same property. Descendants the
//! child already owns are renamed along with it, so a whole subtree can be
//! built bottom-up and attached at once.

use tracing::debug;

use crate::error::{IdentityError, PropertyError};
use crate::model::object::derive_child_identity;
use crate::model::property::{insert_item, remove_item, replace_items};
use crate::model::{
    Cardinality, Identified, PropertyDef, PropertyKind, PropertySlot, SbolObject,
};

/// Runs the attachment checks for `child` and finalizes its identity.
///
/// Nothing is changed unless every check passes.
fn attach_child(
    property: &'static str,
    allowed_types: &[&'static str],
    owner_identity: &str,
    siblings: &[Box<dyn SbolObject>],
    child: &mut Box<dyn SbolObject>,
) -> Result<(), PropertyError> {
    if !allowed_types.is_empty() && !allowed_types.contains(&child.type_uri()) {
        return Err(PropertyError::WrongObjectType {
            property: property.to_string(),
            found: child.type_uri().to_string(),
        });
    }
    if child.identified().identity_state().is_final() {
        return Err(IdentityError::Finalized {
            identity: child.identity().to_string(),
        }
        .into());
    }

    let new_identity = derive_child_identity(property, owner_identity, child.identified())?;

    if siblings.iter().any(|sibling| sibling.identity() == new_identity) {
        return Err(PropertyError::DuplicateUri {
            property: property.to_string(),
            uri: new_identity,
        });
    }
    child.identified().check_descendants(&new_identity)?;

    child
        .identified_mut()
        .finalize_identity(Some(new_identity))?;
    child.identified_mut().rederive_descendants();
    debug!(
        parent = owner_identity,
        property,
        child = child.identity(),
        "attached owned object"
    );
    Ok(())
}

fn declare_owned(owner: &mut Identified, uri: &'static str, lower: usize, upper: Option<usize>) {
    owner.declare(PropertyDef::new(
        uri,
        PropertyKind::Owned,
        Cardinality::new(lower, upper),
    ));
}

/// Handle for a property owning an ordered list of child objects.
#[derive(Debug, Clone, Copy)]
pub struct OwnedList {
    uri: &'static str,
    upper: Option<usize>,
    allowed_types: &'static [&'static str],
}

impl OwnedList {
    /// Declares the property on `owner` with cardinality `[lower, upper]`.
    pub fn declare(owner: &mut Identified, uri: &'static str, lower: usize, upper: Option<usize>) -> Self {
        declare_owned(owner, uri, lower, upper);
        Self {
            uri,
            upper,
            allowed_types: &[],
        }
    }

    /// Restricts the property to children of the given types.
    ///
    /// The restriction is recorded on `owner`'s property table so that
    /// children loaded from a graph are checked by validation.
    pub fn restricted_to(mut self, owner: &mut Identified, types: &'static [&'static str]) -> Self {
        owner.restrict_owned(self.uri, types);
        self.allowed_types = types;
        self
    }

    pub fn uri(&self) -> &'static str {
        self.uri
    }

    /// Returns the owned children in insertion order.
    pub fn get<'a>(&self, owner: &'a Identified) -> &'a [Box<dyn SbolObject>] {
        owner.owned(self.uri)
    }

    /// Returns the children that are of type `T`.
    pub fn get_as<'a, T: SbolObject>(&self, owner: &'a Identified) -> Vec<&'a T> {
        self.get(owner)
            .iter()
            .filter_map(|child| child.downcast_ref::<T>())
            .collect()
    }

    /// Returns the child at `index` mutably.
    ///
    /// Identities of attached children are final, so this cannot be used to
    /// rename them.
    pub fn get_mut<'a>(&self, owner: &'a mut Identified, index: usize) -> Option<&'a mut dyn SbolObject> {
        self.storage(owner).get_mut(index).map(|child| child.as_mut())
    }

    /// Finds a child by identity.
    pub fn find<'a>(&self, owner: &'a Identified, identity: &str) -> Option<&'a dyn SbolObject> {
        self.get(owner)
            .iter()
            .find(|child| child.identity() == identity)
            .map(|child| child.as_ref())
    }

    pub fn len(&self, owner: &Identified) -> usize {
        self.get(owner).len()
    }

    pub fn is_empty(&self, owner: &Identified) -> bool {
        self.len(owner) == 0
    }

    /// Attaches `child` at the end of the list.
    pub fn add<T: SbolObject>(&self, owner: &mut Identified, child: T) -> Result<(), PropertyError> {
        self.add_boxed(owner, Box::new(child))
    }

    pub fn add_boxed(&self, owner: &mut Identified, child: Box<dyn SbolObject>) -> Result<(), PropertyError> {
        insert_item(self, owner, None, child)
    }

    /// Attaches `child` at `index`.
    pub fn insert<T: SbolObject>(
        &self,
        owner: &mut Identified,
        index: usize,
        child: T,
    ) -> Result<(), PropertyError> {
        insert_item(self, owner, Some(index), Box::new(child))
    }

    /// Replaces all children. Either all are attached or none are.
    pub fn set(&self, owner: &mut Identified, children: Vec<Box<dyn SbolObject>>) -> Result<(), PropertyError> {
        replace_items(self, owner, children)
    }

    /// Detaches and returns the child at `index`.
    ///
    /// The detached child keeps its final identity and cannot be attached
    /// anywhere else.
    pub fn remove(&self, owner: &mut Identified, index: usize) -> Result<Box<dyn SbolObject>, PropertyError> {
        remove_item(self, owner, index)
    }

    /// Drops every child.
    pub fn clear(&self, owner: &mut Identified) {
        self.storage(owner).clear();
    }
}

impl PropertySlot for OwnedList {
    type Item = Box<dyn SbolObject>;

    fn uri(&self) -> &'static str {
        self.uri
    }

    fn upper(&self) -> Option<usize> {
        self.upper
    }

    fn storage<'a>(&self, owner: &'a mut Identified) -> &'a mut Vec<Box<dyn SbolObject>> {
        owner.owned_storage(self.uri)
    }

    fn item_added(
        &self,
        owner_identity: &str,
        siblings: &[Box<dyn SbolObject>],
        item: &mut Box<dyn SbolObject>,
    ) -> Result<(), PropertyError> {
        attach_child(self.uri, self.allowed_types, owner_identity, siblings, item)
    }
}

/// Handle for a property owning at most one child object.
#[derive(Debug, Clone, Copy)]
pub struct OwnedSingleton {
    uri: &'static str,
    allowed_types: &'static [&'static str],
}

impl OwnedSingleton {
    /// Declares the property on `owner` with cardinality `[lower, 1]`.
    pub fn declare(owner: &mut Identified, uri: &'static str, lower: usize) -> Self {
        declare_owned(owner, uri, lower, Some(1));
        Self {
            uri,
            allowed_types: &[],
        }
    }

    /// Restricts the property to children of the given types.
    ///
    /// The restriction is recorded on `owner`'s property table so that
    /// children loaded from a graph are checked by validation.
    pub fn restricted_to(mut self, owner: &mut Identified, types: &'static [&'static str]) -> Self {
        owner.restrict_owned(self.uri, types);
        self.allowed_types = types;
        self
    }

    pub fn uri(&self) -> &'static str {
        self.uri
    }

    pub fn get<'a>(&self, owner: &'a Identified) -> Option<&'a dyn SbolObject> {
        owner.owned(self.uri).first().map(|child| child.as_ref())
    }

    pub fn get_as<'a, T: SbolObject>(&self, owner: &'a Identified) -> Option<&'a T> {
        self.get(owner).and_then(|child| child.downcast_ref::<T>())
    }

    /// Attaches `child`, dropping any previous one.
    pub fn set<T: SbolObject>(&self, owner: &mut Identified, child: T) -> Result<(), PropertyError> {
        replace_items(self, owner, vec![Box::new(child) as Box<dyn SbolObject>])
    }

    /// Detaches and returns the child, if any.
    pub fn take(&self, owner: &mut Identified) -> Option<Box<dyn SbolObject>> {
        self.storage(owner).pop()
    }
}

impl PropertySlot for OwnedSingleton {
    type Item = Box<dyn SbolObject>;

    fn uri(&self) -> &'static str {
        self.uri
    }

    fn upper(&self) -> Option<usize> {
        Some(1)
    }

    fn storage<'a>(&self, owner: &'a mut Identified) -> &'a mut Vec<Box<dyn SbolObject>> {
        owner.owned_storage(self.uri)
    }

    fn item_added(
        &self,
        owner_identity: &str,
        siblings: &[Box<dyn SbolObject>],
        item: &mut Box<dyn SbolObject>,
    ) -> Result<(), PropertyError> {
        attach_child(self.uri, self.allowed_types, owner_identity, siblings, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(identity: &str) -> (Identified, OwnedList) {
        let mut obj = Identified::new(Some(identity), "urn:Parent").unwrap();
        let children = OwnedList::declare(&mut obj, "urn:child", 0, None);
        (obj, children)
    }

    fn child(display_id: &str) -> Identified {
        Identified::new(Some(display_id), "urn:Child").unwrap()
    }

    #[test]
    fn test_children_get_derived_identities() {
        let (mut p, children) = parent("urn:p");
        children.add(&mut p, child("x")).unwrap();
        children.add(&mut p, child("y")).unwrap();

        let ids: Vec<&str> = children.get(&p).iter().map(|c| c.identity()).collect();
        assert_eq!(ids, vec!["urn:p/x", "urn:p/y"]);
        assert!(children.get(&p).iter().all(|c| c.identified().identity_state().is_final()));
    }

    #[test]
    fn test_duplicate_display_id_rejected() {
        let (mut p, children) = parent("urn:p");
        children.add(&mut p, child("x")).unwrap();
        children.add(&mut p, child("y")).unwrap();

        let err = children.add(&mut p, child("x")).unwrap_err();
        assert_eq!(
            err,
            PropertyError::DuplicateUri {
                property: "urn:child".to_string(),
                uri: "urn:p/x".to_string(),
            }
        );
        assert_eq!(children.len(&p), 2);
    }

    #[test]
    fn test_missing_display_id_rejected() {
        let (mut p, children) = parent("https://example.org/p");
        let anonymous = Identified::new(None, "urn:Child").unwrap();
        assert!(matches!(
            children.add(&mut p, anonymous),
            Err(PropertyError::MissingDisplayId { .. })
        ));
        assert!(children.is_empty(&p));
    }

    #[test]
    fn test_non_hierarchical_parent_keeps_child_identity() {
        let (mut p, children) = parent("urn:uuid:550e8400-e29b-41d4-a716-446655440000");
        let c = Identified::new(Some("https://example.org/c"), "urn:Child").unwrap();
        children.add(&mut p, c).unwrap();
        assert_eq!(children.get(&p)[0].identity(), "https://example.org/c");

        let dup = Identified::new(Some("https://example.org/c"), "urn:Child").unwrap();
        assert!(matches!(
            children.add(&mut p, dup),
            Err(PropertyError::DuplicateUri { .. })
        ));
    }

    #[test]
    fn test_detached_child_cannot_be_reattached() {
        let (mut p, children) = parent("urn:p");
        children.add(&mut p, child("x")).unwrap();
        let detached = children.remove(&mut p, 0).unwrap();
        assert!(children.is_empty(&p));

        assert!(matches!(
            children.add_boxed(&mut p, detached),
            Err(PropertyError::Identity(IdentityError::Finalized { .. }))
        ));
        assert!(children.is_empty(&p));
    }

    #[test]
    fn test_set_is_all_or_nothing() {
        let (mut p, children) = parent("urn:p");
        children.add(&mut p, child("a")).unwrap();

        let batch: Vec<Box<dyn SbolObject>> = vec![Box::new(child("x")), Box::new(child("x"))];
        assert!(children.set(&mut p, batch).is_err());
        assert_eq!(children.get(&p)[0].identity(), "urn:p/a");
        assert_eq!(children.len(&p), 1);
    }

    #[test]
    fn test_restricted_types() {
        let mut p = Identified::new(Some("urn:p"), "urn:Parent").unwrap();
        let only = OwnedList::declare(&mut p, "urn:child", 0, None).restricted_to(&mut p, &["urn:Child"]);
        let wrong = Identified::new(Some("w"), "urn:Other").unwrap();
        assert!(matches!(
            only.add(&mut p, wrong),
            Err(PropertyError::WrongObjectType { .. })
        ));
        only.add(&mut p, child("ok")).unwrap();
        assert_eq!(p.property_def("urn:child").unwrap().allowed_types, &["urn:Child"]);
    }

    #[test]
    fn test_upper_bound_leaves_storage() {
        let mut p = Identified::new(Some("urn:p"), "urn:Parent").unwrap();
        let two = OwnedList::declare(&mut p, "urn:child", 0, Some(2));
        two.add(&mut p, child("a")).unwrap();
        two.add(&mut p, child("b")).unwrap();
        assert!(matches!(
            two.add(&mut p, child("c")),
            Err(PropertyError::TooManyValues { upper: 2, attempted: 3, .. })
        ));
        assert_eq!(two.len(&p), 2);
    }

    #[test]
    fn test_owned_singleton_replaces() {
        let mut p = Identified::new(Some("urn:p"), "urn:Parent").unwrap();
        let one = OwnedSingleton::declare(&mut p, "urn:only", 0);
        one.set(&mut p, child("a")).unwrap();
        one.set(&mut p, child("b")).unwrap();
        assert_eq!(one.get(&p).map(|c| c.identity()), Some("urn:p/b"));
        assert!(one.get_as::<Identified>(&p).is_some());
        assert!(one.take(&mut p).is_some());
        assert!(one.get(&p).is_none());
    }

    #[test]
    fn test_get_mut_and_find() {
        let (mut p, children) = parent("urn:p");
        children.add(&mut p, child("x")).unwrap();
        let c = children.get_mut(&mut p, 0).unwrap();
        c.identified_mut().set_name(Some("renamed")).unwrap();
        let found = children.find(&p, "urn:p/x").unwrap();
        assert_eq!(found.identified().name().unwrap().as_deref(), Some("renamed"));
    }
}
