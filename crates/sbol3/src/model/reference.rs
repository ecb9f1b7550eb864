//! Reference properties.
//!
//! A reference stores only the identity of its target. Nothing keeps the
//! target alive or checks that it exists when the reference is set; lookup
//! happens on demand against a [`Document`], and document validation reports
//! references that do not resolve.

use crate::document::Document;
use crate::error::PropertyError;
use crate::model::{Identified, List, PropertyKind, RefKind, SbolObject, Singleton};

/// Handle for a property referencing at most one object.
pub type ReferencedObject = Singleton<RefKind>;

/// Handle for a property referencing an ordered list of objects.
pub type ReferencedObjects = List<RefKind>;

impl Singleton<RefKind> {
    /// Points the reference at `target`.
    pub fn set_object(&self, owner: &mut Identified, target: &dyn SbolObject) -> Result<(), PropertyError> {
        self.set(owner, target.identity().to_string())
    }

    /// Looks up the referenced object in `document`.
    ///
    /// Returns `None` when unset or dangling.
    pub fn resolve<'d>(&self, owner: &Identified, document: &'d Document) -> Option<&'d dyn SbolObject> {
        let identity = self.get(owner).ok().flatten()?;
        document.find(&identity)
    }
}

impl List<RefKind> {
    /// Appends a reference to `target`.
    pub fn add_object(&self, owner: &mut Identified, target: &dyn SbolObject) -> Result<(), PropertyError> {
        self.add(owner, target.identity().to_string())
    }

    /// Looks up every referenced object in order, `None` for dangling ones.
    pub fn resolve<'d>(
        &self,
        owner: &Identified,
        document: &'d Document,
    ) -> Result<Vec<Option<&'d dyn SbolObject>>, PropertyError> {
        Ok(self
            .get(owner)?
            .iter()
            .map(|identity| document.find(identity))
            .collect())
    }
}

/// Returns `(property, target)` for every reference of `obj` that does not
/// resolve in `document`.
pub fn dangling_references(obj: &Identified, document: &Document) -> Vec<(&'static str, String)> {
    obj.property_defs()
        .iter()
        .filter(|def| def.kind == PropertyKind::Referenced)
        .flat_map(|def| {
            obj.values(def.uri)
                .iter()
                .filter_map(|value| value.as_uri())
                .filter(|target| !document.contains(target))
                .map(move |target| (def.uri, target.to_string()))
        })
        .collect()
}
