//! Identified objects.
//!
//! [`Identified`] is the state every entity shares: identity, type, the
//! property table, the attribute-value store and the owned-object store.
//! Entity types embed it (directly or through a parent entity such as
//! `Location`) and implement [`SbolObject`] so they can live in documents,
//! ownership properties and the builder registry.

use std::any::Any;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{IdentityError, PropertyError};
use crate::model::identity::{self, Identity};
use crate::model::{PropertyDef, PropertyKind, Singleton, TextKind, Value};
use crate::validate::{self, ValidationReport, rules};
use crate::vocab::properties;

/// Behaviour shared by every object in the model.
pub trait SbolObject: Any + fmt::Debug {
    /// Returns the shared object state.
    fn identified(&self) -> &Identified;

    /// Returns the shared object state mutably.
    fn identified_mut(&mut self) -> &mut Identified;

    /// Validates this object and its owned children.
    ///
    /// Implementations call their parent type's validation first and then
    /// append their own findings. With `None` a fresh report is allocated;
    /// otherwise findings are appended to the given report.
    fn validate(&self, report: Option<ValidationReport>) -> ValidationReport;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the identity URI.
    fn identity(&self) -> &str {
        self.identified().identity()
    }

    /// Returns the declared type URI.
    fn type_uri(&self) -> &str {
        self.identified().type_uri()
    }
}

impl dyn SbolObject {
    /// Downcasts to a concrete entity type.
    pub fn downcast_ref<T: SbolObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts to a concrete entity type mutably.
    pub fn downcast_mut<T: SbolObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Shared state of every object.
pub struct Identified {
    identity: Identity,
    type_uri: String,
    defs: Vec<PropertyDef>,
    properties: FxHashMap<String, Vec<Value>>,
    owned_objects: FxHashMap<String, Vec<Box<dyn SbolObject>>>,
    display_id: Singleton<TextKind>,
    name: Singleton<TextKind>,
    description: Singleton<TextKind>,
}

impl fmt::Debug for Identified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identified")
            .field("identity", &self.identity)
            .field("type_uri", &self.type_uri)
            .field("properties", &self.properties)
            .field("owned_objects", &self.owned_objects)
            .finish()
    }
}

impl Identified {
    /// Creates an object of type `type_uri`.
    ///
    /// `identity` may be an absolute URI or a bare display id; with `None` an
    /// opaque `urn:uuid:` identity is generated. The display id is taken from
    /// a bare identity, or from the last path segment of a hierarchical one.
    pub fn new(identity: Option<&str>, type_uri: &str) -> Result<Self, IdentityError> {
        let identity = match identity {
            Some(s) => identity::parse_identity(s)?,
            None => Identity::generate(),
        };
        let display_id = if identity::is_valid_display_id(identity.as_str()) {
            Some(identity.as_str().to_string())
        } else {
            identity::display_id_from_identity(identity.as_str()).map(str::to_string)
        };

        let mut obj = Self::from_identity(identity, type_uri);
        if let Some(display_id) = display_id {
            *obj.value_storage(properties::DISPLAY_ID) = vec![Value::Text(display_id)];
        }
        Ok(obj)
    }

    /// Creates an empty shell with `identity` taken verbatim.
    ///
    /// Used by builders during deserialization: nothing is derived and no
    /// values are stored, so everything the graph holds can be loaded as is.
    /// The identity is checked when the object is finalized or validated.
    pub fn shell(identity: &str, type_uri: &str) -> Self {
        Self::from_identity(Identity::Provisional(identity.to_string()), type_uri)
    }

    fn from_identity(identity: Identity, type_uri: &str) -> Self {
        let mut obj = Self {
            identity,
            type_uri: type_uri.to_string(),
            defs: Vec::new(),
            properties: FxHashMap::default(),
            owned_objects: FxHashMap::default(),
            display_id: Singleton::unbound(properties::DISPLAY_ID),
            name: Singleton::unbound(properties::NAME),
            description: Singleton::unbound(properties::DESCRIPTION),
        };
        obj.display_id = Singleton::declare(&mut obj, properties::DISPLAY_ID, 0);
        obj.name = Singleton::declare(&mut obj, properties::NAME, 0);
        obj.description = Singleton::declare(&mut obj, properties::DESCRIPTION, 0);
        obj
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn identity(&self) -> &str {
        self.identity.as_str()
    }

    /// Returns the identity together with its lifecycle state.
    pub fn identity_state(&self) -> &Identity {
        &self.identity
    }

    pub fn type_uri(&self) -> &str {
        &self.type_uri
    }

    /// Returns true if children can derive their identity from this one.
    pub fn identity_is_hierarchical(&self) -> bool {
        identity::is_hierarchical(self.identity())
    }

    /// Finalizes the identity, replacing it with `identity` if given.
    pub(crate) fn finalize_identity(&mut self, identity: Option<String>) -> Result<(), IdentityError> {
        match identity {
            Some(identity) => self.identity.finalize_as(identity),
            None => self.identity.finalize(),
        }
    }

    pub fn display_id(&self) -> Option<String> {
        self.display_id.get(self).ok().flatten()
    }

    /// Sets the display id. Only allowed while the identity is provisional.
    pub fn set_display_id(&mut self, display_id: &str) -> Result<(), PropertyError> {
        if let Identity::Final(identity) = &self.identity {
            return Err(IdentityError::Finalized {
                identity: identity.clone(),
            }
            .into());
        }
        if !identity::is_valid_display_id(display_id) {
            return Err(IdentityError::InvalidDisplayId {
                display_id: display_id.to_string(),
            }
            .into());
        }
        let handle = self.display_id;
        handle.set(self, display_id.to_string())
    }

    pub fn name(&self) -> Result<Option<String>, PropertyError> {
        self.name.get(self)
    }

    pub fn set_name(&mut self, name: Option<&str>) -> Result<(), PropertyError> {
        let handle = self.name;
        match name {
            Some(name) => handle.set(self, name.to_string()),
            None => {
                handle.clear(self);
                Ok(())
            }
        }
    }

    pub fn description(&self) -> Result<Option<String>, PropertyError> {
        self.description.get(self)
    }

    pub fn set_description(&mut self, description: Option<&str>) -> Result<(), PropertyError> {
        let handle = self.description;
        match description {
            Some(description) => handle.set(self, description.to_string()),
            None => {
                handle.clear(self);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Property table
    // =========================================================================

    /// Records a property definition. Redeclaring a URI replaces its
    /// definition and keeps stored values.
    pub(crate) fn declare(&mut self, def: PropertyDef) {
        match self.defs.iter_mut().find(|d| d.uri == def.uri) {
            Some(existing) => *existing = def,
            None => self.defs.push(def),
        }
    }

    /// Returns all property definitions in declaration order.
    pub fn property_defs(&self) -> &[PropertyDef] {
        &self.defs
    }

    pub fn property_def(&self, uri: &str) -> Option<&PropertyDef> {
        self.defs.iter().find(|d| d.uri == uri)
    }

    /// Returns the number of values (or owned objects) stored for `def`.
    pub fn count(&self, def: &PropertyDef) -> usize {
        match def.kind {
            PropertyKind::Owned => self.owned(def.uri).len(),
            PropertyKind::Scalar(_) | PropertyKind::Referenced => self.values(def.uri).len(),
        }
    }

    // =========================================================================
    // Attribute-value store
    // =========================================================================

    /// Returns the raw values stored for `uri` (empty if absent).
    pub fn values(&self, uri: &str) -> &[Value] {
        self.properties.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces the raw values of a declared value property.
    ///
    /// Values are checked against the declared kind and upper bound before
    /// anything is stored.
    ///
    /// The display id follows [`Identified::set_display_id`]: it is locked
    /// once the identity is final and must match the display-id pattern.
    pub fn set_values(&mut self, uri: &str, values: Vec<Value>) -> Result<(), PropertyError> {
        if uri == properties::DISPLAY_ID {
            if let Identity::Final(identity) = &self.identity {
                return Err(IdentityError::Finalized {
                    identity: identity.clone(),
                }
                .into());
            }
            if let [Value::Text(display_id)] = values.as_slice() {
                let display_id = display_id.clone();
                return self.set_display_id(&display_id);
            }
        }
        let def = self
            .property_def(uri)
            .ok_or_else(|| PropertyError::NotDeclared {
                property: uri.to_string(),
                owner: self.identity().to_string(),
            })?;
        let Some(expected) = def.kind.data_type() else {
            return Err(PropertyError::KindMismatch {
                property: uri.to_string(),
                kind: def.kind,
            });
        };
        if let Some(value) = values.iter().find(|v| v.data_type() != expected) {
            return Err(PropertyError::TypeMismatch {
                property: uri.to_string(),
                expected,
                found: value.data_type(),
            });
        }
        if let Some(upper) = def.cardinality.upper {
            if values.len() > upper {
                return Err(PropertyError::TooManyValues {
                    property: uri.to_string(),
                    upper,
                    attempted: values.len(),
                });
            }
        }
        *self.value_storage(uri) = values;
        Ok(())
    }

    /// Stores raw values without any checks.
    ///
    /// This is the bulk-load path used when reading a graph; problems with
    /// the loaded data surface in validation.
    pub fn load_values(&mut self, uri: &str, values: Vec<Value>) {
        *self.value_storage(uri) = values;
    }

    /// Removes every value stored for `uri`.
    pub fn clear_values(&mut self, uri: &str) {
        self.properties.remove(uri);
    }

    /// Iterates over non-empty value slots: declared properties first, in
    /// declaration order, then undeclared ones sorted by URI.
    pub fn property_values(&self) -> impl Iterator<Item = (&str, &[Value])> {
        let declared = self.defs.iter().filter_map(move |def| {
            let values = self.values(def.uri);
            (!values.is_empty()).then_some((def.uri, values))
        });
        let mut undeclared: Vec<(&str, &[Value])> = self
            .properties
            .iter()
            .filter(|(uri, values)| !values.is_empty() && self.property_def(uri).is_none())
            .map(|(uri, values)| (uri.as_str(), values.as_slice()))
            .collect();
        undeclared.sort_by(|a, b| a.0.cmp(b.0));
        declared.chain(undeclared)
    }

    pub(crate) fn value_storage(&mut self, uri: &str) -> &mut Vec<Value> {
        self.properties.entry(uri.to_string()).or_default()
    }

    // =========================================================================
    // Owned-object store
    // =========================================================================

    /// Returns the objects owned through `uri`.
    pub fn owned(&self, uri: &str) -> &[Box<dyn SbolObject>] {
        self.owned_objects.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over all owned objects, grouped by property in declaration
    /// order.
    pub fn owned_objects(&self) -> impl Iterator<Item = (&'static str, &dyn SbolObject)> {
        self.defs
            .iter()
            .filter(|def| def.kind == PropertyKind::Owned)
            .flat_map(move |def| self.owned(def.uri).iter().map(move |child| (def.uri, child.as_ref())))
    }

    /// Records the child types accepted by the owned property `uri`.
    pub(crate) fn restrict_owned(&mut self, uri: &str, types: &'static [&'static str]) {
        if let Some(def) = self.defs.iter_mut().find(|d| d.uri == uri) {
            def.allowed_types = types;
        }
    }

    /// Checks that every owned descendant can take the identity derived
    /// from `identity`, the identity this object is about to receive.
    pub(crate) fn check_descendants(&self, identity: &str) -> Result<(), PropertyError> {
        for def in self.defs.iter().filter(|def| def.kind == PropertyKind::Owned) {
            let mut derived: Vec<String> = Vec::new();
            for child in self.owned(def.uri) {
                let child_identity = derive_child_identity(def.uri, identity, child.identified())?;
                if derived.contains(&child_identity) {
                    return Err(PropertyError::DuplicateUri {
                        property: def.uri.to_string(),
                        uri: child_identity,
                    });
                }
                child.identified().check_descendants(&child_identity)?;
                derived.push(child_identity);
            }
        }
        Ok(())
    }

    /// Renames owned descendants after this object's identity changed.
    ///
    /// Only called after [`Identified::check_descendants`] has accepted the
    /// new identity, so every derivation succeeds.
    pub(crate) fn rederive_descendants(&mut self) {
        let identity = self.identity().to_string();
        for (property, children) in self.owned_objects.iter_mut() {
            for child in children.iter_mut() {
                if let Ok(derived) = derive_child_identity(property, &identity, child.identified()) {
                    child.identified_mut().identity = Identity::Final(derived);
                }
                child.identified_mut().rederive_descendants();
            }
        }
    }

    /// Attaches a child read from a graph, keeping its identity.
    pub(crate) fn attach_loaded(
        &mut self,
        uri: &str,
        mut child: Box<dyn SbolObject>,
    ) -> Result<(), PropertyError> {
        child.identified_mut().finalize_identity(None)?;
        self.owned_storage(uri).push(child);
        Ok(())
    }

    pub(crate) fn owned_storage(&mut self, uri: &str) -> &mut Vec<Box<dyn SbolObject>> {
        self.owned_objects.entry(uri.to_string()).or_default()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Base of every validation chain.
    ///
    /// Checks the identity and display id, every declared property, then
    /// validates owned children into the same report.
    pub fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        let mut report = report.unwrap_or_default();
        let identity = self.identity();

        if !identity::is_valid_uri(identity) {
            report.add_error(
                identity,
                Some(rules::INVALID_IDENTITY),
                format!("identity {:?} is not a valid URI", identity),
            );
        }
        if let Some(display_id) = self.display_id() {
            if !identity::is_valid_display_id(&display_id) {
                report.add_error(
                    identity,
                    Some(rules::INVALID_DISPLAY_ID),
                    format!("display id {:?} is not valid", display_id),
                );
            }
        }

        validate::check_properties(self, &mut report);

        for (_, child) in self.owned_objects() {
            report = child.validate(Some(report));
        }
        report
    }
}

/// Returns the identity `child` takes when owned by `owner_identity`.
///
/// Under a hierarchical owner this is `join(owner, display_id)`; otherwise
/// the child keeps its current identity.
pub(crate) fn derive_child_identity(
    property: &str,
    owner_identity: &str,
    child: &Identified,
) -> Result<String, PropertyError> {
    if !identity::is_hierarchical(owner_identity) {
        return Ok(child.identity().to_string());
    }
    let display_id = child
        .display_id()
        .ok_or_else(|| PropertyError::MissingDisplayId {
            property: property.to_string(),
            child: child.identity().to_string(),
        })?;
    Ok(identity::join_identity(owner_identity, &display_id))
}

impl SbolObject for Identified {
    fn identified(&self) -> &Identified {
        self
    }

    fn identified_mut(&mut self) -> &mut Identified {
        self
    }

    fn validate(&self, report: Option<ValidationReport>) -> ValidationReport {
        Identified::validate(self, report)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
