//! Property descriptors.
//!
//! A property is declared on an [`Identified`] owner and recorded in its
//! property table as a [`PropertyDef`]. The declaration returns a small
//! `Copy` handle ([`Singleton`] or [`List`]) that entity types keep as a
//! field and use to read and write the owner's attribute-value store:
//!
//! ```rust
//! use sbol3::model::{Identified, IntKind, List, Singleton, UriKind};
//!
//! let mut obj = Identified::new(Some("https://example.org/obj"), "urn:T").unwrap();
//! let count = Singleton::<IntKind>::declare(&mut obj, "urn:count", 1);
//! let tags = List::<UriKind>::declare(&mut obj, "urn:tag", 0, Some(2));
//!
//! count.set(&mut obj, 3).unwrap();
//! tags.add(&mut obj, "urn:a".to_string()).unwrap();
//! tags.add(&mut obj, "urn:b".to_string()).unwrap();
//! assert!(tags.add(&mut obj, "urn:c".to_string()).is_err());
//!
//! assert_eq!(count.get(&obj).unwrap(), Some(3));
//! assert_eq!(tags.get(&obj).unwrap(), vec!["urn:a", "urn:b"]);
//! ```
//!
//! All list-shaped mutation goes through [`PropertySlot`], which owns the
//! upper-bound check and the `item_added` hook. Scalar lists use the default
//! (no-op) hook; owned lists override it to derive child identities.

use std::marker::PhantomData;

use crate::error::PropertyError;
use crate::model::{DataType, Identified, Value, ValueKind};
use crate::validate::Severity;

/// What a property stores, which decides how the generic machinery treats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Literal or vocabulary values of one data type.
    Scalar(DataType),
    /// Child objects owned by the property's owner.
    Owned,
    /// Identities of other objects.
    Referenced,
}

impl PropertyKind {
    /// Returns the data type stored values must have, or `None` for owned
    /// properties (which store objects, not values).
    pub fn data_type(self) -> Option<DataType> {
        match self {
            PropertyKind::Scalar(data_type) => Some(data_type),
            PropertyKind::Referenced => Some(DataType::Uri),
            PropertyKind::Owned => None,
        }
    }
}

/// Allowed number of values for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    pub lower: usize,
    /// `None` means unbounded.
    pub upper: Option<usize>,
}

impl Cardinality {
    /// Exactly one value.
    pub const REQUIRED: Cardinality = Cardinality { lower: 1, upper: Some(1) };
    /// Zero or one value.
    pub const OPTIONAL: Cardinality = Cardinality { lower: 0, upper: Some(1) };

    pub fn new(lower: usize, upper: Option<usize>) -> Self {
        Self { lower, upper }
    }

    /// Returns true if `count` values satisfy this cardinality.
    pub fn allows(&self, count: usize) -> bool {
        count >= self.lower && self.upper.is_none_or(|upper| count <= upper)
    }
}

/// An extra validation rule attached to one property.
///
/// The check runs once per stored value during validation and returns a
/// message when the value violates the rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub code: Option<&'static str>,
    pub severity: Severity,
    pub check: fn(&Value) -> Option<String>,
}

impl Rule {
    /// Creates an error-level rule.
    pub fn error(code: Option<&'static str>, check: fn(&Value) -> Option<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            check,
        }
    }

    /// Creates a warning-level rule.
    pub fn warning(code: Option<&'static str>, check: fn(&Value) -> Option<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            check,
        }
    }
}

/// A property declared on an object.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub uri: &'static str,
    pub kind: PropertyKind,
    pub cardinality: Cardinality,
    pub rules: Vec<Rule>,
    /// Child types an owned property accepts; empty means any.
    pub allowed_types: &'static [&'static str],
}

impl PropertyDef {
    pub fn new(uri: &'static str, kind: PropertyKind, cardinality: Cardinality) -> Self {
        Self {
            uri,
            kind,
            cardinality,
            rules: Vec::new(),
            allowed_types: &[],
        }
    }

    /// Adds an extra validation rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

// =============================================================================
// LIST MACHINERY
// =============================================================================

/// Shared storage access for list-shaped mutation.
///
/// Implementors name the backing vector on the owner and may override
/// [`PropertySlot::item_added`], which runs before an item is stored and can
/// adjust or reject it.
pub trait PropertySlot {
    type Item;

    /// The property URI.
    fn uri(&self) -> &'static str;

    /// Maximum number of items, `None` if unbounded.
    fn upper(&self) -> Option<usize>;

    /// Returns the backing vector on `owner`.
    fn storage<'a>(&self, owner: &'a mut Identified) -> &'a mut Vec<Self::Item>;

    /// Hook run for every item before it is stored.
    ///
    /// `siblings` are the items already stored under this property. An error
    /// aborts the mutation and leaves storage unchanged.
    fn item_added(
        &self,
        _owner_identity: &str,
        _siblings: &[Self::Item],
        _item: &mut Self::Item,
    ) -> Result<(), PropertyError> {
        Ok(())
    }
}

fn check_upper(uri: &str, upper: Option<usize>, attempted: usize) -> Result<(), PropertyError> {
    match upper {
        Some(upper) if attempted > upper => Err(PropertyError::TooManyValues {
            property: uri.to_string(),
            upper,
            attempted,
        }),
        _ => Ok(()),
    }
}

/// Inserts one item at `index` (or appends when `None`).
pub(crate) fn insert_item<S: PropertySlot>(
    slot: &S,
    owner: &mut Identified,
    index: Option<usize>,
    mut item: S::Item,
) -> Result<(), PropertyError> {
    let owner_identity = owner.identity().to_string();
    let storage = slot.storage(owner);
    let len = storage.len();
    check_upper(slot.uri(), slot.upper(), len + 1)?;

    let index = index.unwrap_or(len);
    if index > len {
        return Err(PropertyError::IndexOutOfBounds {
            property: slot.uri().to_string(),
            index,
            len,
        });
    }

    slot.item_added(&owner_identity, storage, &mut item)?;
    storage.insert(index, item);
    Ok(())
}

/// Replaces all items. Either every item is accepted or storage is left as
/// it was.
pub(crate) fn replace_items<S: PropertySlot>(
    slot: &S,
    owner: &mut Identified,
    items: Vec<S::Item>,
) -> Result<(), PropertyError> {
    check_upper(slot.uri(), slot.upper(), items.len())?;

    let owner_identity = owner.identity().to_string();
    let mut staged = Vec::with_capacity(items.len());
    for mut item in items {
        slot.item_added(&owner_identity, &staged, &mut item)?;
        staged.push(item);
    }
    *slot.storage(owner) = staged;
    Ok(())
}

/// Removes the item at `index`.
pub(crate) fn remove_item<S: PropertySlot>(
    slot: &S,
    owner: &mut Identified,
    index: usize,
) -> Result<S::Item, PropertyError> {
    let storage = slot.storage(owner);
    if index >= storage.len() {
        return Err(PropertyError::IndexOutOfBounds {
            property: slot.uri().to_string(),
            index,
            len: storage.len(),
        });
    }
    Ok(storage.remove(index))
}

// =============================================================================
// VALUE HANDLES
// =============================================================================

/// Handle for a property holding at most one value.
#[derive(Debug, Clone, Copy)]
pub struct Singleton<K> {
    uri: &'static str,
    _kind: PhantomData<K>,
}

impl<K: ValueKind> Singleton<K> {
    /// A handle that is not yet recorded in any property table.
    pub(crate) const fn unbound(uri: &'static str) -> Self {
        Self {
            uri,
            _kind: PhantomData,
        }
    }

    /// Declares the property on `owner` with cardinality `[lower, 1]`.
    pub fn declare(owner: &mut Identified, uri: &'static str, lower: usize) -> Self {
        Self::declare_with_rules(owner, uri, lower, Vec::new())
    }

    /// Declares the property with extra validation rules.
    pub fn declare_with_rules(
        owner: &mut Identified,
        uri: &'static str,
        lower: usize,
        rules: Vec<Rule>,
    ) -> Self {
        let mut def = PropertyDef::new(uri, K::KIND, Cardinality::new(lower, Some(1)));
        def.rules = rules;
        owner.declare(def);
        Self {
            uri,
            _kind: PhantomData,
        }
    }

    /// Stores an initial value, if any, and returns the handle.
    pub fn initial(self, owner: &mut Identified, value: Option<K::User>) -> Result<Self, PropertyError> {
        if let Some(value) = value {
            self.set(owner, value)?;
        }
        Ok(self)
    }

    /// Returns the property URI.
    pub fn uri(&self) -> &'static str {
        self.uri
    }

    /// Returns the stored value, or `None` if absent.
    pub fn get(&self, owner: &Identified) -> Result<Option<K::User>, PropertyError> {
        match owner.values(self.uri) {
            [] => Ok(None),
            [value] => K::to_user(self.uri, value).map(Some),
            values => Err(PropertyError::TooManyValues {
                property: self.uri.to_string(),
                upper: 1,
                attempted: values.len(),
            }),
        }
    }

    /// Overwrites the stored value.
    pub fn set(&self, owner: &mut Identified, value: K::User) -> Result<(), PropertyError> {
        *owner.value_storage(self.uri) = vec![K::from_user(value)];
        Ok(())
    }

    /// Removes the stored value.
    pub fn clear(&self, owner: &mut Identified) {
        owner.value_storage(self.uri).clear();
    }

    /// Returns true if a value is stored.
    pub fn is_set(&self, owner: &Identified) -> bool {
        !owner.values(self.uri).is_empty()
    }
}

/// Handle for a property holding an ordered sequence of values.
///
/// Insertion order is authoritative; values are never sorted.
#[derive(Debug, Clone, Copy)]
pub struct List<K> {
    uri: &'static str,
    upper: Option<usize>,
    _kind: PhantomData<K>,
}

impl<K: ValueKind> List<K> {
    /// Declares the property on `owner` with cardinality `[lower, upper]`.
    pub fn declare(owner: &mut Identified, uri: &'static str, lower: usize, upper: Option<usize>) -> Self {
        Self::declare_with_rules(owner, uri, lower, upper, Vec::new())
    }

    /// Declares the property with extra validation rules.
    pub fn declare_with_rules(
        owner: &mut Identified,
        uri: &'static str,
        lower: usize,
        upper: Option<usize>,
        rules: Vec<Rule>,
    ) -> Self {
        let mut def = PropertyDef::new(uri, K::KIND, Cardinality::new(lower, upper));
        def.rules = rules;
        owner.declare(def);
        Self {
            uri,
            upper,
            _kind: PhantomData,
        }
    }

    /// Stores initial values and returns the handle.
    pub fn initial(self, owner: &mut Identified, values: Vec<K::User>) -> Result<Self, PropertyError> {
        if !values.is_empty() {
            self.set(owner, values)?;
        }
        Ok(self)
    }

    /// Returns the property URI.
    pub fn uri(&self) -> &'static str {
        self.uri
    }

    /// Returns all stored values in insertion order.
    pub fn get(&self, owner: &Identified) -> Result<Vec<K::User>, PropertyError> {
        owner
            .values(self.uri)
            .iter()
            .map(|value| K::to_user(self.uri, value))
            .collect()
    }

    /// Returns the number of stored values.
    pub fn len(&self, owner: &Identified) -> usize {
        owner.values(self.uri).len()
    }

    pub fn is_empty(&self, owner: &Identified) -> bool {
        self.len(owner) == 0
    }

    /// Replaces all stored values.
    pub fn set(&self, owner: &mut Identified, values: Vec<K::User>) -> Result<(), PropertyError> {
        let values = values.into_iter().map(K::from_user).collect();
        replace_items(self, owner, values)
    }

    /// Appends a value.
    pub fn add(&self, owner: &mut Identified, value: K::User) -> Result<(), PropertyError> {
        insert_item(self, owner, None, K::from_user(value))
    }

    /// Inserts a value at `index`.
    pub fn insert(&self, owner: &mut Identified, index: usize, value: K::User) -> Result<(), PropertyError> {
        insert_item(self, owner, Some(index), K::from_user(value))
    }

    /// Removes and returns the value at `index`.
    pub fn remove(&self, owner: &mut Identified, index: usize) -> Result<K::User, PropertyError> {
        let value = remove_item(self, owner, index)?;
        K::to_user(self.uri, &value)
    }

    /// Removes all values.
    pub fn clear(&self, owner: &mut Identified) {
        owner.value_storage(self.uri).clear();
    }
}

impl<K: ValueKind> PropertySlot for List<K> {
    type Item = Value;

    fn uri(&self) -> &'static str {
        self.uri
    }

    fn upper(&self) -> Option<usize> {
        self.upper
    }

    fn storage<'a>(&self, owner: &'a mut Identified) -> &'a mut Vec<Value> {
        owner.value_storage(self.uri)
    }
}
