//! The sixteen-attribute input record and its immutable submission snapshot.

pub mod attribute;
pub mod options;

use std::ops::Deref;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use attribute::Attribute;
pub use options::{options_for, FieldOption};

/// Raw, string-typed answers for every [`Attribute`].
///
/// Values are carried exactly as entered; numeric parsing is left to the
/// prediction service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; Attribute::COUNT],
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: Attribute) -> &str {
        &self.values[attribute.index()]
    }

    /// Replaces the value for `attribute` without any validation.
    pub fn update(&mut self, attribute: Attribute, value: impl Into<String>) {
        self.values[attribute.index()] = value.into();
    }

    /// Same as [`FieldSet::update`] but resolves the attribute from its canonical name or wire key.
    pub fn update_named(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Attribute, FieldError> {
        let attribute: Attribute = name.parse()?;
        self.update(attribute, value);
        Ok(attribute)
    }

    pub fn reset(&mut self) {
        for value in self.values.iter_mut() {
            value.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot(Arc::new(self.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> + '_ {
        Attribute::ALL
            .into_iter()
            .map(move |attribute| (attribute, self.get(attribute)))
    }
}

/// Frozen copy of a [`FieldSet`] taken at submission time.
///
/// Serializes to the request body: one string entry per attribute, keyed by
/// the wire key, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot(Arc<FieldSet>);

impl Deref for FieldSnapshot {
    type Target = FieldSet;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for FieldSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Attribute::COUNT))?;
        for (attribute, value) in self.iter() {
            map.serialize_entry(attribute.wire_key(), value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("expected KEY=VALUE but got '{0}'")]
    MalformedAssignment(String),
}
