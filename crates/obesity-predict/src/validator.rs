//! Completeness gate applied before any request leaves the process.
//!
//! Only presence is checked. Numeric ranges and categorical tokens are the
//! prediction service's responsibility.

use crate::fields::{Attribute, FieldSet};

/// `true` when every attribute holds a non-blank value.
pub fn is_complete(fields: &FieldSet) -> bool {
    fields.iter().all(|(_, value)| !value.trim().is_empty())
}

/// Blank attributes in canonical order.
pub fn missing_fields(fields: &FieldSet) -> Vec<Attribute> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(attribute, _)| attribute)
        .collect()
}
