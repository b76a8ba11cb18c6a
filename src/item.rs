//! Storage item representation and the `Message` mapping.
//!
//! An item is a map of attribute names to tagged scalar values. The JSON
//! shape uses single-key objects like `{"S": "hello"}`.

use crate::models::Message;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key attribute of every message item
pub const ID_ATTRIBUTE: &str = "id";

/// Attribute holding the message text
pub const MESSAGE_ATTRIBUTE: &str = "message";

/// A storage item: attribute name to tagged value
pub type StorageItem = HashMap<String, AttributeValue>;

/// Tagged scalar value of a storage attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number value (string-encoded for arbitrary precision).
    N(String),
}

impl AttributeValue {
    /// Returns the string value if this is an `S` variant.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            Self::N(_) => None,
        }
    }

    /// Returns the type descriptor string ("S" or "N").
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
        }
    }
}

/// Errors shaping a storage item into a `Message`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("Stored item is missing attribute '{0}'.")]
    MissingAttribute(&'static str),

    #[error("Stored attribute '{attribute}' has type {actual}, expected {expected}.")]
    UnexpectedType {
        attribute: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Read a string attribute from an item.
pub fn string_attribute<'a>(
    item: &'a StorageItem,
    attribute: &'static str,
) -> Result<&'a str, ItemError> {
    let value = item
        .get(attribute)
        .ok_or(ItemError::MissingAttribute(attribute))?;

    value.as_s().ok_or(ItemError::UnexpectedType {
        attribute,
        expected: "S",
        actual: value.type_descriptor(),
    })
}

impl Message {
    /// Package as a storage item.
    pub fn to_item(&self) -> StorageItem {
        HashMap::from([
            (ID_ATTRIBUTE.to_string(), AttributeValue::S(self.id.clone())),
            (
                MESSAGE_ATTRIBUTE.to_string(),
                AttributeValue::S(self.message.clone()),
            ),
        ])
    }
}

impl TryFrom<&StorageItem> for Message {
    type Error = ItemError;

    fn try_from(item: &StorageItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: string_attribute(item, ID_ATTRIBUTE)?.to_string(),
            message: string_attribute(item, MESSAGE_ATTRIBUTE)?.to_string(),
        })
    }
}
