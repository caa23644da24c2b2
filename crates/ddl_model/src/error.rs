//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Object {0} already has a parent; clone it before attaching it elsewhere")]
    AlreadyAttached(Uuid),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("'{name}' is not a valid value name for {type_name}")]
    InvalidValueName { type_name: &'static str, name: String },

    #[error("Value '{name}' expects {expected}, got {found}")]
    InvalidValueType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value '{0}' is read-only")]
    ReadOnlyValue(String),

    #[error("Style not found: {0}")]
    UnknownStyle(String),

    #[error("Base style '{0}' does not exist")]
    UnknownBaseStyle(String),

    #[error("Using '{base}' as base style of '{style}' creates a circular reference")]
    CircularStyle { style: String, base: String },

    #[error("Root style '{0}' cannot have a base style")]
    RootStyleRebase(String),

    #[error("Style '{style}' and its base style '{base}' have different style types")]
    BaseStyleTypeMismatch { style: String, base: String },

    #[error("Style '{0}' already exists")]
    DuplicateStyle(String),

    #[error("Document is already bound to another renderer")]
    RendererAlreadyBound,

    #[error("Invalid unit: '{0}'")]
    InvalidUnit(String),

    #[error("Invalid color: '{0}'")]
    InvalidColor(String),

    #[error("'{value}' is not a valid {type_name} value")]
    InvalidEnumValue { type_name: &'static str, value: String },

    #[error("A CMYK color cannot be modified through its RGB channels")]
    CmykColorIsReadOnly,

    #[error("{element} cannot be stored in {collection}")]
    InvalidCollectionElement {
        collection: &'static str,
        element: &'static str,
    },

    #[error("Index {index} is out of range for a collection of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
}

impl DomError {
    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Create an invalid value name error
    pub fn invalid_name(type_name: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidValueName {
            type_name,
            name: name.into(),
        }
    }

    /// Create an invalid enum value error
    pub fn invalid_enum(type_name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            type_name,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomError>;
