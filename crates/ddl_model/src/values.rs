//! Nullable property values and name-based property access
//!
//! Every property of a document object is stored as an `Option`: `None`
//! means "not set, inherit or use the default", `Some` means explicitly
//! set, even when the value equals the default. Getters that substitute
//! defaults live on the owning types; this module only deals with the
//! stored optionality.
//!
//! Each type registers a [`Meta`] table once, mapping property names to
//! accessor functions. [`Values`] builds the generic `get_value` /
//! `set_value` / `has_value` / `is_value_null` / `set_value_null`
//! operations on top of that table. Names are case-insensitive and may be
//! dotted paths through composite properties (`"Format.Font.Bold"`).

use crate::{
    BorderStyle, Color, DomError, HyperlinkType, LineSpacingRule, Orientation, OutlineLevel,
    PageFormat, ParagraphAlignment, Result, RowAlignment, RowHeightRule, SectionStart, StyleType,
    SymbolName, Underline, Unit, VerticalAlignment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A dynamically typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Double(f64),
    String(String),
    Unit(Unit),
    Color(Color),
    /// Name of an enumeration variant
    Enum(String),
}

impl Value {
    /// Name of the variant, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Unit(_) => "unit",
            Value::Color(_) => "color",
            Value::Enum(_) => "enum",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Unit> for Value {
    fn from(v: Unit) -> Self {
        Value::Unit(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

/// Conversion from a [`Value`] into a typed property value
pub trait FromValue: Sized {
    /// `name` is the property being assigned, used in errors
    fn from_value(name: &str, value: Value) -> Result<Self>;
}

fn type_error(name: &str, expected: &'static str, value: &Value) -> DomError {
    DomError::InvalidValueType {
        name: name.to_string(),
        expected,
        found: value.kind_name(),
    }
}

impl FromValue for bool {
    fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::String(ref s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(ref s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(type_error(name, "bool", &other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(type_error(name, "int", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Double(v) => Ok(v),
            Value::Int(v) => Ok(f64::from(v)),
            other => Err(type_error(name, "double", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(type_error(name, "string", &other)),
        }
    }
}

impl FromValue for Unit {
    fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Unit(v) => Ok(v),
            Value::Int(v) => Ok(Unit::from(v)),
            Value::Double(v) => Ok(Unit::from(v)),
            Value::String(s) => s.parse(),
            other => Err(type_error(name, "unit", &other)),
        }
    }
}

impl FromValue for Color {
    fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Color(v) => Ok(v),
            Value::String(s) => s.parse(),
            other => Err(type_error(name, "color", &other)),
        }
    }
}

macro_rules! enum_values {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Enum(v.name().to_string())
                }
            }

            impl FromValue for $ty {
                fn from_value(name: &str, value: Value) -> Result<Self> {
                    match value {
                        Value::Enum(s) | Value::String(s) => s.parse(),
                        other => Err(type_error(name, "enum", &other)),
                    }
                }
            }
        )+
    };
}

enum_values!(
    BorderStyle,
    HyperlinkType,
    LineSpacingRule,
    Orientation,
    OutlineLevel,
    PageFormat,
    ParagraphAlignment,
    RowAlignment,
    RowHeightRule,
    SectionStart,
    StyleType,
    SymbolName,
    Underline,
    VerticalAlignment,
);

/// How a registered property is reached
pub enum Access<T: 'static> {
    /// A plain nullable value
    Value {
        get: fn(&T) -> Option<Value>,
        set: fn(&mut T, Value) -> Result<()>,
        clear: fn(&mut T),
    },
    /// A value that can be read but not assigned by name
    ReadOnly { get: fn(&T) -> Option<Value> },
    /// A composite value with properties of its own
    Object {
        get: fn(&T) -> Option<&dyn Values>,
        /// Returns the composite, creating it when absent
        get_mut: fn(&mut T) -> &mut dyn Values,
        clear: fn(&mut T),
        /// A fresh default instance, used to validate paths below an
        /// absent composite
        blank: fn() -> Box<dyn Values>,
    },
}

/// One entry in a type's property table
pub struct Property<T: 'static> {
    pub name: &'static str,
    pub access: Access<T>,
}

/// Property table of a type, built once
pub struct Meta<T: 'static> {
    type_name: &'static str,
    properties: Vec<Property<T>>,
    index: HashMap<String, usize>,
}

impl<T: 'static> Meta<T> {
    pub fn new(type_name: &'static str, properties: Vec<Property<T>>) -> Self {
        let index = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.to_ascii_lowercase(), i))
            .collect();
        Self {
            type_name,
            properties,
            index,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }

    /// Look up a property by name (case-insensitive)
    pub fn find(&self, name: &str) -> Result<&Property<T>> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.properties[i])
            .ok_or_else(|| DomError::invalid_name(self.type_name, name))
    }
}

/// Types that register a [`Meta`] table
pub trait HasMeta: Sized + 'static {
    fn meta() -> &'static Meta<Self>;
}

/// Name-based access to the nullable values of an object
pub trait Values {
    fn type_name(&self) -> &'static str;

    /// The stored value, `None` when unset. Fails for unknown names and for
    /// paths that end at a composite.
    fn get_value(&self, name: &str) -> Result<Option<Value>>;

    /// Assign a value; composites along a dotted path are created on demand
    fn set_value(&mut self, name: &str, value: Value) -> Result<()>;

    /// True when the value (or composite) is explicitly present
    fn has_value(&self, name: &str) -> Result<bool>;

    /// True when the value is unset, or the composite is absent or null
    fn is_value_null(&self, name: &str) -> Result<bool>;

    /// Reset a value (or composite) to unset
    fn set_value_null(&mut self, name: &str) -> Result<()>;

    /// True when every property is null
    fn is_null(&self) -> bool;

    /// Reset every assignable property
    fn set_null(&mut self);

    /// Names of the assignable plain values, in registration order
    fn value_names(&self) -> Vec<&'static str>;

    /// Names of the composite values, in registration order
    fn object_names(&self) -> Vec<&'static str>;

    /// A composite value, `None` when absent
    fn get_object(&self, name: &str) -> Result<Option<&dyn Values>>;
}

fn split_path(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    }
}

impl<T: HasMeta> Values for T {
    fn type_name(&self) -> &'static str {
        T::meta().type_name()
    }

    fn get_value(&self, name: &str) -> Result<Option<Value>> {
        let (head, rest) = split_path(name);
        let property = T::meta().find(head)?;
        match (&property.access, rest) {
            (Access::Value { get, .. }, None) | (Access::ReadOnly { get }, None) => Ok(get(self)),
            (Access::Object { get, blank, .. }, Some(rest)) => match get(self) {
                Some(object) => object.get_value(rest),
                None => blank().get_value(rest).map(|_| None),
            },
            (Access::Object { .. }, None) => Err(DomError::invalid_operation(format!(
                "'{}' of {} is a composite value; address one of its properties",
                head,
                T::meta().type_name()
            ))),
            (_, Some(_)) => Err(DomError::invalid_name(T::meta().type_name(), name)),
        }
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<()> {
        let (head, rest) = split_path(name);
        let property = T::meta().find(head)?;
        match (&property.access, rest) {
            (Access::Value { set, .. }, None) => set(self, value),
            (Access::ReadOnly { .. }, None) => Err(DomError::ReadOnlyValue(name.to_string())),
            (Access::Object { get_mut, .. }, Some(rest)) => get_mut(self).set_value(rest, value),
            (Access::Object { .. }, None) => Err(DomError::invalid_operation(format!(
                "'{}' of {} is a composite value; address one of its properties",
                head,
                T::meta().type_name()
            ))),
            (_, Some(_)) => Err(DomError::invalid_name(T::meta().type_name(), name)),
        }
    }

    fn has_value(&self, name: &str) -> Result<bool> {
        let (head, rest) = split_path(name);
        let property = T::meta().find(head)?;
        match (&property.access, rest) {
            (Access::Value { get, .. }, None) | (Access::ReadOnly { get }, None) => {
                Ok(get(self).is_some())
            }
            (Access::Object { get, .. }, None) => Ok(get(self).is_some()),
            (Access::Object { get, blank, .. }, Some(rest)) => match get(self) {
                Some(object) => object.has_value(rest),
                None => blank().has_value(rest).map(|_| false),
            },
            (_, Some(_)) => Err(DomError::invalid_name(T::meta().type_name(), name)),
        }
    }

    fn is_value_null(&self, name: &str) -> Result<bool> {
        let (head, rest) = split_path(name);
        let property = T::meta().find(head)?;
        match (&property.access, rest) {
            (Access::Value { get, .. }, None) | (Access::ReadOnly { get }, None) => {
                Ok(get(self).is_none())
            }
            (Access::Object { get, .. }, None) => Ok(get(self).map_or(true, |o| o.is_null())),
            (Access::Object { get, blank, .. }, Some(rest)) => match get(self) {
                Some(object) => object.is_value_null(rest),
                None => blank().is_value_null(rest).map(|_| true),
            },
            (_, Some(_)) => Err(DomError::invalid_name(T::meta().type_name(), name)),
        }
    }

    fn set_value_null(&mut self, name: &str) -> Result<()> {
        let (head, rest) = split_path(name);
        let property = T::meta().find(head)?;
        match (&property.access, rest) {
            (Access::Value { clear, .. }, None) | (Access::Object { clear, .. }, None) => {
                clear(self);
                Ok(())
            }
            (Access::ReadOnly { .. }, None) => Err(DomError::ReadOnlyValue(name.to_string())),
            (Access::Object { get, get_mut, blank, .. }, Some(rest)) => {
                if get(self).is_some() {
                    get_mut(self).set_value_null(rest)
                } else {
                    blank().set_value_null(rest)
                }
            }
            (_, Some(_)) => Err(DomError::invalid_name(T::meta().type_name(), name)),
        }
    }

    fn is_null(&self) -> bool {
        T::meta().properties().iter().all(|p| match &p.access {
            Access::Value { get, .. } => get(self).is_none(),
            Access::ReadOnly { .. } => true,
            Access::Object { get, .. } => get(self).map_or(true, |o| o.is_null()),
        })
    }

    fn set_null(&mut self) {
        for property in T::meta().properties() {
            match &property.access {
                Access::Value { clear, .. } | Access::Object { clear, .. } => clear(self),
                Access::ReadOnly { .. } => {}
            }
        }
    }

    fn value_names(&self) -> Vec<&'static str> {
        T::meta()
            .properties()
            .iter()
            .filter(|p| matches!(p.access, Access::Value { .. }))
            .map(|p| p.name)
            .collect()
    }

    fn object_names(&self) -> Vec<&'static str> {
        T::meta()
            .properties()
            .iter()
            .filter(|p| matches!(p.access, Access::Object { .. }))
            .map(|p| p.name)
            .collect()
    }

    fn get_object(&self, name: &str) -> Result<Option<&dyn Values>> {
        let (head, rest) = split_path(name);
        let property = T::meta().find(head)?;
        match (&property.access, rest) {
            (Access::Object { get, .. }, None) => Ok(get(self)),
            (Access::Object { get, blank, .. }, Some(rest)) => match get(self) {
                Some(object) => object.get_object(rest),
                None => blank().get_object(rest).map(|_| None),
            },
            _ => Err(DomError::invalid_operation(format!(
                "'{}' of {} is not a composite value",
                name,
                T::meta().type_name()
            ))),
        }
    }
}

/// Register an `Option<_>` field as a nullable value property
#[macro_export]
macro_rules! value_property {
    ($name:literal, $owner:ty, $field:ident : $value:ty) => {{
        fn get(o: &$owner) -> Option<$crate::Value> {
            o.$field.clone().map($crate::Value::from)
        }
        fn set(o: &mut $owner, v: $crate::Value) -> $crate::Result<()> {
            o.$field = Some(<$value as $crate::FromValue>::from_value($name, v)?);
            Ok(())
        }
        fn clear(o: &mut $owner) {
            o.$field = None;
        }
        $crate::Property {
            name: $name,
            access: $crate::Access::Value { get, set, clear },
        }
    }};
}

/// Register an `Option<_>` composite field as an object property
#[macro_export]
macro_rules! object_property {
    ($name:literal, $owner:ty, $field:ident : $object:ty) => {{
        fn get(o: &$owner) -> Option<&dyn $crate::Values> {
            o.$field.as_ref().map(|v| v as &dyn $crate::Values)
        }
        fn get_mut(o: &mut $owner) -> &mut dyn $crate::Values {
            o.$field.get_or_insert_with(<$object>::default)
        }
        fn clear(o: &mut $owner) {
            o.$field = None;
        }
        fn blank() -> Box<dyn $crate::Values> {
            Box::new(<$object>::default())
        }
        $crate::Property {
            name: $name,
            access: $crate::Access::Object {
                get,
                get_mut,
                clear,
                blank,
            },
        }
    }};
}
