//! DDL Model - Document object model with nullable property values
//!
//! This crate provides the in-memory document tree that applications build
//! before serializing it to DDL: an id-keyed arena of document objects,
//! nullable property values with name-based access, the style graph, and
//! the `Unit` and `Color` value types.

mod color;
mod document;
mod enums;
mod error;
mod format;
mod node_id;
mod object;
mod paragraph;
mod section;
mod style;
mod table;
mod tree;
mod unit;
mod values;

pub use color::*;
pub use document::*;
pub use enums::*;
pub use error::*;
pub use format::*;
pub use node_id::*;
pub use object::*;
pub use paragraph::*;
pub use section::*;
pub use style::*;
pub use table::*;
pub use tree::*;
pub use unit::*;
pub use values::*;
