//! DDL Writer - Serializes a document tree to DDL text
//!
//! DDL is a brace-delimited markup of `\keyword[attributes]{content}`
//! shapes. The writer only emits values that are explicitly set and differ
//! from their reference, and drops attribute or content blocks that end up
//! empty.

mod api;
mod attributes;
mod config;
mod document;
mod encode;
mod error;
mod paragraph;
mod serialize;
mod serializer;
mod table;

pub use api::*;
pub use attributes::{write_borders, write_object, write_paragraph_format, write_values};
pub use config::DdlWriterConfig;
pub use encode::{encode_text, quote_string};
pub use error::{DdlError, DdlResult};
pub use serialize::{serialize_node, DdlSerialize};
pub use serializer::{BlockKind, BlockToken, Serializer, MAX_BLOCK_DEPTH};
