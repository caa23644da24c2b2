//! Public API for DDL export
//!
//! This module provides the main entry points for writing a document tree
//! as DDL text.

use crate::config::DdlWriterConfig;
use crate::error::DdlResult;
use crate::serialize::serialize_node;
use crate::serializer::Serializer;
use ddl_model::{DocumentTree, NodeId};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write the whole document with the default configuration and return the
/// flushed writer
pub fn write_ddl<W: Write>(tree: &DocumentTree, writer: W) -> DdlResult<W> {
    write_ddl_with_config(tree, writer, DdlWriterConfig::default())
}

/// Write the whole document with a custom configuration
pub fn write_ddl_with_config<W: Write>(
    tree: &DocumentTree,
    writer: W,
    config: DdlWriterConfig,
) -> DdlResult<W> {
    write_object_ddl(tree, tree.root_id(), writer, config)
}

fn write_object_ddl<W: Write>(
    tree: &DocumentTree,
    id: NodeId,
    writer: W,
    config: DdlWriterConfig,
) -> DdlResult<W> {
    let node_type = tree.node_type(id)?;
    debug!(node = %id, node_type = node_type.name(), "serializing DDL");
    let mut serializer = Serializer::with_config(writer, config);
    serialize_node(tree, id, &mut serializer)?;
    let writer = serializer.finish()?;
    debug!(node = %id, "finished DDL");
    Ok(writer)
}

/// Serialize the whole document to a string
///
/// # Example
///
/// ```ignore
/// use ddl_model::DocumentTree;
/// use ddl_writer::to_ddl_string;
///
/// let mut tree = DocumentTree::new();
/// let section = tree.add_section()?;
/// tree.add_paragraph(section, "Hello")?;
/// assert!(to_ddl_string(&tree)?.contains("Hello"));
/// ```
pub fn to_ddl_string(tree: &DocumentTree) -> DdlResult<String> {
    let bytes = write_ddl(tree, Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}

/// Serialize one object and its subtree to a string
pub fn object_to_ddl_string(tree: &DocumentTree, id: NodeId) -> DdlResult<String> {
    let bytes = write_object_ddl(tree, id, Vec::new(), DdlWriterConfig::default())?;
    Ok(String::from_utf8(bytes)?)
}

/// Export the document to a DDL file, creating parent directories as needed
pub fn export_ddl(tree: &DocumentTree, path: &Path) -> DdlResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_ddl(tree, BufWriter::new(file))?;
    debug!(path = %path.display(), nodes = tree.node_count(), "exported DDL");
    Ok(())
}
