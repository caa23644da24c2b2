//! The `DdlSerialize` contract and tree dispatch

use crate::error::DdlResult;
use crate::serializer::Serializer;
use ddl_model::{is_null_format, names, DocumentTree, Element, NodeId};
use std::io::Write;

/// Objects that can write themselves as DDL
pub trait DdlSerialize {
    /// Write this object; children are looked up in `tree`
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()>;
}

/// Serialize the object `id` and everything below it
pub fn serialize_node<W: Write>(
    tree: &DocumentTree,
    id: NodeId,
    s: &mut Serializer<W>,
) -> DdlResult<()> {
    match tree.element(id)? {
        Element::Document(e) => e.serialize(tree, s),
        Element::Section(e) => e.serialize(tree, s),
        Element::HeaderFooter(e) => e.serialize(tree, s),
        Element::Paragraph(e) => e.serialize(tree, s),
        Element::FormattedText(e) => e.serialize(tree, s),
        Element::Hyperlink(e) => e.serialize(tree, s),
        Element::Text(e) => e.serialize(tree, s),
        Element::Character(e) => e.serialize(tree, s),
        Element::Table(e) => e.serialize(tree, s),
        Element::Column(e) => e.serialize(tree, s),
        Element::Row(e) => e.serialize(tree, s),
        Element::Cell(e) => e.serialize(tree, s),
    }
}

/// Serialize a list of nodes in order
pub fn serialize_all<W: Write>(
    tree: &DocumentTree,
    ids: &[NodeId],
    s: &mut Serializer<W>,
) -> DdlResult<()> {
    for &id in ids {
        serialize_node(tree, id, s)?;
    }
    Ok(())
}

/// Serialize the block elements of a section, header/footer or cell. A lone
/// paragraph in the default style, without format or comment, is written as
/// its bare content.
pub fn serialize_block_elements<W: Write>(
    tree: &DocumentTree,
    ids: &[NodeId],
    s: &mut Serializer<W>,
) -> DdlResult<()> {
    match ids {
        [single] => match tree.element(*single)? {
            Element::Paragraph(p)
                if p.style().eq_ignore_ascii_case(names::NORMAL)
                    && is_null_format(p.format.as_ref())
                    && p.comment.is_none() =>
            {
                serialize_all(tree, p.elements(), s)?;
                s.close_up_line();
            }
            _ => serialize_node(tree, *single, s)?,
        },
        _ => serialize_all(tree, ids, s)?,
    }
    Ok(())
}

/// Write an object comment, if any
pub fn write_comment<W: Write>(s: &mut Serializer<W>, comment: Option<&String>) {
    if let Some(comment) = comment {
        s.write_comment(comment);
    }
}
