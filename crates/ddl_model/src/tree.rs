//! Document tree storage and structural operations
//!
//! Every document object lives in one id-keyed arena owned by the tree.
//! Parents hold child ids in ordered collections; children point back
//! through a plain `Option<NodeId>`. An object can sit in exactly one
//! place: attaching an object that already has a parent fails, and the
//! caller has to attach a clone instead.

use crate::object::{AncestorCache, Lookup};
use crate::values::Value;
use crate::{
    Cell, Character, CollectionKind, Column, Document, DocumentObject, DomError, Element,
    FormattedText, HeaderFooter, HeaderFooterIndex, Hyperlink, HyperlinkType, NodeId, NodeType,
    Paragraph, RendererId, Result, Row, Section, Styles, SymbolName, Table, Text, Unit,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell as StdCell;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The complete document tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    root: NodeId,
    nodes: HashMap<NodeId, DocumentObject>,
    #[serde(skip)]
    renderer: Option<RendererId>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_access {
    ($($get:ident, $get_mut:ident => $variant:ident;)+) => {
        $(
            pub fn $get(&self, id: NodeId) -> Result<&$variant> {
                match self.element(id)? {
                    Element::$variant(e) => Ok(e),
                    other => Err(wrong_type(id, NodeType::$variant, other.node_type())),
                }
            }

            pub fn $get_mut(&mut self, id: NodeId) -> Result<&mut $variant> {
                match self.element_mut(id)? {
                    Element::$variant(e) => Ok(e),
                    other => Err(wrong_type(id, NodeType::$variant, other.node_type())),
                }
            }
        )+
    };
}

fn wrong_type(id: NodeId, expected: NodeType, found: NodeType) -> DomError {
    DomError::invalid_operation(format!(
        "object {} is a {}, not a {}",
        id,
        found.name(),
        expected.name()
    ))
}

fn no_collection(owner: NodeType, kind: CollectionKind) -> DomError {
    DomError::invalid_operation(format!("{} has no {} collection", owner.name(), kind.name()))
}

impl DocumentTree {
    /// Create a tree holding an empty document with the built-in styles
    pub fn new() -> Self {
        let root = DocumentObject::new(Element::Document(Document::default()));
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            root: root_id,
            nodes,
            renderer: None,
        }
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Number of objects in the arena, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&DocumentObject> {
        self.nodes
            .get(&id)
            .ok_or(DomError::NodeNotFound(id.as_uuid()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DocumentObject> {
        self.nodes
            .get_mut(&id)
            .ok_or(DomError::NodeNotFound(id.as_uuid()))
    }

    pub fn element(&self, id: NodeId) -> Result<&Element> {
        Ok(&self.node(id)?.element)
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        Ok(&mut self.node_mut(id)?.element)
    }

    pub fn node_type(&self, id: NodeId) -> Result<NodeType> {
        Ok(self.node(id)?.node_type())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn tag(&self, id: NodeId) -> Result<Option<&serde_json::Value>> {
        Ok(self.node(id)?.tag.as_ref())
    }

    pub fn set_tag(&mut self, id: NodeId, tag: Option<serde_json::Value>) -> Result<()> {
        self.node_mut(id)?.tag = tag;
        Ok(())
    }

    typed_access! {
        section, section_mut => Section;
        header_footer, header_footer_mut => HeaderFooter;
        paragraph, paragraph_mut => Paragraph;
        formatted_text, formatted_text_mut => FormattedText;
        hyperlink, hyperlink_mut => Hyperlink;
        text, text_mut => Text;
        character, character_mut => Character;
        table, table_mut => Table;
        column, column_mut => Column;
        row, row_mut => Row;
        cell, cell_mut => Cell;
    }

    pub fn document(&self) -> Result<&Document> {
        match self.element(self.root)? {
            Element::Document(document) => Ok(document),
            other => Err(wrong_type(self.root, NodeType::Document, other.node_type())),
        }
    }

    pub fn document_mut(&mut self) -> Result<&mut Document> {
        let root = self.root;
        match self.element_mut(root)? {
            Element::Document(document) => Ok(document),
            other => Err(wrong_type(root, NodeType::Document, other.node_type())),
        }
    }

    pub fn styles(&self) -> Result<&Styles> {
        Ok(self.document()?.styles())
    }

    pub fn styles_mut(&mut self) -> Result<&mut Styles> {
        Ok(self.document_mut()?.styles_mut())
    }

    // =========================================================================
    // Creation, attachment, cloning
    // =========================================================================

    /// Create a detached object
    pub fn create(&mut self, element: impl Into<Element>) -> Result<NodeId> {
        let element = element.into();
        if element.node_type() == NodeType::Document {
            return Err(DomError::invalid_operation(
                "a tree has exactly one document; clone the tree instead",
            ));
        }
        let node = DocumentObject::new(element);
        let id = node.id();
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Set the parent of a detached object
    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if child == self.root {
            return Err(DomError::invalid_operation("the document cannot be attached"));
        }
        if self.node(child)?.parent.is_some() {
            return Err(DomError::AlreadyAttached(child.as_uuid()));
        }
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(DomError::invalid_operation(
                    "an object cannot be attached below itself",
                ));
            }
            current = self.node(id)?.parent;
        }
        self.node_mut(child)?.parent = Some(parent);
        self.reset_cached_values(child)
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        self.reset_cached_values(child)?;
        let node = self.node_mut(child)?;
        node.parent = None;
        clear_position(&mut node.element);
        Ok(())
    }

    /// Ids of `id` and all its descendants, parents before children
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            order.push(current);
            stack.extend(node.element.children().into_iter().rev());
        }
        Ok(order)
    }

    /// Deep copy of a subtree. The copy is detached, has fresh ids, and
    /// shares nothing with the original.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        if id == self.root {
            return Err(DomError::invalid_operation(
                "the document cannot be cloned into its own tree; clone the tree instead",
            ));
        }
        let ids = self.subtree(id)?;
        let mut mapping = HashMap::with_capacity(ids.len());
        let mut copies = Vec::with_capacity(ids.len());
        for old in &ids {
            let copy = self.node(*old)?.duplicate();
            mapping.insert(*old, copy.id());
            copies.push((*old, copy));
        }
        for (old, copy) in &mut copies {
            copy.element.remap_children(&mut |child| mapping.get(&child).copied().unwrap_or(child));
            if *old == id {
                clear_position(&mut copy.element);
            } else {
                copy.parent = self
                    .node(*old)?
                    .parent
                    .and_then(|p| mapping.get(&p).copied());
            }
        }
        let new_root = mapping
            .get(&id)
            .copied()
            .ok_or(DomError::NodeNotFound(id.as_uuid()))?;
        for (_, copy) in copies {
            self.nodes.insert(copy.id(), copy);
        }
        debug!("Cloned subtree of {} objects as {}", ids.len(), new_root);
        Ok(new_root)
    }

    /// Drop a detached object and everything below it
    pub fn discard(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DomError::invalid_operation("the document cannot be discarded"));
        }
        if self.node(id)?.parent.is_some() {
            return Err(DomError::invalid_operation(
                "only detached objects can be discarded; remove it from its parent first",
            ));
        }
        let ids = self.subtree(id)?;
        for id in &ids {
            self.nodes.remove(id);
        }
        trace!("Discarded {} objects", ids.len());
        Ok(())
    }

    // =========================================================================
    // Ancestry
    // =========================================================================

    /// The document this object belongs to, `None` while detached
    pub fn document_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.cached_ancestor(id, NodeType::Document, |cache| &cache.document)
    }

    /// The section this object belongs to
    pub fn section_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.cached_ancestor(id, NodeType::Section, |cache| &cache.section)
    }

    fn cached_ancestor(
        &self,
        id: NodeId,
        target: NodeType,
        slot: fn(&AncestorCache) -> &StdCell<Lookup>,
    ) -> Result<Option<NodeId>> {
        let node = self.node(id)?;
        if let Lookup::Resolved(found) = slot(&node.cache).get() {
            return Ok(found);
        }
        let mut found = None;
        let mut current = node.parent;
        while let Some(ancestor) = current {
            let ancestor_node = self.node(ancestor)?;
            if ancestor_node.node_type() == target {
                found = Some(ancestor);
                break;
            }
            current = ancestor_node.parent;
        }
        slot(&node.cache).set(Lookup::Resolved(found));
        Ok(found)
    }

    /// Forget cached ancestors of `id` and its descendants
    pub fn reset_cached_values(&self, id: NodeId) -> Result<()> {
        for node_id in self.subtree(id)? {
            self.node(node_id)?.cache.reset();
        }
        Ok(())
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub fn items(&self, owner: NodeId, kind: CollectionKind) -> Result<&[NodeId]> {
        let node = self.node(owner)?;
        node.element
            .collection(kind)
            .map(Vec::as_slice)
            .ok_or_else(|| no_collection(node.node_type(), kind))
    }

    fn items_mut(&mut self, owner: NodeId, kind: CollectionKind) -> Result<&mut Vec<NodeId>> {
        let node = self.node_mut(owner)?;
        let owner_type = node.node_type();
        node.element
            .collection_mut(kind)
            .ok_or_else(|| no_collection(owner_type, kind))
    }

    pub fn count(&self, owner: NodeId, kind: CollectionKind) -> Result<usize> {
        Ok(self.items(owner, kind)?.len())
    }

    pub fn index_of(&self, owner: NodeId, kind: CollectionKind, child: NodeId) -> Result<Option<usize>> {
        Ok(self.items(owner, kind)?.iter().position(|&id| id == child))
    }

    /// Append a detached object; returns its position
    pub fn add(&mut self, owner: NodeId, kind: CollectionKind, child: NodeId) -> Result<usize> {
        let index = self.count(owner, kind)?;
        self.insert(owner, kind, index, child)?;
        Ok(index)
    }

    /// Insert a detached object at `index`
    pub fn insert(
        &mut self,
        owner: NodeId,
        kind: CollectionKind,
        index: usize,
        child: NodeId,
    ) -> Result<()> {
        let child_type = self.node_type(child)?;
        let owner_node = self.node(owner)?;
        let len = owner_node
            .element
            .collection(kind)
            .ok_or_else(|| no_collection(owner_node.node_type(), kind))?
            .len();
        if !owner_node.element.accepts(kind, child_type) {
            return Err(DomError::InvalidCollectionElement {
                collection: kind.name(),
                element: child_type.name(),
            });
        }
        if index > len {
            return Err(DomError::IndexOutOfRange { index, len });
        }

        self.attach(owner, child)?;
        self.items_mut(owner, kind)?.insert(index, child);

        match kind {
            CollectionKind::Rows => {
                self.fill_row(owner, child)?;
                if index == len {
                    self.set_row_index(child, index)?;
                } else {
                    self.reindex_rows(owner, index)?;
                }
            }
            CollectionKind::Columns => self.insert_column_cells(owner, index)?,
            _ => {}
        }
        Ok(())
    }

    /// Detach the object at `index` and return it. The object stays in the
    /// arena so it can be attached elsewhere or discarded.
    pub fn remove_at(&mut self, owner: NodeId, kind: CollectionKind, index: usize) -> Result<NodeId> {
        let items = self.items_mut(owner, kind)?;
        if index >= items.len() {
            return Err(DomError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        let child = items.remove(index);
        self.detach(child)?;

        match kind {
            CollectionKind::Rows => self.reindex_rows(owner, index)?,
            CollectionKind::Columns => {
                for row in self.items(owner, CollectionKind::Rows)?.to_vec() {
                    if index < self.count(row, CollectionKind::Cells)? {
                        let cell = self.remove_at(row, CollectionKind::Cells, index)?;
                        self.discard(cell)?;
                    }
                }
            }
            _ => {}
        }
        Ok(child)
    }

    /// Detach every object of a collection, in order
    pub fn clear(&mut self, owner: NodeId, kind: CollectionKind) -> Result<Vec<NodeId>> {
        let mut removed = Vec::with_capacity(self.count(owner, kind)?);
        while let Some(last) = self.count(owner, kind)?.checked_sub(1) {
            removed.push(self.remove_at(owner, kind, last)?);
        }
        removed.reverse();
        Ok(removed)
    }

    fn set_row_index(&mut self, row: NodeId, index: usize) -> Result<()> {
        if let Element::Row(r) = &mut self.node_mut(row)?.element {
            r.index = index;
        }
        Ok(())
    }

    /// Push positions into every row at or after `from`
    fn reindex_rows(&mut self, table: NodeId, from: usize) -> Result<()> {
        let rows = self.items(table, CollectionKind::Rows)?;
        let shifted: Vec<NodeId> = rows.get(from..).unwrap_or_default().to_vec();
        for (offset, row) in shifted.iter().enumerate() {
            self.set_row_index(*row, from + offset)?;
        }
        trace!("Re-indexed {} rows from {}", shifted.len(), from);
        Ok(())
    }

    /// Give a row one cell per column of its table
    fn fill_row(&mut self, table: NodeId, row: NodeId) -> Result<()> {
        let columns = self.count(table, CollectionKind::Columns)?;
        let cells = self.count(row, CollectionKind::Cells)?;
        for _ in cells..columns {
            let cell = self.create(Cell::default())?;
            self.add(row, CollectionKind::Cells, cell)?;
        }
        Ok(())
    }

    fn insert_column_cells(&mut self, table: NodeId, column: usize) -> Result<()> {
        for row in self.items(table, CollectionKind::Rows)?.to_vec() {
            let cells = self.count(row, CollectionKind::Cells)?;
            let cell = self.create(Cell::default())?;
            self.insert(row, CollectionKind::Cells, column.min(cells), cell)?;
        }
        Ok(())
    }

    /// True when every object in the collection is null
    pub fn is_collection_null(&self, owner: NodeId, kind: CollectionKind) -> Result<bool> {
        for &child in self.items(owner, kind)? {
            if !self.is_null(child)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // =========================================================================
    // Headers and footers
    // =========================================================================

    pub fn header(&self, section: NodeId, index: HeaderFooterIndex) -> Result<Option<NodeId>> {
        Ok(self.section(section)?.headers.get(index))
    }

    pub fn footer(&self, section: NodeId, index: HeaderFooterIndex) -> Result<Option<NodeId>> {
        Ok(self.section(section)?.footers.get(index))
    }

    /// Place a detached header; returns the header it replaced, now detached
    pub fn set_header(
        &mut self,
        section: NodeId,
        index: HeaderFooterIndex,
        header: NodeId,
    ) -> Result<Option<NodeId>> {
        self.place_header_footer(section, true, index, header)
    }

    pub fn set_footer(
        &mut self,
        section: NodeId,
        index: HeaderFooterIndex,
        footer: NodeId,
    ) -> Result<Option<NodeId>> {
        self.place_header_footer(section, false, index, footer)
    }

    /// The header in `index`, created when the slot is empty
    pub fn add_header(&mut self, section: NodeId, index: HeaderFooterIndex) -> Result<NodeId> {
        if let Some(existing) = self.header(section, index)? {
            return Ok(existing);
        }
        let header = self.create(HeaderFooter::default())?;
        self.set_header(section, index, header)?;
        Ok(header)
    }

    pub fn add_footer(&mut self, section: NodeId, index: HeaderFooterIndex) -> Result<NodeId> {
        if let Some(existing) = self.footer(section, index)? {
            return Ok(existing);
        }
        let footer = self.create(HeaderFooter::default())?;
        self.set_footer(section, index, footer)?;
        Ok(footer)
    }

    fn place_header_footer(
        &mut self,
        section: NodeId,
        is_header: bool,
        index: HeaderFooterIndex,
        child: NodeId,
    ) -> Result<Option<NodeId>> {
        self.section(section)?;
        let child_type = self.node_type(child)?;
        if child_type != NodeType::HeaderFooter {
            return Err(DomError::InvalidCollectionElement {
                collection: if is_header { "Headers" } else { "Footers" },
                element: child_type.name(),
            });
        }
        self.attach(section, child)?;
        let hf = self.header_footer_mut(child)?;
        hf.is_header = is_header;
        hf.index = Some(index);

        let target = self.section_mut(section)?;
        let slots = if is_header {
            &mut target.headers
        } else {
            &mut target.footers
        };
        let previous = slots.slot_mut(index).replace(child);
        if let Some(old) = previous {
            self.detach(old)?;
        }
        Ok(previous)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Create an object and append it to `owner`'s `kind` collection
    pub fn add_element(
        &mut self,
        owner: NodeId,
        kind: CollectionKind,
        element: impl Into<Element>,
    ) -> Result<NodeId> {
        let id = self.create(element)?;
        if let Err(e) = self.add(owner, kind, id) {
            self.nodes.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    pub fn add_section(&mut self) -> Result<NodeId> {
        let root = self.root;
        self.add_element(root, CollectionKind::Sections, Section::default())
    }

    /// Append a paragraph, with `text` as its content when not empty
    pub fn add_paragraph(&mut self, owner: NodeId, text: &str) -> Result<NodeId> {
        let paragraph = self.add_element(owner, CollectionKind::Elements, Paragraph::default())?;
        if !text.is_empty() {
            self.add_text(paragraph, text)?;
        }
        Ok(paragraph)
    }

    pub fn add_text(&mut self, owner: NodeId, text: &str) -> Result<NodeId> {
        self.add_element(owner, CollectionKind::Elements, Text::new(text))
    }

    pub fn add_formatted_text(&mut self, owner: NodeId, text: &str) -> Result<NodeId> {
        let formatted = self.add_element(owner, CollectionKind::Elements, FormattedText::default())?;
        if !text.is_empty() {
            self.add_text(formatted, text)?;
        }
        Ok(formatted)
    }

    pub fn add_character(&mut self, owner: NodeId, symbol: SymbolName, count: i32) -> Result<NodeId> {
        self.add_element(owner, CollectionKind::Elements, Character::new(symbol, count))
    }

    pub fn add_hyperlink(
        &mut self,
        owner: NodeId,
        name: &str,
        hyperlink_type: HyperlinkType,
    ) -> Result<NodeId> {
        self.add_element(
            owner,
            CollectionKind::Elements,
            Hyperlink::new(name, hyperlink_type),
        )
    }

    pub fn add_table(&mut self, owner: NodeId) -> Result<NodeId> {
        self.add_element(owner, CollectionKind::Elements, Table::default())
    }

    /// Append a column; every row gets a new cell
    pub fn add_column(&mut self, table: NodeId, width: Unit) -> Result<NodeId> {
        self.add_element(table, CollectionKind::Columns, Column::with_width(width))
    }

    /// Append a row with one cell per column
    pub fn add_row(&mut self, table: NodeId) -> Result<NodeId> {
        self.add_element(table, CollectionKind::Rows, Row::default())
    }

    /// The cell of `row` in column `column`
    pub fn row_cell(&self, row: NodeId, column: usize) -> Result<NodeId> {
        let cells = self.row(row)?.cells();
        cells.get(column).copied().ok_or(DomError::IndexOutOfRange {
            index: column,
            len: cells.len(),
        })
    }

    /// Concatenated text content below `id`
    pub fn plain_text(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        for node_id in self.subtree(id)? {
            match self.element(node_id)? {
                Element::Text(text) => out.push_str(text.content()),
                Element::Character(c) if c.symbol_name == Some(SymbolName::Tab) => out.push('\t'),
                Element::Character(c)
                    if matches!(c.symbol_name, Some(SymbolName::LineBreak | SymbolName::ParaBreak)) =>
                {
                    out.push('\n')
                }
                Element::Character(c) if c.symbol_name == Some(SymbolName::Blank) => {
                    out.push_str(&" ".repeat(c.count().max(0) as usize))
                }
                _ => {}
            }
        }
        Ok(out)
    }

    // =========================================================================
    // Name-based value access
    // =========================================================================

    pub fn get_value(&self, id: NodeId, name: &str) -> Result<Option<Value>> {
        self.element(id)?.values().get_value(name)
    }

    pub fn set_value(&mut self, id: NodeId, name: &str, value: Value) -> Result<()> {
        self.element_mut(id)?.values_mut().set_value(name, value)
    }

    pub fn has_value(&self, id: NodeId, name: &str) -> Result<bool> {
        self.element(id)?.values().has_value(name)
    }

    pub fn is_value_null(&self, id: NodeId, name: &str) -> Result<bool> {
        self.element(id)?.values().is_value_null(name)
    }

    pub fn set_value_null(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.element_mut(id)?.values_mut().set_value_null(name)
    }

    /// True when nothing is set on the object and everything below it is
    /// null. A header or footer never reports null.
    pub fn is_null(&self, id: NodeId) -> Result<bool> {
        let node = self.node(id)?;
        if let Element::HeaderFooter(_) = node.element {
            return Ok(false);
        }
        if !node.element.values().is_null() {
            return Ok(false);
        }
        for child in node.element.children() {
            if !self.is_null(child)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reset every value of the object and its descendants. Structure is
    /// kept.
    pub fn set_null(&mut self, id: NodeId) -> Result<()> {
        for node_id in self.subtree(id)? {
            self.element_mut(node_id)?.values_mut().set_null();
        }
        Ok(())
    }

    // =========================================================================
    // Renderer binding
    // =========================================================================

    /// Bind the document to a renderer, or release it with `None`.
    /// Binding to a second renderer while bound fails.
    pub fn bind_to_renderer(&mut self, renderer: Option<RendererId>) -> Result<()> {
        match (self.renderer, renderer) {
            (Some(current), Some(new)) if current != new => Err(DomError::RendererAlreadyBound),
            _ => {
                debug!(bound = renderer.is_some(), "Renderer binding changed");
                self.renderer = renderer;
                Ok(())
            }
        }
    }

    pub fn is_bound_to_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}

/// Forget the position a detached object held in its former parent
fn clear_position(element: &mut Element) {
    match element {
        Element::Row(row) => row.index = 0,
        Element::HeaderFooter(hf) => hf.index = None,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_rows(tree: &mut DocumentTree, rows: usize) -> (NodeId, Vec<NodeId>) {
        let section = tree.add_section().unwrap();
        let table = tree.add_table(section).unwrap();
        tree.add_column(table, Unit::from_centimeter(3.0)).unwrap();
        tree.add_column(table, Unit::from_centimeter(4.0)).unwrap();
        let ids = (0..rows).map(|_| tree.add_row(table).unwrap()).collect();
        (table, ids)
    }

    #[test]
    fn test_new_tree_has_document() {
        let tree = DocumentTree::new();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.document().unwrap().sections().is_empty());
        assert!(tree.styles().unwrap().contains("Normal"));
        assert_eq!(tree.node_type(tree.root_id()).unwrap(), NodeType::Document);
    }

    #[test]
    fn test_attach_once() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let other = tree.add_section().unwrap();
        let paragraph = tree.add_paragraph(section, "Hello").unwrap();

        let result = tree.add(other, CollectionKind::Elements, paragraph);
        assert!(matches!(result, Err(DomError::AlreadyAttached(_))));

        let copy = tree.clone_subtree(paragraph).unwrap();
        assert_eq!(tree.parent(copy).unwrap(), None);
        tree.add(other, CollectionKind::Elements, copy).unwrap();
        assert_eq!(tree.parent(copy).unwrap(), Some(other));
    }

    #[test]
    fn test_collection_type_checks() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let text = tree.create(Text::new("loose")).unwrap();
        let result = tree.add(section, CollectionKind::Elements, text);
        assert!(matches!(result, Err(DomError::InvalidCollectionElement { .. })));
        assert_eq!(tree.parent(text).unwrap(), None);
        assert!(tree.items(section, CollectionKind::Rows).is_err());
        assert!(tree.create(Element::Document(Document::default())).is_err());
    }

    #[test]
    fn test_cannot_attach_below_itself() {
        let mut tree = DocumentTree::new();
        let paragraph = tree.create(Paragraph::default()).unwrap();
        let formatted = tree.add_formatted_text(paragraph, "x").unwrap();
        let result = tree.add(formatted, CollectionKind::Elements, paragraph);
        assert!(result.is_err());
    }

    #[test]
    fn test_row_indexes_follow_structure() {
        let mut tree = DocumentTree::new();
        let (table, rows) = table_with_rows(&mut tree, 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(tree.row(*row).unwrap().index(), i);
            assert_eq!(tree.row(*row).unwrap().cells().len(), 2);
        }

        let new_row = tree.create(Row::default()).unwrap();
        tree.insert(table, CollectionKind::Rows, 0, new_row).unwrap();
        assert_eq!(tree.row(new_row).unwrap().index(), 0);
        assert_eq!(tree.row(new_row).unwrap().cells().len(), 2);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(tree.row(*row).unwrap().index(), i + 1);
        }

        let removed = tree.remove_at(table, CollectionKind::Rows, 1).unwrap();
        assert_eq!(removed, rows[0]);
        assert_eq!(tree.parent(removed).unwrap(), None);
        assert_eq!(tree.row(rows[1]).unwrap().index(), 1);
        assert_eq!(tree.row(rows[2]).unwrap().index(), 2);
    }

    #[test]
    fn test_columns_keep_cells_in_step() {
        let mut tree = DocumentTree::new();
        let (table, rows) = table_with_rows(&mut tree, 2);
        tree.add_column(table, Unit::from_centimeter(1.0)).unwrap();
        assert!(rows
            .iter()
            .all(|r| tree.row(*r).unwrap().cells().len() == 3));

        let first_cell = tree.row_cell(rows[0], 0).unwrap();
        let before = tree.node_count();
        tree.remove_at(table, CollectionKind::Columns, 0).unwrap();
        assert!(rows
            .iter()
            .all(|r| tree.row(*r).unwrap().cells().len() == 2));
        assert!(!tree.contains(first_cell));
        // Two cells discarded; the removed column stays in the arena.
        assert_eq!(tree.node_count(), before - 2);
    }

    #[test]
    fn test_clear_detaches_in_order() {
        let mut tree = DocumentTree::new();
        let (table, rows) = table_with_rows(&mut tree, 3);
        let removed = tree.clear(table, CollectionKind::Rows).unwrap();
        assert_eq!(removed, rows);
        assert!(tree.table(table).unwrap().rows().is_empty());
        assert!(removed.iter().all(|r| tree.parent(*r).unwrap().is_none()));
        tree.discard(removed[0]).unwrap();
        assert!(!tree.contains(removed[0]));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut tree = DocumentTree::new();
        let (table, _) = table_with_rows(&mut tree, 2);
        let copy = tree.clone_subtree(table).unwrap();

        let original_rows = tree.table(table).unwrap().rows().to_vec();
        let copied_rows = tree.table(copy).unwrap().rows().to_vec();
        assert_eq!(original_rows.len(), copied_rows.len());
        assert!(original_rows.iter().zip(&copied_rows).all(|(a, b)| a != b));
        for row in &copied_rows {
            assert_eq!(tree.parent(*row).unwrap(), Some(copy));
        }

        tree.set_value(copied_rows[0], "Height", Value::from("2cm")).unwrap();
        assert!(tree.is_value_null(original_rows[0], "Height").unwrap());
        tree.row_mut(original_rows[1]).unwrap().heading_format = Some(true);
        assert!(tree.row(copied_rows[1]).unwrap().heading_format.is_none());
    }

    #[test]
    fn test_clone_forgets_position() {
        let mut tree = DocumentTree::new();
        let (_, rows) = table_with_rows(&mut tree, 2);
        let copy = tree.clone_subtree(rows[1]).unwrap();
        assert_eq!(tree.row(copy).unwrap().index(), 0);
        assert_eq!(tree.row(rows[1]).unwrap().index(), 1);

        let section = tree.add_section().unwrap();
        let footer = tree.add_footer(section, HeaderFooterIndex::FirstPage).unwrap();
        let footer_copy = tree.clone_subtree(footer).unwrap();
        assert_eq!(tree.header_footer(footer_copy).unwrap().index(), None);
        assert_eq!(
            tree.header_footer(footer).unwrap().index(),
            Some(HeaderFooterIndex::FirstPage)
        );
    }

    #[test]
    fn test_discard_requires_detached() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let paragraph = tree.add_paragraph(section, "x").unwrap();
        assert!(tree.discard(paragraph).is_err());
        let paragraph = tree.remove_at(section, CollectionKind::Elements, 0).unwrap();
        let count = tree.node_count();
        tree.discard(paragraph).unwrap();
        assert_eq!(tree.node_count(), count - 2);
    }

    #[test]
    fn test_ancestor_cache_follows_reparenting() {
        let mut tree = DocumentTree::new();
        let first = tree.add_section().unwrap();
        let second = tree.add_section().unwrap();
        let paragraph = tree.add_paragraph(first, "").unwrap();
        let text = tree.add_text(paragraph, "x").unwrap();

        assert_eq!(tree.section_of(text).unwrap(), Some(first));
        assert_eq!(tree.document_of(text).unwrap(), Some(tree.root_id()));

        let moved = tree.remove_at(first, CollectionKind::Elements, 0).unwrap();
        assert_eq!(tree.section_of(text).unwrap(), None);
        assert_eq!(tree.document_of(text).unwrap(), None);

        tree.add(second, CollectionKind::Elements, moved).unwrap();
        assert_eq!(tree.section_of(text).unwrap(), Some(second));
    }

    #[test]
    fn test_headers_and_footers() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let header = tree.add_header(section, HeaderFooterIndex::Primary).unwrap();
        assert_eq!(tree.add_header(section, HeaderFooterIndex::Primary).unwrap(), header);
        assert!(tree.header_footer(header).unwrap().is_header());
        assert_eq!(tree.section_of(header).unwrap(), Some(section));

        let replacement = tree.create(HeaderFooter::default()).unwrap();
        let previous = tree
            .set_header(section, HeaderFooterIndex::Primary, replacement)
            .unwrap();
        assert_eq!(previous, Some(header));
        assert_eq!(tree.parent(header).unwrap(), None);
    }

    #[test]
    fn test_header_footer_is_never_null() {
        // Reproduces a known quirk of header/footer null checks.
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let footer = tree.add_footer(section, HeaderFooterIndex::EvenPage).unwrap();
        assert!(!tree.is_null(footer).unwrap());
        assert!(!tree.is_null(section).unwrap());
    }

    #[test]
    fn test_null_semantics() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let paragraph = tree.add_paragraph(section, "").unwrap();
        assert!(tree.is_null(paragraph).unwrap());
        assert!(tree.is_collection_null(section, CollectionKind::Elements).unwrap());

        tree.set_value(paragraph, "Format.Font.Bold", Value::Bool(false)).unwrap();
        assert!(!tree.is_null(paragraph).unwrap());
        assert!(!tree.is_value_null(paragraph, "Format").unwrap());

        tree.set_null(section).unwrap();
        assert!(tree.is_null(paragraph).unwrap());
        assert_eq!(tree.count(section, CollectionKind::Elements).unwrap(), 1);
    }

    #[test]
    fn test_unknown_value_name() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let result = tree.set_value(section, "Colour", Value::Bool(true));
        assert!(matches!(result, Err(DomError::InvalidValueName { .. })));
    }

    #[test]
    fn test_renderer_binding() {
        let mut tree = DocumentTree::new();
        let first = RendererId::new();
        tree.bind_to_renderer(Some(first)).unwrap();
        tree.bind_to_renderer(Some(first)).unwrap();
        assert!(matches!(
            tree.bind_to_renderer(Some(RendererId::new())),
            Err(DomError::RendererAlreadyBound)
        ));
        tree.bind_to_renderer(None).unwrap();
        assert!(!tree.is_bound_to_renderer());
        tree.bind_to_renderer(Some(RendererId::new())).unwrap();
    }

    #[test]
    fn test_plain_text() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let paragraph = tree.add_paragraph(section, "Hello").unwrap();
        tree.add_character(paragraph, SymbolName::Tab, 1).unwrap();
        let bold = tree.add_formatted_text(paragraph, "world").unwrap();
        tree.formatted_text_mut(bold).unwrap().font_mut().bold = Some(true);
        assert_eq!(tree.plain_text(paragraph).unwrap(), "Hello\tworld");
    }

    #[test]
    fn test_json_snapshot() {
        let mut tree = DocumentTree::new();
        let section = tree.add_section().unwrap();
        let paragraph = tree.add_paragraph(section, "Hello").unwrap();
        tree.set_tag(paragraph, Some(serde_json::json!({"source": "test"})))
            .unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let restored: DocumentTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.plain_text(paragraph).unwrap(), "Hello");
        assert_eq!(
            restored.tag(paragraph).unwrap(),
            Some(&serde_json::json!({"source": "test"}))
        );
        assert_eq!(restored.section_of(paragraph).unwrap(), Some(section));
    }
}
