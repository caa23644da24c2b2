//! Document objects: identity, parent link, ancestor cache and payload

use crate::values::Values;
use crate::{
    Cell, Character, Column, Document, FormattedText, HeaderFooter, Hyperlink, NodeId, Paragraph,
    Row, Section, Table, Text,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell as StdCell;

/// Enumeration of all node types in the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Document,
    Section,
    HeaderFooter,
    Paragraph,
    FormattedText,
    Hyperlink,
    Text,
    Character,
    Table,
    Column,
    Row,
    Cell,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Document => "Document",
            NodeType::Section => "Section",
            NodeType::HeaderFooter => "HeaderFooter",
            NodeType::Paragraph => "Paragraph",
            NodeType::FormattedText => "FormattedText",
            NodeType::Hyperlink => "Hyperlink",
            NodeType::Text => "Text",
            NodeType::Character => "Character",
            NodeType::Table => "Table",
            NodeType::Column => "Column",
            NodeType::Row => "Row",
            NodeType::Cell => "Cell",
        }
    }

    /// Paragraph-level content
    pub fn is_block(self) -> bool {
        matches!(self, NodeType::Paragraph | NodeType::Table)
    }

    /// Content of a paragraph
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeType::Text | NodeType::Character | NodeType::FormattedText | NodeType::Hyperlink
        )
    }
}

/// Child collections an element may own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Sections,
    Elements,
    Columns,
    Rows,
    Cells,
}

impl CollectionKind {
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Sections => "Sections",
            CollectionKind::Elements => "Elements",
            CollectionKind::Columns => "Columns",
            CollectionKind::Rows => "Rows",
            CollectionKind::Cells => "Cells",
        }
    }
}

/// Payload of a document object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Document(Document),
    Section(Section),
    HeaderFooter(HeaderFooter),
    Paragraph(Paragraph),
    FormattedText(FormattedText),
    Hyperlink(Hyperlink),
    Text(Text),
    Character(Character),
    Table(Table),
    Column(Column),
    Row(Row),
    Cell(Cell),
}

macro_rules! element_from {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Element {
                fn from(value: $variant) -> Self {
                    Element::$variant(value)
                }
            }
        )+
    };
}

element_from!(
    Section,
    HeaderFooter,
    Paragraph,
    FormattedText,
    Hyperlink,
    Text,
    Character,
    Table,
    Column,
    Row,
    Cell
);

impl Element {
    pub fn node_type(&self) -> NodeType {
        match self {
            Element::Document(_) => NodeType::Document,
            Element::Section(_) => NodeType::Section,
            Element::HeaderFooter(_) => NodeType::HeaderFooter,
            Element::Paragraph(_) => NodeType::Paragraph,
            Element::FormattedText(_) => NodeType::FormattedText,
            Element::Hyperlink(_) => NodeType::Hyperlink,
            Element::Text(_) => NodeType::Text,
            Element::Character(_) => NodeType::Character,
            Element::Table(_) => NodeType::Table,
            Element::Column(_) => NodeType::Column,
            Element::Row(_) => NodeType::Row,
            Element::Cell(_) => NodeType::Cell,
        }
    }

    /// The element's own nullable values
    pub fn values(&self) -> &dyn Values {
        match self {
            Element::Document(e) => e,
            Element::Section(e) => e,
            Element::HeaderFooter(e) => e,
            Element::Paragraph(e) => e,
            Element::FormattedText(e) => e,
            Element::Hyperlink(e) => e,
            Element::Text(e) => e,
            Element::Character(e) => e,
            Element::Table(e) => e,
            Element::Column(e) => e,
            Element::Row(e) => e,
            Element::Cell(e) => e,
        }
    }

    pub fn values_mut(&mut self) -> &mut dyn Values {
        match self {
            Element::Document(e) => e,
            Element::Section(e) => e,
            Element::HeaderFooter(e) => e,
            Element::Paragraph(e) => e,
            Element::FormattedText(e) => e,
            Element::Hyperlink(e) => e,
            Element::Text(e) => e,
            Element::Character(e) => e,
            Element::Table(e) => e,
            Element::Column(e) => e,
            Element::Row(e) => e,
            Element::Cell(e) => e,
        }
    }

    /// Collections this element owns
    pub fn collection_kinds(&self) -> &'static [CollectionKind] {
        match self {
            Element::Document(_) => &[CollectionKind::Sections],
            Element::Section(_)
            | Element::HeaderFooter(_)
            | Element::Paragraph(_)
            | Element::FormattedText(_)
            | Element::Hyperlink(_)
            | Element::Cell(_) => &[CollectionKind::Elements],
            Element::Table(_) => &[CollectionKind::Columns, CollectionKind::Rows],
            Element::Row(_) => &[CollectionKind::Cells],
            Element::Text(_) | Element::Character(_) | Element::Column(_) => &[],
        }
    }

    pub fn collection(&self, kind: CollectionKind) -> Option<&Vec<NodeId>> {
        match (self, kind) {
            (Element::Document(e), CollectionKind::Sections) => Some(&e.sections),
            (Element::Section(e), CollectionKind::Elements) => Some(&e.elements),
            (Element::HeaderFooter(e), CollectionKind::Elements) => Some(&e.elements),
            (Element::Paragraph(e), CollectionKind::Elements) => Some(&e.elements),
            (Element::FormattedText(e), CollectionKind::Elements) => Some(&e.elements),
            (Element::Hyperlink(e), CollectionKind::Elements) => Some(&e.elements),
            (Element::Cell(e), CollectionKind::Elements) => Some(&e.elements),
            (Element::Table(e), CollectionKind::Columns) => Some(&e.columns),
            (Element::Table(e), CollectionKind::Rows) => Some(&e.rows),
            (Element::Row(e), CollectionKind::Cells) => Some(&e.cells),
            _ => None,
        }
    }

    pub(crate) fn collection_mut(&mut self, kind: CollectionKind) -> Option<&mut Vec<NodeId>> {
        match (self, kind) {
            (Element::Document(e), CollectionKind::Sections) => Some(&mut e.sections),
            (Element::Section(e), CollectionKind::Elements) => Some(&mut e.elements),
            (Element::HeaderFooter(e), CollectionKind::Elements) => Some(&mut e.elements),
            (Element::Paragraph(e), CollectionKind::Elements) => Some(&mut e.elements),
            (Element::FormattedText(e), CollectionKind::Elements) => Some(&mut e.elements),
            (Element::Hyperlink(e), CollectionKind::Elements) => Some(&mut e.elements),
            (Element::Cell(e), CollectionKind::Elements) => Some(&mut e.elements),
            (Element::Table(e), CollectionKind::Columns) => Some(&mut e.columns),
            (Element::Table(e), CollectionKind::Rows) => Some(&mut e.rows),
            (Element::Row(e), CollectionKind::Cells) => Some(&mut e.cells),
            _ => None,
        }
    }

    /// Whether `child` may be stored in this element's `kind` collection
    pub fn accepts(&self, kind: CollectionKind, child: NodeType) -> bool {
        match (self, kind) {
            (Element::Document(_), CollectionKind::Sections) => child == NodeType::Section,
            (Element::Section(_), CollectionKind::Elements)
            | (Element::HeaderFooter(_), CollectionKind::Elements) => child.is_block(),
            (Element::Cell(_), CollectionKind::Elements) => child == NodeType::Paragraph,
            (Element::Paragraph(_), CollectionKind::Elements)
            | (Element::FormattedText(_), CollectionKind::Elements) => child.is_inline(),
            (Element::Hyperlink(_), CollectionKind::Elements) => {
                child.is_inline() && child != NodeType::Hyperlink
            }
            (Element::Table(_), CollectionKind::Columns) => child == NodeType::Column,
            (Element::Table(_), CollectionKind::Rows) => child == NodeType::Row,
            (Element::Row(_), CollectionKind::Cells) => child == NodeType::Cell,
            _ => false,
        }
    }

    /// Every owned child: collections in order, then header/footer slots
    pub fn children(&self) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self
            .collection_kinds()
            .iter()
            .filter_map(|&kind| self.collection(kind))
            .flatten()
            .copied()
            .collect();
        if let Element::Section(section) = self {
            children.extend(section.headers.iter().map(|(_, id)| id));
            children.extend(section.footers.iter().map(|(_, id)| id));
        }
        children
    }

    /// Rewrite every owned child id
    pub(crate) fn remap_children(&mut self, map: &mut dyn FnMut(NodeId) -> NodeId) {
        for &kind in self.collection_kinds() {
            if let Some(items) = self.collection_mut(kind) {
                for id in items.iter_mut() {
                    *id = map(*id);
                }
            }
        }
        if let Element::Section(section) = self {
            for slots in [&mut section.headers, &mut section.footers] {
                for slot in [&mut slots.primary, &mut slots.first_page, &mut slots.even_page] {
                    if let Some(id) = slot.as_mut() {
                        *id = map(*id);
                    }
                }
            }
        }
    }
}

/// State of a lazily resolved ancestor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Lookup {
    #[default]
    Unresolved,
    Resolved(Option<NodeId>),
}

/// Cached document and section ancestors
#[derive(Debug, Clone, Default)]
pub(crate) struct AncestorCache {
    pub(crate) document: StdCell<Lookup>,
    pub(crate) section: StdCell<Lookup>,
}

impl AncestorCache {
    pub(crate) fn reset(&self) {
        self.document.set(Lookup::Unresolved);
        self.section.set(Lookup::Unresolved);
    }
}

/// A node of the document tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentObject {
    id: NodeId,
    pub(crate) parent: Option<NodeId>,
    /// Opaque caller data, carried through clones
    pub tag: Option<serde_json::Value>,
    #[serde(skip)]
    pub(crate) cache: AncestorCache,
    pub(crate) element: Element,
}

impl DocumentObject {
    pub(crate) fn new(element: Element) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            tag: None,
            cache: AncestorCache::default(),
            element,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn node_type(&self) -> NodeType {
        self.element.node_type()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Copy with a fresh id, detached, with an empty ancestor cache
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            tag: self.tag.clone(),
            cache: AncestorCache::default(),
            element: self.element.clone(),
        }
    }
}
