//! Tables, columns, rows and cells

use crate::values::{HasMeta, Meta};
use crate::{
    object_property, value_property, Borders, NodeId, ParagraphFormat, RowAlignment,
    RowHeightRule, Shading, Unit, VerticalAlignment,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Attributes of a table's column collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnsFormat {
    pub width: Option<Unit>,
}

impl HasMeta for ColumnsFormat {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<ColumnsFormat>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Columns",
                vec![value_property!("Width", ColumnsFormat, width: Unit)],
            )
        })
    }
}

/// Attributes of a table's row collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowsFormat {
    pub alignment: Option<RowAlignment>,
    pub left_indent: Option<Unit>,
    pub height: Option<Unit>,
    pub height_rule: Option<RowHeightRule>,
    pub vertical_alignment: Option<VerticalAlignment>,
}

impl HasMeta for RowsFormat {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<RowsFormat>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Rows",
                vec![
                    value_property!("Alignment", RowsFormat, alignment: RowAlignment),
                    value_property!("LeftIndent", RowsFormat, left_indent: Unit),
                    value_property!("Height", RowsFormat, height: Unit),
                    value_property!("HeightRule", RowsFormat, height_rule: RowHeightRule),
                    value_property!(
                        "VerticalAlignment",
                        RowsFormat,
                        vertical_alignment: VerticalAlignment
                    ),
                ],
            )
        })
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub style: Option<String>,
    pub format: Option<ParagraphFormat>,
    pub top_padding: Option<Unit>,
    pub bottom_padding: Option<Unit>,
    pub left_padding: Option<Unit>,
    pub right_padding: Option<Unit>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub comment: Option<String>,
    pub columns_format: Option<ColumnsFormat>,
    pub rows_format: Option<RowsFormat>,
    pub(crate) columns: Vec<NodeId>,
    pub(crate) rows: Vec<NodeId>,
}

impl Table {
    pub fn columns(&self) -> &[NodeId] {
        &self.columns
    }

    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn borders_mut(&mut self) -> &mut Borders {
        self.borders.get_or_insert_with(Borders::default)
    }
}

impl HasMeta for Table {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Table>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Table",
                vec![
                    value_property!("Style", Table, style: String),
                    object_property!("Format", Table, format: ParagraphFormat),
                    value_property!("TopPadding", Table, top_padding: Unit),
                    value_property!("BottomPadding", Table, bottom_padding: Unit),
                    value_property!("LeftPadding", Table, left_padding: Unit),
                    value_property!("RightPadding", Table, right_padding: Unit),
                    object_property!("Borders", Table, borders: Borders),
                    object_property!("Shading", Table, shading: Shading),
                    value_property!("Comment", Table, comment: String),
                    object_property!("Columns", Table, columns_format: ColumnsFormat),
                    object_property!("Rows", Table, rows_format: RowsFormat),
                ],
            )
        })
    }
}

// =============================================================================
// Column
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    pub width: Option<Unit>,
    pub left_padding: Option<Unit>,
    pub right_padding: Option<Unit>,
    pub heading_format: Option<bool>,
    pub style: Option<String>,
    pub format: Option<ParagraphFormat>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub comment: Option<String>,
}

impl Column {
    pub fn with_width(width: Unit) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }
}

impl HasMeta for Column {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Column>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Column",
                vec![
                    value_property!("Width", Column, width: Unit),
                    value_property!("LeftPadding", Column, left_padding: Unit),
                    value_property!("RightPadding", Column, right_padding: Unit),
                    value_property!("HeadingFormat", Column, heading_format: bool),
                    value_property!("Style", Column, style: String),
                    object_property!("Format", Column, format: ParagraphFormat),
                    object_property!("Borders", Column, borders: Borders),
                    object_property!("Shading", Column, shading: Shading),
                    value_property!("Comment", Column, comment: String),
                ],
            )
        })
    }
}

// =============================================================================
// Row
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    pub height: Option<Unit>,
    pub height_rule: Option<RowHeightRule>,
    pub heading_format: Option<bool>,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub top_padding: Option<Unit>,
    pub bottom_padding: Option<Unit>,
    pub keep_with: Option<i32>,
    pub style: Option<String>,
    pub format: Option<ParagraphFormat>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub comment: Option<String>,
    /// Position in the owning table's rows, maintained by the tree
    #[serde(default)]
    pub(crate) index: usize,
    pub(crate) cells: Vec<NodeId>,
}

impl Row {
    /// Position of this row within its table (0 while detached)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> &[NodeId] {
        &self.cells
    }
}

impl HasMeta for Row {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Row>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Row",
                vec![
                    value_property!("Height", Row, height: Unit),
                    value_property!("HeightRule", Row, height_rule: RowHeightRule),
                    value_property!("HeadingFormat", Row, heading_format: bool),
                    value_property!(
                        "VerticalAlignment",
                        Row,
                        vertical_alignment: VerticalAlignment
                    ),
                    value_property!("TopPadding", Row, top_padding: Unit),
                    value_property!("BottomPadding", Row, bottom_padding: Unit),
                    value_property!("KeepWith", Row, keep_with: i32),
                    value_property!("Style", Row, style: String),
                    object_property!("Format", Row, format: ParagraphFormat),
                    object_property!("Borders", Row, borders: Borders),
                    object_property!("Shading", Row, shading: Shading),
                    value_property!("Comment", Row, comment: String),
                ],
            )
        })
    }
}

// =============================================================================
// Cell
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    pub style: Option<String>,
    pub format: Option<ParagraphFormat>,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub merge_right: Option<i32>,
    pub merge_down: Option<i32>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub comment: Option<String>,
    pub(crate) elements: Vec<NodeId>,
}

impl Cell {
    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }
}

impl HasMeta for Cell {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Cell>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Cell",
                vec![
                    value_property!("Style", Cell, style: String),
                    object_property!("Format", Cell, format: ParagraphFormat),
                    value_property!(
                        "VerticalAlignment",
                        Cell,
                        vertical_alignment: VerticalAlignment
                    ),
                    value_property!("MergeRight", Cell, merge_right: i32),
                    value_property!("MergeDown", Cell, merge_down: i32),
                    object_property!("Borders", Cell, borders: Borders),
                    object_property!("Shading", Cell, shading: Shading),
                    value_property!("Comment", Cell, comment: String),
                ],
            )
        })
    }
}
