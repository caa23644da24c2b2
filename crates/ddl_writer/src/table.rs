//! Table serialization

use crate::attributes::{write_borders, write_object, write_paragraph_format, write_values};
use crate::error::DdlResult;
use crate::serialize::{serialize_all, serialize_block_elements, write_comment, DdlSerialize};
use crate::serializer::Serializer;
use ddl_model::{Borders, Cell, Column, DocumentTree, ParagraphFormat, Row, Shading, Table, Values};
use std::io::Write;

/// Attribute block shared by tables, columns, rows and cells
fn write_attributes<W: Write>(
    s: &mut Serializer<W>,
    values: &dyn Values,
    format: Option<&ParagraphFormat>,
    borders: Option<&Borders>,
    shading: Option<&Shading>,
) -> DdlResult<()> {
    let attributes = s.begin_attributes()?;
    write_values(s, values, None, &["Comment"])?;
    write_paragraph_format(s, "Format", format, None, true)?;
    write_borders(s, "Borders", borders, None)?;
    write_object(s, "Shading", shading, None)?;
    s.end_attributes(attributes)?;
    Ok(())
}

impl DdlSerialize for Table {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\table");

        let attributes = s.begin_attributes()?;
        write_values(s, self, None, &["Comment"])?;
        write_paragraph_format(s, "Format", self.format.as_ref(), None, true)?;
        write_borders(s, "Borders", self.borders.as_ref(), None)?;
        write_object(s, "Shading", self.shading.as_ref(), None)?;
        write_object(s, "Columns", self.columns_format.as_ref(), None)?;
        write_object(s, "Rows", self.rows_format.as_ref(), None)?;
        s.end_attributes(attributes)?;

        let content = s.begin_content()?;
        if self.columns().is_empty() {
            s.write_comment("Invalid: no columns defined, the table cannot be rendered");
        } else {
            let columns = s.begin_content_named("\\columns")?;
            serialize_all(tree, self.columns(), s)?;
            s.end_content(columns)?;

            let rows = s.begin_content_named("\\rows")?;
            serialize_all(tree, self.rows(), s)?;
            s.end_content(rows)?;
        }
        s.end_content(content)?;
        Ok(())
    }
}

impl DdlSerialize for Column {
    fn serialize<W: Write>(&self, _tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\column");
        write_attributes(
            s,
            self,
            self.format.as_ref(),
            self.borders.as_ref(),
            self.shading.as_ref(),
        )
    }
}

impl DdlSerialize for Row {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\row");
        write_attributes(
            s,
            self,
            self.format.as_ref(),
            self.borders.as_ref(),
            self.shading.as_ref(),
        )?;

        let content = s.begin_content()?;
        serialize_all(tree, self.cells(), s)?;
        s.end_content(content)?;
        Ok(())
    }
}

impl DdlSerialize for Cell {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\cell");
        write_attributes(
            s,
            self,
            self.format.as_ref(),
            self.borders.as_ref(),
            self.shading.as_ref(),
        )?;

        let content = s.begin_content()?;
        serialize_block_elements(tree, self.elements(), s)?;
        s.end_content(content)?;
        Ok(())
    }
}
