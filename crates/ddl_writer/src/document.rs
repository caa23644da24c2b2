//! Document, style and section serialization

use crate::attributes::{write_object, write_paragraph_format, write_values};
use crate::encode::style_name;
use crate::error::{DdlError, DdlResult};
use crate::serialize::{serialize_all, serialize_block_elements, serialize_node, write_comment, DdlSerialize};
use crate::serializer::Serializer;
use ddl_model::{
    names, Document, DocumentTree, HeaderFooter, HeaderFooterIndex, Section, Style, Styles,
};
use std::io::Write;

impl DdlSerialize for Document {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\document");

        let attributes = s.begin_attributes()?;
        write_object(s, "Info", self.info.as_ref(), None)?;
        write_values(s, self, None, &["Comment"])?;
        s.end_attributes(attributes)?;

        let content = s.begin_content()?;
        self.styles().serialize(tree, s)?;
        serialize_all(tree, self.sections(), s)?;
        s.end_content(content)?;
        Ok(())
    }
}

// =============================================================================
// Styles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Pending,
    Done,
}

impl DdlSerialize for Styles {
    /// Styles are written base first, whatever their stored order
    fn serialize<W: Write>(&self, _tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        let mut marks = vec![Mark::Unvisited; self.len()];
        if let Some(index) = self.index_of(names::DEFAULT_PARAGRAPH_FONT) {
            marks[index] = Mark::Done;
        }

        let token = s.begin_content_named("\\styles")?;
        for index in 0..self.len() {
            serialize_style_at(self, index, &mut marks, s)?;
        }
        s.end_content(token)?;
        Ok(())
    }
}

fn serialize_style_at<W: Write>(
    styles: &Styles,
    index: usize,
    marks: &mut [Mark],
    s: &mut Serializer<W>,
) -> DdlResult<()> {
    let Some(style) = styles.get(index) else {
        return Ok(());
    };
    match marks[index] {
        Mark::Done => return Ok(()),
        Mark::Pending => return Err(DdlError::CircularStyle(style.name().to_string())),
        Mark::Unvisited => {}
    }
    marks[index] = Mark::Pending;
    if let Some(base) = styles.index_of(style.base_style()) {
        serialize_style_at(styles, base, marks, s)?;
    }
    write_style(styles, style, s)?;
    marks[index] = Mark::Done;
    Ok(())
}

/// A built-in style keeping its original base is compared with the
/// built-in defaults and vanishes when unchanged. Any other style is always
/// written with its base and compared with that base style.
fn write_style<W: Write>(styles: &Styles, style: &Style, s: &mut Serializer<W>) -> DdlResult<()> {
    let default = Styles::builtins().find(style.name()).filter(|default| {
        style.is_built_in() && default.base_style().eq_ignore_ascii_case(style.base_style())
    });

    let block = s.begin_block()?;
    write_comment(s, style.comment.as_ref());
    let reference = match default {
        Some(default) => {
            s.write_line_no_commit(&style_name(style.name()));
            Some(default)
        }
        None if style.is_root() => {
            s.write_line(&style_name(style.name()));
            None
        }
        None => {
            s.write_line(&format!(
                "{} : {}",
                style_name(style.name()),
                style_name(style.base_style())
            ));
            styles.find(style.base_style())
        }
    };

    let content = s.begin_content()?;
    write_paragraph_format(
        s,
        "ParagraphFormat",
        style.format.as_ref(),
        reference.and_then(|r| r.format.as_ref()),
        false,
    )?;
    write_object(s, "Font", style.font(), reference.and_then(Style::font))?;
    s.end_content(content)?;
    s.end_block(block)?;
    Ok(())
}

impl DdlSerialize for Style {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_style(tree.styles()?, self, s)
    }
}

// =============================================================================
// Sections
// =============================================================================

impl DdlSerialize for Section {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\section");

        let attributes = s.begin_attributes()?;
        write_object(s, "PageSetup", self.page_setup.as_ref(), None)?;
        s.end_attributes(attributes)?;

        let content = s.begin_content()?;
        for (_, id) in self.headers().iter().chain(self.footers().iter()) {
            serialize_node(tree, id, s)?;
        }
        serialize_block_elements(tree, self.elements(), s)?;
        s.end_content(content)?;
        Ok(())
    }
}

impl DdlSerialize for HeaderFooter {
    /// Written as `\primaryheader`, `\evenpagefooter`, ...; dropped when empty
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        let kind = if self.is_header() { "header" } else { "footer" };
        let index = self.index().unwrap_or(HeaderFooterIndex::Primary);

        let block = s.begin_block()?;
        s.write_line_no_commit(&format!("\\{}{}", index.keyword_prefix(), kind));

        let attributes = s.begin_attributes()?;
        write_values(s, self, None, &[])?;
        write_paragraph_format(s, "Format", self.format.as_ref(), None, true)?;
        s.end_attributes(attributes)?;

        let content = s.begin_content()?;
        serialize_block_elements(tree, self.elements(), s)?;
        s.end_content(content)?;
        s.end_block(block)?;
        Ok(())
    }
}
