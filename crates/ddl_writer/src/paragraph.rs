//! Paragraph and inline serialization

use crate::attributes::{write_paragraph_format, write_values};
use crate::encode::{encode_text, format_unit, format_value, quote_string};
use crate::error::DdlResult;
use crate::serialize::{serialize_all, write_comment, DdlSerialize};
use crate::serializer::Serializer;
use ddl_model::{
    Character, DocumentTree, Font, FormattedText, Hyperlink, Paragraph, SymbolKind, SymbolName,
    Text, Underline, Value, Values,
};
use std::io::Write;

impl DdlSerialize for Paragraph {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        write_comment(s, self.comment.as_ref());
        s.write_line("\\paragraph");

        let attributes = s.begin_attributes()?;
        write_values(s, self, None, &["Comment"])?;
        write_paragraph_format(s, "Format", self.format.as_ref(), None, true)?;
        s.end_attributes(attributes)?;

        let content = s.begin_content()?;
        serialize_all(tree, self.elements(), s)?;
        s.close_up_line();
        s.end_content(content)?;
        Ok(())
    }
}

impl DdlSerialize for Text {
    fn serialize<W: Write>(&self, _tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        s.write(&encode_text(self.content()));
        Ok(())
    }
}

/// `Name = value` pairs of every set font value
fn font_attributes(font: &Font) -> DdlResult<Vec<(&'static str, Value)>> {
    let mut attributes = Vec::new();
    for name in font.value_names() {
        if let Some(value) = font.get_value(name)? {
            attributes.push((name, value));
        }
    }
    Ok(attributes)
}

/// Keyword for formatted text that sets a single common property
fn shortcut(attributes: &[(&'static str, Value)]) -> Option<String> {
    let [(name, value)] = attributes else {
        return None;
    };
    match (*name, value) {
        ("Bold", Value::Bool(true)) => Some("\\bold".to_string()),
        ("Italic", Value::Bool(true)) => Some("\\italic".to_string()),
        ("Underline", Value::Enum(u)) if *u == Underline::Single.name() => {
            Some("\\underline".to_string())
        }
        ("Size", Value::Unit(size)) => Some(format!("\\fontsize({})", format_unit(*size))),
        ("Color", Value::Color(color)) => Some(format!("\\fontcolor({})", color)),
        _ => None,
    }
}

impl DdlSerialize for FormattedText {
    /// `\bold{...}` and friends when possible, `\font("Style")[...]{...}`
    /// otherwise
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        let attributes = match &self.font {
            Some(font) => font_attributes(font)?,
            None => Vec::new(),
        };
        let keyword = match (&self.style, shortcut(&attributes)) {
            (None, Some(keyword)) => keyword,
            (style, _) => {
                let mut keyword = String::from("\\font");
                if let Some(style) = style {
                    keyword.push_str(&format!("({})", quote_string(style)));
                }
                if !attributes.is_empty() {
                    let list: Vec<String> = attributes
                        .iter()
                        .map(|(name, value)| format!("{} = {}", name, format_value(value)))
                        .collect();
                    keyword.push_str(&format!("[{}]", list.join(", ")));
                }
                keyword
            }
        };

        s.write_token(&keyword);
        s.write_token("{");
        serialize_all(tree, self.elements(), s)?;
        s.write_token("}");
        Ok(())
    }
}

impl DdlSerialize for Hyperlink {
    fn serialize<W: Write>(&self, tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        let mut attributes = vec![format!("Name = {}", quote_string(self.name().unwrap_or("")))];
        if let Some(hyperlink_type) = self.hyperlink_type {
            attributes.push(format!("Type = {}", hyperlink_type));
        }
        s.write_token(&format!("\\hyperlink[{}]{{", attributes.join(", ")));
        serialize_all(tree, self.elements(), s)?;
        s.write_token("}");
        Ok(())
    }
}

impl DdlSerialize for Character {
    fn serialize<W: Write>(&self, _tree: &DocumentTree, s: &mut Serializer<W>) -> DdlResult<()> {
        let Some(symbol) = self.symbol_name else {
            return Ok(());
        };
        let count = self.count().max(1) as usize;
        let with_count = |keyword: &str| {
            if count == 1 {
                format!("\\{}({})", keyword, symbol)
            } else {
                format!("\\{}({}, {})", keyword, symbol, count)
            }
        };

        match symbol {
            SymbolName::Tab => s.write_token(&"\\tab ".repeat(count)),
            SymbolName::LineBreak => s.write_token(&"\\linebreak ".repeat(count)),
            SymbolName::ParaBreak => {
                for _ in 0..count {
                    s.close_up_line();
                    s.write_line("");
                }
            }
            SymbolName::Blank => s.write_token(&format!("\\space({})", count)),
            other if other.kind() == SymbolKind::Space => s.write_token(&with_count("space")),
            _ => s.write_token(&with_count("symbol")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddl_model::{Color, Unit};

    fn font_keyword(font: Font) -> Option<String> {
        shortcut(&font_attributes(&font).unwrap())
    }

    #[test]
    fn test_shortcuts() {
        let bold = Font {
            bold: Some(true),
            ..Default::default()
        };
        assert_eq!(font_keyword(bold).as_deref(), Some("\\bold"));

        let size = Font {
            size: Some(Unit::from_point(14.0)),
            ..Default::default()
        };
        assert_eq!(font_keyword(size).as_deref(), Some("\\fontsize(14)"));

        let color = Font {
            color: Some(Color::RED),
            ..Default::default()
        };
        assert_eq!(font_keyword(color).as_deref(), Some("\\fontcolor(Red)"));

        let not_bold = Font {
            bold: Some(false),
            ..Default::default()
        };
        assert_eq!(font_keyword(not_bold), None);

        let two = Font {
            bold: Some(true),
            italic: Some(true),
            ..Default::default()
        };
        assert_eq!(font_keyword(two), None);
    }
}
