//! Paragraphs and their inline content

use crate::values::{Access, FromValue, HasMeta, Meta, Property, Value};
use crate::{
    object_property, value_property, Color, Font, HyperlinkType, NodeId, ParagraphFormat, Result,
    SymbolName, Underline, Unit,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// =============================================================================
// Paragraph
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub style: Option<String>,
    pub format: Option<ParagraphFormat>,
    pub comment: Option<String>,
    pub(crate) elements: Vec<NodeId>,
}

impl Paragraph {
    pub fn with_style(style: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            ..Default::default()
        }
    }

    /// Style name, "Normal" when unset
    pub fn style(&self) -> &str {
        self.style.as_deref().unwrap_or("Normal")
    }

    pub fn format_mut(&mut self) -> &mut ParagraphFormat {
        self.format.get_or_insert_with(ParagraphFormat::default)
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }
}

impl HasMeta for Paragraph {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Paragraph>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Paragraph",
                vec![
                    value_property!("Style", Paragraph, style: String),
                    object_property!("Format", Paragraph, format: ParagraphFormat),
                    value_property!("Comment", Paragraph, comment: String),
                ],
            )
        })
    }
}

// =============================================================================
// Formatted Text
// =============================================================================

/// A run of inline content with its own character formatting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormattedText {
    pub style: Option<String>,
    pub font: Option<Font>,
    pub(crate) elements: Vec<NodeId>,
}

impl FormattedText {
    pub fn font_mut(&mut self) -> &mut Font {
        self.font.get_or_insert_with(Font::default)
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }
}

/// A value property of `FormattedText` stored in its font
macro_rules! font_delegate {
    ($name:literal, $field:ident : $value:ty) => {{
        fn get(o: &FormattedText) -> Option<Value> {
            o.font.as_ref().and_then(|f| f.$field.clone()).map(Value::from)
        }
        fn set(o: &mut FormattedText, v: Value) -> Result<()> {
            o.font_mut().$field = Some(<$value as FromValue>::from_value($name, v)?);
            Ok(())
        }
        fn clear(o: &mut FormattedText) {
            if let Some(font) = o.font.as_mut() {
                font.$field = None;
            }
        }
        Property {
            name: $name,
            access: Access::Value { get, set, clear },
        }
    }};
}

impl HasMeta for FormattedText {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<FormattedText>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "FormattedText",
                vec![
                    value_property!("Style", FormattedText, style: String),
                    object_property!("Font", FormattedText, font: Font),
                    font_delegate!("FontName", name: String),
                    font_delegate!("Size", size: Unit),
                    font_delegate!("Bold", bold: bool),
                    font_delegate!("Italic", italic: bool),
                    font_delegate!("Underline", underline: Underline),
                    font_delegate!("Color", color: Color),
                ],
            )
        })
    }
}

// =============================================================================
// Hyperlink
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hyperlink {
    name: Option<String>,
    pub hyperlink_type: Option<HyperlinkType>,
    pub(crate) elements: Vec<NodeId>,
}

impl Hyperlink {
    pub fn new(name: impl Into<String>, hyperlink_type: HyperlinkType) -> Self {
        Self {
            name: Some(name.into()),
            hyperlink_type: Some(hyperlink_type),
            elements: Vec::new(),
        }
    }

    /// Bookmark name or target address
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Assigning `None` stores an empty name rather than clearing it.
    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = Some(name.unwrap_or_default().to_string());
    }

    pub fn hyperlink_type(&self) -> HyperlinkType {
        self.hyperlink_type.unwrap_or(HyperlinkType::Local)
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }
}

impl HasMeta for Hyperlink {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Hyperlink>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Hyperlink",
                vec![
                    value_property!("Name", Hyperlink, name: String),
                    value_property!("Type", Hyperlink, hyperlink_type: HyperlinkType),
                ],
            )
        })
    }
}

// =============================================================================
// Text and Character
// =============================================================================

/// Literal text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Text {
    pub content: Option<String>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

impl HasMeta for Text {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Text>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new("Text", vec![value_property!("Content", Text, content: String)])
        })
    }
}

/// A special character: a space of some width, a break, or a symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Character {
    pub symbol_name: Option<SymbolName>,
    pub count: Option<i32>,
}

impl Character {
    pub fn new(symbol_name: SymbolName, count: i32) -> Self {
        Self {
            symbol_name: Some(symbol_name),
            count: Some(count),
        }
    }

    /// Repeat count, 1 when unset
    pub fn count(&self) -> i32 {
        self.count.unwrap_or(1)
    }
}

impl HasMeta for Character {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Character>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Character",
                vec![
                    value_property!("SymbolName", Character, symbol_name: SymbolName),
                    value_property!("Count", Character, count: i32),
                ],
            )
        })
    }
}
