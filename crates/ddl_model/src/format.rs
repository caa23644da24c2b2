//! Composite formatting values: fonts, paragraph formats, borders, shading
//!
//! These are owned inline by the objects and styles that use them, so a
//! `clone()` is always a deep, independent copy. Every field is nullable;
//! `merge` layers an override on top of a base the same way style
//! resolution does.

use crate::values::{HasMeta, Meta, Values};
use crate::{
    object_property, value_property, BorderStyle, Color, LineSpacingRule, OutlineLevel,
    ParagraphAlignment, Underline, Unit,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// =============================================================================
// Font
// =============================================================================

/// Character formatting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: Option<String>,
    pub size: Option<Unit>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<Underline>,
    pub color: Option<Color>,
    pub superscript: Option<bool>,
    pub subscript: Option<bool>,
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties from `other` override properties from `self` when present
    pub fn merge(&self, other: &Font) -> Font {
        Font {
            name: other.name.clone().or_else(|| self.name.clone()),
            size: other.size.or(self.size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            color: other.color.or(self.color),
            superscript: other.superscript.or(self.superscript),
            subscript: other.subscript.or(self.subscript),
        }
    }

    /// Superscript and subscript exclude each other
    pub fn set_superscript(&mut self, on: bool) {
        self.superscript = Some(on);
        if on {
            self.subscript = Some(false);
        }
    }

    pub fn set_subscript(&mut self, on: bool) {
        self.subscript = Some(on);
        if on {
            self.superscript = Some(false);
        }
    }

    /// Number of properties that are set
    pub fn set_count(&self) -> usize {
        [
            self.name.is_some(),
            self.size.is_some(),
            self.bold.is_some(),
            self.italic.is_some(),
            self.underline.is_some(),
            self.color.is_some(),
            self.superscript.is_some(),
            self.subscript.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

fn set_superscript(font: &mut Font, value: crate::Value) -> crate::Result<()> {
    let on = <bool as crate::FromValue>::from_value("Superscript", value)?;
    font.set_superscript(on);
    Ok(())
}

fn set_subscript(font: &mut Font, value: crate::Value) -> crate::Result<()> {
    let on = <bool as crate::FromValue>::from_value("Subscript", value)?;
    font.set_subscript(on);
    Ok(())
}

impl HasMeta for Font {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Font>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Font",
                vec![
                    value_property!("Name", Font, name: String),
                    value_property!("Size", Font, size: Unit),
                    value_property!("Bold", Font, bold: bool),
                    value_property!("Italic", Font, italic: bool),
                    value_property!("Underline", Font, underline: Underline),
                    value_property!("Color", Font, color: Color),
                    crate::Property {
                        name: "Superscript",
                        access: crate::Access::Value {
                            get: |f: &Font| f.superscript.map(crate::Value::from),
                            set: set_superscript,
                            clear: |f: &mut Font| f.superscript = None,
                        },
                    },
                    crate::Property {
                        name: "Subscript",
                        access: crate::Access::Value {
                            get: |f: &Font| f.subscript.map(crate::Value::from),
                            set: set_subscript,
                            clear: |f: &mut Font| f.subscript = None,
                        },
                    },
                ],
            )
        })
    }
}

// =============================================================================
// Borders
// =============================================================================

/// One edge of a border set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub visible: Option<bool>,
    pub style: Option<BorderStyle>,
    pub width: Option<Unit>,
    pub color: Option<Color>,
}

impl Border {
    pub fn merge(&self, other: &Border) -> Border {
        Border {
            visible: other.visible.or(self.visible),
            style: other.style.or(self.style),
            width: other.width.or(self.width),
            color: other.color.or(self.color),
        }
    }
}

impl HasMeta for Border {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Border>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Border",
                vec![
                    value_property!("Visible", Border, visible: bool),
                    value_property!("Style", Border, style: BorderStyle),
                    value_property!("Width", Border, width: Unit),
                    value_property!("Color", Border, color: Color),
                ],
            )
        })
    }
}

/// Border set of a paragraph, table, row, column or cell.
///
/// `style`, `width`, `color` and `visible` apply to every edge that does
/// not override them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
    pub distance_from_top: Option<Unit>,
    pub distance_from_left: Option<Unit>,
    pub distance_from_bottom: Option<Unit>,
    pub distance_from_right: Option<Unit>,
    pub visible: Option<bool>,
    pub style: Option<BorderStyle>,
    pub width: Option<Unit>,
    pub color: Option<Color>,
    /// Written as `Borders = null`, removing inherited borders
    #[serde(default)]
    pub clear_all: bool,
}

impl Borders {
    pub fn merge(&self, other: &Borders) -> Borders {
        if other.clear_all {
            return other.clone();
        }
        Borders {
            top: merge_nested(&self.top, &other.top, Border::merge),
            left: merge_nested(&self.left, &other.left, Border::merge),
            bottom: merge_nested(&self.bottom, &other.bottom, Border::merge),
            right: merge_nested(&self.right, &other.right, Border::merge),
            distance_from_top: other.distance_from_top.or(self.distance_from_top),
            distance_from_left: other.distance_from_left.or(self.distance_from_left),
            distance_from_bottom: other.distance_from_bottom.or(self.distance_from_bottom),
            distance_from_right: other.distance_from_right.or(self.distance_from_right),
            visible: other.visible.or(self.visible),
            style: other.style.or(self.style),
            width: other.width.or(self.width),
            color: other.color.or(self.color),
            clear_all: self.clear_all,
        }
    }

    /// Borders that remove everything inherited
    pub fn cleared() -> Self {
        Borders {
            clear_all: true,
            ..Default::default()
        }
    }

    /// The edges in DDL order, with their names
    pub fn edges(&self) -> [(&'static str, Option<&Border>); 4] {
        [
            ("Top", self.top.as_ref()),
            ("Left", self.left.as_ref()),
            ("Bottom", self.bottom.as_ref()),
            ("Right", self.right.as_ref()),
        ]
    }
}

impl HasMeta for Borders {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Borders>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Borders",
                vec![
                    object_property!("Top", Borders, top: Border),
                    object_property!("Left", Borders, left: Border),
                    object_property!("Bottom", Borders, bottom: Border),
                    object_property!("Right", Borders, right: Border),
                    value_property!("DistanceFromTop", Borders, distance_from_top: Unit),
                    value_property!("DistanceFromLeft", Borders, distance_from_left: Unit),
                    value_property!("DistanceFromBottom", Borders, distance_from_bottom: Unit),
                    value_property!("DistanceFromRight", Borders, distance_from_right: Unit),
                    value_property!("Visible", Borders, visible: bool),
                    value_property!("Style", Borders, style: BorderStyle),
                    value_property!("Width", Borders, width: Unit),
                    value_property!("Color", Borders, color: Color),
                ],
            )
        })
    }
}

// =============================================================================
// Shading
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shading {
    pub visible: Option<bool>,
    pub color: Option<Color>,
}

impl Shading {
    pub fn merge(&self, other: &Shading) -> Shading {
        Shading {
            visible: other.visible.or(self.visible),
            color: other.color.or(self.color),
        }
    }
}

impl HasMeta for Shading {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Shading>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Shading",
                vec![
                    value_property!("Visible", Shading, visible: bool),
                    value_property!("Color", Shading, color: Color),
                ],
            )
        })
    }
}

// =============================================================================
// Paragraph Format
// =============================================================================

/// Paragraph formatting, including the paragraph's default font
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    pub alignment: Option<ParagraphAlignment>,
    pub first_line_indent: Option<Unit>,
    pub left_indent: Option<Unit>,
    pub right_indent: Option<Unit>,
    pub space_before: Option<Unit>,
    pub space_after: Option<Unit>,
    pub line_spacing: Option<Unit>,
    pub line_spacing_rule: Option<LineSpacingRule>,
    pub outline_level: Option<OutlineLevel>,
    pub keep_together: Option<bool>,
    pub keep_with_next: Option<bool>,
    pub page_break_before: Option<bool>,
    pub widow_control: Option<bool>,
    pub font: Option<Font>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
}

fn merge_nested<T: Clone>(
    base: &Option<T>,
    over: &Option<T>,
    merge: impl Fn(&T, &T) -> T,
) -> Option<T> {
    match (base, over) {
        (Some(b), Some(o)) => Some(merge(b, o)),
        (b, o) => o.clone().or_else(|| b.clone()),
    }
}

impl ParagraphFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties from `other` override properties from `self` when present.
    /// Nested composites merge field by field.
    pub fn merge(&self, other: &ParagraphFormat) -> ParagraphFormat {
        ParagraphFormat {
            alignment: other.alignment.or(self.alignment),
            first_line_indent: other.first_line_indent.or(self.first_line_indent),
            left_indent: other.left_indent.or(self.left_indent),
            right_indent: other.right_indent.or(self.right_indent),
            space_before: other.space_before.or(self.space_before),
            space_after: other.space_after.or(self.space_after),
            line_spacing: other.line_spacing.or(self.line_spacing),
            line_spacing_rule: other.line_spacing_rule.or(self.line_spacing_rule),
            outline_level: other.outline_level.or(self.outline_level),
            keep_together: other.keep_together.or(self.keep_together),
            keep_with_next: other.keep_with_next.or(self.keep_with_next),
            page_break_before: other.page_break_before.or(self.page_break_before),
            widow_control: other.widow_control.or(self.widow_control),
            font: merge_nested(&self.font, &other.font, Font::merge),
            borders: merge_nested(&self.borders, &other.borders, Borders::merge),
            shading: merge_nested(&self.shading, &other.shading, Shading::merge),
        }
    }

    pub fn alignment(&self) -> ParagraphAlignment {
        self.alignment.unwrap_or(ParagraphAlignment::Left)
    }

    pub fn outline_level(&self) -> OutlineLevel {
        self.outline_level.unwrap_or(OutlineLevel::BodyText)
    }

    /// Font, created when absent
    pub fn font_mut(&mut self) -> &mut Font {
        self.font.get_or_insert_with(Font::default)
    }

    pub fn borders_mut(&mut self) -> &mut Borders {
        self.borders.get_or_insert_with(Borders::default)
    }

    pub fn shading_mut(&mut self) -> &mut Shading {
        self.shading.get_or_insert_with(Shading::default)
    }
}

impl HasMeta for ParagraphFormat {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<ParagraphFormat>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "ParagraphFormat",
                vec![
                    value_property!("Alignment", ParagraphFormat, alignment: ParagraphAlignment),
                    value_property!("FirstLineIndent", ParagraphFormat, first_line_indent: Unit),
                    value_property!("LeftIndent", ParagraphFormat, left_indent: Unit),
                    value_property!("RightIndent", ParagraphFormat, right_indent: Unit),
                    value_property!("SpaceBefore", ParagraphFormat, space_before: Unit),
                    value_property!("SpaceAfter", ParagraphFormat, space_after: Unit),
                    value_property!("LineSpacing", ParagraphFormat, line_spacing: Unit),
                    value_property!(
                        "LineSpacingRule",
                        ParagraphFormat,
                        line_spacing_rule: LineSpacingRule
                    ),
                    value_property!("OutlineLevel", ParagraphFormat, outline_level: OutlineLevel),
                    value_property!("KeepTogether", ParagraphFormat, keep_together: bool),
                    value_property!("KeepWithNext", ParagraphFormat, keep_with_next: bool),
                    value_property!("PageBreakBefore", ParagraphFormat, page_break_before: bool),
                    value_property!("WidowControl", ParagraphFormat, widow_control: bool),
                    object_property!("Font", ParagraphFormat, font: Font),
                    object_property!("Borders", ParagraphFormat, borders: Borders),
                    object_property!("Shading", ParagraphFormat, shading: Shading),
                ],
            )
        })
    }
}

/// True when `format` is absent or has nothing set
pub fn is_null_format<T: Values>(format: Option<&T>) -> bool {
    format.map_or(true, |f| f.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_font_merge_prefers_override() {
        let base = Font {
            name: Some("Verdana".into()),
            size: Some(Unit::from_point(10.0)),
            bold: Some(false),
            ..Default::default()
        };
        let over = Font {
            bold: Some(true),
            ..Default::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.name.as_deref(), Some("Verdana"));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.size, Some(Unit::from_point(10.0)));
    }

    #[test]
    fn test_superscript_clears_subscript() {
        let mut font = Font::new();
        font.set_subscript(true);
        font.set_value("Superscript", Value::Bool(true)).unwrap();
        assert_eq!(font.superscript, Some(true));
        assert_eq!(font.subscript, Some(false));
    }

    #[test]
    fn test_paragraph_format_nested_merge() {
        let mut base = ParagraphFormat::new();
        base.font_mut().name = Some("Arial".into());
        base.left_indent = Some(Unit::from_centimeter(1.0));
        let mut over = ParagraphFormat::new();
        over.font_mut().bold = Some(true);
        let merged = base.merge(&over);
        let font = merged.font.unwrap();
        assert_eq!(font.name.as_deref(), Some("Arial"));
        assert_eq!(font.bold, Some(true));
        assert_eq!(merged.left_indent, Some(Unit::from_centimeter(1.0)));
    }

    #[test]
    fn test_cleared_borders_drop_inherited_edges() {
        let base = Borders {
            top: Some(Border {
                width: Some(Unit::from_point(1.0)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.merge(&Borders::cleared());
        assert!(merged.top.is_none());
        assert!(merged.clear_all);
    }

    #[test]
    fn test_format_reflection_paths() {
        let mut format = ParagraphFormat::new();
        assert!(format.is_null());
        format.set_value("Borders.Top.Width", Value::from("1pt")).unwrap();
        format.set_value("font.bold", Value::Bool(true)).unwrap();
        assert_eq!(
            format.borders.as_ref().and_then(|b| b.top.as_ref()).and_then(|t| t.width),
            Some(Unit::from_point(1.0))
        );
        assert_eq!(format.get_value("Font.Bold").unwrap(), Some(Value::Bool(true)));
        assert!(!is_null_format(Some(&format)));
        format.set_null();
        assert!(is_null_format(Some(&format)));
        assert!(is_null_format::<ParagraphFormat>(None));
    }

    #[test]
    fn test_enum_values_by_name() {
        let mut format = ParagraphFormat::new();
        format
            .set_value("Alignment", Value::Enum("Center".into()))
            .unwrap();
        format
            .set_value("OutlineLevel", Value::from("level2"))
            .unwrap();
        assert_eq!(format.alignment(), ParagraphAlignment::Center);
        assert_eq!(format.outline_level(), OutlineLevel::Level2);
        assert_eq!(
            format.get_value("alignment").unwrap(),
            Some(Value::Enum("Center".into()))
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = ParagraphFormat::new();
        original.font_mut().bold = Some(true);
        let mut copy = original.clone();
        copy.font_mut().bold = Some(false);
        assert_eq!(original.font.unwrap().bold, Some(true));
    }
}
