//! Style system - named styles, base-style chains, and resolution
//!
//! Styles form a forest rooted at the two root styles, `Normal` (paragraph)
//! and `DefaultParagraphFont` (character). Every other style names a base
//! style that exists in the same collection; the chain is kept acyclic by
//! checking every assignment before it is applied.

use crate::values::{Access, HasMeta, Meta, Property, Value, Values};
use crate::{
    object_property, value_property, Color, DomError, Font, LineSpacingRule, OutlineLevel,
    ParagraphAlignment, ParagraphFormat, Result, StyleType, Underline, Unit,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Names of the built-in styles
pub mod names {
    pub const DEFAULT_PARAGRAPH_FONT: &str = "DefaultParagraphFont";
    pub const NORMAL: &str = "Normal";
    pub const HEADINGS: [&str; 9] = [
        "Heading1", "Heading2", "Heading3", "Heading4", "Heading5", "Heading6", "Heading7",
        "Heading8", "Heading9",
    ];
    pub const LIST: &str = "List";
    pub const HEADER: &str = "Header";
    pub const FOOTER: &str = "Footer";
    pub const FOOTNOTE: &str = "Footnote";
    pub const HYPERLINK: &str = "Hyperlink";
    pub const INVALID_STYLE_NAME: &str = "InvalidStyleName";
}

fn is_root_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(names::NORMAL)
        || name.eq_ignore_ascii_case(names::DEFAULT_PARAGRAPH_FONT)
}

// =============================================================================
// Style
// =============================================================================

/// A named set of paragraph and character formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    name: String,
    base_style: String,
    style_type: StyleType,
    built_in: bool,
    /// Paragraph formatting; the style's font lives in `format.font`
    pub format: Option<ParagraphFormat>,
    pub comment: Option<String>,
}

impl Style {
    /// A new style deriving from `base_style`. Its type is taken from the
    /// base when the style is added to a collection.
    pub fn new(name: impl Into<String>, base_style: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_style: base_style.into(),
            style_type: StyleType::Paragraph,
            built_in: false,
            format: None,
            comment: None,
        }
    }

    fn root(name: &str, style_type: StyleType) -> Self {
        Self {
            name: name.to_string(),
            base_style: String::new(),
            style_type,
            built_in: true,
            format: None,
            comment: None,
        }
    }

    fn built_in(name: &str, base_style: &str, style_type: StyleType) -> Self {
        Self {
            built_in: true,
            style_type,
            ..Style::new(name, base_style)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the base style, empty for root styles
    pub fn base_style(&self) -> &str {
        &self.base_style
    }

    pub fn style_type(&self) -> StyleType {
        self.style_type
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in
    }

    pub fn is_root(&self) -> bool {
        self.base_style.is_empty()
    }

    pub fn font(&self) -> Option<&Font> {
        self.format.as_ref().and_then(|f| f.font.as_ref())
    }

    /// Paragraph format, created when absent
    pub fn format_mut(&mut self) -> &mut ParagraphFormat {
        self.format.get_or_insert_with(ParagraphFormat::default)
    }

    /// Font, created when absent
    pub fn font_mut(&mut self) -> &mut Font {
        self.format_mut().font_mut()
    }

    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn style_font(style: &Style) -> Option<&dyn Values> {
    style.font().map(|f| f as &dyn Values)
}

fn style_font_mut(style: &mut Style) -> &mut dyn Values {
    style.font_mut()
}

fn clear_style_font(style: &mut Style) {
    if let Some(format) = style.format.as_mut() {
        format.font = None;
    }
}

fn blank_font() -> Box<dyn Values> {
    Box::new(Font::default())
}

impl HasMeta for Style {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Style>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Style",
                vec![
                    Property {
                        name: "Name",
                        access: Access::ReadOnly {
                            get: |s: &Style| Some(Value::String(s.name.clone())),
                        },
                    },
                    Property {
                        name: "BaseStyle",
                        access: Access::ReadOnly {
                            get: |s: &Style| Some(Value::String(s.base_style.clone())),
                        },
                    },
                    Property {
                        name: "StyleType",
                        access: Access::ReadOnly {
                            get: |s: &Style| Some(Value::from(s.style_type)),
                        },
                    },
                    object_property!("ParagraphFormat", Style, format: ParagraphFormat),
                    Property {
                        name: "Font",
                        access: Access::Object {
                            get: style_font,
                            get_mut: style_font_mut,
                            clear: clear_style_font,
                            blank: blank_font,
                        },
                    },
                    value_property!("Comment", Style, comment: String),
                ],
            )
        })
    }
}

// =============================================================================
// Style Collection
// =============================================================================

/// Styles of a document, in storage order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    styles: Vec<Style>,
}

impl Default for Styles {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl Styles {
    /// A collection holding only the built-in styles with their defaults
    pub fn with_builtins() -> Self {
        let mut styles = Vec::with_capacity(17);

        styles.push(Style::root(names::DEFAULT_PARAGRAPH_FONT, StyleType::Character));

        let mut normal = Style::root(names::NORMAL, StyleType::Paragraph);
        normal.format = Some(ParagraphFormat {
            alignment: Some(ParagraphAlignment::Left),
            first_line_indent: Some(Unit::ZERO),
            left_indent: Some(Unit::ZERO),
            right_indent: Some(Unit::ZERO),
            space_before: Some(Unit::ZERO),
            space_after: Some(Unit::ZERO),
            line_spacing: Some(Unit::ZERO),
            line_spacing_rule: Some(LineSpacingRule::Single),
            outline_level: Some(OutlineLevel::BodyText),
            keep_together: Some(false),
            keep_with_next: Some(false),
            page_break_before: Some(false),
            widow_control: Some(true),
            font: Some(Font {
                name: Some("Verdana".to_string()),
                size: Some(Unit::from_point(10.0)),
                bold: Some(false),
                italic: Some(false),
                underline: Some(Underline::None),
                color: Some(Color::BLACK),
                superscript: Some(false),
                subscript: Some(false),
            }),
            borders: None,
            shading: None,
        });
        styles.push(normal);

        let mut base = names::NORMAL;
        for (level, name) in names::HEADINGS.iter().enumerate() {
            let mut heading = Style::built_in(name, base, StyleType::Paragraph);
            heading.format_mut().outline_level = OutlineLevel::heading(level + 1);
            styles.push(heading);
            base = name;
        }

        for name in [names::LIST, names::HEADER, names::FOOTER, names::FOOTNOTE] {
            styles.push(Style::built_in(name, names::NORMAL, StyleType::Paragraph));
        }

        let mut hyperlink = Style::built_in(
            names::HYPERLINK,
            names::DEFAULT_PARAGRAPH_FONT,
            StyleType::Character,
        );
        hyperlink.font_mut().underline = Some(Underline::Single);
        hyperlink.font_mut().color = Some(Color::BLUE);
        styles.push(hyperlink);

        let mut invalid = Style::built_in(names::INVALID_STYLE_NAME, names::NORMAL, StyleType::Paragraph);
        invalid.font_mut().bold = Some(true);
        invalid.font_mut().underline = Some(Underline::Dash);
        invalid.font_mut().color = Some(Color::RED);
        styles.push(invalid);

        Self { styles }
    }

    /// Shared, unmodified built-in styles
    pub fn builtins() -> &'static Styles {
        static BUILTINS: OnceLock<Styles> = OnceLock::new();
        BUILTINS.get_or_init(Styles::with_builtins)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    /// Position of a style (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.styles.iter().position(|s| s.matches(name))
    }

    pub fn find(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.matches(name))
    }

    /// Mutable access to a style's formatting. Name and base style can
    /// only change through the collection.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Style> {
        self.styles.iter_mut().find(|s| s.matches(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Base style of `name`, `None` for roots
    pub fn base_of(&self, name: &str) -> Result<Option<&Style>> {
        let style = self
            .find(name)
            .ok_or_else(|| DomError::UnknownStyle(name.to_string()))?;
        if style.is_root() {
            return Ok(None);
        }
        self.find(&style.base_style)
            .map(Some)
            .ok_or_else(|| DomError::UnknownBaseStyle(style.base_style.clone()))
    }

    /// Add a style, or replace the style with the same name. The base style
    /// must exist; the new style takes its type from the base.
    pub fn add(&mut self, mut style: Style) -> Result<usize> {
        if style.name.is_empty() {
            return Err(DomError::invalid_operation("style name must not be empty"));
        }
        let existing = self.index_of(&style.name);

        if style.base_style.is_empty() {
            // Only the root styles may lack a base, and they already exist.
            return match existing {
                Some(index) if self.styles[index].is_root() => {
                    let current = &self.styles[index];
                    style.style_type = current.style_type;
                    style.built_in = current.built_in;
                    style.name = current.name.clone();
                    self.styles[index] = style;
                    Ok(index)
                }
                _ => Err(DomError::invalid_operation(format!(
                    "style '{}' needs a base style",
                    style.name
                ))),
            };
        }

        if let Some(index) = existing {
            if self.styles[index].is_root() {
                return Err(DomError::RootStyleRebase(style.name));
            }
        }
        if style.base_style.eq_ignore_ascii_case(&style.name) {
            return Err(DomError::CircularStyle {
                style: style.name.clone(),
                base: style.base_style,
            });
        }
        let base = self
            .find(&style.base_style)
            .ok_or_else(|| DomError::UnknownBaseStyle(style.base_style.clone()))?;
        style.style_type = base.style_type;
        self.check_chain(&style.name, &style.base_style)?;

        match existing {
            Some(index) => {
                // Derived styles keep their type, so the replacement must too.
                if self.styles[index].style_type != style.style_type {
                    if let Some(child) = self
                        .styles
                        .iter()
                        .find(|s| s.base_style.eq_ignore_ascii_case(&style.name))
                    {
                        return Err(DomError::BaseStyleTypeMismatch {
                            style: child.name.clone(),
                            base: style.name,
                        });
                    }
                }
                style.built_in = self.styles[index].built_in;
                debug!("Replacing style '{}'", style.name);
                self.styles[index] = style;
                Ok(index)
            }
            None => {
                debug!("Adding style '{}' based on '{}'", style.name, style.base_style);
                self.styles.push(style);
                Ok(self.styles.len() - 1)
            }
        }
    }

    /// Create a style and return it for formatting
    pub fn add_style(&mut self, name: &str, base_style: &str) -> Result<&mut Style> {
        let index = self.add(Style::new(name, base_style))?;
        Ok(&mut self.styles[index])
    }

    /// Assign a new base style. Nothing changes when the assignment fails.
    pub fn set_base_style(&mut self, name: &str, base_style: &str) -> Result<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| DomError::UnknownStyle(name.to_string()))?;
        let style = &self.styles[index];
        if style.is_root() {
            return Err(DomError::RootStyleRebase(style.name.clone()));
        }
        if style.base_style.eq_ignore_ascii_case(base_style) {
            self.styles[index].base_style = base_style.to_string();
            return Ok(());
        }
        let base = self
            .find(base_style)
            .ok_or_else(|| DomError::UnknownBaseStyle(base_style.to_string()))?;
        if base.style_type != style.style_type {
            return Err(DomError::BaseStyleTypeMismatch {
                style: style.name.clone(),
                base: base.name.clone(),
            });
        }
        self.check_chain(name, base_style)?;

        debug!("Rebasing style '{}' onto '{}'", name, base_style);
        self.styles[index].base_style = base_style.to_string();
        Ok(())
    }

    /// Fail if `name` appears on the chain starting at `base_style`
    fn check_chain(&self, name: &str, base_style: &str) -> Result<()> {
        let circular = || DomError::CircularStyle {
            style: name.to_string(),
            base: base_style.to_string(),
        };
        let mut current = base_style;
        for _ in 0..=self.styles.len() {
            if current.eq_ignore_ascii_case(name) {
                return Err(circular());
            }
            match self.find(current) {
                Some(style) if !style.is_root() => current = &style.base_style,
                _ => return Ok(()),
            }
        }
        Err(circular())
    }

    /// Remove a user-defined style that no other style is based on
    pub fn remove(&mut self, name: &str) -> Result<Style> {
        let index = self
            .index_of(name)
            .ok_or_else(|| DomError::UnknownStyle(name.to_string()))?;
        let style = &self.styles[index];
        if style.built_in {
            return Err(DomError::invalid_operation(format!(
                "built-in style '{}' cannot be removed",
                style.name
            )));
        }
        if let Some(child) = self.styles.iter().find(|s| s.base_style.eq_ignore_ascii_case(name)) {
            return Err(DomError::invalid_operation(format!(
                "style '{}' is the base of '{}'",
                style.name, child.name
            )));
        }
        Ok(self.styles.remove(index))
    }

    /// The chain from `name` up to its root, `name` first
    pub fn chain(&self, name: &str) -> Result<Vec<&Style>> {
        let mut chain = Vec::new();
        let mut current = self
            .find(name)
            .ok_or_else(|| DomError::UnknownStyle(name.to_string()))?;
        loop {
            if chain.len() > self.styles.len() {
                return Err(DomError::CircularStyle {
                    style: name.to_string(),
                    base: current.name.clone(),
                });
            }
            chain.push(current);
            if current.is_root() {
                return Ok(chain);
            }
            current = self
                .find(&current.base_style)
                .ok_or_else(|| DomError::UnknownBaseStyle(current.base_style.clone()))?;
        }
    }

    /// Effective paragraph format (with font) of a style: the formats along
    /// the chain merged from the root down.
    pub fn resolve(&self, name: &str) -> Result<ParagraphFormat> {
        let chain = self.chain(name)?;
        Ok(chain
            .iter()
            .rev()
            .filter_map(|s| s.format.as_ref())
            .fold(ParagraphFormat::default(), |acc, f| acc.merge(f)))
    }

    /// Effective font of a style
    pub fn resolve_font(&self, name: &str) -> Result<Font> {
        Ok(self.resolve(name)?.font.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let styles = Styles::with_builtins();
        assert_eq!(styles.get(0).unwrap().name(), names::DEFAULT_PARAGRAPH_FONT);
        assert_eq!(styles.get(1).unwrap().name(), names::NORMAL);
        assert_eq!(styles.get(2).unwrap().name(), "Heading1");
        assert_eq!(styles.len(), 17);
        assert!(styles.iter().all(|s| s.is_built_in()));
        assert!(styles.find("normal").unwrap().is_root());
        assert_eq!(
            styles.find("Hyperlink").unwrap().style_type(),
            StyleType::Character
        );
    }

    #[test]
    fn test_resolve_walks_chain() {
        let styles = Styles::with_builtins();
        let format = styles.resolve("Heading3").unwrap();
        assert_eq!(format.outline_level, Some(OutlineLevel::Level3));
        let font = format.font.unwrap();
        assert_eq!(font.name.as_deref(), Some("Verdana"));
        assert_eq!(font.size, Some(Unit::from_point(10.0)));
    }

    #[test]
    fn test_add_takes_type_from_base() {
        let mut styles = Styles::with_builtins();
        styles.add_style("Emphasis", "DefaultParagraphFont").unwrap();
        assert_eq!(styles.find("Emphasis").unwrap().style_type(), StyleType::Character);
        assert!(matches!(
            styles.add(Style::new("Orphan", "Missing")),
            Err(DomError::UnknownBaseStyle(_))
        ));
        assert!(matches!(
            styles.add(Style::new("Loop", "loop")),
            Err(DomError::CircularStyle { .. })
        ));
        assert!(styles.add(Style::new("", "Normal")).is_err());
    }

    #[test]
    fn test_cycle_rejected_without_mutation() {
        let mut styles = Styles::with_builtins();
        styles.add_style("A", "Normal").unwrap();
        styles.add_style("B", "A").unwrap();
        styles.add_style("C", "B").unwrap();
        let result = styles.set_base_style("A", "C");
        assert!(matches!(result, Err(DomError::CircularStyle { .. })));
        assert_eq!(styles.find("A").unwrap().base_style(), "Normal");
    }

    #[test]
    fn test_rebase_guards() {
        let mut styles = Styles::with_builtins();
        assert!(matches!(
            styles.set_base_style("Normal", "Heading1"),
            Err(DomError::RootStyleRebase(_))
        ));
        assert!(matches!(
            styles.set_base_style("Heading1", "Hyperlink"),
            Err(DomError::BaseStyleTypeMismatch { .. })
        ));
        assert!(matches!(
            styles.set_base_style("Heading1", "Nope"),
            Err(DomError::UnknownBaseStyle(_))
        ));
        styles.set_base_style("Heading1", "NORMAL").unwrap();
        assert_eq!(styles.find("Heading1").unwrap().base_style(), "NORMAL");
    }

    #[test]
    fn test_replace_keeps_derived_types_consistent() {
        let mut styles = Styles::with_builtins();
        styles.add_style("A", "Normal").unwrap();
        styles.add_style("B", "A").unwrap();

        let result = styles.add(Style::new("A", "DefaultParagraphFont"));
        assert!(matches!(result, Err(DomError::BaseStyleTypeMismatch { .. })));
        assert_eq!(styles.find("A").unwrap().base_style(), "Normal");
        assert_eq!(styles.find("A").unwrap().style_type(), StyleType::Paragraph);

        // Same type, different base: allowed.
        styles.add(Style::new("A", "Heading1")).unwrap();
        assert_eq!(styles.find("A").unwrap().base_style(), "Heading1");

        // Nothing derives from C, so its type may change.
        styles.add_style("C", "Normal").unwrap();
        styles.add(Style::new("C", "DefaultParagraphFont")).unwrap();
        assert_eq!(styles.find("C").unwrap().style_type(), StyleType::Character);
    }

    #[test]
    fn test_remove_rules() {
        let mut styles = Styles::with_builtins();
        styles.add_style("Parent", "Normal").unwrap();
        styles.add_style("Child", "Parent").unwrap();
        assert!(styles.remove("Normal").is_err());
        assert!(styles.remove("Parent").is_err());
        styles.remove("Child").unwrap();
        styles.remove("Parent").unwrap();
        assert!(!styles.contains("Parent"));
    }

    #[test]
    fn test_style_reflection() {
        let mut styles = Styles::with_builtins();
        let style = styles.add_style("Quote", "Normal").unwrap();
        style.set_value("Font.Italic", Value::Bool(true)).unwrap();
        style
            .set_value("ParagraphFormat.LeftIndent", Value::from("1cm"))
            .unwrap();
        assert_eq!(style.font().and_then(|f| f.italic), Some(true));
        assert_eq!(
            style.get_value("BaseStyle").unwrap(),
            Some(Value::String("Normal".into()))
        );
        assert!(matches!(
            style.set_value("Name", Value::from("Other")),
            Err(DomError::ReadOnlyValue(_))
        ));
    }
}
