//! Enumerated property values
//!
//! Every enumeration prints its variant name in DDL and parses it back
//! case-insensitively. Parse failures keep the offending text.

use crate::{DomError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! ddl_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name used in DDL
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = DomError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomError::invalid_enum(stringify!($name), s))
            }
        }
    };
}

ddl_enum!(
    /// Horizontal alignment of paragraph lines
    ParagraphAlignment { Left, Center, Right, Justify }
);

ddl_enum!(
    /// How `LineSpacing` is interpreted
    LineSpacingRule { Single, OnePtFive, Double, AtLeast, Exactly, Multiple }
);

ddl_enum!(
    /// Outline level of a paragraph (headings are levels 1-9)
    OutlineLevel {
        BodyText, Level1, Level2, Level3, Level4, Level5, Level6, Level7, Level8, Level9,
    }
);

impl OutlineLevel {
    /// Heading level `n` (1-9)
    pub fn heading(level: usize) -> Option<Self> {
        OutlineLevel::ALL.get(level).copied().filter(|_| level > 0)
    }
}

ddl_enum!(
    /// Underline style of a font
    Underline { None, Single, Words, Dotted, Dash, DotDash, DotDotDash }
);

ddl_enum!(
    /// Line style of a border
    BorderStyle { None, Single, Dot, DashSmallGap, DashLargeGap, DashDot, DashDotDot }
);

ddl_enum!(
    /// Whether a style formats paragraphs or characters
    StyleType { Paragraph, Character }
);

ddl_enum!(
    Orientation { Portrait, Landscape }
);

ddl_enum!(
    /// Where a section starts
    SectionStart { Continuous, NewColumn, NewPage, EvenPage, OddPage }
);

ddl_enum!(
    PageFormat { A3, A4, A5, A6, B5, Letter, Legal, Ledger }
);

ddl_enum!(
    /// Vertical alignment of cell content
    VerticalAlignment { Top, Center, Bottom }
);

ddl_enum!(
    /// Horizontal placement of table rows
    RowAlignment { Left, Center, Right }
);

ddl_enum!(
    RowHeightRule { AtLeast, Auto, Exactly }
);

ddl_enum!(
    /// Target kind of a hyperlink
    HyperlinkType { Local, File, Web }
);

ddl_enum!(
    /// Special characters a `Character` element can stand for
    SymbolName {
        Blank, En, Em, EmQuarter, Em4,
        Tab, LineBreak, ParaBreak,
        Euro, Copyright, Trademark, RegisteredTrademark, Bullet, Not,
        EmDash, EnDash, NonBreakableBlank, HardBlank,
    }
);

/// How a [`SymbolName`] is written in DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `\space(...)`
    Space,
    /// `\tab`, `\linebreak` or a paragraph break
    Break,
    /// `\symbol(...)`
    Symbol,
}

impl SymbolName {
    pub fn kind(self) -> SymbolKind {
        match self {
            SymbolName::Blank
            | SymbolName::En
            | SymbolName::Em
            | SymbolName::EmQuarter
            | SymbolName::Em4 => SymbolKind::Space,
            SymbolName::Tab | SymbolName::LineBreak | SymbolName::ParaBreak => SymbolKind::Break,
            _ => SymbolKind::Symbol,
        }
    }
}

ddl_enum!(
    /// Header/footer slot of a section
    HeaderFooterIndex { Primary, FirstPage, EvenPage }
);

impl HeaderFooterIndex {
    /// Keyword prefix used in DDL (`\primaryheader`, `\firstpagefooter`, ...)
    pub fn keyword_prefix(self) -> &'static str {
        match self {
            HeaderFooterIndex::Primary => "primary",
            HeaderFooterIndex::FirstPage => "firstpage",
            HeaderFooterIndex::EvenPage => "evenpage",
        }
    }
}
