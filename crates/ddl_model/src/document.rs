//! The document root element

use crate::values::{HasMeta, Meta};
use crate::{object_property, value_property, NodeId, Styles, Unit};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Descriptive metadata written to the `Info` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub comment: Option<String>,
}

impl HasMeta for DocumentInfo {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<DocumentInfo>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "DocumentInfo",
                vec![
                    value_property!("Title", DocumentInfo, title: String),
                    value_property!("Author", DocumentInfo, author: String),
                    value_property!("Subject", DocumentInfo, subject: String),
                    value_property!("Keywords", DocumentInfo, keywords: String),
                    value_property!("Comment", DocumentInfo, comment: String),
                ],
            )
        })
    }
}

/// Root element of a document tree. Owns the style collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub info: Option<DocumentInfo>,
    pub default_tab_stop: Option<Unit>,
    pub use_cmyk_color: Option<bool>,
    pub comment: Option<String>,
    pub(crate) styles: Styles,
    pub(crate) sections: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            info: None,
            default_tab_stop: None,
            use_cmyk_color: None,
            comment: None,
            styles: Styles::with_builtins(),
            sections: Vec::new(),
        }
    }
}

impl Document {
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    pub fn sections(&self) -> &[NodeId] {
        &self.sections
    }

    /// Default tab stop, 1.25cm when unset
    pub fn default_tab_stop(&self) -> Unit {
        self.default_tab_stop
            .unwrap_or_else(|| Unit::from_centimeter(1.25))
    }

    pub fn info_mut(&mut self) -> &mut DocumentInfo {
        self.info.get_or_insert_with(DocumentInfo::default)
    }
}

impl HasMeta for Document {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Document>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Document",
                vec![
                    object_property!("Info", Document, info: DocumentInfo),
                    value_property!("DefaultTabStop", Document, default_tab_stop: Unit),
                    value_property!("UseCmykColor", Document, use_cmyk_color: bool),
                    value_property!("Comment", Document, comment: String),
                ],
            )
        })
    }
}
