//! Sections, page setup, and header/footer slots

use crate::values::{HasMeta, Meta};
use crate::{
    object_property, value_property, HeaderFooterIndex, NodeId, Orientation, PageFormat,
    ParagraphFormat, SectionStart, Unit,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// =============================================================================
// Page Setup
// =============================================================================

/// Page geometry of a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub page_format: Option<PageFormat>,
    pub page_width: Option<Unit>,
    pub page_height: Option<Unit>,
    pub orientation: Option<Orientation>,
    pub top_margin: Option<Unit>,
    pub bottom_margin: Option<Unit>,
    pub left_margin: Option<Unit>,
    pub right_margin: Option<Unit>,
    pub header_distance: Option<Unit>,
    pub footer_distance: Option<Unit>,
    pub section_start: Option<SectionStart>,
    pub odd_and_even_pages_header_footer: Option<bool>,
    pub different_first_page_header_footer: Option<bool>,
    pub mirror_margins: Option<bool>,
    pub starting_number: Option<i32>,
}

impl PageSetup {
    pub fn merge(&self, other: &PageSetup) -> PageSetup {
        PageSetup {
            page_format: other.page_format.or(self.page_format),
            page_width: other.page_width.or(self.page_width),
            page_height: other.page_height.or(self.page_height),
            orientation: other.orientation.or(self.orientation),
            top_margin: other.top_margin.or(self.top_margin),
            bottom_margin: other.bottom_margin.or(self.bottom_margin),
            left_margin: other.left_margin.or(self.left_margin),
            right_margin: other.right_margin.or(self.right_margin),
            header_distance: other.header_distance.or(self.header_distance),
            footer_distance: other.footer_distance.or(self.footer_distance),
            section_start: other.section_start.or(self.section_start),
            odd_and_even_pages_header_footer: other
                .odd_and_even_pages_header_footer
                .or(self.odd_and_even_pages_header_footer),
            different_first_page_header_footer: other
                .different_first_page_header_footer
                .or(self.different_first_page_header_footer),
            mirror_margins: other.mirror_margins.or(self.mirror_margins),
            starting_number: other.starting_number.or(self.starting_number),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation.unwrap_or(Orientation::Portrait)
    }
}

impl HasMeta for PageSetup {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<PageSetup>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "PageSetup",
                vec![
                    value_property!("PageFormat", PageSetup, page_format: PageFormat),
                    value_property!("PageWidth", PageSetup, page_width: Unit),
                    value_property!("PageHeight", PageSetup, page_height: Unit),
                    value_property!("Orientation", PageSetup, orientation: Orientation),
                    value_property!("TopMargin", PageSetup, top_margin: Unit),
                    value_property!("BottomMargin", PageSetup, bottom_margin: Unit),
                    value_property!("LeftMargin", PageSetup, left_margin: Unit),
                    value_property!("RightMargin", PageSetup, right_margin: Unit),
                    value_property!("HeaderDistance", PageSetup, header_distance: Unit),
                    value_property!("FooterDistance", PageSetup, footer_distance: Unit),
                    value_property!("SectionStart", PageSetup, section_start: SectionStart),
                    value_property!(
                        "OddAndEvenPagesHeaderFooter",
                        PageSetup,
                        odd_and_even_pages_header_footer: bool
                    ),
                    value_property!(
                        "DifferentFirstPageHeaderFooter",
                        PageSetup,
                        different_first_page_header_footer: bool
                    ),
                    value_property!("MirrorMargins", PageSetup, mirror_margins: bool),
                    value_property!("StartingNumber", PageSetup, starting_number: i32),
                ],
            )
        })
    }
}

// =============================================================================
// Headers and Footers
// =============================================================================

/// The three header (or footer) slots of a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadersFooters {
    pub(crate) primary: Option<NodeId>,
    pub(crate) first_page: Option<NodeId>,
    pub(crate) even_page: Option<NodeId>,
}

impl HeadersFooters {
    pub fn get(&self, index: HeaderFooterIndex) -> Option<NodeId> {
        match index {
            HeaderFooterIndex::Primary => self.primary,
            HeaderFooterIndex::FirstPage => self.first_page,
            HeaderFooterIndex::EvenPage => self.even_page,
        }
    }

    pub(crate) fn slot_mut(&mut self, index: HeaderFooterIndex) -> &mut Option<NodeId> {
        match index {
            HeaderFooterIndex::Primary => &mut self.primary,
            HeaderFooterIndex::FirstPage => &mut self.first_page,
            HeaderFooterIndex::EvenPage => &mut self.even_page,
        }
    }

    /// Occupied slots in DDL order
    pub fn iter(&self) -> impl Iterator<Item = (HeaderFooterIndex, NodeId)> + '_ {
        HeaderFooterIndex::ALL
            .iter()
            .filter_map(|&index| self.get(index).map(|id| (index, id)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A header or footer. Which one it is, and which slot it occupies, is
/// fixed when it is placed into a section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderFooter {
    pub style: Option<String>,
    pub format: Option<ParagraphFormat>,
    pub(crate) is_header: bool,
    pub(crate) index: Option<HeaderFooterIndex>,
    pub(crate) elements: Vec<NodeId>,
}

impl HeaderFooter {
    pub fn is_header(&self) -> bool {
        self.is_header
    }

    pub fn is_footer(&self) -> bool {
        !self.is_header
    }

    /// Slot within the owning section, `None` while detached
    pub fn index(&self) -> Option<HeaderFooterIndex> {
        self.index
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }
}

impl HasMeta for HeaderFooter {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<HeaderFooter>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "HeaderFooter",
                vec![
                    value_property!("Style", HeaderFooter, style: String),
                    object_property!("Format", HeaderFooter, format: ParagraphFormat),
                ],
            )
        })
    }
}

// =============================================================================
// Section
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    pub page_setup: Option<PageSetup>,
    pub comment: Option<String>,
    pub(crate) headers: HeadersFooters,
    pub(crate) footers: HeadersFooters,
    pub(crate) elements: Vec<NodeId>,
}

impl Section {
    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn headers(&self) -> &HeadersFooters {
        &self.headers
    }

    pub fn footers(&self) -> &HeadersFooters {
        &self.footers
    }

    pub fn page_setup_mut(&mut self) -> &mut PageSetup {
        self.page_setup.get_or_insert_with(PageSetup::default)
    }
}

impl HasMeta for Section {
    fn meta() -> &'static Meta<Self> {
        static META: OnceLock<Meta<Section>> = OnceLock::new();
        META.get_or_init(|| {
            Meta::new(
                "Section",
                vec![
                    object_property!("PageSetup", Section, page_setup: PageSetup),
                    value_property!("Comment", Section, comment: String),
                ],
            )
        })
    }
}
