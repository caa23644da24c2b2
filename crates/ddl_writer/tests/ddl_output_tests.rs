//! Integration tests for DDL output
//!
//! Each test builds a document tree through the model API and checks the
//! exact DDL text the writer produces for it.

use ddl_model::{
    CollectionKind, DocumentTree, DomError, HeaderFooterIndex, HyperlinkType, NodeId, Orientation,
    Row, Styles, SymbolName, Unit,
};
use ddl_writer::{
    export_ddl, object_to_ddl_string, to_ddl_string, write_ddl_with_config, DdlError,
    DdlSerialize, DdlWriterConfig, Serializer,
};

/// A document with one section holding one paragraph
fn hello_tree() -> (DocumentTree, NodeId, NodeId) {
    let mut tree = DocumentTree::new();
    let section = tree.add_section().unwrap();
    let paragraph = tree.add_paragraph(section, "Hello").unwrap();
    (tree, section, paragraph)
}

#[test]
fn test_single_unstyled_paragraph() {
    let (tree, _, _) = hello_tree();
    assert_eq!(
        to_ddl_string(&tree).unwrap(),
        "\\document\n{\n  \\section\n  {\n    Hello\n  }\n}\n"
    );
}

#[test]
fn test_explicit_normal_style_keeps_short_form() {
    let (mut tree, _, paragraph) = hello_tree();
    tree.paragraph_mut(paragraph).unwrap().style = Some("Normal".to_string());
    assert_eq!(
        to_ddl_string(&tree).unwrap(),
        "\\document\n{\n  \\section\n  {\n    Hello\n  }\n}\n"
    );
}

#[test]
fn test_empty_document() {
    let tree = DocumentTree::new();
    assert_eq!(to_ddl_string(&tree).unwrap(), "\\document\n");
}

#[test]
fn test_empty_blocks_are_elided() {
    let (mut tree, section, _) = hello_tree();
    tree.add_paragraph(section, "").unwrap();
    assert_eq!(
        to_ddl_string(&tree).unwrap(),
        concat!(
            "\\document\n",
            "{\n",
            "  \\section\n",
            "  {\n",
            "    \\paragraph\n",
            "    {\n",
            "      Hello\n",
            "    }\n",
            "    \\paragraph\n",
            "  }\n",
            "}\n",
        )
    );
}

#[test]
fn test_style_diff_against_base() {
    let mut tree = DocumentTree::new();
    {
        let styles = tree.styles_mut().unwrap();
        styles.add_style("Base", "Normal").unwrap().font_mut().bold = Some(true);
        styles.add_style("Derived", "Base").unwrap().font_mut().bold = Some(false);
        styles.add_style("Plain", "Base").unwrap();
    }
    assert_eq!(
        to_ddl_string(&tree).unwrap(),
        concat!(
            "\\document\n",
            "{\n",
            "  \\styles\n",
            "  {\n",
            "    Base : Normal\n",
            "    {\n",
            "      Font\n",
            "      {\n",
            "        Bold = true\n",
            "      }\n",
            "    }\n",
            "    Derived : Base\n",
            "    {\n",
            "      Font\n",
            "      {\n",
            "        Bold = false\n",
            "      }\n",
            "    }\n",
            "    Plain : Base\n",
            "  }\n",
            "}\n",
        )
    );
}

#[test]
fn test_changed_builtin_style_is_written() {
    let mut tree = DocumentTree::new();
    tree.styles_mut()
        .unwrap()
        .find_mut("Heading1")
        .unwrap()
        .font_mut()
        .size = Some(Unit::from_point(16.0));
    let ddl = to_ddl_string(&tree).unwrap();
    assert!(ddl.contains("    Heading1\n    {\n      Font\n      {\n        Size = 16\n"));
    assert!(!ddl.contains("Heading2"));
}

#[test]
fn test_base_styles_are_written_first() {
    let mut tree = DocumentTree::new();
    {
        let styles = tree.styles_mut().unwrap();
        styles.add_style("Child", "Normal").unwrap();
        styles.add_style("Parent", "Normal").unwrap().font_mut().italic = Some(true);
        styles.set_base_style("Child", "Parent").unwrap();
    }
    let ddl = to_ddl_string(&tree).unwrap();
    let parent = ddl.find("Parent : Normal").unwrap();
    let child = ddl.find("Child : Parent").unwrap();
    assert!(parent < child);
}

#[test]
fn test_circular_styles_fail_loudly() {
    let mut styles = Styles::with_builtins();
    styles.add_style("A", "Normal").unwrap();
    styles.add_style("B", "A").unwrap();

    // The model refuses the cycle, so corrupt a stored copy instead
    assert!(styles.set_base_style("A", "B").is_err());
    let mut json = serde_json::to_value(&styles).unwrap();
    for style in json["styles"].as_array_mut().unwrap() {
        if style["name"] == "A" {
            style["base_style"] = "B".into();
        }
    }
    let corrupted: Styles = serde_json::from_value(json).unwrap();

    let tree = DocumentTree::new();
    let mut serializer = Serializer::new(Vec::new());
    let err = corrupted.serialize(&tree, &mut serializer).unwrap_err();
    assert!(matches!(err, DdlError::CircularStyle(_)));
}

#[test]
fn test_inline_content() {
    let (mut tree, section, _) = hello_tree();
    let paragraph = tree.add_paragraph(section, "Total: ").unwrap();
    tree.paragraph_mut(paragraph).unwrap().style = Some("Heading1".to_string());
    let bold = tree.add_formatted_text(paragraph, "42").unwrap();
    tree.formatted_text_mut(bold).unwrap().font_mut().bold = Some(true);
    tree.add_character(paragraph, SymbolName::Tab, 1).unwrap();
    let link = tree
        .add_hyperlink(paragraph, "anchor", HyperlinkType::Local)
        .unwrap();
    tree.add_text(link, "link").unwrap();

    let ddl = object_to_ddl_string(&tree, paragraph).unwrap();
    assert_eq!(
        ddl,
        concat!(
            "\\paragraph\n",
            "[\n",
            "  Style = \"Heading1\"\n",
            "]\n",
            "{\n",
            "  Total: \\bold{42}\\tab \\hyperlink[Name = \"anchor\", Type = Local]{link}\n",
            "}\n",
        )
    );
}

#[test]
fn test_paragraph_break_and_escaping() {
    let mut tree = DocumentTree::new();
    let section = tree.add_section().unwrap();
    let paragraph = tree.add_paragraph(section, "a{b}").unwrap();
    tree.add_character(paragraph, SymbolName::ParaBreak, 1).unwrap();
    tree.add_text(paragraph, "c").unwrap();

    let ddl = object_to_ddl_string(&tree, section).unwrap();
    assert_eq!(ddl, "\\section\n{\n  a\\{b\\}\n\n  c\n}\n");
}

#[test]
fn test_page_setup_and_comment() {
    let (mut tree, section, _) = hello_tree();
    {
        let section = tree.section_mut(section).unwrap();
        section.comment = Some("Intro".to_string());
        let page_setup = section.page_setup_mut();
        page_setup.orientation = Some(Orientation::Landscape);
        page_setup.top_margin = Some(Unit::from_centimeter(2.0));
    }
    let ddl = object_to_ddl_string(&tree, section).unwrap();
    assert_eq!(
        ddl,
        concat!(
            "// Intro\n",
            "\\section\n",
            "[\n",
            "  PageSetup\n",
            "  {\n",
            "    Orientation = Landscape\n",
            "    TopMargin = \"2cm\"\n",
            "  }\n",
            "]\n",
            "{\n",
            "  Hello\n",
            "}\n",
        )
    );

    let config = DdlWriterConfig {
        write_comments: false,
        ..Default::default()
    };
    let bytes = write_ddl_with_config(&tree, Vec::new(), config).unwrap();
    assert!(!String::from_utf8(bytes).unwrap().contains("Intro"));
}

#[test]
fn test_headers_and_footers() {
    let (mut tree, section, _) = hello_tree();
    let header = tree.add_header(section, HeaderFooterIndex::Primary).unwrap();
    tree.add_paragraph(header, "Top").unwrap();
    tree.add_footer(section, HeaderFooterIndex::EvenPage).unwrap();

    let ddl = object_to_ddl_string(&tree, section).unwrap();
    assert_eq!(
        ddl,
        "\\section\n{\n  \\primaryheader\n  {\n    Top\n  }\n  Hello\n}\n"
    );
}

#[test]
fn test_table_output() {
    let (mut tree, section, _) = hello_tree();
    let table = tree.add_table(section).unwrap();
    tree.add_column(table, Unit::from_centimeter(3.0)).unwrap();
    let row = tree.add_row(table).unwrap();
    let cell = tree.row_cell(row, 0).unwrap();
    tree.add_paragraph(cell, "x").unwrap();

    let ddl = object_to_ddl_string(&tree, table).unwrap();
    assert_eq!(
        ddl,
        concat!(
            "\\table\n",
            "{\n",
            "  \\columns\n",
            "  {\n",
            "    \\column\n",
            "    [\n",
            "      Width = \"3cm\"\n",
            "    ]\n",
            "  }\n",
            "  \\rows\n",
            "  {\n",
            "    \\row\n",
            "    {\n",
            "      \\cell\n",
            "      {\n",
            "        x\n",
            "      }\n",
            "    }\n",
            "  }\n",
            "}\n",
        )
    );
}

#[test]
fn test_table_without_columns() {
    let (mut tree, section, _) = hello_tree();
    let table = tree.add_table(section).unwrap();
    let ddl = object_to_ddl_string(&tree, table).unwrap();
    assert!(ddl.starts_with("\\table\n{\n  // Invalid"));
}

#[test]
fn test_row_insert_reindexes_and_serializes() {
    let (mut tree, section, _) = hello_tree();
    let table = tree.add_table(section).unwrap();
    tree.add_column(table, Unit::from_point(50.0)).unwrap();
    let rows: Vec<NodeId> = (0..3).map(|_| tree.add_row(table).unwrap()).collect();

    let inserted = tree.create(Row::default()).unwrap();
    tree.insert(table, CollectionKind::Rows, 0, inserted).unwrap();

    assert_eq!(tree.row(inserted).unwrap().index(), 0);
    for (i, &row) in rows.iter().enumerate() {
        assert_eq!(tree.row(row).unwrap().index(), i + 1);
    }
    assert_eq!(tree.row(inserted).unwrap().cells().len(), 1);

    let ddl = object_to_ddl_string(&tree, table).unwrap();
    assert_eq!(ddl.matches("\\row\n").count(), 4);
    assert_eq!(ddl.matches("\\cell\n").count(), 4);
}

#[test]
fn test_clone_is_independent() {
    let (mut tree, section, paragraph) = hello_tree();
    let copy = tree.clone_subtree(paragraph).unwrap();
    assert_eq!(tree.parent(copy).unwrap(), None);

    let copy_text = tree.paragraph(copy).unwrap().elements()[0];
    tree.text_mut(copy_text).unwrap().content = Some("Changed".to_string());
    tree.add(section, CollectionKind::Elements, copy).unwrap();

    let original = object_to_ddl_string(&tree, paragraph).unwrap();
    assert!(original.contains("Hello"));
    assert!(!original.contains("Changed"));
    assert!(to_ddl_string(&tree).unwrap().contains("Changed"));
}

#[test]
fn test_attach_once() {
    let (mut tree, _, paragraph) = hello_tree();
    let other = tree.add_section().unwrap();
    let err = tree
        .add(other, CollectionKind::Elements, paragraph)
        .unwrap_err();
    assert!(matches!(err, DomError::AlreadyAttached(_)));

    let copy = tree.clone_subtree(paragraph).unwrap();
    tree.add(other, CollectionKind::Elements, copy).unwrap();
    let ddl = to_ddl_string(&tree).unwrap();
    assert_eq!(ddl.matches("Hello").count(), 2);
}

#[test]
fn test_custom_indent() {
    let (tree, _, _) = hello_tree();
    let config = DdlWriterConfig {
        indent: 4,
        ..Default::default()
    };
    let bytes = write_ddl_with_config(&tree, Vec::new(), config).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "\\document\n{\n    \\section\n    {\n        Hello\n    }\n}\n"
    );
}

#[test]
fn test_export_to_file() {
    let (tree, _, _) = hello_tree();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("hello.ddl");
    export_ddl(&tree, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, to_ddl_string(&tree).unwrap());
}
