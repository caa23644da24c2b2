//! Escaping of free text, string literals and attribute values

use ddl_model::{Unit, UnitType, Value};

/// Encode paragraph text. Braces and backslashes are escaped, every `/`
/// followed by another `/` is escaped so no comment can start, tabs and
/// line breaks become keywords.
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '/' if chars.peek() == Some(&'/') => out.push_str("\\/"),
            '\t' => out.push_str("\\tab "),
            '\r' => {}
            '\n' => out.push_str("\\linebreak "),
            other => out.push(other),
        }
    }
    out
}

/// Quote a string literal, escaping `\` and `"` and a leading `//`
pub fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let body = match text.strip_prefix("//") {
        Some(rest) => {
            out.push_str("\\//");
            rest
        }
        None => text,
    };
    for c in body.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Quote a style name when it contains blanks
pub fn style_name(name: &str) -> String {
    if name.chars().any(char::is_whitespace) {
        quote_string(name)
    } else {
        name.to_string()
    }
}

/// Points are written as bare numbers, other units quoted with suffix
pub fn format_unit(unit: Unit) -> String {
    match unit.unit_type() {
        Some(UnitType::Point) => unit.value().to_string(),
        _ => quote_string(&unit.to_string()),
    }
}

/// Format an attribute value for `Name = value`
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(v) => quote_string(v),
        Value::Unit(v) => format_unit(*v),
        Value::Color(v) => v.to_string(),
        Value::Enum(v) => v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddl_model::Color;
    use proptest::prelude::*;

    /// Whether `text` holds a brace or a `//` that a reader would take as
    /// markup rather than literal text
    fn has_bare_markup(text: &str) -> bool {
        let mut chars = text.chars();
        let mut previous_slash = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                    previous_slash = false;
                }
                '{' | '}' => return true,
                '/' if previous_slash => return true,
                '/' => previous_slash = true,
                _ => previous_slash = false,
            }
        }
        false
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("plain"), "plain");
        assert_eq!(encode_text("a{b}c"), "a\\{b\\}c");
        assert_eq!(encode_text("back\\slash"), "back\\\\slash");
        assert_eq!(encode_text("http://x"), "http:\\//x");
        assert_eq!(encode_text("a///b"), "a\\/\\//b");
        assert_eq!(encode_text("a\tb"), "a\\tab b");
        assert_eq!(encode_text("a\r\nb"), "a\\linebreak b");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("Arial"), "\"Arial\"");
        assert_eq!(quote_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_string("C:\\dir"), "\"C:\\\\dir\"");
        assert_eq!(quote_string("//note"), "\"\\//note\"");
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_value(&Value::Bool(false)), "false");
        assert_eq!(format_value(&Value::Double(1.5)), "1.5");
        assert_eq!(format_value(&Value::Unit(Unit::from_point(12.0))), "12");
        assert_eq!(
            format_value(&Value::Unit(Unit::from_centimeter(2.5))),
            "\"2.5cm\""
        );
        assert_eq!(format_value(&Value::Enum("Center".into())), "Center");
        assert_eq!(format_value(&Value::Color(Color::from_rgb(255, 0, 0))), "Red");
    }

    #[test]
    fn test_style_name_quoting() {
        assert_eq!(style_name("Heading1"), "Heading1");
        assert_eq!(style_name("My Style"), "\"My Style\"");
    }

    proptest! {
        #[test]
        fn prop_encoded_text_has_no_bare_markup(text in "[a-z /{}\\\\\t\n]{0,40}") {
            let encoded = encode_text(&text);
            prop_assert!(!has_bare_markup(&encoded), "{:?} -> {:?}", text, encoded);
            prop_assert!(!encoded.contains('\t') && !encoded.contains('\n'));
        }

        #[test]
        fn prop_quoted_string_is_one_literal(text in "[a-z /\\\\\"]{0,40}") {
            let quoted = quote_string(&text);
            let body = &quoted[1..quoted.len() - 1];
            prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));
            prop_assert!(!body.starts_with("//"));
            let mut chars = body.chars();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => prop_assert!(matches!(chars.next(), Some('\\' | '"' | '/'))),
                    '"' => prop_assert!(false, "bare quote in {:?}", quoted),
                    _ => {}
                }
            }
        }
    }
}
