//! Attribute diffing and composite value blocks
//!
//! A value is written when it is set on the object and the reference
//! object (a base style, the built-in defaults, ...) does not hold the same
//! value. Without a reference every set value is written.

use crate::error::DdlResult;
use crate::serializer::Serializer;
use ddl_model::{Borders, ParagraphFormat, Values};
use std::io::Write;

fn as_values<T: Values>(value: Option<&T>) -> Option<&dyn Values> {
    value.map(|v| v as &dyn Values)
}

/// Write `Name = value` for every plain value of `own` that differs from
/// `reference`; names in `skip` are left to the caller
pub fn write_values<W: Write>(
    s: &mut Serializer<W>,
    own: &dyn Values,
    reference: Option<&dyn Values>,
    skip: &[&str],
) -> DdlResult<()> {
    for name in own.value_names() {
        if skip.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            continue;
        }
        let Some(value) = own.get_value(name)? else {
            continue;
        };
        let inherited = match reference {
            Some(reference) => reference.get_value(name)?,
            None => None,
        };
        if inherited.as_ref() != Some(&value) {
            s.write_simple_attribute(name, &value);
        }
    }
    Ok(())
}

/// Write a composite holding only plain values as `Name { ... }`
pub fn write_object<W: Write, T: Values>(
    s: &mut Serializer<W>,
    name: &str,
    own: Option<&T>,
    reference: Option<&T>,
) -> DdlResult<()> {
    let Some(own) = own else {
        return Ok(());
    };
    let token = s.begin_content_named(name)?;
    write_values(s, own, as_values(reference), &[])?;
    s.end_content(token)?;
    Ok(())
}

/// Write borders; cleared borders are written as `Name = null`
pub fn write_borders<W: Write>(
    s: &mut Serializer<W>,
    name: &str,
    own: Option<&Borders>,
    reference: Option<&Borders>,
) -> DdlResult<()> {
    let Some(own) = own else {
        return Ok(());
    };
    if own.clear_all {
        s.close_up_line();
        s.write_line(&format!("{} = null", name));
        return Ok(());
    }
    let token = s.begin_content_named(name)?;
    write_values(s, own, as_values(reference), &[])?;
    let inherited = reference.map(Borders::edges);
    for (i, (edge, border)) in own.edges().into_iter().enumerate() {
        let reference_edge = inherited.and_then(|edges| edges[i].1);
        write_object(s, edge, border, reference_edge)?;
    }
    s.end_content(token)?;
    Ok(())
}

/// Write a paragraph format. Styles write their font separately and pass
/// `include_font = false`.
pub fn write_paragraph_format<W: Write>(
    s: &mut Serializer<W>,
    name: &str,
    own: Option<&ParagraphFormat>,
    reference: Option<&ParagraphFormat>,
    include_font: bool,
) -> DdlResult<()> {
    let Some(own) = own else {
        return Ok(());
    };
    let token = s.begin_content_named(name)?;
    write_values(s, own, as_values(reference), &[])?;
    if include_font {
        write_object(
            s,
            "Font",
            own.font.as_ref(),
            reference.and_then(|r| r.font.as_ref()),
        )?;
    }
    write_borders(
        s,
        "Borders",
        own.borders.as_ref(),
        reference.and_then(|r| r.borders.as_ref()),
    )?;
    write_object(
        s,
        "Shading",
        own.shading.as_ref(),
        reference.and_then(|r| r.shading.as_ref()),
    )?;
    s.end_content(token)?;
    Ok(())
}
