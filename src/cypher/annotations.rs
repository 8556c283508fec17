//! Serialization of a construct's annotations into the `annotations`
//! property value.
//!
//! The payload is a single-line JSON array of objects with keys in the order
//! `construct, relation, value, source`, using `", "` and `": "` separators
//! and `\uXXXX` escapes for non-ASCII text. Scripts already loaded into a
//! store carry exactly this shape, so re-running an export against them
//! leaves the property byte-for-byte unchanged.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::model::Annotation;

/// JSON formatter with spaced separators and ASCII-only output
/// (everything outside printable ASCII becomes a `\uXXXX` escape).
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut rest = fragment;
        while let Some(pos) = rest.find(|c: char| !c.is_ascii() || c == '\x7f') {
            writer.write_all(rest[..pos].as_bytes())?;
            let ch = rest[pos..].chars().next().unwrap_or_default();
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            rest = &rest[pos + ch.len_utf8()..];
        }
        writer.write_all(rest.as_bytes())
    }
}

/// Render a list of annotations as the `annotations` property payload.
///
/// The result is raw JSON; literal escaping happens when it is embedded.
pub fn annotations_json(annotations: &[&Annotation]) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    annotations.serialize(&mut ser)?;
    // The formatter only ever writes ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
