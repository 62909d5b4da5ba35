//! OpenStep / GNUstep text generator.
//!
//! Walks a [`Value`] tree depth-first and writes it to any [`io::Write`]. When
//! annotation nodes are supplied, dictionaries are written in their original
//! order with their comments (see [`reconcile`]); otherwise keys are sorted.
//!
//! All dialect differences live in [`TextGenerator::write_value`]:
//!
//! | Value   | OpenStep        | GNUstep          |
//! |---------|-----------------|------------------|
//! | Integer | `42`            | `<*I42>`         |
//! | Real    | `1.5`           | `<*R1.5>`        |
//! | Boolean | `1` / `0`       | `<*BY>` / `<*BN>`|
//! | Date    | `"2001-01-01 00:00:00 +0000"` | `<*D2001-01-01 00:00:00 +0000>` |
//! | Data    | `<deadbeef 01>` | same             |
//! | UID     | `{CF$UID = 5;}` | `{CF$UID = <*I5>;}` |
//!
//! # Example
//! ```
//! use plist_text::{encode, Dictionary, EncodeOptions, Value};
//!
//! let mut dict = Dictionary::new();
//! dict.insert("name", Value::from("App"));
//! dict.insert("enabled", Value::from(true));
//! let text = encode(&Value::from(dict), &EncodeOptions::openstep()).unwrap();
//! assert_eq!(text, "{enabled=1;name=App;}");
//! ```

use std::io;

use chrono::{DateTime, Utc};

use crate::error::{PlistError, Result};
use crate::meta::{node_for_string, reconcile, Entry, KeyedNode, Meta, Node};
use crate::options::{EncodeOptions, Format};
use crate::quote::{quote_with, CharacterSet};
use crate::value::{Dictionary, Value};

/// Timestamp layout shared by both dialects. Dates are always written in UTC.
const DATE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Encode `value` with sorted dictionary keys and no comments.
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    encode_with_meta(value, None, options)
}

/// Encode `value`, reproducing the order and comments recorded in `meta`.
pub fn encode_with_meta(value: &Value, meta: Option<&Meta>, options: &EncodeOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_document(&mut buf, value, meta, options)?;
    String::from_utf8(buf).map_err(|e| PlistError::Encode(e.to_string()))
}

/// Write `value` to `writer`. Stops at the first write failure; output already
/// written is left in place.
pub fn write_document<W: io::Write>(
    writer: W,
    value: &Value,
    meta: Option<&Meta>,
    options: &EncodeOptions,
) -> Result<()> {
    let mut generator = TextGenerator::with_options(writer, options);
    generator.generate_document(value, meta)
}

/// Cursor state for one encode pass.
///
/// Holds the writer and current depth, so a generator must not be shared
/// between concurrent encodes.
pub struct TextGenerator<W> {
    writer: W,
    format: Format,
    quotable: &'static CharacterSet,
    indent: String,
    depth: usize,
    kv_delimiter: &'static str,
}

impl<W: io::Write> TextGenerator<W> {
    /// Compact generator for `format`.
    pub fn new(writer: W, format: Format) -> Self {
        Self {
            writer,
            format,
            quotable: format.quotable(),
            indent: String::new(),
            depth: 0,
            kv_delimiter: "=",
        }
    }

    pub fn with_options(writer: W, options: &EncodeOptions) -> Self {
        let mut generator = Self::new(writer, options.format);
        generator.set_indent(&options.indent);
        generator
    }

    /// Empty switches to compact output; anything else pretty-prints.
    pub fn set_indent(&mut self, indent: &str) {
        self.indent = indent.to_string();
        self.kv_delimiter = if indent.is_empty() { "=" } else { " = " };
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a whole document. The first node of `meta` is the document root;
    /// its children annotate the root value.
    pub fn generate_document(&mut self, value: &Value, meta: Option<&Meta>) -> Result<()> {
        let nodes = meta.map(Meta::root_siblings).unwrap_or(&[]);
        tracing::debug!(
            format = ?self.format,
            pretty = !self.indent.is_empty(),
            annotated = !nodes.is_empty(),
            "generating {} document",
            value.type_name()
        );
        self.write_value(value, nodes)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write one value. `nodes` are the annotation siblings in scope: for a
    /// dictionary they drive reconciliation, for a string they supply its
    /// inline comment.
    pub fn write_value(&mut self, value: &Value, nodes: &[Node]) -> Result<()> {
        match value {
            Value::Dictionary(dict) => self.write_dictionary(dict, nodes),
            Value::Array(items) => self.write_array(items, nodes),
            Value::String(s) => {
                let token = self.token(s, node_for_string(nodes, s));
                self.write_str(&token)
            }
            Value::Integer(int) => self.write_typed("<*I", &int.to_decimal()),
            Value::Real(real) => self.write_typed("<*R", &format_real(real.value)),
            Value::Boolean(b) => match (self.format, *b) {
                (Format::GnuStep, true) => self.write_str("<*BY>"),
                (Format::GnuStep, false) => self.write_str("<*BN>"),
                (Format::OpenStep, true) => self.write_str("1"),
                (Format::OpenStep, false) => self.write_str("0"),
            },
            Value::Data(bytes) => {
                let hex = format_data(bytes);
                self.write_str(&hex)
            }
            Value::Date(date) => {
                let stamp = format_date(date);
                match self.format {
                    Format::GnuStep => {
                        self.write_str("<*D")?;
                        self.write_str(&stamp)?;
                        self.write_str(">")
                    }
                    Format::OpenStep => {
                        let token = quote_with(&stamp, self.quotable);
                        self.write_str(&token)
                    }
                }
            }
            Value::Uid(uid) => self.write_dictionary(&uid.to_dict(), &[]),
            Value::Comment(text) => self.write_comment(text),
        }
    }

    fn write_dictionary(&mut self, dict: &Dictionary, nodes: &[Node]) -> Result<()> {
        self.write_str("{")?;
        self.depth += 1;
        if nodes.is_empty() {
            for (key, value) in dict.sorted_entries() {
                self.write_entry(key, value, None)?;
            }
        } else {
            for entry in reconcile(dict, nodes) {
                match entry {
                    Entry::Comment(text) => self.write_comment(text)?,
                    Entry::Pair { key, value, node } => self.write_entry(key, value, node)?,
                }
            }
        }
        self.depth -= 1;
        self.write_indent()?;
        self.write_str("}")
    }

    fn write_entry(&mut self, key: &str, value: &Value, node: Option<&KeyedNode>) -> Result<()> {
        self.write_indent()?;
        let token = self.token(key, node);
        self.write_str(&token)?;
        self.write_str(self.kv_delimiter)?;
        let children = node.map(|n| n.children.as_slice()).unwrap_or(&[]);
        self.write_value(value, children)?;
        self.write_str(";")
    }

    fn write_array(&mut self, items: &[Value], nodes: &[Node]) -> Result<()> {
        self.write_str("(")?;
        self.depth += 1;
        for item in items {
            self.write_indent()?;
            self.write_value(item, nodes)?;
            self.write_str(",")?;
        }
        self.depth -= 1;
        self.write_indent()?;
        self.write_str(")")
    }

    fn write_comment(&mut self, text: &str) -> Result<()> {
        self.write_str("\n")?;
        self.write_str(text)?;
        self.write_str("\n")
    }

    /// Scalars that GNUstep wraps in a type tag: `<*I42>`, `<*R1.5>`.
    fn write_typed(&mut self, tag: &str, digits: &str) -> Result<()> {
        match self.format {
            Format::GnuStep => {
                self.write_str(tag)?;
                self.write_str(digits)?;
                self.write_str(">")
            }
            Format::OpenStep => self.write_str(digits),
        }
    }

    /// Quoted token followed by the node's inline comments.
    fn token(&self, s: &str, node: Option<&KeyedNode>) -> String {
        let mut token = quote_with(s, self.quotable);
        if let Some(node) = node {
            for annotation in &node.annotations {
                token.push(' ');
                token.push_str(annotation);
            }
        }
        token
    }

    fn write_indent(&mut self) -> Result<()> {
        if self.indent.is_empty() {
            return Ok(());
        }
        self.writer.write_all(b"\n")?;
        for _ in 0..self.depth {
            self.writer.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Shortest decimal that reads back as the same `f64`.
///
/// Exponent form is used when the decimal exponent is below -4 or at least 6,
/// with a signed, two-digit minimum exponent (`1e+06`, `2.5e-07`).
pub(crate) fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let sci = format!("{:e}", value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return format!("{}", value);
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= 6 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    } else {
        format!("{}", value)
    }
}

/// `<` + 4-byte hex groups separated by single spaces + `>`.
pub(crate) fn format_data(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + bytes.len() / 4 + 2);
    out.push('<');
    for (i, group) in bytes.chunks(4).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        for b in group {
            out.push(HEX_DIGITS[(b >> 4) as usize] as char);
            out.push(HEX_DIGITS[(b & 0x0F) as usize] as char);
        }
    }
    out.push('>');
    out
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_LAYOUT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_formatting() {
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(-0.0), "-0");
        assert_eq!(format_real(1.5), "1.5");
        assert_eq!(format_real(123456.0), "123456");
        assert_eq!(format_real(1e6), "1e+06");
        assert_eq!(format_real(1234567.0), "1.234567e+06");
        assert_eq!(format_real(0.0001), "0.0001");
        assert_eq!(format_real(0.00001), "1e-05");
        assert_eq!(format_real(-2.5e-7), "-2.5e-07");
        assert_eq!(format_real(1e300), "1e+300");
        assert_eq!(format_real(f64::NAN), "NaN");
        assert_eq!(format_real(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn data_grouping() {
        assert_eq!(format_data(&[]), "<>");
        assert_eq!(format_data(&[0xde, 0xad, 0xbe, 0xef]), "<deadbeef>");
        assert_eq!(format_data(&[0xde, 0xad, 0xbe, 0xef, 0x01]), "<deadbeef 01>");
        assert_eq!(format_data(&[0, 1, 2, 3, 4, 5, 6, 7, 8]), "<00010203 04050607 08>");
    }

    #[test]
    fn date_layout_is_utc() {
        let date = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(format_date(&date), "1970-01-01 00:00:00 +0000");
    }
}
