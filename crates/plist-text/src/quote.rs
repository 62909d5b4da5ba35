//! String quoting for the text dialects.
//!
//! A token is written bare unless it is empty, contains a byte from the
//! dialect's quotable set, or contains anything outside ASCII.

use crate::options::Format;

/// 256-bit membership table over byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSet([u64; 4]);

impl CharacterSet {
    /// Every byte except the listed ones.
    const fn all_except(unquoted: &[u8]) -> Self {
        let mut bits = [u64::MAX; 4];
        let mut i = 0;
        while i < unquoted.len() {
            let b = unquoted[i] as usize;
            bits[b / 64] &= !(1u64 << (b % 64));
            i += 1;
        }
        CharacterSet(bits)
    }

    pub const fn contains_byte(&self, b: u8) -> bool {
        self.0[(b / 64) as usize] & (1u64 << (b % 64)) != 0
    }
}

/// Bytes that force quoting in OpenStep output.
pub const OPENSTEP_QUOTABLE: CharacterSet = CharacterSet::all_except(
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_$/:.-",
);

/// Bytes that force quoting in GNUstep output.
pub const GNUSTEP_QUOTABLE: CharacterSet =
    CharacterSet::all_except(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_$./");

/// Quote `s` for the given dialect.
///
/// ```
/// use plist_text::{quote, Format};
/// assert_eq!(quote("abc", Format::OpenStep), "abc");
/// assert_eq!(quote("", Format::OpenStep), "\"\"");
/// assert_eq!(quote("a b", Format::OpenStep), "\"a b\"");
/// ```
pub fn quote(s: &str, format: Format) -> String {
    quote_with(s, format.quotable())
}

pub(crate) fn quote_with(s: &str, quotable: &CharacterSet) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }

    let mut out = String::with_capacity(s.len() + 2);
    let mut quoted = false;
    for ch in s.chars() {
        let code = ch as u32;
        if code > 0xFF {
            quoted = true;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str("\\U");
                push_digits(&mut out, u32::from(*unit), 4, 4);
            }
        } else if code > 0x7F {
            quoted = true;
            out.push('\\');
            push_digits(&mut out, code, 3, 3);
        } else {
            let b = code as u8;
            if quotable.contains_byte(b) {
                quoted = true;
            }
            match b {
                0x07 => out.push_str("\\a"),
                0x08 => out.push_str("\\b"),
                0x0B => out.push_str("\\v"),
                0x0C => out.push_str("\\f"),
                b'\\' => out.push_str("\\\\"),
                b'"' => out.push_str("\\\""),
                _ => out.push(ch),
            }
        }
    }

    if quoted {
        out.insert(0, '"');
        out.push('"');
    }
    out
}

/// Fixed-width digits of `value`, `bits` per digit (3 = octal, 4 = hex).
fn push_digits(out: &mut String, value: u32, width: u32, bits: u32) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mask = (1 << bits) - 1;
    for i in (0..width).rev() {
        out.push(DIGITS[((value >> (i * bits)) & mask) as usize] as char);
    }
}
