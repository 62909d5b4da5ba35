//! Encode settings: dialect, indentation, UID leniency.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quote::{CharacterSet, GNUSTEP_QUOTABLE, OPENSTEP_QUOTABLE};

/// Text dialect to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Untyped scalars: `1`, `0`, `42`, quoted dates.
    #[default]
    OpenStep,
    /// Typed scalars: `<*BY>`, `<*I42>`, `<*D...>`.
    GnuStep,
}

impl Format {
    pub fn quotable(self) -> &'static CharacterSet {
        match self {
            Format::OpenStep => &OPENSTEP_QUOTABLE,
            Format::GnuStep => &GNUSTEP_QUOTABLE,
        }
    }
}

/// Settings for one encode call.
///
/// An empty `indent` gives compact output (`{a=1;}`); anything else
/// pretty-prints one entry per line, repeating `indent` per depth.
///
/// ```
/// use plist_text::{EncodeOptions, Format};
/// let opts = EncodeOptions::from_json(r#"{"format":"gnustep","indent":"\t"}"#).unwrap();
/// assert_eq!(opts.format, Format::GnuStep);
/// assert!(!opts.lax);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub format: Format,
    pub indent: String,
    /// UID recognition rule for [`Value::as_uid`](crate::Value::as_uid): also
    /// accept decimal strings in `CF$UID` dictionaries. Never changes the
    /// encoded text; dictionaries are written as they are.
    pub lax: bool,
}

impl EncodeOptions {
    pub fn openstep() -> Self {
        Self {
            format: Format::OpenStep,
            ..Self::default()
        }
    }

    pub fn gnustep() -> Self {
        Self {
            format: Format::GnuStep,
            ..Self::default()
        }
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn lax(mut self, lax: bool) -> Self {
        self.lax = lax;
        self
    }

    /// Load settings from a JSON object; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
