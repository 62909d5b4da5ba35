//! JSON → plist value conversion.
//!
//! Lets tools that already hold JSON (or build edits as JSON) produce plist
//! text without constructing [`Value`] trees by hand. Object key order from the
//! JSON source is kept, which matters only for keys the annotation tree does
//! not track.

use serde_json::Value as Json;

use crate::error::{PlistError, Result};
use crate::generator::encode;
use crate::options::EncodeOptions;
use crate::value::{Dictionary, Integer, Real, Value};

/// Convert a JSON value into a plist value.
///
/// Integers keep their signedness (`-1` is signed, values above `i64::MAX` are
/// unsigned); every other number becomes a 64-bit real. JSON `null` has no
/// plist form and is rejected.
pub fn from_json(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Err(PlistError::Encode("null has no property list representation".to_string())),
        Json::Bool(b) => Ok(Value::Boolean(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Integer(Integer::signed(i)));
            }
            if let Some(u) = n.as_u64() {
                return Ok(Value::Integer(Integer::unsigned(u)));
            }
            match n.as_f64() {
                Some(f) => Ok(Value::Real(Real::wide(f))),
                None => Err(PlistError::Encode(format!("unrepresentable number: {}", n))),
            }
        }
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => items.iter().map(from_json).collect::<Result<Vec<_>>>().map(Value::Array),
        Json::Object(map) => {
            let mut dict = Dictionary::new();
            for (key, value) in map {
                dict.insert(key.as_str(), from_json(value)?);
            }
            Ok(Value::Dictionary(dict))
        }
    }
}

/// Parse a JSON string and encode it as plist text.
///
/// ```
/// use plist_text::{encode_json, EncodeOptions};
/// let text = encode_json(r#"{"b":true,"a":[1,2]}"#, &EncodeOptions::gnustep()).unwrap();
/// assert_eq!(text, "{a=(<*I1>,<*I2>,);b=<*BY>;}");
/// ```
pub fn encode_json(json: &str, options: &EncodeOptions) -> Result<String> {
    let parsed: Json = serde_json::from_str(json)?;
    let value = from_json(&parsed)?;
    encode(&value, options)
}
