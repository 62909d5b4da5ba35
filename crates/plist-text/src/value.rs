//! Property list value model.
//!
//! Every renderable plist value is a [`Value`]. Dictionaries keep the key order
//! they were built with; the generator decides the order actually written
//! (sorted, or reconciled against an annotation tree).
//!
//! The model also carries the two capabilities uniquing needs:
//! [`Value::type_name`] and [`Value::identity_key`].

use chrono::{DateTime, Utc};

/// Key of the single-entry dictionary that stands in for a UID in text plists.
pub const CF_UID_KEY: &str = "CF$UID";

/// A property list value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Dictionary(Dictionary),
    Array(Vec<Value>),
    String(String),
    Integer(Integer),
    Real(Real),
    Boolean(bool),
    Data(Vec<u8>),
    Date(DateTime<Utc>),
    Uid(Uid),
    /// Free-form comment text. Written verbatim, never treated as data.
    Comment(String),
}

/// An integer stored as its 64-bit magnitude plus a signedness flag.
///
/// Signed integers are the two's-complement bits of an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    pub value: u64,
    pub signed: bool,
}

impl Integer {
    pub fn signed(value: i64) -> Self {
        Self {
            value: value as u64,
            signed: true,
        }
    }

    pub fn unsigned(value: u64) -> Self {
        Self {
            value,
            signed: false,
        }
    }

    /// Decimal text, honouring the signedness flag.
    pub fn to_decimal(self) -> String {
        if self.signed {
            (self.value as i64).to_string()
        } else {
            self.value.to_string()
        }
    }
}

/// A floating point number. `wide` records whether the source was 64-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Real {
    pub value: f64,
    pub wide: bool,
}

impl Real {
    pub fn wide(value: f64) -> Self {
        Self { value, wide: true }
    }

    pub fn narrow(value: f32) -> Self {
        Self {
            value: value as f64,
            wide: false,
        }
    }
}

/// An opaque 64-bit object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(pub u64);

impl Uid {
    /// The `{CF$UID = n;}` dictionary form used by text dialects.
    pub fn to_dict(self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert(CF_UID_KEY, Value::Integer(Integer::unsigned(self.0)));
        dict
    }
}

/// String-keyed mapping with unique keys.
///
/// Entries are kept in insertion order; re-inserting an existing key replaces
/// its value in place. Lookups are linear, which is fine for the entry counts
/// found in project files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(String, Value)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove `key`, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in dictionary (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries sorted by key, byte-wise ascending. This is the order written
    /// when no annotation tree governs the dictionary.
    pub fn sorted_entries(&self) -> Vec<(&str, &Value)> {
        let mut sorted: Vec<(&str, &Value)> = self.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
    }

    /// If this dictionary is the text form of a UID, return it.
    ///
    /// The canonical form is a sole `CF$UID` entry holding an integer. With
    /// `lax`, a decimal string in that slot is accepted too, since OpenStep
    /// text has no integer syntax distinct from strings.
    pub fn as_uid(&self, lax: bool) -> Option<Uid> {
        if self.entries.len() != 1 {
            return None;
        }
        let (key, value) = &self.entries[0];
        if key != CF_UID_KEY {
            return None;
        }
        match value {
            Value::Integer(int) => Some(Uid(int.value)),
            Value::String(s) if lax && !s.bytes().all(|b| b.is_ascii_digit()) => {
                tracing::trace!("CF$UID string {:?} is not a UID", s);
                None
            }
            Value::String(s) if lax => match s.parse::<u64>() {
                Ok(id) => Some(Uid(id)),
                Err(err) => {
                    tracing::trace!("CF$UID string {:?} is not a UID: {}", s, err);
                    None
                }
            },
            _ => None,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// Equality/deduplication key for a value.
///
/// Containers compare by address and are never merged by content. Data is
/// compared by CRC-32, so two different byte strings may collide; a false match
/// only means a shared object in a uniqued encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Container(usize),
    String(String),
    Signed(i64),
    Unsigned(u64),
    Real64(u64),
    Real32(u32),
    Boolean(bool),
    Data(u32),
    Date(DateTime<Utc>),
    Uid(u64),
    Comment(String),
}

impl Value {
    /// Stable name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Dictionary(_) => "dictionary",
            Value::Array(_) => "array",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Boolean(_) => "boolean",
            Value::Data(_) => "data",
            Value::Date(_) => "date",
            Value::Uid(_) => "UID",
            Value::Comment(_) => "comment",
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        match self {
            Value::Dictionary(_) | Value::Array(_) => {
                IdentityKey::Container(self as *const Value as usize)
            }
            Value::String(s) => IdentityKey::String(s.clone()),
            Value::Integer(int) if int.signed => IdentityKey::Signed(int.value as i64),
            Value::Integer(int) => IdentityKey::Unsigned(int.value),
            Value::Real(real) if real.wide => IdentityKey::Real64(real.value.to_bits()),
            Value::Real(real) => IdentityKey::Real32((real.value as f32).to_bits()),
            Value::Boolean(b) => IdentityKey::Boolean(*b),
            Value::Data(bytes) => IdentityKey::Data(crc32fast::hash(bytes)),
            Value::Date(date) => IdentityKey::Date(*date),
            Value::Uid(uid) => IdentityKey::Uid(uid.0),
            Value::Comment(text) => IdentityKey::Comment(text.clone()),
        }
    }

    /// Borrowing form of [`Value::as_uid`].
    pub fn uid(&self, lax: bool) -> Option<Uid> {
        match self {
            Value::Uid(uid) => Some(*uid),
            Value::Dictionary(dict) => dict.as_uid(lax),
            _ => None,
        }
    }

    /// Turn a `CF$UID` dictionary into a [`Value::Uid`]. Anything else,
    /// including a lax string that fails to parse, is returned unchanged.
    pub fn as_uid(self, lax: bool) -> Value {
        match self.uid(lax) {
            Some(uid) => Value::Uid(uid),
            None => self,
        }
    }

    /// Inverse of [`Value::as_uid`]: a UID becomes its `CF$UID` dictionary.
    pub fn uid_to_dict(self) -> Value {
        match self {
            Value::Uid(uid) => Value::Dictionary(uid.to_dict()),
            other => other,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Value::Dictionary(dict)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(Integer::signed(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(Integer::unsigned(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(Real::wide(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl From<Uid> for Value {
    fn from(uid: Uid) -> Self {
        Value::Uid(uid)
    }
}
