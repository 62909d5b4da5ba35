//! # plist-text
//!
//! Comment-preserving writer for the textual **OpenStep** and **GNUstep**
//! property list dialects, the format of Xcode `project.pbxproj` files.
//!
//! A decoder (not part of this crate) produces two trees from source text: the
//! [`Value`] tree holding the data, and a [`Meta`] annotation tree recording
//! key order and comments. Callers edit the value tree, then hand both trees to
//! the generator, which writes untouched structure exactly as it was and
//! appends new keys after the ones it knows about.
//!
//! ## Quick start
//!
//! ```rust
//! use plist_text::{encode_with_meta, Dictionary, EncodeOptions, KeyedNode, Meta, Node, Value};
//!
//! let mut root = Dictionary::new();
//! root.insert("rootObject", Value::from("AB12"));
//! root.insert("archiveVersion", Value::from("1"));
//!
//! let meta = Meta::with_root(vec![
//!     Node::keyed("archiveVersion"),
//!     Node::comment("/* objects */"),
//!     KeyedNode::new("rootObject")
//!         .with_child(KeyedNode::new("AB12").with_annotation("/* Project object */"))
//!         .into(),
//! ]);
//!
//! let text = encode_with_meta(&Value::from(root), Some(&meta), &EncodeOptions::openstep()).unwrap();
//! assert_eq!(text, "{archiveVersion=1;\n/* objects */\nrootObject=AB12 /* Project object */;}");
//! ```
//!
//! ## Modules
//!
//! - [`value`] — plist value model, UID transform, identity keys
//! - [`meta`] — annotation tree and dictionary reconciliation
//! - [`generator`] — OpenStep / GNUstep text generator
//! - [`quote`] — dialect quoting tables and string escaping
//! - [`options`] — `Format` and `EncodeOptions`
//! - [`json`] — JSON → plist value bridge
//! - [`error`] — error type

pub mod error;
pub mod generator;
pub mod json;
pub mod meta;
pub mod options;
pub mod quote;
pub mod value;

pub use error::PlistError;
pub use generator::{encode, encode_with_meta, write_document, TextGenerator};
pub use json::{encode_json, from_json};
pub use meta::{reconcile, Entry, KeyedNode, Meta, Node};
pub use options::{EncodeOptions, Format};
pub use quote::quote;
pub use value::{Dictionary, IdentityKey, Integer, Real, Uid, Value, CF_UID_KEY};
