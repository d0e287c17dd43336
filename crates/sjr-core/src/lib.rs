//! # sjr-core
//!
//! In-memory document model for **SJR**, a small JSON-like text format.
//!
//! A document is a tree of [`Node`]s: bools, integers, floats, strings,
//! single-line arrays and tab-indented objects. Objects always keep their
//! keys in lexicographic order. Accessors create missing keys and indices on
//! demand, so trees can be built without declaring intermediate containers.
//!
//! ## Quick start
//!
//! ```rust
//! use sjr_core::{parse, render, Kind};
//!
//! let mut doc = parse(r#"{"name": "sjr", "tags": [1, 2]}"#).unwrap();
//! doc["tags"][2].set_value(3);
//! doc["enabled"].set_value(true);
//!
//! assert_eq!(doc["tags"].kind(), Kind::Array);
//! assert_eq!(
//!     render(&doc).unwrap(),
//!     "{\n\t\"enabled\": true,\n\t\"name\": \"sjr\",\n\t\"tags\": [1, 2, 3]\n}"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`node`] — `Node` tree, `Kind`, `Scalar`, typed value access
//! - [`parser`] — text → `Node` (`parse`, `ParseOptions`)
//! - [`writer`] — `Node` → text (`render`)
//! - [`io`] — file and reader/writer load/save
//! - [`json`] — `serde` / `serde_json` interop
//! - [`error`] — `SjrError` and offset diagnostics

pub mod error;
pub mod io;
pub mod json;
pub mod node;
pub mod parser;
pub mod writer;

pub use error::{line_col, Result, SjrError};
pub use io::{load, load_from, load_with, parse_bytes, save, save_to};
pub use node::{FromNode, Kind, Node, Scalar};
pub use parser::{parse, parse_with, ParseOptions, DEFAULT_MAX_DEPTH};
pub use writer::{format_float, render};
