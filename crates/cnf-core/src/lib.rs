//! # cnf-core
//!
//! Lossless, format-preserving parser and serializer for **OpenSSL-style
//! configuration files** (`openssl.cnf` and friends).
//!
//! Parsing captures every character of the input (spacing around `=`, the
//! inside of `[ section ]` headers, comments, blank runs, line endings) into a
//! tree of raw fragments. The tree can be searched and edited, and serializing
//! it reproduces untouched regions byte for byte.
//!
//! ## Quick start
//!
//! ```rust
//! use cnf_core::{serialize, Document, KeyValue, Section, Whitespace};
//!
//! let text = "# defaults\n[req]\nCN = test\n";
//! let mut doc = Document::parse(text).unwrap();
//! assert_eq!(serialize(&doc), text);
//!
//! let req = doc.get_section("req").unwrap();
//! assert_eq!(req.get_kvp("CN").unwrap().value, "test");
//!
//! let mut engine = Section::new("engine_sect");
//! engine.append(Whitespace::new("\n").unwrap());
//! engine.append(KeyValue::new("gost", "gost_sect"));
//! doc.append(engine);
//! doc.ensure_last_new_line("\n").unwrap();
//! assert!(serialize(&doc).ends_with("[engine_sect]\ngost=gost_sect\n"));
//! ```
//!
//! ## Modules
//!
//! - [`node`] — node kinds (`Whitespace`, `Comment`, `KeyValue`, `Section`, `Directive`)
//! - [`scanner`] — character stream → tokens
//! - [`document`] — token assembly, lookups, and edits
//! - [`serializer`] — tree → exact source text
//! - [`io`] — load from / dump to files and streams
//! - [`error`] — error types

pub mod document;
pub mod error;
pub mod io;
pub mod node;
pub mod scanner;
pub mod serializer;

pub use document::{parse_chars, Document};
pub use error::CnfError;
pub use io::{dump, from_reader, load, load_with, write_to};
pub use node::{Comment, Directive, KeyValue, Node, Section, Whitespace};
pub use scanner::{ParseOptions, Scanner};
pub use serializer::{serialize, serialize_node};
