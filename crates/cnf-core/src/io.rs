//! Loading and persisting configuration files.
//!
//! Files are read as UTF-8 and scanned front to back exactly once. Writing
//! replaces the target file with the serialized tree.

use crate::document::{parse_chars, Document};
use crate::error::Result;
use crate::scanner::ParseOptions;
use crate::serializer::serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Parse the file at `path` with the default (strict) options.
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    load_with(path, ParseOptions::default())
}

pub fn load_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading config");
    let file = fs::File::open(path)?;
    from_reader(file, options)
}

/// Parse UTF-8 text from any reader.
pub fn from_reader(mut reader: impl Read, options: ParseOptions) -> Result<Document> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_chars(text.chars(), options)
}

/// Serialize `doc` and overwrite the file at `path`.
pub fn dump(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing config");
    let file = fs::File::create(path)?;
    write_to(doc, file)
}

/// Serialize `doc` into any writer.
pub fn write_to(doc: &Document, mut writer: impl Write) -> Result<()> {
    writer.write_all(serialize(doc).as_bytes())?;
    writer.flush()?;
    Ok(())
}

impl Document {
    /// See [`load`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load(path)
    }

    /// See [`dump`].
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        dump(self, path)
    }
}
