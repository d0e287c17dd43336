//! Load/save glue between files (or any byte source/sink) and the document
//! model.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Result, SjrError};
use crate::node::Node;
use crate::parser::{parse_with, ParseOptions};
use crate::writer::render;

/// Read and parse the file at `path`.
///
/// Fails with [`SjrError::Io`] if the file cannot be read and with
/// [`SjrError::Format`] if its content is not one complete SJR value.
pub fn load(path: impl AsRef<Path>) -> Result<Node> {
    load_with(path, &ParseOptions::default())
}

pub fn load_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Node> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading document");
    parse_bytes(&bytes, options)
}

/// Read a byte source to the end and parse it.
pub fn load_from<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Node> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_bytes(&bytes, options)
}

/// Parse raw bytes. Invalid UTF-8 is reported as a format error at the first
/// bad byte.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> Result<Node> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SjrError::format(e.valid_up_to(), "input is not valid UTF-8"))?;
    parse_with(text, options)
}

/// Render `node` and write it to `path`, followed by a newline.
///
/// The file is only created once rendering has succeeded.
pub fn save(node: &Node, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut text = render(node)?;
    text.push('\n');
    fs::write(path, &text)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "saved document");
    Ok(())
}

/// Render `node` into any byte sink, followed by a newline.
pub fn save_to<W: Write>(node: &Node, mut writer: W) -> Result<()> {
    let text = render(node)?;
    writer.write_all(text.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
