//! SJR writer — renders a [`Node`] tree back to text.
//!
//! Output layout:
//!
//! - Scalars: `true`/`false`, decimal integers, floats (see [`format_float`]),
//!   strings wrapped in `"` with no escaping
//! - Arrays: single line, `[a, b, c]`
//! - Objects: one `"key": value` pair per line, indented with one tab per
//!   nesting level; `{` and `}` sit on their own lines
//!
//! ```
//! use sjr_core::{render, Node};
//!
//! let mut doc = Node::new();
//! doc["b"].set_value(2.5);
//! doc["a"].set_value(1);
//! assert_eq!(render(&doc).unwrap(), "{\n\t\"a\": 1,\n\t\"b\": 2.5\n}");
//! ```
//!
//! Nesting depth is passed down the recursion explicitly; rendering keeps no
//! state between calls.

use crate::error::{Result, SjrError};
use crate::node::{Kind, Node, Scalar};

/// Render a node tree to SJR text.
///
/// Fails only when the tree holds a value the format cannot express
/// (non-finite floats).
pub fn render(node: &Node) -> Result<String> {
    let mut out = String::new();
    write_value(node, 0, false, &mut out)?;
    Ok(out)
}

impl Node {
    /// Shorthand for [`render`].
    pub fn render(&self) -> Result<String> {
        render(self)
    }
}

/// Dispatch on kind. `nested` is false only for the document root, which
/// opens its object on the first line.
fn write_value(node: &Node, depth: usize, nested: bool, out: &mut String) -> Result<()> {
    if let Some(scalar) = node.scalar() {
        return write_scalar(scalar, out);
    }
    match node.kind() {
        Kind::Array => write_array(node.elements(), depth, out),
        _ => write_object(node, depth, nested, out),
    }
}

fn write_scalar(scalar: &Scalar, out: &mut String) -> Result<()> {
    match scalar {
        Scalar::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Scalar::Int(i) => out.push_str(&i.to_string()),
        Scalar::Float(f) => {
            let text = format_float(*f).ok_or_else(|| {
                SjrError::Serialize(format!("float {f} has no textual representation"))
            })?;
            out.push_str(&text);
        }
        Scalar::Str(s) => write_quoted(s, out),
    }
    Ok(())
}

fn write_array(elements: &[Node], depth: usize, out: &mut String) -> Result<()> {
    out.push('[');
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(element, depth, true, out)?;
    }
    out.push(']');
    Ok(())
}

/// Emit an object whose pairs sit at `depth + 1`.
///
/// A nested object starts on a fresh line at its own depth, so a value
/// object reads as:
///
/// ```text
/// "key": "label":
/// 	{
/// 		"inner": 1
/// 	}
/// ```
fn write_object(node: &Node, depth: usize, nested: bool, out: &mut String) -> Result<()> {
    if let Some(label) = node.label() {
        write_quoted(label, out);
        out.push_str(": ");
    }
    if nested {
        out.push('\n');
        push_tabs(depth, out);
    }
    out.push('{');
    for (i, (key, child)) in node.children().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('\n');
        push_tabs(depth + 1, out);
        write_quoted(key, out);
        out.push_str(": ");
        write_value(child, depth + 1, true, out)?;
    }
    out.push('\n');
    push_tabs(depth, out);
    out.push('}');
    Ok(())
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}

fn push_tabs(count: usize, out: &mut String) {
    out.extend(std::iter::repeat_n('\t', count));
}

/// Format a float as its shortest round-trip decimal, never in exponent
/// notation. Whole values keep a `.0` suffix so they parse back as floats
/// rather than integers. Returns `None` for NaN and infinities.
///
/// The parser folds fractional digits in one at a time, so a value with a
/// long fraction may read back off by an ulp or so (`0.3333333333333333`
/// comes back as `0.3333333333333334`). Whole values read back exactly.
pub fn format_float(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let mut s = f.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    Some(s)
}
