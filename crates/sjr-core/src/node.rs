//! The SJR document tree.
//!
//! A [`Node`] is one value of the format: a scalar (bool, integer, float,
//! string), an ordered array, or an object whose children are always kept in
//! lexicographic key order. Scalars are stored natively in [`Scalar`]; text
//! conversion only happens in the parser and the writer.
//!
//! # Auto-vivification
//!
//! Mutable key and index access create missing entries on the fly, so a tree
//! can be built without declaring intermediate containers:
//!
//! ```
//! use sjr_core::{Kind, Node};
//!
//! let mut doc = Node::new();
//! doc["server"]["port"].set_value(8080);
//! doc["server"]["hosts"][1].set_value("b.example");
//!
//! assert_eq!(doc["server"]["hosts"].kind(), Kind::Array);
//! assert_eq!(doc["server"]["hosts"].array_size(), 2);
//! assert_eq!(doc["server"]["port"].value::<i64>().unwrap(), 8080);
//! ```
//!
//! Index access is destructive on non-array nodes: the node is coerced to an
//! array and its previous scalar and object content is dropped.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{Result, SjrError};
use crate::writer;

/// The tag of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// True for the four scalar kinds.
    pub fn is_scalar(self) -> bool {
        !matches!(self, Kind::Array | Kind::Object)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native payload of a scalar node.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Bool(_) => Kind::Bool,
            Scalar::Int(_) => Kind::Int,
            Scalar::Float(_) => Kind::Float,
            Scalar::Str(_) => Kind::String,
        }
    }

    /// The text a scalar is normalized to: `true`/`false`, decimal digits,
    /// the writer's float format, or the raw string.
    pub fn canonical_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => writer::format_float(*f).unwrap_or_else(|| f.to_string()),
            Scalar::Str(s) => s.clone(),
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => |$v:ident| $e:expr),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from($v: $t) -> Self {
                    $e
                }
            }

            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    let mut node = Node::new();
                    node.set_value(v);
                    node
                }
            }
        )*
    };
}

scalar_from! {
    bool => |v| Scalar::Bool(v),
    i32 => |v| Scalar::Int(i64::from(v)),
    i64 => |v| Scalar::Int(v),
    u32 => |v| Scalar::Int(i64::from(v)),
    f32 => |v| Scalar::Float(f64::from(v)),
    f64 => |v| Scalar::Float(v),
    String => |v| Scalar::Str(v),
    &str => |v| Scalar::Str(v.to_owned()),
}

/// Container shape used when no scalar is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Shape {
    #[default]
    Object,
    Array,
}

/// One value in an SJR document.
///
/// A default node is an empty object. Children live in a `BTreeMap`, so
/// lookup and iteration are always sorted by key regardless of insertion
/// order. `children` and `elements` may both hold entries; only the one
/// selected by [`Node::kind`] is rendered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    scalar: Option<Scalar>,
    shape: Shape,
    children: BTreeMap<String, Node>,
    elements: Vec<Node>,
    label: Option<String>,
}

/// Returned by read-only indexing when the key or index is absent.
static EMPTY: Node = Node {
    scalar: None,
    shape: Shape::Object,
    children: BTreeMap::new(),
    elements: Vec::new(),
    label: None,
};

impl Node {
    /// An empty object node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for [`Node::new`].
    pub fn object() -> Self {
        Self::default()
    }

    /// An empty array node.
    pub fn array() -> Self {
        Node {
            shape: Shape::Array,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> Kind {
        match (&self.scalar, self.shape) {
            (Some(scalar), _) => scalar.kind(),
            (None, Shape::Object) => Kind::Object,
            (None, Shape::Array) => Kind::Array,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.scalar.is_some()
    }

    /// Store a scalar, switching the kind to match it.
    ///
    /// Children and elements are left untouched; they stay hidden until the
    /// node becomes a container again.
    pub fn set_value<T: Into<Scalar>>(&mut self, value: T) {
        self.scalar = Some(value.into());
    }

    /// The scalar payload, if the node currently is a scalar.
    pub fn scalar(&self) -> Option<&Scalar> {
        self.scalar.as_ref()
    }

    /// Read the value as `T`.
    ///
    /// The conversion does not require the kind to match `T`: a bool reads as
    /// `1` through `value::<i64>()`, an integer string reads as a number, and
    /// so on. Anything that cannot be represented fails with
    /// [`SjrError::ValueType`].
    pub fn value<T: FromNode>(&self) -> Result<T> {
        T::from_node(self)
    }

    /// Number of object children, whatever the current kind.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of array elements, whatever the current kind.
    pub fn array_size(&self) -> usize {
        self.elements.len()
    }

    /// Look up `key`, inserting an empty object node if it is missing.
    ///
    /// Returns the child and whether it was inserted. The receiver's kind does
    /// not change.
    pub fn get_or_insert(&mut self, key: &str) -> (&mut Node, bool) {
        match self.children.entry(key.to_owned()) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(Node::new()), true),
        }
    }

    /// Element at `index`, growing the array with empty object nodes as needed.
    ///
    /// A non-array receiver is first coerced to an empty array, dropping its
    /// scalar, children and label. Returns the element and whether any slot
    /// was created.
    pub fn element_or_insert(&mut self, index: usize) -> (&mut Node, bool) {
        self.make_array();
        let grew = index >= self.elements.len();
        if grew {
            self.elements.resize_with(index + 1, Node::new);
        }
        (&mut self.elements[index], grew)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children.get_mut(key)
    }

    /// Element at `index` when the node is an array.
    pub fn element(&self, index: usize) -> Option<&Node> {
        if self.kind() == Kind::Array {
            self.elements.get(index)
        } else {
            None
        }
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Node> {
        if self.kind() == Kind::Array {
            self.elements.get_mut(index)
        } else {
            None
        }
    }

    /// Insert or replace a child, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.children.insert(key.into(), node)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.children.remove(key)
    }

    /// Append an element, coercing the receiver to an array first.
    pub fn push(&mut self, node: Node) {
        self.make_array();
        self.elements.push(node);
    }

    /// Children in key order.
    pub fn children(&self) -> btree_map::Iter<'_, String, Node> {
        self.children.iter()
    }

    pub fn elements(&self) -> &[Node] {
        &self.elements
    }

    /// Name printed before an object's braces (`"name": { ... }`).
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn clear_label(&mut self) {
        self.label = None;
    }

    /// Walk a `/`-separated path of keys and array indices without inserting.
    ///
    /// Numeric segments index arrays; on objects every segment is a key.
    /// An empty path returns the node itself.
    pub fn pointer(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node.kind() {
                Kind::Array => segment.parse().ok().and_then(|i| node.element(i)),
                _ => node.get(segment),
            })
    }

    fn make_array(&mut self) {
        if self.kind() != Kind::Array {
            self.scalar = None;
            self.children.clear();
            self.elements.clear();
            self.label = None;
            self.shape = Shape::Array;
        }
    }
}

impl Index<&str> for Node {
    type Output = Node;

    /// Child under `key`, or an empty object node if absent.
    fn index(&self, key: &str) -> &Node {
        self.get(key).unwrap_or(&EMPTY)
    }
}

impl IndexMut<&str> for Node {
    fn index_mut(&mut self, key: &str) -> &mut Node {
        self.get_or_insert(key).0
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        self.element(index).unwrap_or(&EMPTY)
    }
}

impl IndexMut<usize> for Node {
    fn index_mut(&mut self, index: usize) -> &mut Node {
        self.element_or_insert(index).0
    }
}

/// Types a node can be read as via [`Node::value`].
pub trait FromNode: Sized {
    fn from_node(node: &Node) -> Result<Self>;
}

fn mismatch(requested: &'static str, node: &Node, reason: impl Into<String>) -> SjrError {
    SjrError::ValueType {
        requested,
        found: node.kind(),
        reason: reason.into(),
    }
}

fn scalar_of<'a>(requested: &'static str, node: &'a Node) -> Result<&'a Scalar> {
    node.scalar()
        .ok_or_else(|| mismatch(requested, node, "containers have no scalar value"))
}

/// Integer reading shared by every integral target and `bool`.
fn read_integer(requested: &'static str, node: &Node) -> Result<i64> {
    match scalar_of(requested, node)? {
        Scalar::Bool(b) => Ok(i64::from(*b)),
        Scalar::Int(i) => Ok(*i),
        Scalar::Float(f) => {
            let t = f.trunc();
            if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                Ok(t as i64)
            } else {
                Err(mismatch(requested, node, format!("{f} is out of range")))
            }
        }
        Scalar::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| mismatch(requested, node, format!("{s:?} is not an integer"))),
    }
}

fn read_float(requested: &'static str, node: &Node) -> Result<f64> {
    match scalar_of(requested, node)? {
        Scalar::Bool(b) => Ok(f64::from(u8::from(*b))),
        Scalar::Int(i) => Ok(*i as f64),
        Scalar::Float(f) => Ok(*f),
        Scalar::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| mismatch(requested, node, format!("{s:?} is not a number"))),
    }
}

impl FromNode for bool {
    fn from_node(node: &Node) -> Result<Self> {
        read_integer("bool", node).map(|i| i != 0)
    }
}

impl FromNode for i64 {
    fn from_node(node: &Node) -> Result<Self> {
        read_integer("i64", node)
    }
}

impl FromNode for i32 {
    fn from_node(node: &Node) -> Result<Self> {
        let i = read_integer("i32", node)?;
        i32::try_from(i).map_err(|_| mismatch("i32", node, format!("{i} is out of range")))
    }
}

impl FromNode for u32 {
    fn from_node(node: &Node) -> Result<Self> {
        let i = read_integer("u32", node)?;
        u32::try_from(i).map_err(|_| mismatch("u32", node, format!("{i} is out of range")))
    }
}

impl FromNode for f64 {
    fn from_node(node: &Node) -> Result<Self> {
        read_float("f64", node)
    }
}

impl FromNode for f32 {
    fn from_node(node: &Node) -> Result<Self> {
        read_float("f32", node).map(|f| f as f32)
    }
}

impl FromNode for String {
    fn from_node(node: &Node) -> Result<Self> {
        scalar_of("string", node).map(Scalar::canonical_text)
    }
}
