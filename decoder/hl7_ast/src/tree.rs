// Tree node definitions for decoded HL7 v2 messages.
// Leaves hold already-unescaped bytes; composites are only built with enough children.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The level a [`Composite`] node represents in the delimiter hierarchy.
///
/// Levels nest strictly in declaration order. A level is skipped entirely
/// when its delimiter does not occur in the slice being folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompositeKind {
    Segment,
    Repeated,
    Component,
    SubComponent,
}

impl CompositeKind {
    /// Smallest number of children a composite of this kind may hold.
    ///
    /// A segment that carries only its identifier still has to appear in the
    /// message, so it is the one level allowed to hold a single child.
    pub fn min_children(self) -> usize {
        match self {
            CompositeKind::Segment => 1,
            _ => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CompositeKind::Segment => "Segment",
            CompositeKind::Repeated => "Repeated",
            CompositeKind::Component => "Component",
            CompositeKind::SubComponent => "SubComponent",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State of a scalar leaf.
///
/// `Null` and `Absent` are different things on the wire: `Absent` is a
/// zero-length slice (nothing was sent), `Null` is the explicit `""` marker
/// (the sender asked for the value to be cleared).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "crate::repr::ValueRepr", from = "crate::repr::ValueRepr")
)]
pub enum Value {
    Present(Vec<u8>),
    Null,
    Absent,
}

impl Value {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Present(bytes) => Some(bytes),
            Value::Null | Value::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Value::Present(_))
    }
}

/// A typed interior node. Children are fixed once the node is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "crate::repr::CompositeRepr")
)]
pub struct Composite {
    kind: CompositeKind,
    children: Vec<Data>,
}

impl Composite {
    /// Builds a composite, or returns `None` when `children` is too short
    /// for `kind` (see [`CompositeKind::min_children`]).
    pub fn new(kind: CompositeKind, children: Vec<Data>) -> Option<Self> {
        if children.len() < kind.min_children() {
            return None;
        }
        Some(Self { kind, children })
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn children(&self) -> &[Data] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Data> {
        self.children
    }
}

/// A node of the decoded tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Data {
    Leaf(Value),
    Composite(Composite),
}

impl Data {
    /// Shorthand for a present leaf.
    pub fn text(bytes: impl Into<Vec<u8>>) -> Self {
        Data::Leaf(Value::Present(bytes.into()))
    }

    pub fn null() -> Self {
        Data::Leaf(Value::Null)
    }

    pub fn absent() -> Self {
        Data::Leaf(Value::Absent)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Data::Leaf(_))
    }

    /// Kind of a composite node; `None` for leaves.
    pub fn kind(&self) -> Option<CompositeKind> {
        match self {
            Data::Composite(c) => Some(c.kind()),
            Data::Leaf(_) => None,
        }
    }

    /// Children of a composite node. Leaves have none.
    pub fn children(&self) -> &[Data] {
        match self {
            Data::Composite(c) => c.children(),
            Data::Leaf(_) => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Data> {
        self.children().get(index)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Data::Leaf(v) => Some(v),
            Data::Composite(_) => None,
        }
    }

    /// Bytes of a present leaf.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.value().and_then(Value::as_bytes)
    }

    /// UTF-8 view of a present leaf. `None` for non-leaves, null/absent
    /// leaves and payloads that are not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Identifier of a segment node (its first child).
    pub fn segment_id(&self) -> Option<&[u8]> {
        match self {
            Data::Composite(c) if c.kind() == CompositeKind::Segment => {
                c.children().first().and_then(Data::as_bytes)
            }
            _ => None,
        }
    }
}

impl From<Composite> for Data {
    fn from(c: Composite) -> Self {
        Data::Composite(c)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Present(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::Null => f.write_str("Null"),
            Value::Absent => f.write_str("Absent"),
        }
    }
}

/// Compact one-line notation, e.g. `Component[Leaf("1"), Leaf(Absent)]`.
impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Leaf(v) => write!(f, "Leaf({v})"),
            Data::Composite(c) => {
                write!(f, "{}[", c.kind())?;
                for (i, child) in c.children().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A decoded message: segment nodes in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    segments: Vec<Data>,
}

impl Message {
    /// Wraps already-built segment nodes. Callers are expected to pass only
    /// `CompositeKind::Segment` composites.
    pub fn new(segments: Vec<Data>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Data] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Data> {
        self.segments.iter()
    }

    /// First segment whose identifier equals `id`.
    pub fn segment(&self, id: &str) -> Option<&Data> {
        self.segments
            .iter()
            .find(|s| s.segment_id() == Some(id.as_bytes()))
    }

    pub fn segments_named<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Data> + 'a {
        self.segments
            .iter()
            .filter(move |s| s.segment_id() == Some(id.as_bytes()))
    }

    pub fn into_segments(self) -> Vec<Data> {
        self.segments
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Data;
    type IntoIter = std::slice::Iter<'a, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
