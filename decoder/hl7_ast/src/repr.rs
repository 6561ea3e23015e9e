// Serde wire shapes for tree types whose in-memory form is not the JSON form.

use serde::{Deserialize, Serialize};

use crate::tree::{Composite, CompositeKind, Data, Value};

/// Present values are written as strings; non-UTF-8 bytes are replaced.
#[derive(Serialize, Deserialize)]
pub(crate) enum ValueRepr {
    Present(String),
    Null,
    Absent,
}

impl From<Value> for ValueRepr {
    fn from(v: Value) -> Self {
        match v {
            Value::Present(bytes) => ValueRepr::Present(String::from_utf8_lossy(&bytes).into_owned()),
            Value::Null => ValueRepr::Null,
            Value::Absent => ValueRepr::Absent,
        }
    }
}

impl From<ValueRepr> for Value {
    fn from(v: ValueRepr) -> Self {
        match v {
            ValueRepr::Present(s) => Value::Present(s.into_bytes()),
            ValueRepr::Null => Value::Null,
            ValueRepr::Absent => Value::Absent,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct CompositeRepr {
    kind: CompositeKind,
    children: Vec<Data>,
}

impl TryFrom<CompositeRepr> for Composite {
    type Error = String;

    fn try_from(repr: CompositeRepr) -> Result<Self, Self::Error> {
        let count = repr.children.len();
        Composite::new(repr.kind, repr.children).ok_or_else(|| {
            format!(
                "{} needs at least {} children, found {count}",
                repr.kind,
                repr.kind.min_children()
            )
        })
    }
}
