use std::fmt::Write;

use crate::tree::{Data, Message, Value};

/// Renders a message one node per line, children indented under their parent.
///
/// ```
/// use hl7_ast::{Composite, CompositeKind, Data, Message, TreePrinter};
///
/// let seg = Composite::new(CompositeKind::Segment, vec![Data::text("PV1"), Data::text("1")]).unwrap();
/// let out = TreePrinter::new().print_message(&Message::new(vec![seg.into()]));
/// assert_eq!(out, "Segment\n  \"PV1\"\n  \"1\"\n");
/// ```
#[derive(Debug, Clone)]
pub struct TreePrinter {
    indent: usize,
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spaces per nesting level.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn print_message(&self, message: &Message) -> String {
        let mut out = String::new();
        for segment in message {
            self.write_node(&mut out, segment, 0);
        }
        out
    }

    pub fn print(&self, node: &Data) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node, 0);
        out
    }

    fn write_node(&self, out: &mut String, node: &Data, depth: usize) {
        let pad = depth * self.indent;
        match node {
            Data::Leaf(value) => {
                let _ = match value {
                    Value::Present(bytes) => {
                        writeln!(out, "{:pad$}{:?}", "", String::from_utf8_lossy(bytes))
                    }
                    Value::Null => writeln!(out, "{:pad$}<null>", ""),
                    Value::Absent => writeln!(out, "{:pad$}<absent>", ""),
                };
            }
            Data::Composite(c) => {
                let _ = writeln!(out, "{:pad$}{}", "", c.kind());
                for child in c.children() {
                    self.write_node(out, child, depth + 1);
                }
            }
        }
    }
}
