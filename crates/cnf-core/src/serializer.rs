//! Serializer — rebuilds the exact source text from a tree.
//!
//! Serialization is a pure walk: each node writes its marker characters and
//! raw fragments back in source order, and a section writes its header
//! followed by its children. Nothing is escaped, quoted, or re-spaced, so an
//! unmodified parsed tree serializes to the bytes it was parsed from.
//!
//! # Example
//! ```
//! use cnf_core::{serialize, Document};
//! let text = "[req]\nCN = test\n";
//! let doc = Document::parse(text).unwrap();
//! assert_eq!(serialize(&doc), text);
//! ```

use crate::document::Document;
use crate::node::{Comment, Directive, KeyValue, Node, Section, Whitespace};
use std::fmt;

/// Serialize a whole document back to configuration text.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    write_nodes(doc.nodes(), &mut out);
    out
}

/// Serialize a single node; sections include their children.
pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Whitespace(ws) => out.push_str(ws.as_str()),
        Node::Comment(c) => {
            out.push('#');
            out.push_str(&c.text);
        }
        Node::KeyValue(kv) => {
            out.push_str(&kv.key);
            out.push_str(&kv.key_post);
            out.push('=');
            out.push_str(&kv.value_pre);
            out.push_str(&kv.value);
        }
        Node::Section(s) => {
            write_section_header(s, out);
            write_nodes(s.nodes(), out);
        }
        Node::Directive(d) => {
            out.push('.');
            out.push_str(&d.name);
            out.push_str(&d.spacer);
            out.push_str(&d.args);
        }
    }
}

fn write_section_header(s: &Section, out: &mut String) {
    out.push('[');
    out.push_str(&s.pre);
    out.push_str(&s.name);
    out.push_str(&s.post);
    out.push(']');
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_node(self))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_section_header(self, &mut out);
        write_nodes(self.nodes(), &mut out);
        f.write_str(&out)
    }
}

impl fmt::Display for Whitespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.text)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}={}{}",
            self.key, self.key_post, self.value_pre, self.value
        )
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}{}{}", self.name, self.spacer, self.args)
    }
}
