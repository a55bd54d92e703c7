//! The document tree: assembly from scanned tokens, lookups, and edits.
//!
//! A [`Document`] owns the nodes that precede the first section header plus
//! one [`Section`] node per header. Each section in turn owns everything up to
//! the next header, so sections never nest when parsed.

use crate::error::{CnfError, Result};
use crate::node::{find_kvp, find_kvp_mut, KeyValue, Node, Section, Whitespace};
use crate::scanner::{ParseOptions, Scanner};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// A whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration text with the default (strict) options.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: ParseOptions) -> Result<Self> {
        parse_chars(text.chars(), options)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node after the existing top-level nodes.
    pub fn append(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Add a node before the existing top-level nodes.
    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.nodes.insert(0, node.into());
    }

    /// First section whose name equals `name` exactly.
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections().find(|s| s.name == name)
    }

    /// Like [`Document::get_section`], falling back to `default` when nothing matches.
    pub fn get_section_or<'a>(&'a self, name: &str, default: &'a Section) -> &'a Section {
        self.get_section(name).unwrap_or(default)
    }

    pub fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.nodes
            .iter_mut()
            .filter_map(Node::as_section_mut)
            .find(|s| s.name == name)
    }

    /// Top-level sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.nodes.iter().filter_map(Node::as_section)
    }

    /// First top-level key/value pair named `name`.
    ///
    /// Only pairs declared before the first section header are top-level.
    pub fn get_kvp(&self, name: &str) -> Option<&KeyValue> {
        find_kvp(&self.nodes, name)
    }

    pub fn get_kvp_or<'a>(&'a self, name: &str, default: &'a KeyValue) -> &'a KeyValue {
        self.get_kvp(name).unwrap_or(default)
    }

    pub fn get_kvp_mut(&mut self, name: &str) -> Option<&mut KeyValue> {
        find_kvp_mut(&mut self.nodes, name)
    }

    /// Top-level key/value pairs in declaration order, re-read on every call.
    pub fn kvp(&self) -> impl Iterator<Item = &KeyValue> + '_ {
        self.nodes.iter().filter_map(Node::as_key_value)
    }

    /// Make sure the serialized document ends with `newline`.
    ///
    /// When the last top-level node is a section, its own children are
    /// checked instead, since that is where the trailing text lives. Existing
    /// whitespace is never modified; a new whitespace node is appended when
    /// needed. Calling this twice has the same effect as calling it once.
    pub fn ensure_last_new_line(&mut self, newline: &str) -> Result<()> {
        let ws = Whitespace::new(newline)?;
        if let Some(Node::Section(section)) = self.nodes.last_mut() {
            if !ends_with_newline(section.nodes(), newline) {
                section.append(ws);
            }
            return Ok(());
        }
        if !ends_with_newline(&self.nodes, newline) {
            self.nodes.push(Node::Whitespace(ws));
        }
        Ok(())
    }
}

fn ends_with_newline(nodes: &[Node], newline: &str) -> bool {
    matches!(nodes.last(), Some(Node::Whitespace(ws)) if ws.ends_with(newline))
}

impl FromStr for Document {
    type Err = CnfError;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

/// Parse a character stream into a [`Document`].
///
/// Every section token opens a new top-level section; every other token goes
/// to the most recently opened section, or to the document before the first
/// header. Any scanner error aborts the parse.
pub fn parse_chars<I>(chars: I, options: ParseOptions) -> Result<Document>
where
    I: IntoIterator<Item = char>,
{
    let mut doc = Document::new();
    // Index of the open section in `doc.nodes`, or None for the document itself.
    let mut current: Option<usize> = None;

    for token in Scanner::new(chars.into_iter(), options) {
        match token? {
            node @ Node::Section(_) => {
                doc.nodes.push(node);
                current = Some(doc.nodes.len() - 1);
            }
            node => match current.and_then(|i| doc.nodes[i].as_section_mut()) {
                Some(section) => section.append(node),
                None => doc.nodes.push(node),
            },
        }
    }

    debug!(
        nodes = doc.nodes.len(),
        sections = doc.sections().count(),
        "assembled document"
    );
    Ok(doc)
}
