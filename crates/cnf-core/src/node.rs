//! Token model: the closed set of node kinds a configuration file is made of.
//!
//! Every node stores raw text fragments only. Nothing is trimmed, unquoted, or
//! interpreted, so writing the fragments back in order reproduces the source.
//! `Section` is the one container kind; its header fields live next to the
//! ordered list of nodes that follow the header in the file.

use crate::error::{CnfError, Result};
use serde::{Deserialize, Serialize};

/// One lexical unit of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Whitespace(Whitespace),
    Comment(Comment),
    KeyValue(KeyValue),
    Section(Section),
    Directive(Directive),
}

impl Node {
    pub fn as_whitespace(&self) -> Option<&Whitespace> {
        match self {
            Node::Whitespace(ws) => Some(ws),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Node::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_key_value(&self) -> Option<&KeyValue> {
        match self {
            Node::KeyValue(kv) => Some(kv),
            _ => None,
        }
    }

    pub fn as_key_value_mut(&mut self) -> Option<&mut KeyValue> {
        match self {
            Node::KeyValue(kv) => Some(kv),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Node::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&Directive> {
        match self {
            Node::Directive(d) => Some(d),
            _ => None,
        }
    }
}

/// A maximal run of whitespace characters. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Whitespace {
    text: String,
}

impl Whitespace {
    /// Build a whitespace run, rejecting empty text and non-whitespace characters.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() || !text.chars().all(char::is_whitespace) {
            return Err(CnfError::InvalidWhitespace(text));
        }
        Ok(Self { text })
    }

    /// Scanner-side constructor; the caller guarantees a non-empty whitespace run.
    pub(crate) fn from_scanned(text: String) -> Self {
        debug_assert!(!text.is_empty());
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.text.ends_with(suffix)
    }
}

impl TryFrom<String> for Whitespace {
    type Error = CnfError;

    fn try_from(text: String) -> Result<Self> {
        Whitespace::new(text)
    }
}

impl From<Whitespace> for String {
    fn from(ws: Whitespace) -> Self {
        ws.text
    }
}

/// A `#` comment. `text` excludes the leading `#` and the line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A `key = value` pair, with the spacing on both sides of `=` kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    /// Text between the key and `=`.
    pub key_post: String,
    /// Whitespace between `=` and the value.
    pub value_pre: String,
    /// Raw value, up to (not including) `#`, CR, LF, or end of input.
    pub value: String,
}

impl KeyValue {
    /// A pair written as `key=value` with no spacing.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_spacing(key, "", "", value)
    }

    pub fn with_spacing(
        key: impl Into<String>,
        key_post: impl Into<String>,
        value_pre: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            key_post: key_post.into(),
            value_pre: value_pre.into(),
            value: value.into(),
        }
    }

    /// Replace the value text, keeping the key and both spacers untouched.
    ///
    /// Rejected values:
    /// - empty, since `key =` followed by a line end does not parse;
    /// - leading whitespace, which would read back as part of `value_pre`;
    /// - any `#`, CR, or LF.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let bad_start = value.chars().next().is_none_or(char::is_whitespace);
        if bad_start || value.contains(['#', '\r', '\n']) {
            return Err(CnfError::InvalidValue(value));
        }
        self.value = value;
        Ok(())
    }

    /// Check that `key` scans back as a key: an alphanumeric first character
    /// and no whitespace or `=` after it.
    pub fn validate_key(key: &str) -> Result<()> {
        let starts_ok = key.chars().next().is_some_and(char::is_alphanumeric);
        if !starts_ok || key.contains(|c: char| c.is_whitespace() || c == '=') {
            return Err(CnfError::InvalidKey(key.to_string()));
        }
        Ok(())
    }
}

/// A `[name]` header and the nodes that follow it up to the next header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    /// Whitespace between `[` and the name.
    pub pre: String,
    pub name: String,
    /// Text between the name and `]`.
    pub post: String,
    nodes: Vec<Node>,
}

impl Section {
    /// A header written as `[name]`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_spacing("", name, "")
    }

    pub fn with_spacing(
        pre: impl Into<String>,
        name: impl Into<String>,
        post: impl Into<String>,
    ) -> Self {
        Self {
            pre: pre.into(),
            name: name.into(),
            post: post.into(),
            nodes: Vec::new(),
        }
    }

    /// Check that `name` reads back from a `[name]` header unchanged.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == ']') {
            return Err(CnfError::InvalidSectionName(name.to_string()));
        }
        Ok(())
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

    /// Add a node after the existing children. Node kinds are not checked.
    pub fn append(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Add a node before the existing children. Node kinds are not checked.
    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.nodes.insert(0, node.into());
    }

    /// First key/value child whose key equals `name` exactly.
    pub fn get_kvp(&self, name: &str) -> Option<&KeyValue> {
        find_kvp(&self.nodes, name)
    }

    /// Like [`Section::get_kvp`], falling back to `default` when nothing matches.
    pub fn get_kvp_or<'a>(&'a self, name: &str, default: &'a KeyValue) -> &'a KeyValue {
        self.get_kvp(name).unwrap_or(default)
    }

    pub fn get_kvp_mut(&mut self, name: &str) -> Option<&mut KeyValue> {
        find_kvp_mut(&mut self.nodes, name)
    }

    /// Key/value children in declaration order.
    ///
    /// Each call walks the current children, so nodes appended or prepended
    /// since the last traversal are seen.
    pub fn kvp(&self) -> impl Iterator<Item = &KeyValue> + '_ {
        self.nodes.iter().filter_map(Node::as_key_value)
    }
}

/// A `.`-prefixed line such as `.include other.cnf`, kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    pub spacer: String,
    pub args: String,
}

impl Directive {
    pub fn new(
        name: impl Into<String>,
        spacer: impl Into<String>,
        args: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            spacer: spacer.into(),
            args: args.into(),
        }
    }
}

impl From<Whitespace> for Node {
    fn from(ws: Whitespace) -> Self {
        Node::Whitespace(ws)
    }
}

impl From<Comment> for Node {
    fn from(c: Comment) -> Self {
        Node::Comment(c)
    }
}

impl From<KeyValue> for Node {
    fn from(kv: KeyValue) -> Self {
        Node::KeyValue(kv)
    }
}

impl From<Section> for Node {
    fn from(s: Section) -> Self {
        Node::Section(s)
    }
}

impl From<Directive> for Node {
    fn from(d: Directive) -> Self {
        Node::Directive(d)
    }
}

pub(crate) fn find_kvp<'a>(nodes: &'a [Node], name: &str) -> Option<&'a KeyValue> {
    nodes
        .iter()
        .filter_map(Node::as_key_value)
        .find(|kv| kv.key == name)
}

pub(crate) fn find_kvp_mut<'a>(nodes: &'a mut [Node], name: &str) -> Option<&'a mut KeyValue> {
    nodes
        .iter_mut()
        .filter_map(Node::as_key_value_mut)
        .find(|kv| kv.key == name)
}
