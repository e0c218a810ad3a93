//! Canonical configuration tree.
//!
//! Every input format (YAML, JSON, XML, TOML) is lowered into the same
//! [`ConfigNode`] shape before the graph builder sees it. A node has a tag,
//! a set of uniquely keyed scalar attributes and an ordered list of children.
//! Child order is meaningful: it is execution order inside a series group and
//! mixing order inside a parallel group.
//!
//! Trees are plain values. Once a tree has been handed to the engine it is
//! shared behind an `Arc` and never mutated; a reconfiguration always builds a
//! brand-new tree.
//!
//! # Example
//!
//! ```rust
//! use rackgraph_core::{ConfigNode, ScalarValue};
//!
//! let chain = ConfigNode::new("Chain")
//!     .with_child(ConfigNode::new("Effect").with_attribute("type", "Gain"))
//!     .with_child(
//!         ConfigNode::new("Group")
//!             .with_attribute("mode", "parallel")
//!             .with_child(ConfigNode::new("Effect").with_attribute("type", "Delay")),
//!     );
//!
//! assert_eq!(chain.children().len(), 2);
//! assert_eq!(chain.children()[0].attribute("type"), Some(&ScalarValue::from("Gain")));
//! ```

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use core::fmt;

/// Tag that turns a node into a composite group.
pub const GROUP_TAG: &str = "Group";

/// Tag the format adapters give to the root of a chain.
pub const ROOT_TAG: &str = "Chain";

/// Attribute naming the registry type of a leaf effect descriptor.
pub const TYPE_KEY: &str = "type";

/// A single attribute value.
///
/// XML attributes always arrive as text, so the accessors coerce between
/// representations instead of failing on a type mismatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Any numeric value (integers are stored as `f64` too).
    Number(f64),
    /// Free-form text.
    Text(String),
    /// Boolean flag.
    Bool(bool),
}

impl ScalarValue {
    /// Numeric view. Text is parsed as a decimal float; booleans map to 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ScalarValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Numeric view narrowed to `f32`.
    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|v| v as f32)
    }

    /// Boolean view.
    ///
    /// Text accepts `true/false`, `yes/no`, `on/off` and `1/0` (ASCII
    /// case-insensitive). Numbers are true when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            ScalarValue::Number(n) => Some(*n != 0.0),
            ScalarValue::Text(s) => {
                let s = s.trim();
                if ["true", "yes", "on", "1"]
                    .iter()
                    .any(|t| s.eq_ignore_ascii_case(t))
                {
                    Some(true)
                } else if ["false", "no", "off", "0"]
                    .iter()
                    .any(|t| s.eq_ignore_ascii_case(t))
                {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Number(n) => write!(f, "{n}"),
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Number(v)
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        ScalarValue::Number(f64::from(v))
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Number(f64::from(v))
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Number(v as f64)
    }
}

impl From<u32> for ScalarValue {
    fn from(v: u32) -> Self {
        ScalarValue::Number(f64::from(v))
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.into())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Text(v)
    }
}

/// One node of the canonical configuration tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigNode {
    tag: String,
    attributes: BTreeMap<String, ScalarValue>,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Create a node with the given tag and no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Add (or replace) an attribute, builder style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Append a child, builder style.
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children in order, builder style.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ConfigNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Add or replace an attribute in place.
    ///
    /// Intended for format adapters while they assemble a tree; a published
    /// tree is only reachable through shared references.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Append a child in place.
    pub fn push_child(&mut self, child: ConfigNode) {
        self.children.push(child);
    }

    /// The node's tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up a direct attribute (no nested-child fallback, see [`crate::resolve`]).
    pub fn attribute(&self, key: &str) -> Option<&ScalarValue> {
        self.attributes.get(key)
    }

    /// Whether a direct attribute with this key exists.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Iterate attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    /// First child carrying the given tag.
    pub fn child(&self, tag: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// True when this node is tagged [`GROUP_TAG`].
    pub fn is_group(&self) -> bool {
        self.tag == GROUP_TAG
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ConfigNode::node_count).sum::<usize>()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        f.write_str(&self.tag)?;
        for (key, value) in &self.attributes {
            match value {
                ScalarValue::Text(s) => write!(f, " {key}=\"{s}\"")?,
                other => write!(f, " {key}={other}")?,
            }
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented, one-node-per-line dump used by diagnostics and the CLI.
impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_child_order() {
        let node = ConfigNode::new("Chain")
            .with_child(ConfigNode::new("a"))
            .with_child(ConfigNode::new("b"))
            .with_children([ConfigNode::new("c"), ConfigNode::new("d")]);

        let tags: Vec<&str> = node.children().iter().map(ConfigNode::tag).collect();
        assert_eq!(tags, ["a", "b", "c", "d"]);
        assert_eq!(node.node_count(), 5);
    }

    #[test]
    fn test_attribute_keys_are_unique() {
        let node = ConfigNode::new("Effect")
            .with_attribute("gain", 1.0)
            .with_attribute("gain", 2.0);

        assert_eq!(node.attribute_count(), 1);
        assert_eq!(node.attribute("gain"), Some(&ScalarValue::Number(2.0)));
    }

    #[test]
    fn test_child_returns_first_match() {
        let node = ConfigNode::new("Effect")
            .with_child(ConfigNode::new("depth").with_attribute("value", 0.1))
            .with_child(ConfigNode::new("depth").with_attribute("value", 0.9));

        let child = node.child("depth").unwrap();
        assert_eq!(child.attribute("value"), Some(&ScalarValue::Number(0.1)));
        assert!(node.child("rate").is_none());
    }

    #[test]
    fn test_text_coerces_to_number() {
        assert_eq!(ScalarValue::from(" -6.5 ").as_f64(), Some(-6.5));
        assert_eq!(ScalarValue::from("knob").as_f64(), None);
        assert_eq!(ScalarValue::from(true).as_f32(), Some(1.0));
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(ScalarValue::from("Yes").as_bool(), Some(true));
        assert_eq!(ScalarValue::from("OFF").as_bool(), Some(false));
        assert_eq!(ScalarValue::from(0.0).as_bool(), Some(false));
        assert_eq!(ScalarValue::from(3).as_bool(), Some(true));
        assert_eq!(ScalarValue::from("maybe").as_bool(), None);
    }

    #[test]
    fn test_as_str_only_for_text() {
        assert_eq!(ScalarValue::from("LowPass").as_str(), Some("LowPass"));
        assert_eq!(ScalarValue::from(1.0).as_str(), None);
    }

    #[test]
    fn test_is_group() {
        assert!(ConfigNode::new(GROUP_TAG).is_group());
        assert!(!ConfigNode::new("group").is_group());
    }

    #[test]
    fn test_display_dump() {
        let node = ConfigNode::new("Chain").with_child(
            ConfigNode::new("Effect")
                .with_attribute("type", "Gain")
                .with_attribute("gain_db", -6.0),
        );
        let dump = node.to_string();
        assert_eq!(dump, "Chain\n  Effect gain_db=-6 type=\"Gain\"\n");
    }
}
