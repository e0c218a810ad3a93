//! Lowering of generic data documents into configuration trees.
//!
//! YAML, JSON and TOML all deserialize into a [`serde_json::Value`] first;
//! this module turns that value into the canonical [`ConfigNode`] shape.
//!
//! Rules for a descriptor mapping:
//!
//! - `type: Group` makes a `Group` node. Its children come from `children`
//!   (or `effects`); every other key lowers like any descriptor key.
//! - Any other mapping is tagged `Effect` and keeps its `type` attribute.
//! - Scalars become attributes. Nulls are skipped.
//! - A nested mapping becomes a child node tagged with the key.
//! - A sequence becomes a child node tagged with the key. Scalar entries
//!   become `Item` children carrying a `value` attribute; mapping entries
//!   become descriptors when they carry a `type`, `Item` nodes otherwise.
//!
//! Mapping keys are visited in sorted order, so nested children come out
//! sorted by key. Sequence order is always preserved.

use rackgraph_core::{ConfigNode, GROUP_TAG, ROOT_TAG, ScalarValue, TYPE_KEY};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Tag given to leaf effect descriptors.
pub const EFFECT_TAG: &str = "Effect";

/// Tag given to the entries of a nested sequence.
pub const ITEM_TAG: &str = "Item";

/// Key holding the descriptor list of a mapping root or a group.
pub const EFFECTS_KEY: &str = "effects";

/// Alternative key for a group's children.
pub const CHILDREN_KEY: &str = "children";

const VALUE_KEY: &str = "value";

/// Lower a whole document into a `Chain` root.
pub(crate) fn lower_document(doc: &Value) -> Result<ConfigNode, ConfigError> {
    let mut chain = ConfigNode::new(ROOT_TAG);
    match doc {
        Value::Array(items) => push_descriptors(&mut chain, items, "")?,
        Value::Object(map) => {
            let Some(effects) = map.get(EFFECTS_KEY) else {
                return Err(ConfigError::invalid_root(
                    "mapping root has no `effects` sequence",
                ));
            };
            for (key, value) in map {
                if key == EFFECTS_KEY || value.is_null() {
                    continue;
                }
                let Some(scalar) = scalar(value) else {
                    return Err(ConfigError::invalid_root(format!(
                        "root key `{key}` must be a scalar, found {}",
                        kind(value)
                    )));
                };
                chain.set_attribute(key.as_str(), scalar);
            }
            match effects {
                Value::Array(items) => push_descriptors(&mut chain, items, "")?,
                Value::Null => {}
                other => {
                    return Err(ConfigError::invalid_root(format!(
                        "`effects` must be a sequence, found {}",
                        kind(other)
                    )));
                }
            }
        }
        other => {
            return Err(ConfigError::invalid_root(format!(
                "expected a sequence of effects or a mapping with `effects`, found {}",
                kind(other)
            )));
        }
    }
    Ok(chain)
}

fn push_descriptors(
    parent: &mut ConfigNode,
    items: &[Value],
    path: &str,
) -> Result<(), ConfigError> {
    let mut index = 0;
    for item in items {
        let item_path = format!("{path}/{index}");
        match item {
            Value::Null => continue,
            Value::Object(map) => parent.push_child(descriptor(map, &item_path)?),
            other => {
                return Err(ConfigError::invalid_descriptor(
                    item_path,
                    format!("expected a mapping, found {}", kind(other)),
                ));
            }
        }
        index += 1;
    }
    Ok(())
}

fn descriptor(map: &Map<String, Value>, path: &str) -> Result<ConfigNode, ConfigError> {
    let is_group = map.get(TYPE_KEY).and_then(Value::as_str) == Some(GROUP_TAG);
    if !is_group {
        return mapping_node(EFFECT_TAG, map, path);
    }

    let mut node = ConfigNode::new(GROUP_TAG);
    for (key, value) in map {
        match key.as_str() {
            TYPE_KEY => {}
            CHILDREN_KEY | EFFECTS_KEY => match value {
                Value::Array(items) => push_descriptors(&mut node, items, path)?,
                Value::Null => {}
                other => {
                    return Err(ConfigError::invalid_descriptor(
                        format!("{path}/{key}"),
                        format!("group children must be a sequence, found {}", kind(other)),
                    ));
                }
            },
            _ => lower_entry(&mut node, key, value, path)?,
        }
    }
    Ok(node)
}

fn mapping_node(
    tag: &str,
    map: &Map<String, Value>,
    path: &str,
) -> Result<ConfigNode, ConfigError> {
    let mut node = ConfigNode::new(tag);
    for (key, value) in map {
        lower_entry(&mut node, key, value, path)?;
    }
    Ok(node)
}

fn lower_entry(
    node: &mut ConfigNode,
    key: &str,
    value: &Value,
    path: &str,
) -> Result<(), ConfigError> {
    let entry_path = format!("{path}/{key}");
    match value {
        Value::Null => {}
        Value::Object(map) => node.push_child(mapping_node(key, map, &entry_path)?),
        Value::Array(items) => {
            let mut list = ConfigNode::new(key);
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{entry_path}/{i}");
                match item {
                    Value::Null => {}
                    Value::Object(map) if map.contains_key(TYPE_KEY) => {
                        list.push_child(descriptor(map, &item_path)?);
                    }
                    Value::Object(map) => list.push_child(mapping_node(ITEM_TAG, map, &item_path)?),
                    Value::Array(_) => {
                        return Err(ConfigError::invalid_descriptor(
                            item_path,
                            "nested sequences are not supported",
                        ));
                    }
                    scalar_item => {
                        if let Some(v) = scalar(scalar_item) {
                            list.push_child(ConfigNode::new(ITEM_TAG).with_attribute(VALUE_KEY, v));
                        }
                    }
                }
            }
            node.push_child(list);
        }
        other => {
            if let Some(v) = scalar(other) {
                node.set_attribute(key, v);
            }
        }
    }
    Ok(())
}

fn scalar(value: &Value) -> Option<ScalarValue> {
    match value {
        Value::Bool(b) => Some(ScalarValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(ScalarValue::Number),
        Value::String(s) => Some(ScalarValue::Text(s.clone())),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
