//! Three-tier parameter lookup.
//!
//! A configuration can spell the same parameter two ways:
//!
//! ```yaml
//! - type: Gain
//!   gain_db: -6.0                 # direct attribute
//! - type: Gain
//!   gain_db: { value: -6.0, ui: knob }   # nested child carrying UI metadata
//! ```
//!
//! [`resolve`] treats both identically. Lookup order, first hit wins:
//!
//! 1. a scalar attribute named `key` on the node,
//! 2. a child tagged `key` with a `value` attribute,
//! 3. a child tagged `key` with a `default` attribute,
//! 4. otherwise the caller's default.
//!
//! Everything else on the nested child (`ui`, `min`, `max`, `style`, ...) is
//! ignored here; it only matters to editors.

use crate::param_info::ParamDescriptor;
use crate::tree::{ConfigNode, ScalarValue};

/// Resolve `key` on `node` through tiers 1–3.
///
/// Returns `None` when no tier matches; callers supply their own default.
pub fn resolve<'a>(node: &'a ConfigNode, key: &str) -> Option<&'a ScalarValue> {
    if let Some(value) = node.attribute(key) {
        return Some(value);
    }
    let child = node.child(key)?;
    child
        .attribute("value")
        .or_else(|| child.attribute("default"))
}

/// True when the node mentions `key` at all, either as an attribute or as a
/// nested child (even one with neither `value` nor `default`).
pub fn has_param(node: &ConfigNode, key: &str) -> bool {
    node.has_attribute(key) || node.child(key).is_some()
}

/// Resolve a numeric parameter. Non-numeric values fall back to `default`.
pub fn param_f32(node: &ConfigNode, key: &str, default: f32) -> f32 {
    resolve(node, key)
        .and_then(ScalarValue::as_f32)
        .unwrap_or(default)
}

/// Resolve a non-negative integer parameter.
///
/// Values with a fractional part, negative values and non-numeric text fall
/// back to `default`.
pub fn param_u32(node: &ConfigNode, key: &str, default: u32) -> u32 {
    resolve(node, key)
        .and_then(ScalarValue::as_f64)
        .filter(|v| *v >= 0.0 && *v <= f64::from(u32::MAX) && libm::trunc(*v) == *v)
        .map(|v| v as u32)
        .unwrap_or(default)
}

/// Resolve a boolean parameter.
pub fn param_bool(node: &ConfigNode, key: &str, default: bool) -> bool {
    resolve(node, key)
        .and_then(ScalarValue::as_bool)
        .unwrap_or(default)
}

/// Resolve a text parameter. Numbers and booleans fall back to `default`.
pub fn param_str<'a>(node: &'a ConfigNode, key: &str, default: &'a str) -> &'a str {
    resolve(node, key)
        .and_then(ScalarValue::as_str)
        .unwrap_or(default)
}

/// Resolve the parameter described by `desc`, clamped to its range.
///
/// Uses the descriptor's key and default, so effects can keep one static
/// table of parameters and read every one of them the same way.
pub fn param_value(node: &ConfigNode, desc: &ParamDescriptor) -> f32 {
    desc.clamp(param_f32(node, desc.key, desc.default))
}
