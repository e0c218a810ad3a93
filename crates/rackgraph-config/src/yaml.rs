//! YAML adapter.

use rackgraph_core::ConfigNode;

use crate::error::ConfigError;
use crate::lower::lower_document;

/// Parse a YAML chain description.
///
/// ```rust
/// let chain = rackgraph_config::parse_yaml(
///     "- type: Gain\n  gain_db: -6\n- type: Reverb\n  room_size: 0.8\n",
/// )
/// .unwrap();
/// assert_eq!(chain.children().len(), 2);
/// ```
pub fn parse_yaml(text: &str) -> Result<ConfigNode, ConfigError> {
    let doc: serde_json::Value = serde_yaml::from_str(text)?;
    lower_document(&doc)
}
