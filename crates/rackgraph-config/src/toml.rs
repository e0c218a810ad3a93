//! TOML adapter.
//!
//! TOML documents are tables, so the descriptors live in an `effects` array
//! of tables:
//!
//! ```toml
//! [[effects]]
//! type = "Gain"
//! gain_db = -6.0
//!
//! [[effects]]
//! type = "Group"
//! mode = "parallel"
//!
//! [[effects.children]]
//! type = "Delay"
//! ```

use rackgraph_core::ConfigNode;

use crate::error::ConfigError;
use crate::lower::lower_document;

/// Parse a TOML chain description.
pub fn parse_toml(text: &str) -> Result<ConfigNode, ConfigError> {
    let doc: serde_json::Value = ::toml::from_str(text)?;
    lower_document(&doc)
}
