//! Configuration adapters for rackgraph.
//!
//! Turns configuration text into the canonical [`ConfigNode`] tree consumed
//! by the graph builder. Four formats are supported, all producing the same
//! shape: a `Chain` root with one child per top-level descriptor.
//!
//! | Format | Parser | Root |
//! |--------|--------|------|
//! | YAML | `serde_yaml` | sequence of descriptors, or mapping with `effects` |
//! | JSON | `serde_json` | same as YAML |
//! | TOML | `toml` | `effects` array of tables |
//! | XML | `roxmltree` | element tree, mapped one-to-one |
//!
//! # Example
//!
//! ```rust
//! use rackgraph_config::{ConfigFormat, parse_str};
//! use rackgraph_core::param_f32;
//!
//! let yaml = "
//! - type: Gain
//!   gain_db: -6
//! - type: Group
//!   mode: parallel
//!   children:
//!     - type: Delay
//!       time: 0.25
//!     - type: Reverb
//! ";
//! assert_eq!(ConfigFormat::detect(yaml), ConfigFormat::Yaml);
//!
//! let chain = parse_str(yaml).unwrap();
//! assert_eq!(chain.children().len(), 2);
//! assert_eq!(param_f32(&chain.children()[0], "gain_db", 0.0), -6.0);
//! ```
//!
//! Parsing never touches the effect registry: whether a `type` exists is the
//! graph builder's concern.

mod error;
mod format;
mod json;
mod load;
mod lower;
mod toml;
mod xml;
mod yaml;

pub use error::ConfigError;
pub use format::ConfigFormat;
pub use json::parse_json;
pub use load::{load_file, parse_str};
pub use lower::{CHILDREN_KEY, EFFECT_TAG, EFFECTS_KEY, ITEM_TAG};
pub use self::toml::parse_toml;
pub use xml::parse_xml;
pub use yaml::parse_yaml;

pub use rackgraph_core::ConfigNode;
