//! Loading configuration from strings and files.

use std::path::Path;

use rackgraph_core::ConfigNode;

use crate::error::ConfigError;
use crate::format::ConfigFormat;

/// Parse configuration text, detecting its format.
///
/// See [`ConfigFormat::detect`] for the rules. Text detected as JSON that
/// the JSON parser rejects is retried as YAML, so flow-style YAML such as
/// `[{type: Gain}]` loads too; if both fail the JSON error is returned.
pub fn parse_str(text: &str) -> Result<ConfigNode, ConfigError> {
    match ConfigFormat::detect(text) {
        ConfigFormat::Json => ConfigFormat::Json
            .parse(text)
            .or_else(|err| ConfigFormat::Yaml.parse(text).map_err(|_| err)),
        format => format.parse(text),
    }
}

/// Read and parse a configuration file.
///
/// The format comes from the file extension. Files without a recognised
/// extension fall back to content detection.
pub fn load_file(path: impl AsRef<Path>) -> Result<ConfigNode, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    match ConfigFormat::from_path(path) {
        Some(format) => format.parse(&text),
        None => parse_str(&text),
    }
}
