//! JSON adapter.

use rackgraph_core::ConfigNode;

use crate::error::ConfigError;
use crate::lower::lower_document;

/// Parse a JSON chain description. Same schema as YAML.
pub fn parse_json(text: &str) -> Result<ConfigNode, ConfigError> {
    let doc: serde_json::Value = serde_json::from_str(text)?;
    lower_document(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackgraph_core::ScalarValue;

    #[test]
    fn mapping_root() {
        let chain =
            parse_json(r#"{"effects":[{"type":"Delay","time":0.25,"sync":false}]}"#).unwrap();
        let delay = &chain.children()[0];
        assert_eq!(delay.attribute("time"), Some(&ScalarValue::Number(0.25)));
        assert_eq!(delay.attribute("sync"), Some(&ScalarValue::Bool(false)));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(parse_json("[{\"type\":"), Err(ConfigError::Json(_))));
    }
}
