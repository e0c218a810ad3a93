//! Configuration format detection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rackgraph_core::ConfigNode;

use crate::error::ConfigError;

/// Supported configuration text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// JSON (`.json`)
    Json,
    /// XML (`.xml`)
    Xml,
    /// TOML (`.toml`)
    Toml,
}

impl ConfigFormat {
    /// All formats.
    pub const ALL: [ConfigFormat; 4] = [
        ConfigFormat::Yaml,
        ConfigFormat::Json,
        ConfigFormat::Xml,
        ConfigFormat::Toml,
    ];

    /// Lower-case format name.
    pub const fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Json => "json",
            ConfigFormat::Xml => "xml",
            ConfigFormat::Toml => "toml",
        }
    }

    /// Guess the format from the text itself.
    ///
    /// Leading whitespace and `#` comment lines are skipped. Then a leading
    /// `<` means XML, `[[` followed by a key (`[[effects]]`) means TOML, `{`
    /// or `[` means JSON, and anything else is YAML.
    pub fn detect(text: &str) -> Self {
        let body = text
            .trim_start_matches('\u{feff}')
            .lines()
            .map(str::trim_start)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .unwrap_or("");

        if body.starts_with('<') {
            ConfigFormat::Xml
        } else if body
            .strip_prefix("[[")
            .and_then(|rest| rest.trim_start().chars().next())
            .is_some_and(|c| c.is_alphabetic() || c == '_')
        {
            ConfigFormat::Toml
        } else if body.starts_with('{') || body.starts_with('[') {
            ConfigFormat::Json
        } else {
            ConfigFormat::Yaml
        }
    }

    /// Format for a file extension (without the dot, ASCII case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            "xml" => Some(ConfigFormat::Xml),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Format for a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse `text` as this format.
    pub fn parse(self, text: &str) -> Result<ConfigNode, ConfigError> {
        match self {
            ConfigFormat::Yaml => crate::parse_yaml(text),
            ConfigFormat::Json => crate::parse_json(text),
            ConfigFormat::Xml => crate::parse_xml(text),
            ConfigFormat::Toml => crate::parse_toml(text),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim().trim_start_matches('.'))
            .ok_or_else(|| ConfigError::UnsupportedFormat(s.to_string()))
    }
}
