//! Static parameter metadata.
//!
//! Each leaf effect publishes a `const` table of [`ParamDescriptor`]s. The
//! table drives three things: the configuration key the effect reads, the
//! range a configured value is clamped to, and the listing editors and the
//! CLI show to users.
//!
//! ```rust
//! use rackgraph_core::{ParamDescriptor, ParamUnit};
//!
//! const FEEDBACK: ParamDescriptor =
//!     ParamDescriptor::new("feedback", "Feedback", ParamUnit::Ratio, 0.0, 0.95, 0.3);
//!
//! assert_eq!(FEEDBACK.clamp(2.0), 0.95);
//! ```

use core::fmt;

/// Unit a parameter is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Unitless value.
    #[default]
    None,
    /// Decibels.
    Decibels,
    /// Hertz.
    Hertz,
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    Seconds,
    /// Normalised 0..1 (or -1..1) amount.
    Ratio,
}

impl ParamUnit {
    /// Short suffix for display (`"dB"`, `"Hz"`, ...). Empty for unitless values.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::None | ParamUnit::Ratio => "",
            ParamUnit::Decibels => "dB",
            ParamUnit::Hertz => "Hz",
            ParamUnit::Milliseconds => "ms",
            ParamUnit::Seconds => "s",
        }
    }
}

/// Describes one configurable parameter of a leaf effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Configuration key, e.g. `"gain_db"`.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Minimum accepted value.
    pub min: f32,
    /// Maximum accepted value.
    pub max: f32,
    /// Value used when the configuration does not mention the key.
    pub default: f32,
}

impl ParamDescriptor {
    /// Create a descriptor. Usable in `const` tables.
    pub const fn new(
        key: &'static str,
        name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            key,
            name,
            unit,
            min,
            max,
            default,
        }
    }

    /// Clamp a value into `[min, max]`. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

impl fmt::Display for ParamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = self.unit.suffix();
        write!(
            f,
            "{} ({}): {}..{}{}{}, default {}",
            self.key,
            self.name,
            self.min,
            self.max,
            if suffix.is_empty() { "" } else { " " },
            suffix,
            self.default
        )
    }
}
