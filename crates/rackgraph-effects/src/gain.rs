//! Smoothed gain stage.

use crate::dsp::{SmoothedParam, scale_frame};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, db_to_linear,
    has_param, param_value,
};

const GAIN: ParamDescriptor =
    ParamDescriptor::new("gain", "Gain", ParamUnit::Ratio, 0.0, 16.0, 1.0);
const GAIN_DB: ParamDescriptor =
    ParamDescriptor::new("gain_db", "Gain", ParamUnit::Decibels, -100.0, 24.0, 0.0);

/// Parameters read by [`Gain`]. `gain_db` wins when both are present.
pub const PARAMS: &[ParamDescriptor] = &[GAIN, GAIN_DB];

/// Linear gain with a short ramp on changes.
///
/// # Example
///
/// ```rust
/// use rackgraph_core::{AudioBuffer, ConfigNode, Effect, ProcessSpec};
/// use rackgraph_effects::Gain;
///
/// let mut gain = Gain::new();
/// gain.configure(&ConfigNode::new("Effect").with_attribute("gain", 0.5));
/// gain.prepare(&ProcessSpec::default());
///
/// let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4]]);
/// gain.process(&mut buffer);
/// assert_eq!(buffer.channel(0), &[0.5; 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Gain {
    gain: SmoothedParam,
}

impl Gain {
    /// Unity gain.
    pub fn new() -> Self {
        Self {
            gain: SmoothedParam::new(1.0, 50.0),
        }
    }

    /// Set the linear gain.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain.set_target(GAIN.clamp(gain));
    }

    /// Set the gain in decibels.
    pub fn set_gain_db(&mut self, db: f32) {
        self.gain.set_target(db_to_linear(GAIN_DB.clamp(db)));
    }

    /// Target linear gain.
    pub fn gain(&self) -> f32 {
        self.gain.target()
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Gain {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.gain.prepare(spec.sample_rate);
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for i in 0..buffer.len() {
            let g = self.gain.advance();
            scale_frame(buffer, i, g);
        }
    }

    fn reset(&mut self) {
        self.gain.snap_to_target();
    }

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, GAIN.key) {
            self.set_gain(param_value(node, &GAIN));
        }
        if has_param(node, GAIN_DB.key) {
            self.set_gain_db(param_value(node, &GAIN_DB));
        }
    }
}
