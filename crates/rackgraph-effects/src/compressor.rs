//! Feed-forward compressor.
//!
//! ```text
//! Input → Peak Envelope (linked) → Gain Computer → Gain Reduction → Output
//! ```
//!
//! | Parameter | Range | Default |
//! |-----------|-------|---------|
//! | `threshold` | -60 to 0 dB | -12 |
//! | `ratio` | 1 to 20 | 4 |
//! | `attack` | 0.1 to 500 ms | 10 |
//! | `release` | 1 to 2000 ms | 100 |

use crate::dsp::{EnvelopeFollower, frame_peak, scale_frame};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, db_to_linear,
    has_param, linear_to_db, param_value,
};

const THRESHOLD: ParamDescriptor =
    ParamDescriptor::new("threshold", "Threshold", ParamUnit::Decibels, -60.0, 0.0, -12.0);
const RATIO: ParamDescriptor =
    ParamDescriptor::new("ratio", "Ratio", ParamUnit::None, 1.0, 20.0, 4.0);
const ATTACK: ParamDescriptor =
    ParamDescriptor::new("attack", "Attack", ParamUnit::Milliseconds, 0.1, 500.0, 10.0);
const RELEASE: ParamDescriptor =
    ParamDescriptor::new("release", "Release", ParamUnit::Milliseconds, 1.0, 2000.0, 100.0);

/// Parameters read by [`Compressor`].
pub const PARAMS: &[ParamDescriptor] = &[THRESHOLD, RATIO, ATTACK, RELEASE];

/// Hard-knee compressor with stereo-linked detection.
#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f32,
    ratio: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f32,
    envelope: EnvelopeFollower,
}

impl Compressor {
    /// Compressor with the default settings.
    pub fn new() -> Self {
        Self {
            threshold_db: THRESHOLD.default,
            ratio: RATIO.default,
            attack_ms: ATTACK.default,
            release_ms: RELEASE.default,
            sample_rate: 44100.0,
            envelope: EnvelopeFollower::default(),
        }
    }

    /// Static gain in dB applied to a detector level in dB.
    #[inline]
    pub fn gain_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        if over <= 0.0 { 0.0 } else { -over * (1.0 - 1.0 / self.ratio) }
    }

    fn update(&mut self) {
        self.envelope.set_times(self.attack_ms, self.release_ms, self.sample_rate);
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Compressor {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.update();
        self.envelope.reset();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for i in 0..buffer.len() {
            let level = self.envelope.process(frame_peak(buffer, i));
            let gain = db_to_linear(self.gain_db(linear_to_db(level)));
            scale_frame(buffer, i, gain);
        }
    }

    fn reset(&mut self) {
        self.envelope.reset();
    }

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, THRESHOLD.key) {
            self.threshold_db = param_value(node, &THRESHOLD);
        }
        if has_param(node, RATIO.key) {
            self.ratio = param_value(node, &RATIO);
        }
        if has_param(node, ATTACK.key) {
            self.attack_ms = param_value(node, &ATTACK);
        }
        if has_param(node, RELEASE.key) {
            self.release_ms = param_value(node, &RELEASE);
        }
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_computer() {
        let mut comp = Compressor::new();
        comp.configure(
            &ConfigNode::new("Effect")
                .with_attribute("threshold", -20.0)
                .with_attribute("ratio", 4.0),
        );
        assert_eq!(comp.gain_db(-30.0), 0.0);
        assert!((comp.gain_db(-8.0) - -9.0).abs() < 1e-5);
    }

    #[test]
    fn test_reduces_loud_signal() {
        let mut comp = Compressor::new();
        comp.configure(
            &ConfigNode::new("Effect")
                .with_attribute("threshold", -20.0)
                .with_attribute("ratio", 10.0)
                .with_attribute("attack", 0.1),
        );
        comp.prepare(&ProcessSpec::new(48000.0, 4800, 2));
        let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 4800], vec![1.0; 4800]]);
        comp.process(&mut buffer);
        let tail = buffer.channel(0)[4799];
        assert!(tail < 0.25, "compressed level {tail}");
        assert_eq!(buffer.channel(0)[4799], buffer.channel(1)[4799]);
    }
}
