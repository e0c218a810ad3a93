//! Noise gate as a downward expander (registered as `NoiseGate` and `Gate`).

use crate::dsp::{EnvelopeFollower, frame_peak, scale_frame};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, db_to_linear,
    has_param, linear_to_db, param_value,
};

const THRESHOLD: ParamDescriptor =
    ParamDescriptor::new("threshold", "Threshold", ParamUnit::Decibels, -100.0, 0.0, -60.0);
const RATIO: ParamDescriptor =
    ParamDescriptor::new("ratio", "Ratio", ParamUnit::None, 1.0, 100.0, 2.0);
const ATTACK: ParamDescriptor =
    ParamDescriptor::new("attack", "Attack", ParamUnit::Milliseconds, 0.1, 500.0, 2.0);
const RELEASE: ParamDescriptor =
    ParamDescriptor::new("release", "Release", ParamUnit::Milliseconds, 1.0, 5000.0, 100.0);

/// Parameters read by [`NoiseGate`].
pub const PARAMS: &[ParamDescriptor] = &[THRESHOLD, RATIO, ATTACK, RELEASE];

/// Attenuates signal below the threshold by `(threshold - level) * (ratio - 1)` dB.
#[derive(Debug, Clone)]
pub struct NoiseGate {
    threshold_db: f32,
    ratio: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f32,
    envelope: EnvelopeFollower,
}

impl NoiseGate {
    /// Gate at -60 dB, ratio 2.
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

    /// Gain in dB for a detector level in dB. Never positive.
    #[inline]
    pub fn gain_db(&self, level_db: f32) -> f32 {
        let under = self.threshold_db - level_db;
        if under <= 0.0 { 0.0 } else { (-under * (self.ratio - 1.0)).max(-120.0) }
    }

    fn update(&mut self) {
        self.envelope.set_times(self.attack_ms, self.release_ms, self.sample_rate);
    }
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for NoiseGate {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.update();
        self.envelope.reset();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for i in 0..buffer.len() {
            let level = self.envelope.process(frame_peak(buffer, i));
            scale_frame(buffer, i, db_to_linear(self.gain_db(linear_to_db(level))));
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
