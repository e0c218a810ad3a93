//! Peak limiter with instant attack.

use crate::dsp::{frame_peak, scale_frame, time_coeff};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, db_to_linear,
    flush_denormal, has_param, param_value,
};

const THRESHOLD: ParamDescriptor =
    ParamDescriptor::new("threshold", "Threshold", ParamUnit::Decibels, -40.0, 0.0, -1.0);
const RELEASE: ParamDescriptor =
    ParamDescriptor::new("release", "Release", ParamUnit::Milliseconds, 1.0, 2000.0, 100.0);

/// Parameters read by [`Limiter`].
pub const PARAMS: &[ParamDescriptor] = &[THRESHOLD, RELEASE];

/// Brickwall-style peak limiter.
///
/// The detector jumps to any new peak immediately and decays with the
/// release time, so output never exceeds the threshold.
#[derive(Debug, Clone)]
pub struct Limiter {
    threshold_db: f32,
    release_ms: f32,
    ceiling: f32,
    release_coeff: f32,
    peak: f32,
}

impl Limiter {
    /// Limiter at -1 dB.
    pub fn new() -> Self {
        Self {
            threshold_db: THRESHOLD.default,
            release_ms: RELEASE.default,
            ceiling: db_to_linear(THRESHOLD.default),
            release_coeff: time_coeff(RELEASE.default, 44100.0),
            peak: 0.0,
        }
    }

    /// Linear ceiling.
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Limiter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.release_coeff = time_coeff(self.release_ms, spec.sample_rate);
        self.peak = 0.0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for i in 0..buffer.len() {
            let x = frame_peak(buffer, i);
            self.peak = flush_denormal(x.max(self.peak * self.release_coeff));
            if self.peak > self.ceiling {
                scale_frame(buffer, i, self.ceiling / self.peak);
            }
        }
    }

    fn reset(&mut self) {
        self.peak = 0.0;
    }

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, THRESHOLD.key) {
            self.threshold_db = param_value(node, &THRESHOLD);
            self.ceiling = db_to_linear(self.threshold_db);
        }
        if has_param(node, RELEASE.key) {
            self.release_ms = param_value(node, &RELEASE);
        }
    }
}
