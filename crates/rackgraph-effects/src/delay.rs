//! Feedback delay.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::dsp::{DelayLine, SmoothedParam};
use libm::ceilf;
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, has_param,
    param_value, wet_dry_mix,
};

/// Longest supported delay.
pub const MAX_DELAY_SECONDS: f32 = 4.0;

const TIME: ParamDescriptor =
    ParamDescriptor::new("time", "Time", ParamUnit::Seconds, 0.001, MAX_DELAY_SECONDS, 0.5);
const FEEDBACK: ParamDescriptor =
    ParamDescriptor::new("feedback", "Feedback", ParamUnit::Ratio, 0.0, 0.95, 0.3);
const MIX: ParamDescriptor = ParamDescriptor::new("mix", "Mix", ParamUnit::Ratio, 0.0, 1.0, 0.5);

/// Parameters read by [`Delay`].
pub const PARAMS: &[ParamDescriptor] = &[TIME, FEEDBACK, MIX];

/// Per-channel feedback delay.
///
/// `out = dry * (1 - mix) + delayed * mix`; the line is fed `dry + delayed * feedback`.
#[derive(Debug, Clone)]
pub struct Delay {
    time: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
    lines: Vec<DelayLine>,
}

impl Delay {
    /// Half-second delay, 30% feedback, even mix.
    pub fn new() -> Self {
        Self {
            time: SmoothedParam::new(TIME.default, 50.0),
            feedback: SmoothedParam::new(FEEDBACK.default, 10.0),
            mix: SmoothedParam::new(MIX.default, 10.0),
            sample_rate: 44100.0,
            lines: Vec::new(),
        }
    }

    /// Set the delay time in seconds.
    pub fn set_time(&mut self, seconds: f32) {
        self.time.set_target(TIME.clamp(seconds));
    }

    /// Set the feedback amount.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(FEEDBACK.clamp(feedback));
    }

    /// Set the wet/dry mix.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(MIX.clamp(mix));
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Delay {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        let capacity = ceilf(MAX_DELAY_SECONDS * spec.sample_rate) as usize;
        self.lines = (0..spec.num_channels).map(|_| DelayLine::new(capacity)).collect();
        self.time.prepare(spec.sample_rate);
        self.feedback.prepare(spec.sample_rate);
        self.mix.prepare(spec.sample_rate);
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.num_channels().min(self.lines.len());
        for i in 0..buffer.len() {
            let delay_samples = self.time.advance() * self.sample_rate;
            let feedback = self.feedback.advance();
            let mix = self.mix.advance();
            for ch in 0..channels {
                let line = &mut self.lines[ch];
                let dry = buffer.channel(ch)[i];
                let delayed = line.read(delay_samples);
                line.write(dry + delayed * feedback);
                buffer.channel_mut(ch)[i] = wet_dry_mix(dry, delayed, mix);
            }
        }
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, TIME.key) {
            self.set_time(param_value(node, &TIME));
        }
        if has_param(node, FEEDBACK.key) {
            self.set_feedback(param_value(node, &FEEDBACK));
        }
        if has_param(node, MIX.key) {
            self.set_mix(param_value(node, &MIX));
        }
    }
}
