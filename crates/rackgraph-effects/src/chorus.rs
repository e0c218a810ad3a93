//! Modulated-delay chorus.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::dsp::{DelayLine, Lfo};
use libm::ceilf;
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, has_param,
    param_value, wet_dry_mix,
};

/// Modulation swing at `depth = 1`.
const MAX_SWING_MS: f32 = 10.0;

const RATE: ParamDescriptor =
    ParamDescriptor::new("rate", "Rate", ParamUnit::Hertz, 0.01, 20.0, 1.0);
const DEPTH: ParamDescriptor =
    ParamDescriptor::new("depth", "Depth", ParamUnit::Ratio, 0.0, 1.0, 0.25);
const FEEDBACK: ParamDescriptor =
    ParamDescriptor::new("feedback", "Feedback", ParamUnit::Ratio, -0.95, 0.95, 0.0);
const MIX: ParamDescriptor = ParamDescriptor::new("mix", "Mix", ParamUnit::Ratio, 0.0, 1.0, 0.5);
const DELAY: ParamDescriptor =
    ParamDescriptor::new("delay", "Centre Delay", ParamUnit::Milliseconds, 1.0, 100.0, 7.0);

/// Parameters read by [`Chorus`].
pub const PARAMS: &[ParamDescriptor] = &[RATE, DEPTH, FEEDBACK, MIX, DELAY];

/// Chorus: each channel reads its delay line at
/// `delay + depth * 10 ms * lfo`, with odd channels on the inverted LFO.
#[derive(Debug, Clone)]
pub struct Chorus {
    rate: f32,
    depth: f32,
    feedback: f32,
    mix: f32,
    delay_ms: f32,
    sample_rate: f32,
    lfo: Lfo,
    lines: Vec<DelayLine>,
}

impl Chorus {
    /// Chorus with the default settings.
    pub fn new() -> Self {
        Self {
            rate: RATE.default,
            depth: DEPTH.default,
            feedback: FEEDBACK.default,
            mix: MIX.default,
            delay_ms: DELAY.default,
            sample_rate: 44100.0,
            lfo: Lfo::default(),
            lines: Vec::new(),
        }
    }
}

impl Default for Chorus {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Chorus {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.lfo.set_rate(self.rate, spec.sample_rate);
        self.lfo.reset();
        let capacity = ceilf((DELAY.max + MAX_SWING_MS) * 0.001 * spec.sample_rate) as usize;
        self.lines = (0..spec.num_channels).map(|_| DelayLine::new(capacity)).collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.num_channels().min(self.lines.len());
        let ms_to_samples = 0.001 * self.sample_rate;
        for i in 0..buffer.len() {
            let swing = self.depth * MAX_SWING_MS * self.lfo.next_value();
            for ch in 0..channels {
                let polarity = if ch % 2 == 0 { 1.0 } else { -1.0 };
                let delay = (self.delay_ms + polarity * swing) * ms_to_samples;
                let line = &mut self.lines[ch];
                let dry = buffer.channel(ch)[i];
                let wet = line.read(delay);
                line.write(dry + wet * self.feedback);
                buffer.channel_mut(ch)[i] = wet_dry_mix(dry, wet, self.mix);
            }
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
        for line in &mut self.lines {
            line.clear();
        }
    }

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, RATE.key) {
            self.rate = param_value(node, &RATE);
            self.lfo.set_rate(self.rate, self.sample_rate);
        }
        if has_param(node, DEPTH.key) {
            self.depth = param_value(node, &DEPTH);
        }
        if has_param(node, FEEDBACK.key) {
            self.feedback = param_value(node, &FEEDBACK);
        }
        if has_param(node, MIX.key) {
            self.mix = param_value(node, &MIX);
        }
        if has_param(node, DELAY.key) {
            self.delay_ms = param_value(node, &DELAY);
        }
    }
}
