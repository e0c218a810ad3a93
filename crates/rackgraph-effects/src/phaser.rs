//! Four-stage allpass phaser with a shared sine LFO.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::dsp::Lfo;
use core::f32::consts::PI;
use libm::{exp2f, tanf};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, flush_denormal,
    has_param, param_value, wet_dry_mix,
};

const STAGES: usize = 4;

const RATE: ParamDescriptor =
    ParamDescriptor::new("rate", "Rate", ParamUnit::Hertz, 0.01, 20.0, 1.0);
const DEPTH: ParamDescriptor =
    ParamDescriptor::new("depth", "Depth", ParamUnit::Ratio, 0.0, 1.0, 0.5);
const FEEDBACK: ParamDescriptor =
    ParamDescriptor::new("feedback", "Feedback", ParamUnit::Ratio, -0.95, 0.95, 0.0);
const MIX: ParamDescriptor = ParamDescriptor::new("mix", "Mix", ParamUnit::Ratio, 0.0, 1.0, 0.5);
const CENTRE: ParamDescriptor = ParamDescriptor::new(
    "centre_frequency",
    "Centre Frequency",
    ParamUnit::Hertz,
    100.0,
    5000.0,
    1000.0,
);

/// Parameters read by [`Phaser`].
pub const PARAMS: &[ParamDescriptor] = &[RATE, DEPTH, FEEDBACK, MIX, CENTRE];

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    stages: [f32; STAGES],
    last: f32,
}

/// Phaser. The notch centre sweeps `depth * 2` octaves either side of
/// `centre_frequency`.
#[derive(Debug, Clone)]
pub struct Phaser {
    rate: f32,
    depth: f32,
    feedback: f32,
    mix: f32,
    centre: f32,
    sample_rate: f32,
    lfo: Lfo,
    channels: Vec<ChannelState>,
}

impl Phaser {
    /// Phaser with the default settings.
    pub fn new() -> Self {
        Self {
            rate: RATE.default,
            depth: DEPTH.default,
            feedback: FEEDBACK.default,
            mix: MIX.default,
            centre: CENTRE.default,
            sample_rate: 44100.0,
            lfo: Lfo::default(),
            channels: Vec::new(),
        }
    }

    fn allpass_coeff(&self, modulation: f32) -> f32 {
        let fc = (self.centre * exp2f(2.0 * self.depth * modulation))
            .clamp(20.0, self.sample_rate * 0.45);
        let t = tanf(PI * fc / self.sample_rate);
        (t - 1.0) / (t + 1.0)
    }
}

impl Default for Phaser {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Phaser {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.lfo.set_rate(self.rate, spec.sample_rate);
        self.lfo.reset();
        self.channels = (0..spec.num_channels).map(|_| ChannelState::default()).collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.num_channels().min(self.channels.len());
        for i in 0..buffer.len() {
            let modulation = self.lfo.next_value();
            let a = self.allpass_coeff(modulation);
            for ch in 0..channels {
                let state = &mut self.channels[ch];
                let dry = buffer.channel(ch)[i];
                let mut x = dry + state.last * self.feedback;
                for s in &mut state.stages {
                    let y = a * x + *s;
                    *s = flush_denormal(x - a * y);
                    x = y;
                }
                state.last = flush_denormal(x);
                buffer.channel_mut(ch)[i] = wet_dry_mix(dry, x, self.mix);
            }
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
        for state in &mut self.channels {
            *state = ChannelState::default();
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
        if has_param(node, CENTRE.key) {
            self.centre = param_value(node, &CENTRE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_mix_is_identity() {
        let mut phaser = Phaser::new();
        phaser.configure(&ConfigNode::new("Effect").with_attribute("mix", 0.0));
        phaser.prepare(&ProcessSpec::new(48000.0, 16, 2));
        let input: Vec<f32> = (0..16).map(|i| (i as f32 * 0.3).sin()).collect();
        let mut buffer = AudioBuffer::from_channels(vec![input.clone(), input.clone()]);
        phaser.process(&mut buffer);
        assert_eq!(buffer.channel(0), input.as_slice());
    }

    #[test]
    fn test_allpass_keeps_energy_bounded() {
        let mut phaser = Phaser::new();
        phaser.configure(
            &ConfigNode::new("Effect")
                .with_attribute("mix", 1.0)
                .with_attribute("feedback", 0.9),
        );
        phaser.prepare(&ProcessSpec::new(48000.0, 4800, 1));
        let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = AudioBuffer::from_channels(vec![input]);
        phaser.process(&mut buffer);
        assert!(buffer.channel(0).iter().all(|s| s.is_finite() && s.abs() < 20.0));
    }

    #[test]
    fn test_lfo_advances_per_sample() {
        let mut phaser = Phaser::new();
        phaser.configure(
            &ConfigNode::new("Effect")
                .with_attribute("mix", 1.0)
                .with_attribute("rate", 5.0)
                .with_attribute("depth", 1.0),
        );
        phaser.prepare(&ProcessSpec::new(48000.0, 2400, 1));
        let input: Vec<f32> = (0..2400).map(|i| (i as f32 * 0.2).sin()).collect();

        let render = |phaser: &mut Phaser| {
            let mut buffer = AudioBuffer::from_channels(vec![input.clone()]);
            phaser.process(&mut buffer);
            buffer
        };
        let first = render(&mut phaser);
        let later = render(&mut phaser);
        assert_ne!(first, later);

        phaser.reset();
        assert_eq!(render(&mut phaser), first);
    }
}
