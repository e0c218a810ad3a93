//! Biquad filter (registered as `Filter` and `EQ`).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::dsp::{Biquad, BiquadKind};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, has_param,
    param_str, param_value,
};

const FREQUENCY: ParamDescriptor =
    ParamDescriptor::new("frequency", "Frequency", ParamUnit::Hertz, 20.0, 20000.0, 1000.0);
const Q: ParamDescriptor = ParamDescriptor::new("q", "Q", ParamUnit::None, 0.1, 20.0, 0.707);

/// Numeric parameters read by [`Filter`]. The response is chosen by the text
/// attribute `mode` (`LowPass`, `HighPass` or `BandPass`).
pub const PARAMS: &[ParamDescriptor] = &[FREQUENCY, Q];

/// Parse a filter response name, ASCII case-insensitive.
///
/// Accepts the long names and the usual short forms (`lp`, `lpf`, ...).
pub fn parse_kind(name: &str) -> Option<BiquadKind> {
    let name = name.trim();
    let is = |options: &[&str]| options.iter().any(|o| name.eq_ignore_ascii_case(o));
    if is(&["lowpass", "low_pass", "lp", "lpf"]) {
        Some(BiquadKind::LowPass)
    } else if is(&["highpass", "high_pass", "hp", "hpf"]) {
        Some(BiquadKind::HighPass)
    } else if is(&["bandpass", "band_pass", "bp", "bpf"]) {
        Some(BiquadKind::BandPass)
    } else {
        None
    }
}

/// Second-order filter, one biquad per channel.
#[derive(Debug, Clone)]
pub struct Filter {
    kind: BiquadKind,
    frequency: f32,
    q: f32,
    sample_rate: f32,
    channels: Vec<Biquad>,
}

impl Filter {
    /// 1 kHz Butterworth low-pass.
    pub fn new() -> Self {
        Self {
            kind: BiquadKind::LowPass,
            frequency: FREQUENCY.default,
            q: Q.default,
            sample_rate: 44100.0,
            channels: Vec::new(),
        }
    }

    /// Set the response.
    pub fn set_kind(&mut self, kind: BiquadKind) {
        self.kind = kind;
        self.update();
    }

    /// Set the cutoff or centre frequency in Hz.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = FREQUENCY.clamp(frequency);
        self.update();
    }

    /// Set the resonance.
    pub fn set_q(&mut self, q: f32) {
        self.q = Q.clamp(q);
        self.update();
    }

    /// Current response.
    pub fn kind(&self) -> BiquadKind {
        self.kind
    }

    fn update(&mut self) {
        for bq in &mut self.channels {
            bq.set(self.kind, self.frequency, self.q, self.sample_rate);
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Filter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.channels = (0..spec.num_channels).map(|_| Biquad::new()).collect();
        self.update();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for (ch, bq) in buffer.channels_mut().zip(&mut self.channels) {
            for s in ch {
                *s = bq.process(*s);
            }
        }
    }

    fn reset(&mut self) {
        for bq in &mut self.channels {
            bq.clear();
        }
    }

    fn configure(&mut self, node: &ConfigNode) {
        if let Some(kind) = parse_kind(param_str(node, "mode", "")) {
            self.kind = kind;
        }
        if has_param(node, FREQUENCY.key) {
            self.frequency = param_value(node, &FREQUENCY);
        }
        if has_param(node, Q.key) {
            self.q = param_value(node, &Q);
        }
        self.update();
    }
}
