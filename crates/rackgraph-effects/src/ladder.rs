//! Four-pole ladder filter (registered as `LadderFilter` and `MoogFilter`).
//!
//! Four cascaded one-pole stages with a saturated resonance loop. The
//! response is a weighted sum of the stage outputs:
//!
//! | Mode | Weights (input, s1, s2, s3, s4) |
//! |------|-------------------------------|
//! | LP12 | 0, 0, 1, 0, 0 |
//! | LP24 | 0, 0, 0, 0, 1 |
//! | HP12 | 1, -2, 1, 0, 0 |
//! | HP24 | 1, -4, 6, -4, 1 |
//! | BP12 | 0, 1, -1, 0, 0 |
//! | BP24 | 0, 0, 1, -2, 1 |

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::f32::consts::PI;
use libm::{tanf, tanhf};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, flush_denormal,
    has_param, param_str, param_value,
};

const FREQUENCY: ParamDescriptor =
    ParamDescriptor::new("frequency", "Cutoff", ParamUnit::Hertz, 20.0, 20000.0, 1000.0);
const RESONANCE: ParamDescriptor =
    ParamDescriptor::new("resonance", "Resonance", ParamUnit::Ratio, 0.0, 1.0, 0.0);
const DRIVE: ParamDescriptor =
    ParamDescriptor::new("drive", "Drive", ParamUnit::None, 1.0, 10.0, 1.0);

/// Numeric parameters read by [`LadderFilter`]. The response is chosen by the
/// text attribute `mode`.
pub const PARAMS: &[ParamDescriptor] = &[FREQUENCY, RESONANCE, DRIVE];

/// Ladder response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderMode {
    /// 12 dB/oct low-pass.
    #[default]
    Lp12,
    /// 24 dB/oct low-pass.
    Lp24,
    /// 12 dB/oct high-pass.
    Hp12,
    /// 24 dB/oct high-pass.
    Hp24,
    /// 12 dB/oct band-pass.
    Bp12,
    /// 24 dB/oct band-pass.
    Bp24,
}

impl LadderMode {
    /// Parse `LP12`, `lp24`, `HP12`, ... (ASCII case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        const NAMES: [(&str, LadderMode); 6] = [
            ("LP12", LadderMode::Lp12),
            ("LP24", LadderMode::Lp24),
            ("HP12", LadderMode::Hp12),
            ("HP24", LadderMode::Hp24),
            ("BP12", LadderMode::Bp12),
            ("BP24", LadderMode::Bp24),
        ];
        let name = name.trim();
        NAMES
            .iter()
            .find(|(n, _)| name.eq_ignore_ascii_case(n))
            .map(|(_, mode)| *mode)
    }

    fn weights(self) -> [f32; 5] {
        match self {
            LadderMode::Lp12 => [0.0, 0.0, 1.0, 0.0, 0.0],
            LadderMode::Lp24 => [0.0, 0.0, 0.0, 0.0, 1.0],
            LadderMode::Hp12 => [1.0, -2.0, 1.0, 0.0, 0.0],
            LadderMode::Hp24 => [1.0, -4.0, 6.0, -4.0, 1.0],
            LadderMode::Bp12 => [0.0, 1.0, -1.0, 0.0, 0.0],
            LadderMode::Bp24 => [0.0, 0.0, 1.0, -2.0, 1.0],
        }
    }
}

/// Ladder filter with per-channel state.
#[derive(Debug, Clone)]
pub struct LadderFilter {
    mode: LadderMode,
    frequency: f32,
    resonance: f32,
    drive: f32,
    sample_rate: f32,
    g: f32,
    states: Vec<[f32; 4]>,
}

impl LadderFilter {
    /// 1 kHz LP12, no resonance.
    pub fn new() -> Self {
        let mut filter = Self {
            mode: LadderMode::default(),
            frequency: FREQUENCY.default,
            resonance: RESONANCE.default,
            drive: DRIVE.default,
            sample_rate: 44100.0,
            g: 0.0,
            states: Vec::new(),
        };
        filter.update();
        filter
    }

    /// Current response.
    pub fn mode(&self) -> LadderMode {
        self.mode
    }

    /// Set the response.
    pub fn set_mode(&mut self, mode: LadderMode) {
        self.mode = mode;
    }

    fn update(&mut self) {
        let fc = self.frequency.min(self.sample_rate * 0.45);
        let t = tanf(PI * fc / self.sample_rate);
        self.g = t / (1.0 + t);
    }
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for LadderFilter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.states = (0..spec.num_channels).map(|_| [0.0; 4]).collect();
        self.update();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let weights = self.mode.weights();
        let k = 4.0 * self.resonance;
        let g = self.g;
        let drive = self.drive;
        for (ch, state) in buffer.channels_mut().zip(&mut self.states) {
            for s in ch {
                let mut stage = tanhf(drive * (*s - k * state[3]));
                let mut out = weights[0] * stage;
                for (z, w) in state.iter_mut().zip(&weights[1..]) {
                    let v = g * (stage - *z);
                    let y = v + *z;
                    *z = flush_denormal(y + v);
                    stage = y;
                    out += w * y;
                }
                *s = out;
            }
        }
    }

    fn reset(&mut self) {
        for state in &mut self.states {
            *state = [0.0; 4];
        }
    }

    fn configure(&mut self, node: &ConfigNode) {
        if let Some(mode) = LadderMode::parse(param_str(node, "mode", "")) {
            self.mode = mode;
        }
        if has_param(node, FREQUENCY.key) {
            self.frequency = param_value(node, &FREQUENCY);
        }
        if has_param(node, RESONANCE.key) {
            self.resonance = param_value(node, &RESONANCE);
        }
        if has_param(node, DRIVE.key) {
            self.drive = param_value(node, &DRIVE);
        }
        self.update();
    }
}
