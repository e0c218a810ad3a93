//! Stereo panner (registered as `Panner` and `Pan`).

use core::f32::consts::{FRAC_PI_2, SQRT_2};
use libm::{powf, sinf, sqrtf};
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, has_param,
    param_str, param_value,
};

const PAN: ParamDescriptor = ParamDescriptor::new("pan", "Pan", ParamUnit::Ratio, -1.0, 1.0, 0.0);

/// Numeric parameters read by [`Panner`]. The law is chosen by the text
/// attribute `rule`.
pub const PARAMS: &[ParamDescriptor] = &[PAN];

/// Pan law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanRule {
    /// Straight crossfade, +6 dB at the edges.
    Linear,
    /// Attenuates only the far side; centre is unity.
    #[default]
    Balanced,
    /// Sine law, -3 dB at centre.
    Sin3dB,
    /// Sine law, -4.5 dB at centre.
    Sin4p5dB,
    /// Sine law, -6 dB at centre.
    Sin6dB,
    /// Square-root law, -3 dB at centre.
    SquareRoot3dB,
    /// Square-root law, -4.5 dB at centre.
    SquareRoot4p5dB,
}

impl PanRule {
    /// Parse a rule name, ASCII case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let is = |options: &[&str]| options.iter().any(|o| name.eq_ignore_ascii_case(o));
        if is(&["linear"]) {
            Some(PanRule::Linear)
        } else if is(&["balanced"]) {
            Some(PanRule::Balanced)
        } else if is(&["sin3db"]) {
            Some(PanRule::Sin3dB)
        } else if is(&["sin4.5db", "sin4p5db"]) {
            Some(PanRule::Sin4p5dB)
        } else if is(&["sin6db"]) {
            Some(PanRule::Sin6dB)
        } else if is(&["square", "sqrt3db", "squareroot3db"]) {
            Some(PanRule::SquareRoot3dB)
        } else if is(&["sqrt4.5db", "squareroot4.5db", "squareroot4p5db"]) {
            Some(PanRule::SquareRoot4p5dB)
        } else {
            None
        }
    }

    /// Left and right gains for `pan` in `[-1, 1]`.
    pub fn gains(self, pan: f32) -> (f32, f32) {
        let p = (pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
        let boost_4p5 = powf(2.0, 0.75);
        match self {
            PanRule::Linear => (2.0 * (1.0 - p), 2.0 * p),
            PanRule::Balanced => (2.0 * (1.0 - p).min(0.5), 2.0 * p.min(0.5)),
            PanRule::Sin3dB => (SQRT_2 * sinf(FRAC_PI_2 * (1.0 - p)), SQRT_2 * sinf(FRAC_PI_2 * p)),
            PanRule::Sin4p5dB => (
                boost_4p5 * powf(sinf(FRAC_PI_2 * (1.0 - p)), 1.5),
                boost_4p5 * powf(sinf(FRAC_PI_2 * p), 1.5),
            ),
            PanRule::Sin6dB => {
                let (l, r) = (sinf(FRAC_PI_2 * (1.0 - p)), sinf(FRAC_PI_2 * p));
                (2.0 * l * l, 2.0 * r * r)
            }
            PanRule::SquareRoot3dB => (SQRT_2 * sqrtf(1.0 - p), SQRT_2 * sqrtf(p)),
            PanRule::SquareRoot4p5dB => (
                boost_4p5 * powf(sqrtf(1.0 - p), 1.5),
                boost_4p5 * powf(sqrtf(p), 1.5),
            ),
        }
    }
}

/// Applies a pan law to the first two channels. Mono buffers pass through.
#[derive(Debug, Clone)]
pub struct Panner {
    pan: f32,
    rule: PanRule,
    left: f32,
    right: f32,
}

impl Panner {
    /// Centred, balanced law.
    pub fn new() -> Self {
        let rule = PanRule::default();
        let (left, right) = rule.gains(0.0);
        Self {
            pan: 0.0,
            rule,
            left,
            right,
        }
    }

    /// Set the position, -1 (left) to 1 (right).
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = PAN.clamp(pan);
        self.update();
    }

    /// Set the pan law.
    pub fn set_rule(&mut self, rule: PanRule) {
        self.rule = rule;
        self.update();
    }

    /// Current left and right gains.
    pub fn gains(&self) -> (f32, f32) {
        (self.left, self.right)
    }

    fn update(&mut self) {
        (self.left, self.right) = self.rule.gains(self.pan);
    }
}

impl Default for Panner {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Panner {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if buffer.num_channels() < 2 {
            return;
        }
        for s in buffer.channel_mut(0) {
            *s *= self.left;
        }
        for s in buffer.channel_mut(1) {
            *s *= self.right;
        }
    }

    fn reset(&mut self) {}

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, PAN.key) {
            self.pan = param_value(node, &PAN);
        }
        if let Some(rule) = PanRule::parse(param_str(node, "rule", "")) {
            self.rule = rule;
        }
        self.update();
    }
}
