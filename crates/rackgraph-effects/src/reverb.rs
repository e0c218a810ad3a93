//! Freeverb-style reverb.
//!
//! Eight damped comb filters in parallel feed four allpasses in series, per
//! channel. The second channel's delays are offset by a fixed stereo spread.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, flush_denormal,
    has_param, param_value,
};

/// Comb delays at 44.1 kHz.
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
/// Allpass delays at 44.1 kHz.
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;
const REFERENCE_RATE: f32 = 44100.0;
const INPUT_GAIN: f32 = 0.015;

const ROOM_SIZE: ParamDescriptor =
    ParamDescriptor::new("room_size", "Room Size", ParamUnit::Ratio, 0.0, 1.0, 0.5);
const DAMPING: ParamDescriptor =
    ParamDescriptor::new("damping", "Damping", ParamUnit::Ratio, 0.0, 1.0, 0.5);
const WET: ParamDescriptor =
    ParamDescriptor::new("wet", "Wet Level", ParamUnit::Ratio, 0.0, 1.0, 0.33);
const DRY: ParamDescriptor =
    ParamDescriptor::new("dry", "Dry Level", ParamUnit::Ratio, 0.0, 1.0, 0.4);
const WIDTH: ParamDescriptor =
    ParamDescriptor::new("width", "Width", ParamUnit::Ratio, 0.0, 1.0, 1.0);

/// Parameters read by [`Reverb`].
pub const PARAMS: &[ParamDescriptor] = &[ROOM_SIZE, DAMPING, WET, DRY, WIDTH];

fn scaled(samples: usize, sample_rate: f32) -> usize {
    ((samples as f32 * sample_rate / REFERENCE_RATE) as usize).max(1)
}

#[derive(Debug, Clone)]
struct Comb {
    buffer: Vec<f32>,
    pos: usize,
    store: f32,
}

impl Comb {
    fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
            pos: 0,
            store: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, x: f32, feedback: f32, damp: f32) -> f32 {
        let out = self.buffer[self.pos];
        self.store = flush_denormal(out * (1.0 - damp) + self.store * damp);
        self.buffer[self.pos] = x + self.store * feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        out
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.store = 0.0;
    }
}

#[derive(Debug, Clone)]
struct Allpass {
    buffer: Vec<f32>,
    pos: usize,
}

impl Allpass {
    fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
            pos: 0,
        }
    }

    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        self.buffer[self.pos] = flush_denormal(x + delayed * 0.5);
        self.pos = (self.pos + 1) % self.buffer.len();
        delayed - x
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}

#[derive(Debug, Clone)]
struct Tank {
    combs: Vec<Comb>,
    allpasses: Vec<Allpass>,
}

impl Tank {
    fn new(sample_rate: f32, spread: usize) -> Self {
        Self {
            combs: COMB_TUNINGS
                .iter()
                .map(|&n| Comb::new(scaled(n + spread, sample_rate)))
                .collect(),
            allpasses: ALLPASS_TUNINGS
                .iter()
                .map(|&n| Allpass::new(scaled(n + spread, sample_rate)))
                .collect(),
        }
    }

    #[inline]
    fn process(&mut self, x: f32, feedback: f32, damp: f32) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(x, feedback, damp);
        }
        for ap in &mut self.allpasses {
            out = ap.process(out);
        }
        out
    }

    fn clear(&mut self) {
        self.combs.iter_mut().for_each(Comb::clear);
        self.allpasses.iter_mut().for_each(Allpass::clear);
    }
}

/// Stereo reverb. Mono input uses one tank; channels past the second are untouched.
#[derive(Debug, Clone)]
pub struct Reverb {
    room_size: f32,
    damping: f32,
    wet: f32,
    dry: f32,
    width: f32,
    tanks: Vec<Tank>,
}

impl Reverb {
    /// Reverb with the default settings.
    pub fn new() -> Self {
        Self {
            room_size: ROOM_SIZE.default,
            damping: DAMPING.default,
            wet: WET.default,
            dry: DRY.default,
            width: WIDTH.default,
            tanks: Vec::new(),
        }
    }

    fn feedback(&self) -> f32 {
        self.room_size * 0.28 + 0.7
    }

    fn damp(&self) -> f32 {
        self.damping * 0.4
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Reverb {
    fn prepare(&mut self, spec: &ProcessSpec) {
        let tanks = spec.num_channels.min(2);
        self.tanks = (0..tanks)
            .map(|ch| Tank::new(spec.sample_rate, ch * STEREO_SPREAD))
            .collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let feedback = self.feedback();
        let damp = self.damp();
        let wet1 = self.wet * (self.width / 2.0 + 0.5);
        let wet2 = self.wet * ((1.0 - self.width) / 2.0);

        match (buffer.num_channels().min(self.tanks.len()), self.tanks.as_mut_slice()) {
            (2, [left_tank, right_tank]) => {
                for i in 0..buffer.len() {
                    let l = buffer.channel(0)[i];
                    let r = buffer.channel(1)[i];
                    let input = (l + r) * INPUT_GAIN;
                    let out_l = left_tank.process(input, feedback, damp);
                    let out_r = right_tank.process(input, feedback, damp);
                    buffer.channel_mut(0)[i] = out_l * wet1 + out_r * wet2 + l * self.dry;
                    buffer.channel_mut(1)[i] = out_r * wet1 + out_l * wet2 + r * self.dry;
                }
            }
            (1, [tank, ..]) => {
                for s in buffer.channel_mut(0) {
                    let out = tank.process(*s * INPUT_GAIN * 2.0, feedback, damp);
                    *s = out * (wet1 + wet2) + *s * self.dry;
                }
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.tanks.iter_mut().for_each(Tank::clear);
    }

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, ROOM_SIZE.key) {
            self.room_size = param_value(node, &ROOM_SIZE);
        }
        if has_param(node, DAMPING.key) {
            self.damping = param_value(node, &DAMPING);
        }
        if has_param(node, WET.key) {
            self.wet = param_value(node, &WET);
        }
        if has_param(node, DRY.key) {
            self.dry = param_value(node, &DRY);
        }
        if has_param(node, WIDTH.key) {
            self.width = param_value(node, &WIDTH);
        }
    }
}
