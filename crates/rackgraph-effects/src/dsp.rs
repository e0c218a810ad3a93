//! Small DSP building blocks shared by the leaf effects.
//!
//! Everything here is per-channel state that an effect allocates in
//! `prepare` and advances sample by sample in `process`.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::f32::consts::PI;
use libm::{cosf, expf, fabsf, floorf, sinf};
use rackgraph_core::{AudioBuffer, flush_denormal};

/// One-pole smoothed parameter for zipper-free changes.
///
/// `prepare` snaps the current value to the target, so a freshly configured
/// effect starts exactly on its configured value.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    smoothing_ms: f32,
}

impl SmoothedParam {
    /// Create a parameter that smooths over `smoothing_ms` once prepared.
    pub fn new(initial: f32, smoothing_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            smoothing_ms,
        }
    }

    /// Derive the smoothing coefficient for `sample_rate` and jump to the target.
    pub fn prepare(&mut self, sample_rate: f32) {
        let samples = self.smoothing_ms * 0.001 * sample_rate;
        self.coeff = if samples > 1.0 { 1.0 - expf(-1.0 / samples) } else { 1.0 };
        self.current = self.target;
    }

    /// Set the value to glide towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }
}

/// Biquad response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiquadKind {
    /// Second-order low-pass.
    #[default]
    LowPass,
    /// Second-order high-pass.
    HighPass,
    /// Constant 0 dB peak band-pass.
    BandPass,
}

/// Direct Form I biquad with RBJ cookbook coefficients.
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Passthrough filter.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            ..Self::default()
        }
    }

    /// Recompute coefficients. `frequency` is clamped below Nyquist.
    pub fn set(&mut self, kind: BiquadKind, frequency: f32, q: f32, sample_rate: f32) {
        let frequency = frequency.clamp(1.0, sample_rate * 0.49);
        let omega = 2.0 * PI * frequency / sample_rate;
        let (sin_w, cos_w) = (sinf(omega), cosf(omega));
        let alpha = sin_w / (2.0 * q.max(0.01));

        let (b0, b1, b2) = match kind {
            BiquadKind::LowPass => ((1.0 - cos_w) / 2.0, 1.0 - cos_w, (1.0 - cos_w) / 2.0),
            BiquadKind::HighPass => ((1.0 + cos_w) / 2.0, -(1.0 + cos_w), (1.0 + cos_w) / 2.0),
            BiquadKind::BandPass => (alpha, 0.0, -alpha),
        };
        let a0 = 1.0 + alpha;
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = flush_denormal(y);
        y
    }

    /// Clear history, keep coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Ring-buffer delay line with linear interpolation.
#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Allocate room for delays up to `max_delay` samples.
    pub fn new(max_delay: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay + 2],
            write_pos: 0,
        }
    }

    /// Longest delay that can be read, in samples.
    pub fn max_delay(&self) -> f32 {
        self.buffer.len().saturating_sub(2) as f32
    }

    /// Read `delay` samples back; `1.0` is the most recent write. Clamped to
    /// `1..=max_delay`.
    #[inline]
    pub fn read(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        if len < 3 {
            return 0.0;
        }
        let delay = delay.clamp(1.0, self.max_delay());
        let whole = floorf(delay);
        let frac = delay - whole;
        let i0 = (self.write_pos + len - (whole as usize - 1)) % len;
        let i1 = (i0 + len - 1) % len;
        self.buffer[i0] * (1.0 - frac) + self.buffer[i1] * frac
    }

    /// Push one sample.
    #[inline]
    pub fn write(&mut self, x: f32) {
        if self.buffer.is_empty() {
            return;
        }
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.buffer[self.write_pos] = flush_denormal(x);
    }

    /// Zero the contents.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Sine low-frequency oscillator, output in `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    phase: f32,
    increment: f32,
}

impl Lfo {
    /// Set the rate in Hz.
    pub fn set_rate(&mut self, rate_hz: f32, sample_rate: f32) {
        self.increment = rate_hz / sample_rate;
    }

    /// Next value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        let value = sinf(2.0 * PI * self.phase);
        self.phase += self.increment;
        self.phase -= floorf(self.phase);
        value
    }

    /// Restart at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Peak envelope follower with separate attack and release.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeFollower {
    level: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    /// Set attack and release times in milliseconds.
    pub fn set_times(&mut self, attack_ms: f32, release_ms: f32, sample_rate: f32) {
        self.attack_coeff = time_coeff(attack_ms, sample_rate);
        self.release_coeff = time_coeff(release_ms, sample_rate);
    }

    /// Track one rectified sample and return the envelope.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let x = fabsf(x);
        let coeff = if x > self.level { self.attack_coeff } else { self.release_coeff };
        self.level = flush_denormal(coeff * self.level + (1.0 - coeff) * x);
        self.level
    }

    /// Current envelope.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drop to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// Exponential time constant coefficient for a duration in milliseconds.
pub fn time_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    let samples = time_ms.max(0.01) * 0.001 * sample_rate;
    expf(-1.0 / samples)
}

/// Largest absolute sample across all channels of frame `i`.
#[inline]
pub fn frame_peak(buffer: &AudioBuffer, i: usize) -> f32 {
    (0..buffer.num_channels()).fold(0.0, |peak: f32, ch| peak.max(fabsf(buffer.channel(ch)[i])))
}

/// Multiply every channel of frame `i` by `gain`.
#[inline]
pub fn scale_frame(buffer: &mut AudioBuffer, i: usize, gain: f32) {
    for ch in 0..buffer.num_channels() {
        buffer.channel_mut(ch)[i] *= gain;
    }
}
