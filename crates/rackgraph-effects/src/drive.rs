//! Arctangent waveshaper (registered as `Drive` and `Distortion`).

use core::f32::consts::FRAC_PI_2;
use libm::atanf;
use rackgraph_core::{
    AudioBuffer, ConfigNode, Effect, ParamDescriptor, ParamUnit, ProcessSpec, has_param,
    param_value,
};

const DRIVE: ParamDescriptor =
    ParamDescriptor::new("drive", "Drive", ParamUnit::Ratio, 0.0, 1.0, 0.0);

/// Parameters read by [`Drive`].
pub const PARAMS: &[ParamDescriptor] = &[DRIVE];

/// Memoryless saturation: `atan(x * k) / atan(k)` with `k = 1 + 10 * drive`.
///
/// Normalised so that a full-scale input stays at full scale.
#[derive(Debug, Clone)]
pub struct Drive {
    drive: f32,
    pre_gain: f32,
    norm: f32,
}

impl Drive {
    /// Drive at zero (gentle curve, `k = 1`).
    pub fn new() -> Self {
        let mut drive = Self {
            drive: 0.0,
            pre_gain: 1.0,
            norm: 1.0,
        };
        drive.set_drive(DRIVE.default);
        drive
    }

    /// Set the drive amount.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = DRIVE.clamp(drive);
        self.pre_gain = 1.0 + 10.0 * self.drive;
        self.norm = 1.0 / atanf(self.pre_gain);
    }

    /// Shape one sample.
    #[inline]
    pub fn shape(&self, x: f32) -> f32 {
        atanf(x * self.pre_gain) * self.norm
    }
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Drive {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for ch in buffer.channels_mut() {
            for s in ch {
                *s = self.shape(*s);
            }
        }
    }

    fn reset(&mut self) {}

    fn configure(&mut self, node: &ConfigNode) {
        if has_param(node, DRIVE.key) {
            self.set_drive(param_value(node, &DRIVE));
        }
    }
}

/// Output bound for any input: `(pi / 2) / atan(k)`.
pub fn output_bound(drive: f32) -> f32 {
    FRAC_PI_2 / atanf(1.0 + 10.0 * DRIVE.clamp(drive))
}
