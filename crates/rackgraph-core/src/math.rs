//! Small DSP math helpers shared by the node runtime and the leaf effects.
//!
//! All functions are allocation-free and `no_std` friendly.

use libm::{expf, fabsf, logf};

/// Convert decibels to linear gain (0 dB → 1.0, -6 dB → ~0.5).
///
/// ```rust
/// use rackgraph_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. Inputs at or below 1e-10 read as -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Replace denormal-range values with zero.
///
/// Feedback paths (delay lines, reverb combs) decay towards denormals, which
/// are very slow on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if fabsf(x) < 1e-20 { 0.0 } else { x }
}

/// Linear wet/dry crossfade; `mix = 0` is fully dry.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip() {
        for db in [-40.0, -6.0, 0.0, 6.0, 12.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert!(linear_to_db(0.0) < -190.0);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(-1e-30), 0.0);
        assert_eq!(flush_denormal(0.25), 0.25);
    }

    #[test]
    fn test_wet_dry_mix() {
        assert_eq!(wet_dry_mix(1.0, 0.0, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, 0.0, 1.0), 0.0);
        assert_eq!(wet_dry_mix(1.0, 3.0, 0.5), 2.0);
    }
}
