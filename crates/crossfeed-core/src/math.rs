//! Mathematical utility functions for the crossfeed pipeline.
//!
//! All functions are allocation-free and suitable for `no_std`. The per-block
//! path never calls these directly for dB conversion; the engine routes those
//! through a [`LookupTable`](crate::LookupTable) built from [`db_to_linear`].
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Angles
//!
//! - [`half_angle_sin`] - `sin(θ/2)` for a steering angle in degrees

use libm::{expf, logf, sinf};

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use crossfeed_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below `1e-10` are treated as `1e-10` (-200 dB).
///
/// # Example
/// ```rust
/// use crossfeed_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Sine of half a steering angle given in degrees.
///
/// This is the angle-dependent factor of the interaural time difference:
/// a source at 90° (hard left/right) yields `sin(45°)`.
#[inline]
pub fn half_angle_sin(degrees: f32) -> f32 {
    sinf(degrees.to_radians() * 0.5)
}

/// Flush denormal floats to zero.
///
/// Recursive filters decaying towards silence can produce subnormal values,
/// which are very slow on many CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversion() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(6.0206) - 2.0).abs() < 1e-3);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-4);
        assert!((linear_to_db(0.1) - (-20.0)).abs() < 1e-3);
    }

    #[test]
    fn test_db_roundtrip() {
        for db in [-15.0, -9.0, -4.5, 0.0, 6.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-4, "{db} dB came back as {back}");
        }
    }

    #[test]
    fn test_half_angle_sin() {
        assert!((half_angle_sin(60.0) - 0.5).abs() < 1e-6);
        assert!((half_angle_sin(90.0) - core::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!(half_angle_sin(0.0).abs() < 1e-7);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
