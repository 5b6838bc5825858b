//! Analytic first-order coefficient design for the crossfeed filters.
//!
//! All three filters in the pipeline share a single pole derived from the
//! crossfeed cutoff frequency:
//!
//! ```text
//! y = 1 - cos(2π · fc / fs)
//! a = -y + sqrt(y² + 2y)
//! ```
//!
//! `a` is the coefficient of the one-pole lowpass
//! `y[n] = a·x[n] - (a - 1)·y[n-1]`, whose gain is exactly −3 dB at `fc`.
//! The mid and side shelves keep the same pole and move only the `a0` term,
//! which sets their low-frequency gain to `1 / (1 ± g)`.
//!
//! | Set | b0 | b1 | a0 | a1 |
//! |-----|----|----|----|----|
//! | lowpass | `a` | 0 | 1 | `a - 1` |
//! | mid shelf | 1 | `a - 1` | `1 + g·a` | `a - 1` |
//! | side shelf | 1 | `a - 1` | `1 - g·a` | `a - 1` |
//!
//! The lowpass is designed once per `prepare`; the shelves are redesigned
//! every block because `g` follows the crossfeed gain.

use libm::{cosf, roundf, sqrtf};

/// Mid-shelf gain trim relative to the crossfeed gain, in dB.
pub const MID_SHELF_TRIM_DB: f32 = -2.0;

/// Side-shelf gain trim relative to the crossfeed gain, in dB.
pub const SIDE_SHELF_TRIM_DB: f32 = -6.0;

/// Raw coefficients of a first-order IIR section.
///
/// Transfer function:
///
/// ```text
///         b0 + b1·z⁻¹
/// H(z) = -------------
///         a0 + a1·z⁻¹
/// ```
///
/// Stored un-normalised; [`FirstOrderFilter`](crate::FirstOrderFilter)
/// divides by `a0` when loading them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderCoefficients {
    /// Feedforward gain on x[n].
    pub b0: f32,
    /// Feedforward gain on x[n-1].
    pub b1: f32,
    /// Output normalisation term.
    pub a0: f32,
    /// Feedback gain on y[n-1].
    pub a1: f32,
}

impl FirstOrderCoefficients {
    /// Identity filter: `y[n] = x[n]`.
    pub const PASSTHROUGH: Self = Self {
        b0: 1.0,
        b1: 0.0,
        a0: 1.0,
        a1: 0.0,
    };

    /// Builds a coefficient set from its four taps.
    pub const fn new(b0: f32, b1: f32, a0: f32, a1: f32) -> Self {
        Self { b0, b1, a0, a1 }
    }

    /// Gain at DC (z = 1).
    pub fn dc_gain(&self) -> f32 {
        (self.b0 + self.b1) / (self.a0 + self.a1)
    }

    /// Gain at Nyquist (z = −1).
    pub fn nyquist_gain(&self) -> f32 {
        (self.b0 - self.b1) / (self.a0 - self.a1)
    }
}

impl Default for FirstOrderCoefficients {
    fn default() -> Self {
        Self::PASSTHROUGH
    }
}

/// Computes the one-pole lowpass coefficient `a` for a cutoff.
///
/// # Arguments
///
/// * `cutoff_hz` - −3 dB frequency in Hz (0 < cutoff < sample_rate / 2)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// `a` in (0, 1]. 700 Hz at 44.1 kHz gives `a ≈ 0.0949`.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::lowpass_pole;
///
/// let a = lowpass_pole(700.0, 44100.0);
/// assert!((a - 0.0949).abs() < 1e-3);
/// ```
pub fn lowpass_pole(cutoff_hz: f32, sample_rate: f32) -> f32 {
    let y = 1.0 - cosf(core::f32::consts::TAU * (cutoff_hz / sample_rate));
    -y + sqrtf(y * y + 2.0 * y)
}

/// One-pole lowpass taps for pole coefficient `a`: `{a, 0, 1, a − 1}`.
pub fn lowpass_coefficients(a: f32) -> FirstOrderCoefficients {
    FirstOrderCoefficients::new(a, 0.0, 1.0, a - 1.0)
}

/// Low-frequency group delay of the lowpass, rounded to whole samples.
///
/// The DC group delay of `a / (1 + (a − 1)·z⁻¹)` is `(1 − a) / a = 1/a − 1`.
/// This is the length of the dry-path compensation delay and the latency the
/// engine reports.
pub fn group_delay_samples(a: f32) -> usize {
    roundf(1.0 / a - 1.0).max(0.0) as usize
}

/// Mid-channel shelf taps: `{1, a − 1, 1 + g·a, a − 1}`.
///
/// `g` is the linear gain of `crossfeed_db + MID_SHELF_TRIM_DB`. The DC gain
/// is `1 / (1 + g)`; the shelf flattens towards unity at high frequencies.
pub fn mid_shelf_coefficients(a: f32, g: f32) -> FirstOrderCoefficients {
    FirstOrderCoefficients::new(1.0, a - 1.0, 1.0 + g * a, a - 1.0)
}

/// Side-channel shelf taps: `{1, a − 1, 1 − g·a, a − 1}`.
///
/// `g` is the linear gain of `crossfeed_db + SIDE_SHELF_TRIM_DB`. The DC gain
/// is `1 / (1 − g)`, lifting low-frequency width the crossfeed removes.
pub fn side_shelf_coefficients(a: f32, g: f32) -> FirstOrderCoefficients {
    FirstOrderCoefficients::new(1.0, a - 1.0, 1.0 - g * a, a - 1.0)
}
