//! First-order IIR filter sections.
//!
//! A Direct Form I section with the difference equation:
//!
//! ```text
//! y[n] = b0·x[n] + b1·x[n-1] - a1·y[n-1]
//! ```
//!
//! (coefficients normalised by `a0`). The crossfeed uses it three ways: the
//! stereo lowpass on the crossfeed branch, and the mid and side shelves on the
//! summed output. Coefficient sets come from [`crate::coefficients`].
//!
//! # Usage
//!
//! ```rust
//! use crossfeed_core::{FirstOrderFilter, lowpass_coefficients, lowpass_pole};
//!
//! let mut lp = FirstOrderFilter::new();
//! lp.set_coefficients(lowpass_coefficients(lowpass_pole(700.0, 48000.0)));
//! let filtered = lp.process(1.0);
//! assert!(filtered < 1.0); // first sample of a step is attenuated
//! ```

use crate::{FirstOrderCoefficients, flush_denormal};

/// First-order (6 dB/oct) IIR section.
///
/// # Invariants
///
/// - Stored coefficients are normalised (`a0 == 1`)
/// - `y1` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct FirstOrderFilter {
    b0: f32,
    b1: f32,
    a1: f32,
    coefficients: FirstOrderCoefficients,
    x1: f32,
    y1: f32,
}

impl FirstOrderFilter {
    /// Creates a passthrough filter with cleared state.
    pub fn new() -> Self {
        Self::with_coefficients(FirstOrderCoefficients::PASSTHROUGH)
    }

    /// Creates a filter with the given coefficients and cleared state.
    pub fn with_coefficients(coefficients: FirstOrderCoefficients) -> Self {
        let mut filter = Self {
            b0: 1.0,
            b1: 0.0,
            a1: 0.0,
            coefficients,
            x1: 0.0,
            y1: 0.0,
        };
        filter.set_coefficients(coefficients);
        filter
    }

    /// Loads new coefficients, normalising by `a0`.
    ///
    /// Filter state is kept, so coefficients can change between blocks
    /// without a discontinuity in the recursion.
    pub fn set_coefficients(&mut self, coefficients: FirstOrderCoefficients) {
        let a0_inv = 1.0 / coefficients.a0;
        self.b0 = coefficients.b0 * a0_inv;
        self.b1 = coefficients.b1 * a0_inv;
        self.a1 = coefficients.a1 * a0_inv;
        self.coefficients = coefficients;
    }

    /// Returns the raw (un-normalised) coefficients last loaded.
    pub fn coefficients(&self) -> FirstOrderCoefficients {
        self.coefficients
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 - self.a1 * self.y1;
        self.x1 = input;
        self.y1 = flush_denormal(output);
        output
    }

    /// Processes a block in place.
    #[inline]
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter history without touching coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

impl Default for FirstOrderFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Two [`FirstOrderFilter`]s sharing one coefficient set, one per channel.
#[derive(Debug, Clone, Default)]
pub struct StereoFilter {
    left: FirstOrderFilter,
    right: FirstOrderFilter,
}

impl StereoFilter {
    /// Creates a passthrough stereo filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the same coefficients into both channels.
    pub fn set_coefficients(&mut self, coefficients: FirstOrderCoefficients) {
        self.left.set_coefficients(coefficients);
        self.right.set_coefficients(coefficients);
    }

    /// Returns the shared raw coefficients.
    pub fn coefficients(&self) -> FirstOrderCoefficients {
        self.left.coefficients()
    }

    /// Filters both channels in place.
    #[inline]
    pub fn process_block_inplace(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.left.process_block_inplace(left);
        self.right.process_block_inplace(right);
    }

    /// Clears the history of both channels.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
