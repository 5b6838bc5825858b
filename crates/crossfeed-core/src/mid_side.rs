//! Mid/side transcoding.
//!
//! ```text
//! M = (L + R) / √2
//! S = (L − R) / √2
//! ```
//!
//! With the `1/√2` normalisation the transform is orthonormal and its own
//! inverse: applying it to `(M, S)` returns `(L, R)`.

use core::f32::consts::FRAC_1_SQRT_2;

/// Converts a left/right pair to mid/side.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::to_mid_side;
///
/// let (m, s) = to_mid_side(0.5, 0.5);
/// assert_eq!(s, 0.0); // identical channels carry no side energy
/// let (l, r) = to_mid_side(m, s);
/// assert!((l - 0.5).abs() < 1e-6 && (r - 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn to_mid_side(left: f32, right: f32) -> (f32, f32) {
    (
        (left + right) * FRAC_1_SQRT_2,
        (left - right) * FRAC_1_SQRT_2,
    )
}

/// Converts a mid/side pair back to left/right.
///
/// Identical to [`to_mid_side`]; provided so call sites read in the direction
/// they convert.
#[inline]
pub fn from_mid_side(mid: f32, side: f32) -> (f32, f32) {
    to_mid_side(mid, side)
}

/// Transcodes two channels in place: `left` becomes mid, `right` becomes side
/// (or back again on a second call).
#[inline]
pub fn transcode_block(left: &mut [f32], right: &mut [f32]) {
    debug_assert_eq!(left.len(), right.len());
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
        (*l, *r) = to_mid_side(*l, *r);
    }
}
