//! Table-based function approximation for per-block control math.
//!
//! [`LookupTable`] samples a continuous function once, at construction time,
//! and answers later evaluations with a two-point linear interpolation. The
//! engine uses two of these: dB → linear gain over `[-15, 15]` dB, and the
//! `sin(θ/2)` interaural factor over the `[30, 90]` degree steering range.
//!
//! # When to use
//!
//! | Table | Domain | Resolution | Max error |
//! |-------|--------|------------|-----------|
//! | dB → linear | −15..15 dB | 10000 | < 1e-6 (relative) |
//! | `sin(θ/2)` | 30..90° | 10000 | < 1e-6 |
//!
//! Building costs `resolution + 1` calls of the source function; evaluation
//! is one multiply-add for the index and one lerp.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Linearly-interpolated lookup table over a closed domain `[lo, hi]`.
///
/// # Invariants
///
/// - `table.len() == resolution + 1`, knot `i` holds `f(lo + i·(hi − lo)/resolution)`
/// - `hi > lo`, `resolution >= 1`
///
/// # Example
///
/// ```rust
/// use crossfeed_core::LookupTable;
///
/// let square = LookupTable::new(|x| x * x, 0.0, 4.0, 4);
/// assert_eq!(square.eval(2.0), 4.0);
/// assert_eq!(square.eval(2.5), 6.5); // lerp between knots 4 and 9
/// ```
#[derive(Debug, Clone)]
pub struct LookupTable {
    table: Vec<f32>,
    lo: f32,
    hi: f32,
    /// Distance between knots: `(hi - lo) / resolution`.
    step: f32,
    /// Knots per unit of input: `resolution / (hi - lo)`.
    scale: f32,
}

/// Input value of knot `i`. The last knot sits exactly on `hi` regardless of
/// rounding in `step`.
#[inline]
fn knot_position(lo: f32, hi: f32, step: f32, resolution: usize, i: usize) -> f32 {
    if i == resolution {
        hi
    } else {
        lo + i as f32 * step
    }
}

impl LookupTable {
    /// Samples `f` at `resolution + 1` evenly spaced points over `[lo, hi]`.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is 0 or if `hi <= lo`.
    pub fn new<F>(f: F, lo: f32, hi: f32, resolution: usize) -> Self
    where
        F: Fn(f32) -> f32,
    {
        assert!(resolution > 0, "Lookup table resolution must be > 0");
        assert!(hi > lo, "Lookup table domain must satisfy hi > lo");

        let step = (hi - lo) / resolution as f32;
        let table = (0..=resolution)
            .map(|i| f(knot_position(lo, hi, step, resolution, i)))
            .collect();

        Self {
            table,
            lo,
            hi,
            step,
            scale: resolution as f32 / (hi - lo),
        }
    }

    /// Evaluates the approximation at `x`.
    ///
    /// # Precondition
    ///
    /// `lo <= x <= hi`. Callers clamp upstream (host parameters are already
    /// range-bounded); this is only checked by a debug assertion. Use
    /// [`eval_clamped`](Self::eval_clamped) when the input is not trusted.
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        debug_assert!(
            x >= self.lo && x <= self.hi,
            "lookup input {x} outside [{}, {}]",
            self.lo,
            self.hi
        );

        let pos = (x - self.lo) * self.scale;
        // Index of the left knot; `hi` itself maps onto the last segment.
        let index = (pos as usize).min(self.table.len() - 2);

        // `pos` can land an ulp either side of an integer when `x` is a knot,
        // so knots are matched against their construction-time positions.
        let resolution = self.table.len() - 1;
        if x == knot_position(self.lo, self.hi, self.step, resolution, index + 1) {
            return self.table[index + 1];
        }
        if x == knot_position(self.lo, self.hi, self.step, resolution, index) {
            return self.table[index];
        }

        let frac = pos - index as f32;
        self.table[index] * (1.0 - frac) + self.table[index + 1] * frac
    }

    /// Returns the input value of knot `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i > resolution()`.
    pub fn knot_input(&self, i: usize) -> f32 {
        assert!(i < self.table.len(), "knot {i} out of range");
        knot_position(self.lo, self.hi, self.step, self.table.len() - 1, i)
    }

    /// Evaluates at `x` after clamping it into the domain.
    #[inline]
    pub fn eval_clamped(&self, x: f32) -> f32 {
        self.eval(x.clamp(self.lo, self.hi))
    }

    /// Returns the `(lo, hi)` domain.
    pub fn domain(&self) -> (f32, f32) {
        (self.lo, self.hi)
    }

    /// Returns the number of intervals between knots.
    pub fn resolution(&self) -> usize {
        self.table.len() - 1
    }

    /// Returns the stored value of knot `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i > resolution()`.
    pub fn knot(&self, i: usize) -> f32 {
        self.table[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db_to_linear, half_angle_sin};

    #[test]
    fn knots_are_exact() {
        // Dyadic domain: knot positions are exactly representable.
        let table = LookupTable::new(|x| x * x * x, -8.0, 8.0, 16);
        for i in 0..=16 {
            let x = -8.0 + i as f32;
            assert_eq!(table.eval(x), table.knot(i));
            assert_eq!(table.eval(x), x * x * x);
        }
    }

    #[test]
    fn knots_are_exact_on_angle_table() {
        // 60° / 10000 is not representable, so knot positions carry rounding.
        let table = LookupTable::new(half_angle_sin, 30.0, 90.0, 10_000);
        for i in 0..=10_000 {
            let x = if i == 10_000 { 90.0 } else { 30.0 + i as f32 * 0.006 };
            assert_eq!(x, table.knot_input(i));
            assert_eq!(table.eval(x), table.knot(i), "knot {i} at {x}");
        }
    }

    #[test]
    fn knots_are_exact_on_db_table() {
        let table = LookupTable::new(db_to_linear, -15.0, 15.0, 10_000);
        for i in 0..=10_000 {
            let x = table.knot_input(i);
            assert_eq!(table.eval(x), table.knot(i), "knot {i} at {x}");
        }
    }

    #[test]
    fn interpolates_between_knots() {
        let table = LookupTable::new(|x| x * x, 0.0, 4.0, 4);
        assert!((table.eval(0.5) - 0.5).abs() < 1e-6);
        assert!((table.eval(3.5) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn upper_bound_returns_last_knot() {
        let table = LookupTable::new(|x| 2.0 * x, 1.0, 3.0, 7);
        assert_eq!(table.eval(3.0), table.knot(7));
        assert_eq!(table.knot(7), 6.0);
    }

    #[test]
    fn clamped_eval_saturates() {
        let table = LookupTable::new(|x| x, -1.0, 1.0, 8);
        assert_eq!(table.eval_clamped(5.0), 1.0);
        assert_eq!(table.eval_clamped(-5.0), -1.0);
    }

    #[test]
    fn db_table_accuracy() {
        let table = LookupTable::new(db_to_linear, -15.0, 15.0, 10_000);
        for i in 0..=300 {
            let db = i as f32 / 10.0 - 15.0;
            let exact = db_to_linear(db);
            let approx = table.eval(db);
            assert!(
                ((approx - exact) / exact).abs() < 1e-5,
                "{db} dB: {approx} vs {exact}"
            );
        }
    }

    #[test]
    fn angle_table_accuracy() {
        let table = LookupTable::new(half_angle_sin, 30.0, 90.0, 10_000);
        for deg in 30..=90 {
            let x = deg as f32;
            assert!((table.eval(x) - half_angle_sin(x)).abs() < 1e-6);
        }
    }

    #[test]
    fn accessors() {
        let table = LookupTable::new(|x| x, 30.0, 90.0, 60);
        assert_eq!(table.domain(), (30.0, 90.0));
        assert_eq!(table.resolution(), 60);
    }

    #[test]
    #[should_panic]
    fn zero_resolution_panics() {
        let _ = LookupTable::new(|x| x, 0.0, 1.0, 0);
    }

    #[test]
    #[should_panic]
    fn empty_domain_panics() {
        let _ = LookupTable::new(|x| x, 1.0, 1.0, 4);
    }
}
