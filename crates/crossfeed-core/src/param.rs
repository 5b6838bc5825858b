//! Host-facing control parameters with lock-free cross-thread hand-off.
//!
//! The control surface (UI thread, automation, CLI) writes parameter values
//! into [`CrossfeedParams`]; the audio thread calls
//! [`snapshot`](CrossfeedParams::snapshot) once at the start of every block
//! and works from that copy only. Each value is an independent atomic scalar,
//! so a write is never observed torn and the audio thread never waits.
//!
//! ```text
//! UI thread ──► CrossfeedParams::set_*()   (AtomicU32 / AtomicBool stores)
//!                         │
//! Audio thread ◄── CrossfeedParams::snapshot() ──► ParamSnapshot (per block)
//! ```
//!
//! Setters clamp to the descriptor range, so the DSP core downstream can rely
//! on every snapshot being in range without re-validating.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Unit type for formatting a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Decibels (dB).
    Decibels,
    /// Angle in degrees.
    Degrees,
    /// On/off switch (0.0 = off, 1.0 = on).
    Toggle,
}

impl ParamUnit {
    /// Display suffix for the unit.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Decibels => "dB",
            Self::Degrees => "deg",
            Self::Toggle => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display.
    pub name: &'static str,
    /// Short stable identifier (host parameter ID, CLI flag name).
    pub short_name: &'static str,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Value at construction.
    pub default: f32,
}

impl ParamDescriptor {
    /// Clamps `value` into `[min, max]`. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Output gain, applied after mid/side shelving.
pub const OUTPUT_GAIN: ParamDescriptor = ParamDescriptor {
    name: "Gain",
    short_name: "GAIN",
    unit: ParamUnit::Decibels,
    min: -12.0,
    max: 6.0,
    default: 0.0,
};

/// Level of the crossfed copy of the opposite channel.
pub const CROSSFEED_GAIN: ParamDescriptor = ParamDescriptor {
    name: "Crossfeed Gain",
    short_name: "XGAIN",
    unit: ParamUnit::Decibels,
    min: -9.0,
    max: 0.0,
    default: -4.5,
};

/// Virtual speaker angle; sets the interaural delay.
pub const ANGLE: ParamDescriptor = ParamDescriptor {
    name: "Angle",
    short_name: "ANGLE",
    unit: ParamUnit::Degrees,
    min: 30.0,
    max: 90.0,
    default: 60.0,
};

/// Whole-effect bypass.
pub const BYPASS: ParamDescriptor = ParamDescriptor {
    name: "Bypass",
    short_name: "BYPASS",
    unit: ParamUnit::Toggle,
    min: 0.0,
    max: 1.0,
    default: 0.0,
};

/// All descriptors in host registration order.
pub const DESCRIPTORS: [ParamDescriptor; 4] = [OUTPUT_GAIN, CROSSFEED_GAIN, ANGLE, BYPASS];

/// An `f32` parameter stored as atomic bits, clamped to its descriptor.
///
/// Relaxed ordering: each parameter is an independent scalar and no other
/// memory is published through it.
#[derive(Debug)]
pub struct AtomicParam {
    bits: AtomicU32,
    descriptor: ParamDescriptor,
}

impl AtomicParam {
    /// Creates a cell holding the descriptor's default.
    pub fn new(descriptor: ParamDescriptor) -> Self {
        Self {
            bits: AtomicU32::new(descriptor.default.to_bits()),
            descriptor,
        }
    }

    /// Stores `value`, clamped to the descriptor range.
    #[inline]
    pub fn set(&self, value: f32) {
        self.bits
            .store(self.descriptor.clamp(value).to_bits(), Ordering::Relaxed);
    }

    /// Loads the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Restores the default value.
    pub fn reset(&self) {
        self.set(self.descriptor.default);
    }

    /// Returns the descriptor.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }
}

/// Block-scoped copy of every parameter, taken once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Output gain in dB, within [`OUTPUT_GAIN`] range.
    pub gain_db: f32,
    /// Crossfeed gain in dB, within [`CROSSFEED_GAIN`] range.
    pub crossfeed_db: f32,
    /// Steering angle in degrees, within [`ANGLE`] range.
    pub angle_deg: f32,
    /// Whole-effect bypass.
    pub bypass: bool,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            gain_db: OUTPUT_GAIN.default,
            crossfeed_db: CROSSFEED_GAIN.default,
            angle_deg: ANGLE.default,
            bypass: false,
        }
    }
}

/// Shared parameter store for one engine instance.
///
/// `Send + Sync`; wrap in an `Arc` and hand one clone to the engine and one
/// to the control surface.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::CrossfeedParams;
///
/// let params = CrossfeedParams::default();
/// params.set_crossfeed_db(-20.0); // clamped
/// let snap = params.snapshot();
/// assert_eq!(snap.crossfeed_db, -9.0);
/// assert_eq!(snap.angle_deg, 60.0);
/// ```
#[derive(Debug)]
pub struct CrossfeedParams {
    gain_db: AtomicParam,
    crossfeed_db: AtomicParam,
    angle_deg: AtomicParam,
    bypass: AtomicBool,
}

impl CrossfeedParams {
    /// Creates a store holding every default.
    pub fn new() -> Self {
        Self {
            gain_db: AtomicParam::new(OUTPUT_GAIN),
            crossfeed_db: AtomicParam::new(CROSSFEED_GAIN),
            angle_deg: AtomicParam::new(ANGLE),
            bypass: AtomicBool::new(false),
        }
    }

    /// Sets the output gain in dB.
    pub fn set_gain_db(&self, db: f32) {
        self.gain_db.set(db);
    }

    /// Sets the crossfeed gain in dB.
    pub fn set_crossfeed_db(&self, db: f32) {
        self.crossfeed_db.set(db);
    }

    /// Sets the steering angle in degrees.
    pub fn set_angle_deg(&self, degrees: f32) {
        self.angle_deg.set(degrees);
    }

    /// Engages or releases bypass.
    pub fn set_bypass(&self, bypass: bool) {
        self.bypass.store(bypass, Ordering::Relaxed);
    }

    /// Output gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db.get()
    }

    /// Crossfeed gain in dB.
    pub fn crossfeed_db(&self) -> f32 {
        self.crossfeed_db.get()
    }

    /// Steering angle in degrees.
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg.get()
    }

    /// Whether bypass is engaged.
    pub fn bypass(&self) -> bool {
        self.bypass.load(Ordering::Relaxed)
    }

    /// Applies every field of a snapshot (e.g. restoring host state).
    pub fn apply(&self, snapshot: &ParamSnapshot) {
        self.set_gain_db(snapshot.gain_db);
        self.set_crossfeed_db(snapshot.crossfeed_db);
        self.set_angle_deg(snapshot.angle_deg);
        self.set_bypass(snapshot.bypass);
    }

    /// Restores every default.
    pub fn reset(&self) {
        self.gain_db.reset();
        self.crossfeed_db.reset();
        self.angle_deg.reset();
        self.set_bypass(false);
    }

    /// Reads each parameter exactly once.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            gain_db: self.gain_db.get(),
            crossfeed_db: self.crossfeed_db.get(),
            angle_deg: self.angle_deg.get(),
            bypass: self.bypass(),
        }
    }
}

impl Default for CrossfeedParams {
    fn default() -> Self {
        Self::new()
    }
}
