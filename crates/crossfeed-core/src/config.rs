//! Construction-time engine configuration.
//!
//! These values shape the filter topology and are fixed for the lifetime of
//! an engine. Everything the user can move while audio runs lives in
//! [`CrossfeedParams`](crate::CrossfeedParams) instead.

/// Physical and numeric constants of the crossfeed model.
///
/// # Example
///
/// ```rust
/// use crossfeed_core::CrossfeedConfig;
///
/// let config = CrossfeedConfig::default().with_cutoff_hz(650.0);
/// assert_eq!(config.cutoff_hz, 650.0);
/// // 16 cm head width at 340 m/s
/// assert!((config.interaural_time() - 0.000_470_588).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossfeedConfig {
    /// Crossfeed lowpass −3 dB frequency in Hz.
    pub cutoff_hz: f32,
    /// Ear-to-ear distance in metres.
    pub head_width_m: f32,
    /// Speed of sound in m/s.
    pub speed_of_sound: f32,
    /// Intervals per lookup table.
    pub lookup_resolution: usize,
}

impl CrossfeedConfig {
    /// Default crossfeed cutoff in Hz.
    pub const DEFAULT_CUTOFF_HZ: f32 = 700.0;
    /// Default head width in metres.
    pub const DEFAULT_HEAD_WIDTH_M: f32 = 0.16;
    /// Default speed of sound in m/s.
    pub const DEFAULT_SPEED_OF_SOUND: f32 = 340.0;
    /// Default lookup table resolution.
    pub const DEFAULT_LOOKUP_RESOLUTION: usize = 10_000;

    /// Sets the crossfeed lowpass cutoff.
    pub fn with_cutoff_hz(mut self, cutoff_hz: f32) -> Self {
        self.cutoff_hz = cutoff_hz;
        self
    }

    /// Sets the head width used for the interaural delay.
    pub fn with_head_width_m(mut self, head_width_m: f32) -> Self {
        self.head_width_m = head_width_m;
        self
    }

    /// Sets the speed of sound used for the interaural delay.
    pub fn with_speed_of_sound(mut self, speed_of_sound: f32) -> Self {
        self.speed_of_sound = speed_of_sound;
        self
    }

    /// Sets the lookup table resolution.
    pub fn with_lookup_resolution(mut self, resolution: usize) -> Self {
        self.lookup_resolution = resolution;
        self
    }

    /// Time sound takes to cross the head, in seconds.
    pub fn interaural_time(&self) -> f32 {
        self.head_width_m / self.speed_of_sound
    }
}

impl Default for CrossfeedConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: Self::DEFAULT_CUTOFF_HZ,
            head_width_m: Self::DEFAULT_HEAD_WIDTH_M,
            speed_of_sound: Self::DEFAULT_SPEED_OF_SOUND,
            lookup_resolution: Self::DEFAULT_LOOKUP_RESOLUTION,
        }
    }
}
