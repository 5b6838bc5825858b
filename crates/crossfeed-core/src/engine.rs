//! The crossfeed engine.
//!
//! Each channel receives a lowpassed, interaurally delayed and attenuated
//! copy of the opposite channel. The summed signal is then shelved in the
//! mid/side domain to restore the width and level balance the crossfeed
//! disturbs.
//!
//! # Signal Flow
//!
//! ```text
//!  L ──► dry delay ──┬───────────────────────────────► (+) ──┐
//!                    └──┐                             ▲      │
//!                       ╳ swap ─► lowpass ─► ITD ─► ×xg      ├─► M/S ─► shelves ─► M/S ─► ×gain ─► out
//!                    ┌──┘                             ▼      │
//!  R ──► dry delay ──┴───────────────────────────────► (+) ──┘
//! ```
//!
//! The dry delay equals the lowpass group delay, so the direct signal lines
//! up with the bulk of the filtered crossfeed. That delay is the latency the
//! engine reports to the host.
//!
//! # Bypass
//!
//! A bypassed block is passed through untouched. The first bypassed block
//! after active processing clears every filter and delay, so re-engaging the
//! effect never replays stale history:
//!
//! ```text
//! Active ──bypassed block──► BypassedDirty ──reset──► BypassedClean
//!   ▲                                                      │
//!   └──────────────────────── active block ◄───────────────┘
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use libm::floorf;

use crate::coefficients::{MID_SHELF_TRIM_DB, SIDE_SHELF_TRIM_DB};
use crate::param::{ANGLE, CrossfeedParams, ParamSnapshot};
use crate::{
    AudioProcessor, CrossfeedConfig, FirstOrderCoefficients, FirstOrderFilter, LookupTable,
    MultiChannelDelay, PrepareError, ProcessSpec, StereoFilter, db_to_linear, group_delay_samples,
    half_angle_sin, lowpass_coefficients, lowpass_pole, mid_shelf_coefficients,
    side_shelf_coefficients, transcode_block,
};

/// Domain of the dB → linear table, in dB.
///
/// Covers output gain, crossfeed gain, and both shelf trims.
const DB_TABLE_RANGE: (f32, f32) = (-15.0, 15.0);

/// Where the engine is in its bypass cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BypassState {
    /// Processing normally.
    #[default]
    Active,
    /// Bypass just engaged; filter and delay state still holds history.
    BypassedDirty,
    /// Bypassed with all state cleared.
    BypassedClean,
}

/// Stereo headphone crossfeed.
///
/// Owns every filter, delay line and scratch buffer. Parameters are read
/// from the shared [`CrossfeedParams`] once per block.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use crossfeed_core::{AudioProcessor, CrossfeedEngine, CrossfeedParams, ProcessSpec};
///
/// let params = Arc::new(CrossfeedParams::default());
/// let mut engine = CrossfeedEngine::new(Arc::clone(&params));
/// engine.prepare(ProcessSpec::stereo(44100.0, 512)).unwrap();
///
/// params.set_angle_deg(90.0);
/// let mut left = [0.5f32; 512];
/// let mut right = [0.0f32; 512];
/// engine.process_block(&mut left, &mut right);
///
/// assert_eq!(engine.latency_samples(), 10);
/// assert_eq!(engine.itd_delay_samples(), 14);
/// ```
#[derive(Debug)]
pub struct CrossfeedEngine {
    params: Arc<CrossfeedParams>,
    config: CrossfeedConfig,

    db_table: LookupTable,
    angle_table: LookupTable,

    lowpass: StereoFilter,
    mid_shelf: FirstOrderFilter,
    side_shelf: FirstOrderFilter,
    dry_delay: MultiChannelDelay,
    itd_delay: MultiChannelDelay,
    aux_left: Vec<f32>,
    aux_right: Vec<f32>,

    gain: f32,
    crossfeed_gain: f32,
    itd_samples: usize,
    lowpass_pole: f32,
    latency: usize,
    sample_rate: f32,
    max_block_size: usize,
    prepared: bool,
    bypass_state: BypassState,
}

impl CrossfeedEngine {
    /// Creates an engine with the default model constants.
    pub fn new(params: Arc<CrossfeedParams>) -> Self {
        Self::with_config(params, CrossfeedConfig::default())
    }

    /// Creates an engine with custom model constants.
    ///
    /// Builds both lookup tables; the engine still needs
    /// [`prepare`](AudioProcessor::prepare) before processing.
    ///
    /// # Panics
    ///
    /// Panics if `config.lookup_resolution` is 0.
    pub fn with_config(params: Arc<CrossfeedParams>, config: CrossfeedConfig) -> Self {
        let resolution = config.lookup_resolution;
        Self {
            params,
            config,
            db_table: LookupTable::new(db_to_linear, DB_TABLE_RANGE.0, DB_TABLE_RANGE.1, resolution),
            angle_table: LookupTable::new(half_angle_sin, ANGLE.min, ANGLE.max, resolution),
            lowpass: StereoFilter::new(),
            mid_shelf: FirstOrderFilter::new(),
            side_shelf: FirstOrderFilter::new(),
            dry_delay: MultiChannelDelay::new(),
            itd_delay: MultiChannelDelay::new(),
            aux_left: Vec::new(),
            aux_right: Vec::new(),
            gain: 1.0,
            crossfeed_gain: 1.0,
            itd_samples: 0,
            lowpass_pole: 1.0,
            latency: 0,
            sample_rate: 0.0,
            max_block_size: 0,
            prepared: false,
            bypass_state: BypassState::Active,
        }
    }

    /// Current bypass state.
    pub fn bypass_state(&self) -> BypassState {
        self.bypass_state
    }

    /// Interaural delay applied to the crossfeed in the last active block.
    pub fn itd_delay_samples(&self) -> usize {
        self.itd_samples
    }

    /// Smallest and largest interaural delay over the angle range at the
    /// prepared sample rate.
    pub fn itd_range(&self) -> (usize, usize) {
        (
            self.itd_for_angle(ANGLE.min),
            self.itd_for_angle(ANGLE.max),
        )
    }

    /// One-pole coefficient shared by the lowpass and both shelves.
    pub fn lowpass_pole(&self) -> f32 {
        self.lowpass_pole
    }

    /// Sample rate from the last `prepare`.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Shared parameter store.
    pub fn params(&self) -> &Arc<CrossfeedParams> {
        &self.params
    }

    /// Construction-time model constants.
    pub fn config(&self) -> &CrossfeedConfig {
        &self.config
    }

    /// Whether `prepare` succeeded and `release` has not been called since.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn itd_for_angle(&self, degrees: f32) -> usize {
        let samples = self.angle_table.eval(degrees) * self.config.interaural_time() * self.sample_rate;
        floorf(samples) as usize
    }

    /// Clears every filter and delay line.
    fn reset_state(&mut self) {
        self.lowpass.reset();
        self.itd_delay.reset();
        self.dry_delay.reset();
        self.mid_shelf.reset();
        self.side_shelf.reset();
    }

    /// Derives gains, the interaural delay and shelf coefficients from a
    /// snapshot.
    fn update_parameters(&mut self, snapshot: &ParamSnapshot) {
        self.gain = self.db_table.eval(snapshot.gain_db);
        self.crossfeed_gain = self.db_table.eval(snapshot.crossfeed_db);

        self.itd_samples = self
            .itd_for_angle(snapshot.angle_deg)
            .min(self.itd_delay.max_delay_samples());
        self.itd_delay.set_delay_samples(self.itd_samples);

        let a = self.lowpass_pole;
        let g_mid = self.db_table.eval(snapshot.crossfeed_db + MID_SHELF_TRIM_DB);
        let g_side = self.db_table.eval(snapshot.crossfeed_db + SIDE_SHELF_TRIM_DB);
        self.mid_shelf.set_coefficients(mid_shelf_coefficients(a, g_mid));
        self.side_shelf.set_coefficients(side_shelf_coefficients(a, g_side));
    }

    /// Delays the dry path and adds the filtered, delayed, attenuated copy of
    /// the opposite channel.
    fn mix_crossfeed(&mut self, left: &mut [f32], right: &mut [f32]) {
        let n = left.len();
        self.dry_delay.process(&mut [&mut *left, &mut *right]);

        let aux_left = &mut self.aux_left[..n];
        let aux_right = &mut self.aux_right[..n];
        aux_left.copy_from_slice(right);
        aux_right.copy_from_slice(left);

        self.lowpass.process_block_inplace(aux_left, aux_right);
        self.itd_delay.process(&mut [&mut *aux_left, &mut *aux_right]);

        let xg = self.crossfeed_gain;
        for (out, cross) in left.iter_mut().zip(aux_left.iter()) {
            *out += cross * xg;
        }
        for (out, cross) in right.iter_mut().zip(aux_right.iter()) {
            *out += cross * xg;
        }
    }

    /// Shelves mid and side independently.
    fn shelve_mid_side(&mut self, left: &mut [f32], right: &mut [f32]) {
        transcode_block(left, right);
        self.mid_shelf.process_block_inplace(left);
        self.side_shelf.process_block_inplace(right);
        transcode_block(left, right);
    }

    fn apply_output_gain(&self, left: &mut [f32], right: &mut [f32]) {
        let gain = self.gain;
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample *= gain;
        }
    }
}

impl Default for CrossfeedEngine {
    fn default() -> Self {
        Self::new(Arc::new(CrossfeedParams::default()))
    }
}

/// Clears `buffer` and refills it with `len` zeros.
fn allocate_scratch(
    buffer: &mut Vec<f32>,
    len: usize,
    what: &'static str,
) -> Result<(), PrepareError> {
    buffer.clear();
    buffer
        .try_reserve_exact(len)
        .map_err(PrepareError::allocation(what))?;
    buffer.resize(len, 0.0);
    Ok(())
}

impl AudioProcessor for CrossfeedEngine {
    fn prepare(&mut self, spec: ProcessSpec) -> Result<(), PrepareError> {
        self.prepared = false;

        if spec.channels != 2 {
            return Err(PrepareError::UnsupportedChannelCount(spec.channels));
        }
        // The cutoff must sit below Nyquist for the pole to lie in (0, 1].
        let fs = spec.sample_rate;
        if !fs.is_finite() || fs <= 2.0 * self.config.cutoff_hz {
            return Err(PrepareError::InvalidSampleRate(fs));
        }
        let pole = lowpass_pole(self.config.cutoff_hz, fs);
        if pole.is_nan() || pole <= 0.0 || pole > 1.0 {
            return Err(PrepareError::InvalidSampleRate(fs));
        }
        if spec.max_block_size == 0 {
            return Err(PrepareError::InvalidBlockSize(spec.max_block_size));
        }

        self.sample_rate = fs;
        self.max_block_size = spec.max_block_size;

        self.lowpass_pole = pole;
        self.lowpass.set_coefficients(lowpass_coefficients(pole));
        self.latency = group_delay_samples(pole);

        // Drop the old delays first so the new maxima always admit them.
        self.dry_delay.set_delay_samples(0);
        self.dry_delay.prepare_with_max_delay(&spec, self.latency)?;
        self.dry_delay.set_delay_samples(self.latency);

        let itd_max = floorf(self.config.interaural_time() * fs) as usize;
        self.itd_delay.set_delay_samples(0);
        self.itd_delay.prepare_with_max_delay(&spec, itd_max)?;

        self.mid_shelf
            .set_coefficients(FirstOrderCoefficients::PASSTHROUGH);
        self.side_shelf
            .set_coefficients(FirstOrderCoefficients::PASSTHROUGH);

        allocate_scratch(&mut self.aux_left, spec.max_block_size, "crossfeed buffer")?;
        allocate_scratch(&mut self.aux_right, spec.max_block_size, "crossfeed buffer")?;

        self.reset_state();
        self.itd_samples = 0;
        self.bypass_state = BypassState::Active;
        self.prepared = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = fs,
            max_block_size = spec.max_block_size,
            pole = self.lowpass_pole,
            latency = self.latency,
            itd_max,
            "crossfeed engine prepared"
        );

        Ok(())
    }

    fn release(&mut self) {
        self.reset_state();
        self.dry_delay.release();
        self.itd_delay.release();
        self.aux_left = Vec::new();
        self.aux_right = Vec::new();
        self.prepared = false;

        #[cfg(feature = "tracing")]
        tracing::debug!("crossfeed engine released");
    }

    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        assert!(self.prepared, "process_block called before prepare");
        assert_eq!(left.len(), right.len(), "channel lengths differ");
        assert!(
            left.len() <= self.max_block_size,
            "block of {} samples exceeds prepared maximum {}",
            left.len(),
            self.max_block_size
        );

        let snapshot = self.params.snapshot();
        if snapshot.bypass {
            self.process_block_bypassed(left, right);
            return;
        }

        self.update_parameters(&snapshot);
        self.mix_crossfeed(left, right);
        self.shelve_mid_side(left, right);
        self.apply_output_gain(left, right);
        self.bypass_state = BypassState::Active;
    }

    fn process_block_bypassed(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "channel lengths differ");

        if self.bypass_state == BypassState::Active {
            self.bypass_state = BypassState::BypassedDirty;
        }
        if self.bypass_state == BypassState::BypassedDirty {
            self.reset_state();
            self.bypass_state = BypassState::BypassedClean;
        }
    }

    fn latency_samples(&self) -> usize {
        self.latency
    }
}
