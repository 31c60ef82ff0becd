//! Outlier-Rejecting Distance Filter
//!
//! ## Overview
//!
//! Stateful per-channel filter that turns the raw `(distance, status)` pairs
//! coming off the histogram extractor into a smoothed, outlier-resistant
//! distance. Two validation gates decide how much to trust each sample, and
//! a scalar Kalman estimator ([`kalman::Kalman1d`]) carries the state:
//!
//! - **Status gate**: the sensor's range status must be in the configured
//!   accept mask (status used as a bit position, so one mask covers any
//!   subset of the small code space).
//! - **Rate gate**: the jump from the previous output must stay inside
//!   `max_change_rate_mm`, tripled for the first few samples after a reset,
//!   when the baseline itself has just moved.
//!
//! A sample failing either gate is not discarded: the filter outputs the
//! Kalman prediction instead (uncertainty keeps growing since nothing
//! corrected it), so transient glitches coast by without reaching the
//! consumer. Five rejections in a row mean the scene really changed; the
//! filter resets itself and re-seeds from the next acceptable sample.
//!
//! ## State machine
//!
//! ```text
//!                    accepted sample (bootstrap)
//!   Uninitialized ──────────────────────────────→ Tracking
//!        ↑ │                                        │   │
//!        │ └── rejected sample: Err(NotReady) ──┐   │   │ any sample:
//!        │                                      ↓   │   │ output
//!        └────── 5th consecutive rejection ─────────┘   ↓
//!                (reset before the Kalman step)    correct / coast
//! ```
//!
//! The 5th-rejection reset runs *before* the Kalman step, so the triggering
//! call re-evaluates bootstrap against the same sample, which was just
//! rejected, so that call also returns [`FilterError::NotReady`] and the
//! filter waits for the next usable sample.
//!
//! ## Usage
//!
//! ```
//! use vl53l3cx_core::filter::{FilterConfig, OutlierFilter};
//!
//! let config = FilterConfig::default().with_max_change_rate(300);
//! let mut filter = OutlierFilter::new(config);
//!
//! // First accepted sample seeds the estimate.
//! assert_eq!(filter.update(1000, 0), Ok(1000));
//! // A glitch jump coasts on the prediction instead of propagating.
//! assert_eq!(filter.update(4000, 0), Ok(1000));
//! ```
//!
//! ## Concurrency
//!
//! One filter instance belongs to one sensor channel and one logical thread
//! of control. There is no internal synchronization; callers sharing an
//! instance across threads must serialize access themselves.

pub mod kalman;

pub use kalman::Kalman1d;

use crate::{
    constants::{
        DEFAULT_MAX_CHANGE_RATE_MM, DEFAULT_MEASUREMENT_NOISE, DEFAULT_PROCESS_NOISE,
        DEFAULT_VALID_STATUS_MASK, RATE_GRACE_MULTIPLIER, RATE_GRACE_SAMPLES,
        REJECTION_RESET_THRESHOLD, SAMPLES_SINCE_RESET_CAP,
    },
    errors::{FilterError, FilterResult},
};

/// Outlier filter configuration, immutable per filter instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterConfig {
    /// Validate the sensor's range status against `valid_status_mask`.
    pub enable_status_check: bool,
    /// Reject samples whose jump from the previous output is too large.
    pub enable_rate_limit: bool,
    /// Maximum accepted |distance delta| per sample in millimeters.
    pub max_change_rate_mm: u16,
    /// Accepted range statuses, one bit per status code (bit 0 = status 0).
    pub valid_status_mask: u8,
    /// Kalman process noise Q; higher values track faster, smooth less.
    pub process_noise: f32,
    /// Kalman measurement noise R; higher values smooth more, lag more.
    pub measurement_noise: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enable_status_check: true,
            enable_rate_limit: true,
            max_change_rate_mm: DEFAULT_MAX_CHANGE_RATE_MM,
            valid_status_mask: DEFAULT_VALID_STATUS_MASK,
            process_noise: DEFAULT_PROCESS_NOISE,
            measurement_noise: DEFAULT_MEASUREMENT_NOISE,
        }
    }
}

impl FilterConfig {
    /// Enable or disable the range-status gate.
    pub fn with_status_check(mut self, enable: bool) -> Self {
        self.enable_status_check = enable;
        self
    }

    /// Enable or disable the rate-of-change gate.
    pub fn with_rate_limit(mut self, enable: bool) -> Self {
        self.enable_rate_limit = enable;
        self
    }

    /// Set the maximum accepted per-sample distance change in millimeters.
    pub fn with_max_change_rate(mut self, max_change_rate_mm: u16) -> Self {
        self.max_change_rate_mm = max_change_rate_mm;
        self
    }

    /// Set the accepted-status bitmask (bit N accepts status N).
    pub fn with_valid_status_mask(mut self, mask: u8) -> Self {
        self.valid_status_mask = mask;
        self
    }

    /// Set the Kalman process noise Q.
    pub fn with_process_noise(mut self, q: f32) -> Self {
        self.process_noise = q;
        self
    }

    /// Set the Kalman measurement noise R.
    pub fn with_measurement_noise(mut self, r: f32) -> Self {
        self.measurement_noise = r;
        self
    }
}

/// Per-channel outlier-rejecting distance filter.
///
/// Owns the gate bookkeeping and a [`Kalman1d`] estimator. One instance per
/// sensor channel; state lives as long as the channel does.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    config: FilterConfig,
    kalman: Kalman1d,
    /// Most recent output, baseline for the rate gate.
    last_output: u16,
    /// Consecutive rejected samples; reaching the threshold resets the
    /// filter. Capped, never wraps.
    consecutive_rejections: u8,
    /// Accepted samples since the last reset; relaxes the rate gate while
    /// small. Capped at 255, never wraps.
    samples_since_reset: u8,
}

impl OutlierFilter {
    /// Creates a filter with the given configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            kalman: Kalman1d::new(),
            last_output: 0,
            consecutive_rejections: 0,
            // Grace counter starts expired: the relaxed rate limit is for
            // recovering after a reset, not for a freshly built filter.
            samples_since_reset: RATE_GRACE_SAMPLES,
        }
    }

    /// Creates a filter with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Processes one `(distance, status)` sample and returns the filtered
    /// distance.
    ///
    /// The only failure is [`FilterError::NotReady`]: the filter holds no
    /// estimate yet and this sample failed validation, so there is nothing
    /// to output. Treat it as "retry with the next sample". Once tracking,
    /// every call produces an output; rejected samples ride the prediction
    /// while [`error_covariance`](Self::error_covariance) grows, which is
    /// the signal consumers should watch if they need a confidence measure.
    pub fn update(&mut self, distance_mm: u16, range_status: u8) -> FilterResult<u16> {
        let status_valid = !self.config.enable_status_check || self.status_accepted(range_status);
        let rate_valid = !self.config.enable_rate_limit
            || !self.kalman.is_initialized()
            || self.rate_accepted(distance_mm);
        let accepted = status_valid && rate_valid;

        // Rejection bookkeeping runs before the Kalman step: the 5th
        // consecutive rejection resets the state, and the same (rejected)
        // sample then falls through to the bootstrap-failure path below.
        if accepted {
            self.consecutive_rejections = 0;
        } else {
            self.consecutive_rejections = self.consecutive_rejections.saturating_add(1);
            if self.consecutive_rejections >= REJECTION_RESET_THRESHOLD {
                self.reset();
            }
        }

        let output = if !self.kalman.is_initialized() {
            if !accepted {
                return Err(FilterError::NotReady);
            }
            self.kalman
                .bootstrap(f32::from(distance_mm), self.config.measurement_noise);
            distance_mm
        } else {
            self.kalman.predict(self.config.process_noise);
            if accepted {
                self.kalman
                    .correct(f32::from(distance_mm), self.config.measurement_noise);
            }
            libm::roundf(self.kalman.estimate()) as u16
        };

        self.last_output = output;
        if accepted && self.samples_since_reset < SAMPLES_SINCE_RESET_CAP {
            self.samples_since_reset += 1;
        }

        Ok(output)
    }

    /// Clears all filter state back to uninitialized.
    ///
    /// The next accepted sample re-seeds the estimate; until then
    /// [`update`](Self::update) fails with [`FilterError::NotReady`] for
    /// invalid samples.
    pub fn reset(&mut self) {
        self.last_output = 0;
        self.consecutive_rejections = 0;
        self.samples_since_reset = 0;
        self.kalman.reset();
    }

    /// Current Kalman estimate in millimeters (0.0 while uninitialized).
    pub fn estimate(&self) -> f32 {
        self.kalman.estimate()
    }

    /// Current error covariance; grows while coasting on rejected samples,
    /// shrinks while tracking accepted ones.
    pub fn error_covariance(&self) -> f32 {
        self.kalman.covariance()
    }

    /// Whether the filter holds an estimate.
    pub fn is_initialized(&self) -> bool {
        self.kalman.is_initialized()
    }

    /// Most recent filtered output in millimeters.
    pub fn last_output(&self) -> u16 {
        self.last_output
    }

    /// The configuration this filter was built with.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Status gate: the status code indexes into the accept mask. Codes
    /// beyond the mask width can never be accepted.
    fn status_accepted(&self, range_status: u8) -> bool {
        usize::from(range_status) < u8::BITS as usize
            && (1u8 << range_status) & self.config.valid_status_mask != 0
    }

    /// Rate gate against the previous output, with the post-reset grace
    /// window widening the limit.
    fn rate_accepted(&self, distance_mm: u16) -> bool {
        let change = i32::from(distance_mm) - i32::from(self.last_output);

        let mut effective_limit = u32::from(self.config.max_change_rate_mm);
        if self.samples_since_reset < RATE_GRACE_SAMPLES {
            effective_limit *= u32::from(RATE_GRACE_MULTIPLIER);
        }

        change.unsigned_abs() <= effective_limit
    }
}
