//! Constants for the VL53L3CX post-processing core
//!
//! Centralizes every tuning number used by the histogram extractor and the
//! outlier filter, with the reasoning behind each value. Use these instead of
//! magic numbers; names carry units where one applies.
//!
//! Values trace back to the VL53L3CX MEDIUM_RANGE preset: the device streams
//! a 77-byte result frame per cycle (5-byte header + 24 bins of 3 bytes), and
//! the two VCSEL period regions give the histogram its piecewise bin width.

// --- Histogram geometry ---

/// Number of time-window bins in one histogram snapshot.
pub const HISTOGRAM_BINS: usize = 24;

/// Leading bins averaged to estimate the ambient light floor.
///
/// The first 6 windows close before the VCSEL pulse can return from the
/// sensor's minimum range, so they see ambient photons only.
pub const AMBIENT_BINS: usize = 6;

/// First bin of the target search window (inclusive).
pub const PEAK_SEARCH_FIRST_BIN: usize = 6;

/// Last bin of the target search window (inclusive).
///
/// Bins past 17 alias with the next VCSEL pulse under the MEDIUM_RANGE
/// timing and are excluded from peak search.
pub const PEAK_SEARCH_LAST_BIN: usize = 17;

/// First bin ranged with the short VCSEL period (period B).
pub const PERIOD_B_FIRST_BIN: usize = 12;

/// Bin width in millimeters for the long VCSEL period region (bins 0-11).
pub const BIN_WIDTH_PERIOD_A_MM: f32 = 15.0;

/// Bin width in millimeters for the short VCSEL period region (bins 12-23).
pub const BIN_WIDTH_PERIOD_B_MM: f32 = 12.5;

// --- Result frame layout ---

/// Total length of the ranging result frame read in one bus transaction.
pub const FRAME_LEN: usize = FRAME_HEADER_LEN + HISTOGRAM_BINS * 3;

/// Header bytes preceding the bin counts in the result frame.
pub const FRAME_HEADER_LEN: usize = 5;

/// Mask applied to the frame's status byte; upper bits carry unrelated flags.
pub const RANGE_STATUS_MASK: u8 = 0x1F;

// --- Outlier filter defaults ---

/// Default maximum accepted |distance delta| between consecutive samples.
///
/// 500 mm per sample is far beyond what the airframe can close at the
/// sensor's cycle rate; larger jumps are glitches, not motion.
pub const DEFAULT_MAX_CHANGE_RATE_MM: u16 = 500;

/// Default accepted range statuses: bit per status code, status 0 only.
pub const DEFAULT_VALID_STATUS_MASK: u8 = 0x01;

/// Default Kalman process noise Q (responsive tracking).
pub const DEFAULT_PROCESS_NOISE: f32 = 1.0;

/// Default Kalman measurement noise R (~2 mm measurement std deviation).
pub const DEFAULT_MEASUREMENT_NOISE: f32 = 4.0;

/// Error covariance sentinel while the filter holds no estimate.
pub const INITIAL_COVARIANCE: f32 = 1000.0;

/// Consecutive rejections that trigger an automatic filter reset.
///
/// Bounds how long the filter may coast on stale predictions before
/// accepting that the scene really changed.
pub const REJECTION_RESET_THRESHOLD: u8 = 5;

/// Number of post-reset samples that get the relaxed rate limit.
pub const RATE_GRACE_SAMPLES: u8 = 3;

/// Rate-limit multiplier applied during the post-reset grace window.
pub const RATE_GRACE_MULTIPLIER: u16 = 3;

/// Cap for the accepted-samples-since-reset counter (capped, never wraps).
pub const SAMPLES_SINCE_RESET_CAP: u8 = u8::MAX;
