//! Measurement post-processing core for the VL53L3CX time-of-flight sensor
//!
//! Turns raw 24-bin photon-count histograms into filtered millimeter
//! distances for flight-control use. The bus transport (I2C register access,
//! XSHUT sequencing, interrupt wiring) lives outside this crate; callers hand
//! in one self-consistent result frame or [`HistogramSample`] per measurement
//! cycle and consume the filtered output.
//!
//! Key constraints:
//! - No heap allocation anywhere
//! - No blocking, no I/O, safe to call from a per-sensor polling task
//! - Deterministic per-sample cost (one histogram scan + scalar Kalman step)
//!
//! ```
//! use vl53l3cx_core::{HistogramSample, OutlierFilter, FilterConfig};
//!
//! let mut bins = [120u32; 24];
//! bins[10] = 900; // target echo
//! let sample = HistogramSample { bins, range_status: 0, stream_count: 1 };
//!
//! let estimate = sample.extract();
//! let mut filter = OutlierFilter::new(FilterConfig::default());
//!
//! match filter.update(estimate.distance_mm, sample.range_status) {
//!     Ok(_mm) => {}  // feed to the controller
//!     Err(_) => {}   // not ready yet, retry with the next sample
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod errors;
pub mod filter;
pub mod histogram;
pub mod pipeline;
pub mod status;

// Public API
pub use errors::{FilterError, FilterResult, FrameError};
pub use filter::{FilterConfig, OutlierFilter};
pub use histogram::{DistanceEstimate, HistogramSample};
pub use pipeline::{RangingChannel, RangingUpdate};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
