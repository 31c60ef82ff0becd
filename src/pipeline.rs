//! Per-Channel Ranging Pipeline
//!
//! Composes the two algorithmic stages for one sensor channel:
//!
//! ```text
//! HistogramSample ──→ distance extraction ──→ outlier filter ──→ consumer
//! ```
//!
//! A flight controller typically owns one [`RangingChannel`] per physical
//! sensor (front, bottom, ...), each polled from its own task. The channel
//! follows the `nb` convention: until the filter has bootstrapped from a
//! valid sample, [`RangingChannel::process`] returns
//! [`nb::Error::WouldBlock`]; poll again with the next measurement cycle.
//! Once tracking, every cycle yields a [`RangingUpdate`].
//!
//! Policy decisions (what to do while not ready, when to force a reset)
//! stay with the caller; the channel itself only reports.
//!
//! ```
//! use vl53l3cx_core::{HistogramSample, RangingChannel};
//!
//! let mut channel = RangingChannel::with_defaults();
//!
//! let mut bins = [0u32; 24];
//! bins[10] = 1500;
//! let sample = HistogramSample { bins, range_status: 0, stream_count: 1 };
//!
//! let update = channel.process(&sample).unwrap();
//! assert_eq!(update.distance_mm, 150);
//! ```

use core::convert::Infallible;

use crate::{
    errors::FilterError,
    filter::{FilterConfig, OutlierFilter},
    histogram::HistogramSample,
};

/// One cycle's result from a ranging channel.
///
/// Carries the filtered distance plus the extractor's intermediates for
/// consumers that want diagnostics (telemetry, tuning).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangingUpdate {
    /// Filtered distance in millimeters.
    pub distance_mm: u16,
    /// Unfiltered distance straight from the histogram extractor.
    pub raw_distance_mm: u16,
    /// Peak bin the raw distance came from; 0 when no target was found.
    pub peak_bin: u8,
    /// Ambient light floor estimated from the leading bins.
    pub ambient_estimate: u32,
    /// Range status the sensor reported for this cycle.
    pub range_status: u8,
}

/// Extraction and filtering state for one physical sensor.
///
/// Single-writer: one channel belongs to one polling task. The extractor is
/// stateless; all per-channel state lives in the owned [`OutlierFilter`].
#[derive(Debug, Clone)]
pub struct RangingChannel {
    filter: OutlierFilter,
}

impl RangingChannel {
    /// Creates a channel with the given filter configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            filter: OutlierFilter::new(config),
        }
    }

    /// Creates a channel with the default filter configuration.
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Runs one histogram snapshot through extraction and filtering.
    ///
    /// Returns [`nb::Error::WouldBlock`] while the filter cannot produce an
    /// output (no estimate yet and the sample failed validation); retry
    /// with the next measurement cycle.
    pub fn process(&mut self, sample: &HistogramSample) -> nb::Result<RangingUpdate, Infallible> {
        let estimate = sample.extract();
        let was_initialized = self.filter.is_initialized();

        match self.filter.update(estimate.distance_mm, sample.range_status) {
            Ok(distance_mm) => Ok(RangingUpdate {
                distance_mm,
                raw_distance_mm: estimate.distance_mm,
                peak_bin: estimate.peak_bin,
                ambient_estimate: estimate.ambient_estimate,
                range_status: sample.range_status,
            }),
            Err(FilterError::NotReady) => {
                #[cfg(feature = "log")]
                if was_initialized {
                    log::debug!(
                        "ranging filter reset after rejection streak ({})",
                        crate::status::describe(sample.range_status)
                    );
                } else {
                    log::debug!(
                        "awaiting usable sample to seed ranging filter ({})",
                        crate::status::describe(sample.range_status)
                    );
                }
                #[cfg(not(feature = "log"))]
                let _ = was_initialized;

                Err(nb::Error::WouldBlock)
            }
        }
    }

    /// Forces the channel's filter back to uninitialized.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Read access to the channel's filter for covariance inspection.
    pub fn filter(&self) -> &OutlierFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HISTOGRAM_BINS;

    fn sample(peak_bin: usize, count: u32, range_status: u8) -> HistogramSample {
        let mut bins = [0u32; HISTOGRAM_BINS];
        bins[peak_bin] = count;
        HistogramSample {
            bins,
            range_status,
            stream_count: 0,
        }
    }

    #[test]
    fn clean_sample_produces_update() {
        let mut channel = RangingChannel::with_defaults();
        let update = channel.process(&sample(10, 1200, 0)).unwrap();

        assert_eq!(update.distance_mm, 150);
        assert_eq!(update.raw_distance_mm, 150);
        assert_eq!(update.peak_bin, 10);
        assert_eq!(update.range_status, 0);
    }

    #[test]
    fn invalid_first_sample_would_block() {
        let mut channel = RangingChannel::with_defaults();
        assert_eq!(
            channel.process(&sample(10, 1200, 4)),
            Err(nb::Error::WouldBlock)
        );

        // Channel recovers as soon as a usable sample arrives.
        let update = channel.process(&sample(10, 1200, 0)).unwrap();
        assert_eq!(update.distance_mm, 150);
    }

    #[test]
    fn rejected_status_coasts_and_grows_covariance() {
        let mut channel = RangingChannel::with_defaults();
        channel.process(&sample(10, 1200, 0)).unwrap();

        // Status 2 fails the default mask: output rides the prediction
        // while uncertainty grows.
        let update = channel.process(&sample(10, 1200, 2)).unwrap();
        assert_eq!(update.raw_distance_mm, 150);
        assert_eq!(update.distance_mm, 150);
        assert!(channel.filter().error_covariance() > 4.0);
    }

    #[test]
    fn reset_requires_rebootstrap() {
        let mut channel = RangingChannel::with_defaults();
        channel.process(&sample(10, 1200, 0)).unwrap();

        channel.reset();
        assert!(!channel.filter().is_initialized());
        assert_eq!(
            channel.process(&sample(10, 1200, 4)),
            Err(nb::Error::WouldBlock)
        );
    }
}
