//! Histogram Distance Extraction
//!
//! ## Overview
//!
//! The VL53L3CX reports each ranging cycle as a 24-bin photon-count
//! histogram: every bin is a fixed time window, and time of flight maps bin
//! position to target distance. This module converts one histogram snapshot
//! into a millimeter estimate in four steps:
//!
//! ```text
//! bins[24] ──→ ambient estimate ──→ ambient-corrected bins
//!                                          │
//!                              peak search (bins 6..=17)
//!                                          │
//!                          parabolic sub-bin interpolation
//!                                          │
//!                        bin width (VCSEL period) ──→ distance_mm
//! ```
//!
//! The whole chain is a pure function over one [`HistogramSample`]: no state,
//! no I/O, no failure modes. "No target detected" is the valid zero result
//! (`peak_bin == 0`, `distance_mm == 0`), not an error.
//!
//! ## Sub-bin interpolation
//!
//! A parabola through the peak bin and its two neighbors sharpens the
//! estimate well below one bin of resolution:
//!
//! ```text
//! offset = 0.5 · (a − c) / (a − 2b + c)      a, b, c = corrected counts
//! ```
//!
//! A zero denominator (flat top) skips the offset. For non-unimodal bin
//! patterns the offset can exceed ±0.5; the conversion leaves that as-is
//! rather than clamping, matching the sensor's reference processing.

use crate::{
    constants::{
        AMBIENT_BINS, BIN_WIDTH_PERIOD_A_MM, BIN_WIDTH_PERIOD_B_MM, FRAME_HEADER_LEN, FRAME_LEN,
        HISTOGRAM_BINS, PEAK_SEARCH_FIRST_BIN, PEAK_SEARCH_LAST_BIN, PERIOD_B_FIRST_BIN,
        RANGE_STATUS_MASK,
    },
    errors::FrameError,
};

/// One histogram snapshot as delivered by the sensor per measurement cycle.
///
/// The peripheral layer guarantees the snapshot is self-consistent (read in
/// a single bus transaction, never torn). Bin counts are 24-bit photon
/// totals; bin 0 is the earliest time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HistogramSample {
    /// Photon counts per time window, earliest first.
    pub bins: [u32; HISTOGRAM_BINS],
    /// Measurement status code; 0 is a valid range, see [`crate::status`].
    pub range_status: u8,
    /// Free-running measurement counter, informational only.
    pub stream_count: u8,
}

/// Distance derived from one histogram snapshot.
///
/// Recomputed every cycle; nothing here is carried across samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceEstimate {
    /// Estimated target distance in millimeters; 0 when no peak was found.
    pub distance_mm: u16,
    /// Ambient light floor (mean of the first 6 bins), for diagnostics.
    pub ambient_estimate: u32,
    /// Bin holding the peak within the search window; 0 when none.
    pub peak_bin: u8,
}

impl HistogramSample {
    /// Decodes the 77-byte ranging result frame into a sample.
    ///
    /// Frame layout: 5 header bytes (status at offset 1, masked to its low
    /// five bits; stream counter at offset 3) followed by 24 big-endian
    /// 3-byte bin counts. Extra trailing bytes are ignored.
    pub fn from_frame(frame: &[u8]) -> Result<Self, FrameError> {
        if frame.len() < FRAME_LEN {
            return Err(FrameError::Truncated {
                expected: FRAME_LEN,
                actual: frame.len(),
            });
        }

        let mut bins = [0u32; HISTOGRAM_BINS];
        for (bin, value) in bins.iter_mut().enumerate() {
            let offset = FRAME_HEADER_LEN + bin * 3;
            *value = (u32::from(frame[offset]) << 16)
                | (u32::from(frame[offset + 1]) << 8)
                | u32::from(frame[offset + 2]);
        }

        Ok(Self {
            bins,
            range_status: frame[1] & RANGE_STATUS_MASK,
            stream_count: frame[3],
        })
    }

    /// Extracts the distance estimate from this snapshot.
    ///
    /// Pure function: identical samples produce identical estimates. See the
    /// module docs for the algorithm.
    pub fn extract(&self) -> DistanceEstimate {
        // Ambient floor from the leading windows; integer division biases
        // low, acceptable for a bias term.
        let ambient_sum: u32 = self.bins[..AMBIENT_BINS].iter().sum();
        let ambient_estimate = ambient_sum / AMBIENT_BINS as u32;

        let mut corrected = [0u32; HISTOGRAM_BINS];
        for (out, &raw) in corrected.iter_mut().zip(self.bins.iter()) {
            *out = raw.saturating_sub(ambient_estimate);
        }

        // First-wins scan keeps the lowest-index bin on ties.
        let mut max_count = 0u32;
        let mut peak_bin = 0usize;
        for (i, &count) in corrected
            .iter()
            .enumerate()
            .take(PEAK_SEARCH_LAST_BIN + 1)
            .skip(PEAK_SEARCH_FIRST_BIN)
        {
            if count > max_count {
                max_count = count;
                peak_bin = i;
            }
        }

        let bin_width_mm = if peak_bin < PERIOD_B_FIRST_BIN {
            BIN_WIDTH_PERIOD_A_MM
        } else {
            BIN_WIDTH_PERIOD_B_MM
        };

        let distance_mm = if max_count > 0 && peak_bin > 0 && peak_bin < HISTOGRAM_BINS - 1 {
            let a = corrected[peak_bin - 1] as i32;
            let b = corrected[peak_bin] as i32;
            let c = corrected[peak_bin + 1] as i32;

            let denominator = a - 2 * b + c;
            let sub_bin_offset = if denominator == 0 {
                0.0
            } else {
                0.5 * (a - c) as f32 / denominator as f32
            };

            let accurate_bin = peak_bin as f32 + sub_bin_offset;
            libm::roundf(accurate_bin * bin_width_mm) as u16
        } else {
            // No peak, or peak at the array edge where a neighbor is
            // missing: fall back to whole-bin resolution.
            libm::roundf(peak_bin as f32 * bin_width_mm) as u16
        };

        DistanceEstimate {
            distance_mm,
            ambient_estimate,
            peak_bin: peak_bin as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with_bins(bins: [u32; HISTOGRAM_BINS]) -> HistogramSample {
        HistogramSample {
            bins,
            range_status: 0,
            stream_count: 0,
        }
    }

    #[test]
    fn all_zero_bins_mean_no_target() {
        let estimate = sample_with_bins([0; HISTOGRAM_BINS]).extract();
        assert_eq!(estimate.peak_bin, 0);
        assert_eq!(estimate.distance_mm, 0);
        assert_eq!(estimate.ambient_estimate, 0);
    }

    #[test]
    fn flat_histogram_cancels_to_no_target() {
        // Uniform counts vanish entirely under ambient subtraction.
        let estimate = sample_with_bins([50; HISTOGRAM_BINS]).extract();
        assert_eq!(estimate.ambient_estimate, 50);
        assert_eq!(estimate.peak_bin, 0);
        assert_eq!(estimate.distance_mm, 0);
    }

    #[test]
    fn symmetric_peak_lands_on_bin_center() {
        let mut bins = [0u32; HISTOGRAM_BINS];
        bins[10] = 1000;
        let estimate = sample_with_bins(bins).extract();
        assert_eq!(estimate.peak_bin, 10);
        // Isolated peak: neighbors equal, offset zero, 10 bins x 15 mm.
        assert_eq!(estimate.distance_mm, 150);
    }

    #[test]
    fn interpolation_shifts_toward_heavier_neighbor() {
        let mut bins = [0u32; HISTOGRAM_BINS];
        bins[9] = 300;
        bins[10] = 1000;
        bins[11] = 500;
        let estimate = sample_with_bins(bins).extract();
        assert_eq!(estimate.peak_bin, 10);
        // offset = 0.5 * (300 - 500) / (300 - 2000 + 500) = 1/12 of a bin
        // toward bin 11: (10 + 1/12) * 15.0 = 151.25
        assert_eq!(estimate.distance_mm, 151);
    }

    #[test]
    fn short_period_region_uses_narrower_bins() {
        let mut bins = [0u32; HISTOGRAM_BINS];
        bins[14] = 800;
        let estimate = sample_with_bins(bins).extract();
        assert_eq!(estimate.peak_bin, 14);
        assert_eq!(estimate.distance_mm, 175); // 14 x 12.5
    }

    #[test]
    fn peak_at_window_edges_is_handled() {
        let mut low = [0u32; HISTOGRAM_BINS];
        low[PEAK_SEARCH_FIRST_BIN] = 500;
        let estimate = sample_with_bins(low).extract();
        assert_eq!(estimate.peak_bin, PEAK_SEARCH_FIRST_BIN as u8);
        assert_eq!(estimate.distance_mm, 90); // 6 x 15

        let mut high = [0u32; HISTOGRAM_BINS];
        high[PEAK_SEARCH_LAST_BIN] = 400;
        let estimate = sample_with_bins(high).extract();
        assert_eq!(estimate.peak_bin, PEAK_SEARCH_LAST_BIN as u8);
        assert_eq!(estimate.distance_mm, 213); // round(17 x 12.5)
    }

    #[test]
    fn tie_resolves_to_first_bin() {
        let mut bins = [0u32; HISTOGRAM_BINS];
        bins[7] = 500;
        bins[9] = 500;
        let estimate = sample_with_bins(bins).extract();
        assert_eq!(estimate.peak_bin, 7);
        assert_eq!(estimate.distance_mm, 105);
    }

    #[test]
    fn ambient_offset_does_not_move_the_peak() {
        let mut bins = [100u32; HISTOGRAM_BINS];
        bins[8] = 600;
        let estimate = sample_with_bins(bins).extract();
        assert_eq!(estimate.ambient_estimate, 100);
        assert_eq!(estimate.peak_bin, 8);
        assert_eq!(estimate.distance_mm, 120); // 8 x 15
    }

    #[test]
    fn peak_outside_search_window_is_ignored() {
        let mut bins = [0u32; HISTOGRAM_BINS];
        bins[3] = 2000;
        bins[20] = 2000;
        bins[12] = 400;
        let estimate = sample_with_bins(bins).extract();
        assert_eq!(estimate.peak_bin, 12);
        assert_eq!(estimate.distance_mm, 150); // 12 x 12.5
    }

    #[test]
    fn frame_decode_extracts_header_and_bins() {
        let mut frame = [0u8; FRAME_LEN];
        frame[1] = 0x49; // status bits plus unrelated flags
        frame[3] = 7;
        // bin 0 = 0x000102, bin 23 = 0x030201
        frame[FRAME_HEADER_LEN] = 0x00;
        frame[FRAME_HEADER_LEN + 1] = 0x01;
        frame[FRAME_HEADER_LEN + 2] = 0x02;
        let last = FRAME_HEADER_LEN + 23 * 3;
        frame[last] = 0x03;
        frame[last + 1] = 0x02;
        frame[last + 2] = 0x01;

        let sample = HistogramSample::from_frame(&frame).unwrap();
        assert_eq!(sample.range_status, 0x09);
        assert_eq!(sample.stream_count, 7);
        assert_eq!(sample.bins[0], 0x000102);
        assert_eq!(sample.bins[23], 0x030201);
    }

    #[test]
    fn short_frame_is_rejected() {
        let frame = [0u8; FRAME_LEN - 1];
        assert_eq!(
            HistogramSample::from_frame(&frame),
            Err(FrameError::Truncated {
                expected: FRAME_LEN,
                actual: FRAME_LEN - 1,
            })
        );
    }
}
