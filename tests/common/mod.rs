//! Shared builders for integration tests
//!
//! Frames and samples here mimic what the peripheral layer hands the core:
//! a flat ambient floor with a single target echo somewhere in the histogram.

use vl53l3cx_core::constants::{FRAME_HEADER_LEN, FRAME_LEN, HISTOGRAM_BINS};
use vl53l3cx_core::HistogramSample;

/// Builds a raw 77-byte result frame: `ambient` photons in every bin, the
/// target echo adding `count` on top of bin `peak_bin`.
pub fn frame_with_peak(
    peak_bin: usize,
    count: u32,
    ambient: u32,
    range_status: u8,
    stream_count: u8,
) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[1] = range_status;
    frame[3] = stream_count;

    for bin in 0..HISTOGRAM_BINS {
        let total = if bin == peak_bin {
            ambient + count
        } else {
            ambient
        };
        let offset = FRAME_HEADER_LEN + bin * 3;
        frame[offset] = (total >> 16) as u8;
        frame[offset + 1] = (total >> 8) as u8;
        frame[offset + 2] = total as u8;
    }

    frame
}

/// Builds a decoded sample with a single echo in `peak_bin`, no ambient.
pub fn sample_with_peak(peak_bin: usize, count: u32, range_status: u8) -> HistogramSample {
    let mut bins = [0u32; HISTOGRAM_BINS];
    bins[peak_bin] = count;
    HistogramSample {
        bins,
        range_status,
        stream_count: 0,
    }
}
