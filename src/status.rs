//! Range status codes and diagnostics
//!
//! The result frame's status byte classifies each measurement. For filtering
//! purposes only one convention matters: **status 0 is a valid range** and
//! every other code is some degree of failure, which is why
//! [`FilterConfig::default`](crate::FilterConfig::default) accepts status 0
//! alone. The named codes below follow the device's internal classification
//! and exist for diagnostics and logging, not for gate decisions: widen the
//! filter's `valid_status_mask` instead of matching on these.

/// Sigma (ranging noise) estimate above limit.
pub const SIGMA_FAIL: u8 = 0x01;
/// Return signal below the detection threshold.
pub const SIGNAL_FAIL: u8 = 0x02;
/// Phase out of the valid window.
pub const OUTOFBOUNDS_FAIL: u8 = 0x04;
/// VCSEL or SPAD hardware failure.
pub const HARDWARE_FAIL: u8 = 0x05;
/// Range valid but wrap-around check was not performed.
pub const RANGE_VALID_NO_WRAP_CHECK_FAIL: u8 = 0x06;
/// Wrapped target, non-matching phases.
pub const WRAP_TARGET_FAIL: u8 = 0x07;
/// Internal algorithm underflow or overflow.
pub const PROCESSING_FAIL: u8 = 0x08;
/// Range valid per the device's own classification.
pub const RANGE_VALID: u8 = 0x09;
/// Crosstalk between SPAD arrays degraded the signal.
pub const XTALK_SIGNAL_FAIL: u8 = 0x0A;
/// Range valid but clipped at the sensor's minimum range.
pub const RANGE_VALID_MIN_RANGE_CLIPPED: u8 = 0x0B;
/// Measurement aborted by a synchronisation interrupt.
pub const SYNCRONISATION_INT: u8 = 0x0C;
/// Range valid from a merged pulse of multiple targets.
pub const RANGE_VALID_MERGED_PULSE: u8 = 0x0D;
/// Target present but signal too weak to range.
pub const TARGET_PRESENT_LACK_OF_SIGNAL: u8 = 0x0E;
/// Target closer than the sensor's minimum range.
pub const MIN_RANGE_FAIL: u8 = 0x0F;
/// No usable range produced.
pub const RANGE_INVALID: u8 = 0x11;

/// Whether a status code counts as a usable range under the driver
/// convention (status 0 only).
///
/// Statuses 1 and 2 are signal/sigma failures that may still carry a usable
/// distance; accept them by widening the filter's status mask rather than
/// changing this predicate.
pub fn is_valid_range_status(range_status: u8) -> bool {
    range_status == 0
}

/// Human-readable name for a device status code, for diagnostics output.
pub fn describe(range_status: u8) -> &'static str {
    match range_status {
        RANGE_VALID => "Range Valid",
        SIGMA_FAIL => "Sigma Fail",
        SIGNAL_FAIL => "Signal Fail",
        RANGE_VALID_MIN_RANGE_CLIPPED => "Min Range Clipped",
        OUTOFBOUNDS_FAIL => "Out of Bounds",
        HARDWARE_FAIL => "Hardware Fail",
        RANGE_VALID_NO_WRAP_CHECK_FAIL => "No Wrap Check",
        WRAP_TARGET_FAIL => "Wrap Target Fail",
        PROCESSING_FAIL => "Processing Fail",
        XTALK_SIGNAL_FAIL => "Crosstalk Fail",
        SYNCRONISATION_INT => "Sync Interrupt",
        RANGE_VALID_MERGED_PULSE => "Merged Pulse",
        TARGET_PRESENT_LACK_OF_SIGNAL => "Lack of Signal",
        MIN_RANGE_FAIL => "Min Range Fail",
        RANGE_INVALID => "Range Invalid",
        _ => "Unknown Status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_status_zero_is_valid() {
        assert!(is_valid_range_status(0));
        for status in 1..=0x1F {
            assert!(!is_valid_range_status(status));
        }
    }

    #[test]
    fn describe_known_and_unknown() {
        assert_eq!(describe(RANGE_INVALID), "Range Invalid");
        assert_eq!(describe(0x1E), "Unknown Status");
    }
}
