//! Error Types for the Post-Processing Core
//!
//! The error surface here is intentionally narrow. Both algorithmic
//! components are leaf computational units: the histogram extractor cannot
//! fail at all ("no target" is a valid zero result, not an error), and the
//! outlier filter fails only when asked to bootstrap from a sample that its
//! own validation gates rejected. Everything else (degraded inputs, rate
//! spikes, rejection streaks) is absorbed internally via prediction-only
//! mode and auto-reset.
//!
//! Design constraints shared with the rest of the crate:
//!
//! 1. **Small and Copy**: errors are returned on every measurement cycle and
//!    must cost nothing to move around. No String, no heap.
//! 2. **Actionable**: a [`FilterError::NotReady`] means "retry with the next
//!    sample", never "give up". Callers decide policy; the core never logs,
//!    retries, or escalates on its own.

use thiserror_no_std::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors produced by the outlier filter
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// Filter holds no estimate yet and the incoming sample failed
    /// validation, so there is nothing to bootstrap from. Retry with the
    /// next sample.
    #[error("filter not initialized and sample failed validation")]
    NotReady,
}

/// Errors produced when decoding a raw ranging result frame
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Frame shorter than the fixed result-frame layout
    #[error("result frame truncated: need {expected} bytes, got {actual}")]
    Truncated {
        /// Required frame length in bytes
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for FilterError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotReady => defmt::write!(fmt, "filter not ready"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Truncated { expected, actual } => {
                defmt::write!(fmt, "frame truncated: need {}, got {}", expected, actual)
            }
        }
    }
}
