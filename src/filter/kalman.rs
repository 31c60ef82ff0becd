//! Scalar Kalman Estimator
//!
//! ## Overview
//!
//! One-dimensional Kalman filter over a stationary model: the state is the
//! distance itself, the transition is identity, and each accepted
//! measurement observes the state directly. The full recursion collapses to
//! scalar arithmetic:
//!
//! ```text
//! Prediction:   x̂ = x            (identity transition)
//!               P̂ = P + Q
//! Correction:   K  = P̂ / (P̂ + R)
//!               x  = x̂ + K·(z − x̂)
//!               P  = (1 − K)·P̂
//! ```
//!
//! The correction step is optional per sample: skipping it leaves the
//! predicted state as the output while `P` keeps growing by `Q`. That is
//! the prediction-only coasting the outlier filter leans on when a sample
//! fails validation. Gate policy (which samples to trust) lives in
//! [`super::OutlierFilter`]; this type only does the estimation math.
//!
//! `P ≥ 0` holds throughout: `P` starts at the positive sentinel, `Q` and
//! `R` are positive, and `(1 − K) ∈ (0, 1)`.

use crate::constants::INITIAL_COVARIANCE;

/// 1D Kalman state: distance estimate plus its error covariance.
#[derive(Debug, Clone, Copy)]
pub struct Kalman1d {
    /// Current state estimate (distance in mm).
    estimate: f32,
    /// Estimation error covariance P.
    covariance: f32,
    /// Whether a first measurement has seeded the state.
    initialized: bool,
}

impl Kalman1d {
    /// Creates an estimator holding no state yet.
    ///
    /// The covariance starts at a large sentinel so the first correction
    /// after a bootstrap trusts the measurement almost entirely.
    pub const fn new() -> Self {
        Self {
            estimate: 0.0,
            covariance: INITIAL_COVARIANCE,
            initialized: false,
        }
    }

    /// Whether the estimator has been seeded with a measurement.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current state estimate in millimeters.
    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    /// Current error covariance P.
    pub fn covariance(&self) -> f32 {
        self.covariance
    }

    /// Seeds the state from a first trusted measurement.
    ///
    /// The estimate adopts the measurement and P drops from the sentinel to
    /// the measurement noise R.
    pub fn bootstrap(&mut self, measurement: f32, measurement_noise: f32) {
        self.estimate = measurement;
        self.covariance = measurement_noise;
        self.initialized = true;
    }

    /// Prediction step: identity transition, covariance grows by Q.
    pub fn predict(&mut self, process_noise: f32) {
        self.covariance += process_noise;
    }

    /// Correction step against measurement `z`, returning the new estimate.
    ///
    /// Call after [`predict`](Self::predict); skip entirely to coast on the
    /// prediction.
    pub fn correct(&mut self, z: f32, measurement_noise: f32) -> f32 {
        let gain = self.covariance / (self.covariance + measurement_noise);
        self.estimate += gain * (z - self.estimate);
        self.covariance = (1.0 - gain) * self.covariance;
        self.estimate
    }

    /// Clears the state back to uninitialized with sentinel covariance.
    pub fn reset(&mut self) {
        self.estimate = 0.0;
        self.covariance = INITIAL_COVARIANCE;
        self.initialized = false;
    }
}

impl Default for Kalman1d {
    fn default() -> Self {
        Self::new()
    }
}
