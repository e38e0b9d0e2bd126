//! # Position Filter
//!
//! Linear Kalman filter over a single tracked point.
//!
//! State vector: `[x, y, vx, vy]` with a constant-velocity transition
//! (`x += vx`, `y += vy`, velocity unchanged). Only the position is
//! measured.
//!
//! ## Lifecycle
//! 1. One `PositionFilter` per physical object, created with
//!    [`PositionFilter::with_initial`] at the object's first measurement and
//!    kept for the rest of the trajectory.
//! 2. Every frame: `predict()`.
//! 3. Frames with a measurement: `correct(x, y)`. Frames without one skip
//!    it and the covariance grows through `predict` alone.

use crate::config::FilterConfig;
use nalgebra::{Matrix2, Matrix2x4, Matrix4, Matrix4x2, Vector2, Vector4};
use serde::{Deserialize, Serialize};

/// Diagonal of the covariance a seeded filter starts from
const INITIAL_COVARIANCE: f32 = 100.0;

/// Estimate and error covariance, owned by exactly one filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// `[x, y, vx, vy]`
    pub x: Vector4<f32>,
    pub p: Matrix4<f32>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            x: Vector4::zeros(),
            p: Matrix4::zeros(),
        }
    }
}

impl FilterState {
    pub fn position(&self) -> (f32, f32) {
        (self.x[0], self.x[1])
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.x[2], self.x[3])
    }
}

#[derive(Debug, Clone)]
pub struct PositionFilter {
    state: FilterState,
    transition: Matrix4<f32>,
    measurement: Matrix2x4<f32>,
    process_noise: Matrix4<f32>,
    measurement_noise: Matrix2<f32>,
}

impl PositionFilter {
    /// Fresh filter: zero state and zero covariance.
    pub fn new(config: &FilterConfig) -> Self {
        #[rustfmt::skip]
        let transition = Matrix4::new(
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let measurement = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );

        Self {
            state: FilterState::default(),
            transition,
            measurement,
            process_noise: Matrix4::identity() * config.process_noise,
            measurement_noise: Matrix2::identity() * config.measurement_noise,
        }
    }

    /// Filter seeded at a first measurement: position `(x, y)`, zero
    /// velocity, wide covariance so the next measurements dominate.
    pub fn with_initial(config: &FilterConfig, x: f32, y: f32) -> Self {
        let mut filter = Self::new(config);
        filter.state.x = Vector4::new(x, y, 0.0, 0.0);
        filter.state.p = Matrix4::identity() * INITIAL_COVARIANCE;
        filter
    }

    /// Advance one step and return the predicted position.
    pub fn predict(&mut self) -> (f32, f32) {
        let f = &self.transition;
        self.state.x = f * self.state.x;
        self.state.p = f * self.state.p * f.transpose() + self.process_noise;
        self.state.position()
    }

    /// Fuse a position measurement into the current estimate.
    pub fn correct(&mut self, x: f32, y: f32) {
        let z = Vector2::new(x, y);
        let h = &self.measurement;

        let innovation = z - h * self.state.x;
        let s = h * self.state.p * h.transpose() + self.measurement_noise;
        // S = HPHᵀ + R is positive definite while R is.
        let Some(s_inv) = s.try_inverse() else {
            tracing::warn!("position filter innovation covariance is singular, measurement skipped");
            return;
        };
        let gain: Matrix4x2<f32> = self.state.p * h.transpose() * s_inv;

        self.state.x += gain * innovation;
        self.state.p = (Matrix4::identity() - gain * h) * self.state.p;
    }

    pub fn position(&self) -> (f32, f32) {
        self.state.position()
    }

    pub fn velocity(&self) -> (f32, f32) {
        self.state.velocity()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }
}
