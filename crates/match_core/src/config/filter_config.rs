//! Position filter noise settings.

use serde::{Deserialize, Serialize};

/// Noise magnitudes for the constant-velocity position filter.
///
/// Process noise is kept small relative to measurement noise so the
/// estimate favours smoothness over responsiveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Diagonal of the process noise covariance Q
    pub process_noise: f32,
    /// Diagonal of the measurement noise covariance R
    pub measurement_noise: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            process_noise: 1e-2,
            measurement_noise: 1e-1,
        }
    }
}

impl FilterConfig {
    /// Trust measurements more (follows fast balls, keeps more jitter)
    pub fn responsive() -> Self {
        Self {
            process_noise: 1e-1,
            measurement_noise: 1e-1,
        }
    }
}
