//! Ball candidate validation settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallValidationConfig {
    /// Exclusive lower bound on box width and height (pixels)
    pub min_ball_size: f32,
    /// Exclusive upper bound on box width and height (pixels)
    pub max_ball_size: f32,
    /// Per-channel half-width of the colour range around the inferred ball
    /// colour. `0` matches only pixels equal to the rounded centroid.
    pub color_tolerance: u8,
    /// Seed for the k-means++ initialisation
    pub cluster_seed: u64,
    /// Lloyd iteration cap for the 2-cluster fit
    pub max_cluster_iterations: usize,
}

impl Default for BallValidationConfig {
    fn default() -> Self {
        Self {
            min_ball_size: 5.0,
            max_ball_size: 20.0,
            color_tolerance: 0,
            cluster_seed: 0,
            max_cluster_iterations: 300,
        }
    }
}
