//! Possession, pass and occupancy thresholds.
//!
//! | Category | Description |
//! |----------|-------------|
//! | Possession | Player-to-ball distance gate |
//! | Pass | Ball-speed gate for possession changes |
//! | Occupancy | Pitch grid for space control |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionConfig {
    /// Threshold used when a frame has no players (pixels)
    pub default_threshold: f32,
    /// Multiplier applied to the mean player box height
    pub threshold_scale: f32,
    /// Compute per-player distances on the rayon pool
    pub parallel: bool,
}

impl Default for PossessionConfig {
    fn default() -> Self {
        Self {
            default_threshold: 70.0,
            threshold_scale: 1.0,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Ball speed that must be exceeded for a possession change to count
    pub speed_threshold: f32,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            speed_threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyConfig {
    /// Pitch extent along x (metres)
    pub field_width_m: f32,
    /// Pitch extent along y (metres)
    pub field_length_m: f32,
    /// Cell edge (metres)
    pub grid_size_m: f32,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            field_width_m: 68.0,
            field_length_m: 105.0,
            grid_size_m: 10.0,
        }
    }
}
