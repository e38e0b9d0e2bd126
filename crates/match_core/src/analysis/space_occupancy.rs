//! # Space Occupancy
//!
//! Counts player samples per pitch cell and team, then turns the counts into
//! per-cell control shares.
//!
//! ## Grid
//! - rows = ceil(length / cell), indexed by `y / cell`
//! - cols = ceil(width / cell), indexed by `x / cell`
//! - two team slots, for teams 1 and 2
//!
//! Samples need a team and a `position_transformed` (pitch metres); anything
//! outside the grid is skipped.

use crate::config::OccupancyConfig;
use crate::models::{TeamId, Trajectory};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

pub const TEAM_SLOTS: usize = 2;

/// Keeps `control_ratios` finite on empty cells
const RATIO_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceOccupancy {
    rows: usize,
    cols: usize,
    cell_size: f32,
    /// Row-major `[row][col][team]`
    counts: Vec<[u32; TEAM_SLOTS]>,
}

impl SpaceOccupancy {
    pub fn new(config: &OccupancyConfig) -> Self {
        let rows = (config.field_length_m / config.grid_size_m).ceil().max(0.0) as usize;
        let cols = (config.field_width_m / config.grid_size_m).ceil().max(0.0) as usize;
        Self {
            rows,
            cols,
            cell_size: config.grid_size_m,
            counts: vec![[0; TEAM_SLOTS]; rows * cols],
        }
    }

    pub fn from_trajectory(trajectory: &Trajectory, config: &OccupancyConfig) -> Self {
        let mut grid = Self::new(config);
        for frame in &trajectory.frames {
            for rec in frame.players.values() {
                if let (Some(team), Some(pos)) = (rec.team, rec.position_transformed) {
                    grid.record(team, pos);
                }
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn cell_of(&self, pos: Point2<f32>) -> Option<(usize, usize)> {
        if !(pos.x >= 0.0 && pos.y >= 0.0) {
            return None;
        }
        let row = (pos.y / self.cell_size) as usize;
        let col = (pos.x / self.cell_size) as usize;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    /// Add one sample. Returns false when the team has no slot or the
    /// position falls outside the grid.
    pub fn record(&mut self, team: TeamId, pos: Point2<f32>) -> bool {
        let slot = match team.0 {
            1 => 0,
            2 => 1,
            _ => return false,
        };
        let Some((row, col)) = self.cell_of(pos) else {
            return false;
        };
        self.counts[row * self.cols + col][slot] += 1;
        true
    }

    /// Samples per team in one cell; `None` outside the grid.
    pub fn count(&self, row: usize, col: usize) -> Option<[u32; TEAM_SLOTS]> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.counts.get(row * self.cols + col).copied()
    }

    /// Per-cell share of samples for each team, `[row][col] -> [team1, team2]`.
    pub fn control_ratios(&self) -> Vec<Vec<[f32; TEAM_SLOTS]>> {
        self.counts
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| {
                row.iter()
                    .map(|&[a, b]| {
                        let total = (a + b) as f32 + RATIO_EPSILON;
                        [a as f32 / total, b as f32 / total]
                    })
                    .collect()
            })
            .collect()
    }

    pub fn total_samples(&self) -> u64 {
        self.counts
            .iter()
            .map(|c| c.iter().map(|&n| n as u64).sum::<u64>())
            .sum()
    }
}
