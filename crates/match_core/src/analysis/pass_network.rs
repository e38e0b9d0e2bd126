//! Directed passing-option network.
//!
//! Every frame with a possessor adds one unit of weight to the edge from the
//! possessor to each teammate on the pitch in that frame. The result is a
//! weighted graph of "who had whom as an option", not of completed passes.

use crate::models::{Frame, TrackId, Trajectory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassEdge {
    pub from: TrackId,
    pub to: TrackId,
    /// Frames in which the edge was available
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PassEdge>", into = "Vec<PassEdge>")]
pub struct PassNetwork {
    weights: BTreeMap<(TrackId, TrackId), u32>,
}

impl PassNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let mut network = Self::new();
        for frame in &trajectory.frames {
            network.add_frame(frame);
        }
        network
    }

    /// Add the frame's edges. Returns how many edges were touched.
    pub fn add_frame(&mut self, frame: &Frame) -> usize {
        let Some((owner, rec)) = frame.possessor() else {
            return 0;
        };
        let Some(team) = rec.team else {
            return 0;
        };

        let mut touched = 0;
        for (id, mate) in &frame.players {
            if *id != owner && mate.team == Some(team) {
                *self.weights.entry((owner, *id)).or_insert(0) += 1;
                touched += 1;
            }
        }
        touched
    }

    pub fn weight(&self, from: TrackId, to: TrackId) -> u32 {
        self.weights.get(&(from, to)).copied().unwrap_or(0)
    }

    /// All edges ordered by `(from, to)`.
    pub fn edges(&self) -> Vec<PassEdge> {
        self.weights
            .iter()
            .map(|(&(from, to), &weight)| PassEdge { from, to, weight })
            .collect()
    }

    /// Number of distinct teammates reachable from `player`.
    pub fn out_degree(&self, player: TrackId) -> usize {
        self.weights
            .range((player, TrackId::MIN)..=(player, TrackId::MAX))
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl From<Vec<PassEdge>> for PassNetwork {
    fn from(edges: Vec<PassEdge>) -> Self {
        let mut weights = BTreeMap::new();
        for e in edges {
            *weights.entry((e.from, e.to)).or_insert(0) += e.weight;
        }
        Self { weights }
    }
}

impl From<PassNetwork> for Vec<PassEdge> {
    fn from(network: PassNetwork) -> Self {
        network.edges()
    }
}
