//! # Pass Event Tracker
//!
//! Turns the per-frame possession series into pass and turnover events and
//! keeps running per-player counters.
//!
//! ## State Machine
//! Each frame is either `NoPossessor` or `Possessor { player, team }`. The
//! transition between frame `t` and `t + 1` is classified by
//! [`classify_transition`]:
//!
//! | t | t + 1 | ball speed at t | Event |
//! |---|-------|-----------------|-------|
//! | none | any | any | - |
//! | A | A or none | any | - |
//! | A | B | <= threshold | - |
//! | A | B, same team | > threshold | `Completed` |
//! | A | B, other/unknown team | > threshold | `Turnover` |
//!
//! The counters are the single source of truth: `live_stats`, `final_stats`
//! and `write_stats` are projections of them and never replay history.

use crate::config::PassConfig;
use crate::models::{Frame, TeamId, TrackId, Trajectory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PossessionState {
    NoPossessor,
    Possessor {
        player: TrackId,
        team: Option<TeamId>,
    },
}

impl PossessionState {
    pub fn from_frame(frame: &Frame) -> Self {
        match frame.possessor() {
            Some((player, rec)) => PossessionState::Possessor {
                player,
                team: rec.team,
            },
            None => PossessionState::NoPossessor,
        }
    }

    pub fn player(&self) -> Option<TrackId> {
        match self {
            PossessionState::Possessor { player, .. } => Some(*player),
            PossessionState::NoPossessor => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassEvent {
    /// Ball moved between two players of the same team
    Completed {
        from: TrackId,
        to: TrackId,
        team: TeamId,
    },
    /// Ball moved to a player of another (or unknown) team
    Turnover {
        from: TrackId,
        to: TrackId,
        from_team: Option<TeamId>,
        to_team: Option<TeamId>,
    },
}

impl PassEvent {
    pub fn receiver(&self) -> TrackId {
        match self {
            PassEvent::Completed { to, .. } | PassEvent::Turnover { to, .. } => *to,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PassEvent::Completed { .. })
    }
}

/// Pure transition function of the possession state machine.
///
/// A pass needs a change of possessor *and* a ball moving faster than
/// `speed_threshold`; anything else is sustained possession or assignment
/// flicker around a slow ball.
pub fn classify_transition(
    current: PossessionState,
    next: PossessionState,
    ball_speed: f32,
    speed_threshold: f32,
) -> Option<PassEvent> {
    let PossessionState::Possessor {
        player: from,
        team: from_team,
    } = current
    else {
        return None;
    };
    let PossessionState::Possessor {
        player: to,
        team: to_team,
    } = next
    else {
        return None;
    };

    if from == to || !(ball_speed > speed_threshold) {
        return None;
    }

    match (from_team, to_team) {
        (Some(a), Some(b)) if a == b => Some(PassEvent::Completed { from, to, team: a }),
        _ => Some(PassEvent::Turnover {
            from,
            to,
            from_team,
            to_team,
        }),
    }
}

/// Cumulative pass counters for one player. Counters only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPassStats {
    /// Possession changes away from this player (completed or not)
    pub total_passes: u32,
    /// Subset of `total_passes` received by a teammate
    pub successful_passes: u32,
    /// Completed passes this player received
    pub received_passes: u32,
}

/// A detected event and the frame it left from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    pub frame: usize,
    pub ball_speed: f32,
    pub event: PassEvent,
}

/// One instance per trajectory; mutated only through `observe*`.
///
/// Serializes as the counters in creation order plus the event log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassEventTracker {
    #[serde(skip)]
    config: PassConfig,
    /// Players in creation order
    stats: Vec<(TrackId, PlayerPassStats)>,
    #[serde(skip)]
    index: HashMap<TrackId, usize>,
    events: Vec<PassRecord>,
    #[serde(skip)]
    next_frame: usize,
}

impl PassEventTracker {
    pub fn new(config: PassConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn entry(&mut self, player: TrackId) -> &mut PlayerPassStats {
        let idx = match self.index.get(&player) {
            Some(&idx) => idx,
            None => {
                self.stats.push((player, PlayerPassStats::default()));
                self.index.insert(player, self.stats.len() - 1);
                self.stats.len() - 1
            }
        };
        &mut self.stats[idx].1
    }

    fn observe_at(
        &mut self,
        frame: usize,
        current: PossessionState,
        next: PossessionState,
        ball_speed: f32,
    ) -> Option<PassEvent> {
        self.next_frame = frame + 1;

        let from = current.player()?;
        self.entry(from);

        let event = classify_transition(current, next, ball_speed, self.config.speed_threshold)?;
        let to = event.receiver();
        self.entry(to);

        self.entry(from).total_passes += 1;
        if event.is_completed() {
            self.entry(from).successful_passes += 1;
            self.entry(to).received_passes += 1;
        }

        debug!(frame, ?event, ball_speed, "pass event");
        self.events.push(PassRecord {
            frame,
            ball_speed,
            event,
        });
        Some(event)
    }

    /// Feed the possession of frame `t`, frame `t + 1` and the ball speed at `t`.
    pub fn observe(
        &mut self,
        current: PossessionState,
        next: PossessionState,
        ball_speed: f32,
    ) -> Option<PassEvent> {
        self.observe_at(self.next_frame, current, next, ball_speed)
    }

    /// Observe frame `frame_num` of a trajectory against the frame after it.
    ///
    /// Out-of-range frames are ignored. The last frame has no successor and
    /// can only register its possessor.
    pub fn observe_frames(
        &mut self,
        trajectory: &Trajectory,
        frame_num: usize,
    ) -> Option<PassEvent> {
        let frame = trajectory.frames.get(frame_num)?;
        let current = PossessionState::from_frame(frame);
        let next = trajectory
            .frames
            .get(frame_num + 1)
            .map(PossessionState::from_frame)
            .unwrap_or(PossessionState::NoPossessor);
        self.observe_at(frame_num, current, next, frame.ball_speed())
    }

    /// Observe every frame pair of a trajectory in order.
    pub fn observe_trajectory(&mut self, trajectory: &Trajectory) -> usize {
        (0..trajectory.len())
            .filter_map(|t| self.observe_frames(trajectory, t))
            .count()
    }

    pub fn stats(&self, player: TrackId) -> Option<&PlayerPassStats> {
        self.index.get(&player).map(|&idx| &self.stats[idx].1)
    }

    /// Per-player counters in creation order.
    pub fn players(&self) -> &[(TrackId, PlayerPassStats)] {
        &self.stats
    }

    pub fn events(&self) -> &[PassRecord] {
        &self.events
    }

    /// Overlay lines, one per player in creation order.
    pub fn live_stats(&self) -> Vec<String> {
        self.stats
            .iter()
            .map(|(id, s)| {
                format!(
                    "Player {}: Passes: {} | Successful: {} | Received: {}",
                    id, s.total_passes, s.successful_passes, s.received_passes
                )
            })
            .collect()
    }

    /// End-of-run report lines, one per player in creation order.
    pub fn final_stats(&self) -> Vec<String> {
        self.stats
            .iter()
            .map(|(id, s)| {
                format!(
                    "Player {}: Total Passes = {}, Successful Passes = {}, Received Passes = {}",
                    id, s.total_passes, s.successful_passes, s.received_passes
                )
            })
            .collect()
    }

    pub fn write_stats<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.final_stats() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}
