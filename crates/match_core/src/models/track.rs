//! Per-object, per-frame track records.
//!
//! ## Coordinate System
//!
//! Boxes are in image pixels with a top-left origin: `left < right` and
//! `top < bottom` for any box the tracker considers valid. Pitch positions
//! (`position_transformed`) are metres produced by an external view
//! transformer and are only read here.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Track identity assigned by the upstream tracker.
pub type TrackId = u32;

/// Team label (the tracker pipeline uses 1 and 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned bounding box `[left, top, right, bottom]`.
///
/// Serialized as a 4-element array, the layout the tracker writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.left, b.top, b.right, b.bottom]
    }
}

impl BBox {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True for zero-area, inverted or non-finite boxes.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite();
        !finite || self.left >= self.right || self.top >= self.bottom
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Bottom-left corner, the player's left foot reference.
    pub fn foot_left(&self) -> Point2<f32> {
        Point2::new(self.left, self.bottom)
    }

    /// Bottom-right corner, the player's right foot reference.
    pub fn foot_right(&self) -> Point2<f32> {
        Point2::new(self.right, self.bottom)
    }

    /// Linear blend between two boxes, `t = 0` → `self`, `t = 1` → `other`.
    pub fn lerp(&self, other: &BBox, t: f32) -> BBox {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        BBox::new(
            mix(self.left, other.left),
            mix(self.top, other.top),
            mix(self.right, other.right),
            mix(self.bottom, other.bottom),
        )
    }
}

/// One tracked object in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub bbox: BBox,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,

    /// Display colour assigned by the team assigner; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_color: Option<[u8; 3]>,

    /// Pitch coordinates in metres (external view transform).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_transformed: Option<Point2<f32>>,

    /// Instantaneous speed written by the external speed estimator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,

    #[serde(default, alias = "possession")]
    pub has_ball: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid_ball: Option<bool>,

    /// Filtered image-space centre (ball tracks only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_smoothed: Option<Point2<f32>>,
}

impl TrackRecord {
    pub fn new(bbox: BBox) -> Self {
        Self {
            bbox,
            team: None,
            team_color: None,
            position_transformed: None,
            speed: None,
            has_ball: false,
            is_valid_ball: None,
            position_smoothed: None,
        }
    }

    pub fn with_team(mut self, team: u8) -> Self {
        self.team = Some(TeamId(team));
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position_transformed = Some(Point2::new(x, y));
        self
    }
}
