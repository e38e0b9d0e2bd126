//! # Vision Module
//!
//! Pixel-level evidence for ball candidates. This is the only part of the
//! crate that reads frame content; everything downstream works on track
//! records alone.

pub mod ball_validator;
pub mod clustering;
pub mod color;

pub use ball_validator::BallCandidateValidator;
pub use clustering::{infer_dominant_color, two_means, TwoMeans};
pub use color::{crop_hsv, rgb_to_hsv, Hsv, HsvRegion};
