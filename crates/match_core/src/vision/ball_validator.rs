//! # Ball Candidate Validator
//!
//! Scores a ball detection on two independent pieces of evidence and accepts
//! it only when both agree (score > 1 out of 2):
//!
//! | Check | Passes when |
//! |-------|-------------|
//! | Size  | `min < width < max` and `min < height < max` |
//! | Colour | some pixel of the crop matches the inferred ball colour |
//!
//! Validation is advisory. Every failure (box off-frame, degenerate box,
//! crop too small to cluster) is a rejection and never an error.

use super::clustering::infer_dominant_color;
use super::color::{crop_hsv, Hsv};
use crate::config::BallValidationConfig;
use crate::models::{BBox, Frame, TrackId};
use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct BallCandidateValidator {
    config: BallValidationConfig,
}

impl BallCandidateValidator {
    pub fn new(config: BallValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BallValidationConfig {
        &self.config
    }

    pub fn passes_size_check(&self, bbox: &BBox) -> bool {
        let (min, max) = (self.config.min_ball_size, self.config.max_ball_size);
        let (w, h) = (bbox.width(), bbox.height());
        min < w && w < max && min < h && h < max
    }

    /// True when the crop holds at least one pixel inside the colour range
    /// built around the inferred ball colour.
    pub fn passes_color_check(&self, bbox: &BBox, frame: &RgbImage) -> bool {
        let Some(region) = crop_hsv(frame, bbox) else {
            debug!(?bbox, "ball candidate outside frame or degenerate");
            return false;
        };
        let Some(ball_color) = infer_dominant_color(&region, &self.config) else {
            debug!(?bbox, "ball candidate too small to segment");
            return false;
        };

        let tol = self.config.color_tolerance;
        let (lower, upper) = color_range(ball_color, tol);
        let hit = region.pixels.iter().any(|p| in_range(p, &lower, &upper));
        trace!(?bbox, ?ball_color, hit, "colour check");
        hit
    }

    pub fn score(&self, bbox: &BBox, frame: &RgbImage) -> u8 {
        let mut score = 0;
        if self.passes_size_check(bbox) {
            score += 1;
        }
        if self.passes_color_check(bbox, frame) {
            score += 1;
        }
        score
    }

    pub fn classify(&self, bbox: &BBox, frame: &RgbImage) -> bool {
        self.score(bbox, frame) > 1
    }

    /// Classify every ball candidate of a frame and write `is_valid_ball`.
    ///
    /// Candidates are independent, so they are scored on the rayon pool.
    /// Returns the number of candidates accepted.
    pub fn validate_frame(&self, frame: &mut Frame, pixels: &RgbImage) -> usize {
        let verdicts: Vec<(TrackId, bool)> = frame
            .ball
            .par_iter()
            .map(|(id, rec)| (*id, self.classify(&rec.bbox, pixels)))
            .collect();

        let mut accepted = 0;
        for (id, valid) in verdicts {
            if let Some(rec) = frame.ball.get_mut(&id) {
                rec.is_valid_ball = Some(valid);
                accepted += valid as usize;
            }
        }
        accepted
    }
}

fn color_range(center: Hsv, tol: u8) -> (Hsv, Hsv) {
    let lower = center.map(|c| c.saturating_sub(tol));
    let upper = center.map(|c| c.saturating_add(tol));
    (lower, upper)
}

#[inline]
fn in_range(p: &Hsv, lower: &Hsv, upper: &Hsv) -> bool {
    (0..3).all(|c| lower[c] <= p[c] && p[c] <= upper[c])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::models::TrackRecord;
    use image::Rgb;
    use proptest::prelude::*;

    const GRASS: Rgb<u8> = Rgb([40, 140, 60]);
    const WHITE: Rgb<u8> = Rgb([250, 250, 250]);

    /// 100x100 pitch with a white 6x6 ball whose top-left is (x, y).
    fn pitch_with_ball(x: u32, y: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(100, 100, GRASS);
        for dy in 0..6 {
            for dx in 0..6 {
                img.put_pixel(x + dx, y + dy, WHITE);
            }
        }
        img
    }

    fn validator() -> BallCandidateValidator {
        BallCandidateValidator::default()
    }

    #[test]
    fn test_size_check_bounds() {
        let v = validator();
        assert!(v.passes_size_check(&BBox::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!v.passes_size_check(&BBox::new(0.0, 0.0, 5.0, 10.0)));
        assert!(!v.passes_size_check(&BBox::new(0.0, 0.0, 10.0, 20.0)));
        assert!(!v.passes_size_check(&BBox::new(0.0, 0.0, 25.0, 12.0)));
        assert!(v.passes_size_check(&BBox::new(0.0, 0.0, 5.5, 19.5)));
    }

    #[test]
    fn test_ball_on_grass_is_accepted() {
        let frame = pitch_with_ball(42, 42);
        let bbox = BBox::new(40.0, 40.0, 50.0, 50.0);
        assert!(v_score(&frame, &bbox) == 2);
        assert!(validator().classify(&bbox, &frame));
    }

    fn v_score(frame: &RgbImage, bbox: &BBox) -> u8 {
        validator().score(bbox, frame)
    }

    #[test]
    fn test_oversized_box_rejected_even_with_ball_colour() {
        let frame = pitch_with_ball(45, 45);
        let bbox = BBox::new(30.0, 30.0, 70.0, 70.0);
        assert!(validator().passes_color_check(&bbox, &frame));
        assert!(!validator().classify(&bbox, &frame));
    }

    #[test]
    fn test_off_frame_box_fails_closed() {
        let frame = pitch_with_ball(10, 10);
        let bbox = BBox::new(150.0, 150.0, 160.0, 160.0);
        assert!(!validator().passes_color_check(&bbox, &frame));
        assert!(!validator().classify(&bbox, &frame));
    }

    #[test]
    fn test_degenerate_box_fails_closed() {
        let frame = pitch_with_ball(10, 10);
        assert!(!validator().classify(&BBox::new(10.0, 10.0, 10.0, 20.0), &frame));
        assert!(!validator().classify(&BBox::new(10.0, 10.0, 20.0, 10.5), &frame));
    }

    #[test]
    fn test_noisy_ball_needs_tolerance() {
        // Checkerboard of two whites: the centroid (V = 245) matches no pixel
        let mut frame = RgbImage::from_pixel(100, 100, GRASS);
        for dy in 0..6 {
            for dx in 0..6 {
                let shade = if (dx + dy) % 2 == 0 { 250 } else { 240 };
                frame.put_pixel(42 + dx, 42 + dy, Rgb([shade, shade, shade]));
            }
        }
        let bbox = BBox::new(40.0, 40.0, 50.0, 50.0);

        let exact = validator();
        assert!(!exact.passes_color_check(&bbox, &frame));
        assert!(!exact.classify(&bbox, &frame));

        let lenient = BallCandidateValidator::new(AnalysisConfig::lenient().ball);
        assert_eq!(lenient.config().color_tolerance, 10);
        assert!(lenient.passes_color_check(&bbox, &frame));
        assert!(lenient.classify(&bbox, &frame));
    }

    #[test]
    fn test_tolerance_widens_range() {
        assert_eq!(color_range([10, 250, 3], 5), ([5, 245, 0], [15, 255, 8]));
        assert_eq!(color_range([10, 20, 30], 0), ([10, 20, 30], [10, 20, 30]));
    }

    #[test]
    fn test_validate_frame_marks_candidates() {
        let pixels = pitch_with_ball(42, 42);
        let mut frame = Frame::default();
        frame
            .ball
            .insert(1, TrackRecord::new(BBox::new(40.0, 40.0, 50.0, 50.0)));
        frame
            .ball
            .insert(2, TrackRecord::new(BBox::new(0.0, 0.0, 60.0, 60.0)));
        frame
            .ball
            .insert(3, TrackRecord::new(BBox::new(95.0, 95.0, 130.0, 130.0)));

        assert_eq!(validator().validate_frame(&mut frame, &pixels), 1);
        assert_eq!(frame.ball[&1].is_valid_ball, Some(true));
        assert_eq!(frame.ball[&2].is_valid_ball, Some(false));
        assert_eq!(frame.ball[&3].is_valid_ball, Some(false));
    }

    proptest! {
        #[test]
        fn prop_size_check_rejects_out_of_bounds(
            w in prop_oneof![0.5f32..=5.0, 20.0f32..200.0],
            h in 6.0f32..19.0,
            swap in any::<bool>(),
        ) {
            let (w, h) = if swap { (h, w) } else { (w, h) };
            let bbox = BBox::new(10.0, 10.0, 10.0 + w, 10.0 + h);
            prop_assert!(!validator().passes_size_check(&bbox));
        }
    }
}
