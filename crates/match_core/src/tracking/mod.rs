//! # Tracking Module
//!
//! Ball trajectory cleanup: recursive smoothing and gap filling.

pub mod interpolation;
pub mod position_filter;

pub use interpolation::{drop_invalid_balls, interpolate_ball_positions};
pub use position_filter::{FilterState, PositionFilter};

use crate::config::FilterConfig;
use crate::models::{TrackId, Trajectory};
use nalgebra::Point2;
use std::collections::BTreeMap;

/// Smooth every ball track with its own filter and write `position_smoothed`.
///
/// A filter is seeded at the first usable box of a track id, so that frame's
/// smoothed position is the measurement itself. From then on it is predicted
/// every frame and corrected only when the id has a usable box.
/// Returns the number of filters created (one per physical ball track).
pub fn smooth_ball_track(trajectory: &mut Trajectory, config: &FilterConfig) -> usize {
    let mut filters: BTreeMap<TrackId, PositionFilter> = BTreeMap::new();

    for frame in &mut trajectory.frames {
        for (id, filter) in filters.iter_mut() {
            filter.predict();
            let Some(rec) = frame.ball.get_mut(id) else {
                continue;
            };
            if rec.bbox.is_degenerate() {
                continue;
            }
            let c = rec.bbox.center();
            filter.correct(c.x, c.y);
            let (x, y) = filter.position();
            rec.position_smoothed = Some(Point2::new(x, y));
        }

        for (id, rec) in frame.ball.iter_mut() {
            if filters.contains_key(id) || rec.bbox.is_degenerate() {
                continue;
            }
            let c = rec.bbox.center();
            filters.insert(*id, PositionFilter::with_initial(config, c.x, c.y));
            rec.position_smoothed = Some(c);
        }
    }

    filters.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BBox, Frame, TrackRecord};

    #[test]
    fn test_smoothing_writes_positions_per_track() {
        let mut frames = Vec::new();
        for i in 0..30 {
            let mut f = Frame::default();
            let x = 100.0 + i as f32 * 3.0;
            f.ball
                .insert(1, TrackRecord::new(BBox::new(x, 50.0, x + 8.0, 58.0)));
            if i >= 10 {
                f.ball
                    .insert(4, TrackRecord::new(BBox::new(400.0, 300.0, 410.0, 310.0)));
            }
            frames.push(f);
        }
        let mut t = Trajectory::new(frames);

        let created = smooth_ball_track(&mut t, &FilterConfig::default());
        assert_eq!(created, 2);

        let last = &t.frames[29];
        let p1 = last.ball[&1].position_smoothed.unwrap();
        let p4 = last.ball[&4].position_smoothed.unwrap();
        // Each track converges to its own measurements
        assert!((p1.x - (100.0 + 29.0 * 3.0 + 4.0)).abs() < 5.0);
        assert!((p4.x - 405.0).abs() < 5.0);
        assert!((p4.y - 305.0).abs() < 5.0);
    }

    #[test]
    fn test_new_track_starts_at_first_measurement() {
        let frames = (0..15)
            .map(|_| {
                let mut f = Frame::default();
                f.ball
                    .insert(1, TrackRecord::new(BBox::new(396.0, 296.0, 404.0, 304.0)));
                f
            })
            .collect();
        let mut t = Trajectory::new(frames);

        smooth_ball_track(&mut t, &FilterConfig::default());
        for (n, f) in t.frames.iter().enumerate() {
            let p = f.ball[&1].position_smoothed.unwrap();
            assert!((p.x - 400.0).abs() < 0.5, "frame {n}: x = {}", p.x);
            assert!((p.y - 300.0).abs() < 0.5, "frame {n}: y = {}", p.y);
        }
    }

    #[test]
    fn test_track_appearing_late_is_seeded_there() {
        let mut frames = vec![Frame::default(); 5];
        frames[3]
            .ball
            .insert(2, TrackRecord::new(BBox::new(10.0, 10.0, 10.0, 20.0)));
        frames[4]
            .ball
            .insert(2, TrackRecord::new(BBox::new(96.0, 46.0, 104.0, 54.0)));
        let mut t = Trajectory::new(frames);

        assert_eq!(smooth_ball_track(&mut t, &FilterConfig::default()), 1);
        assert!(t.frames[3].ball[&2].position_smoothed.is_none());
        assert_eq!(
            t.frames[4].ball[&2].position_smoothed,
            Some(Point2::new(100.0, 50.0))
        );
    }

    #[test]
    fn test_degenerate_box_not_smoothed() {
        let mut f = Frame::default();
        f.ball.insert(1, TrackRecord::new(BBox::new(10.0, 10.0, 10.0, 20.0)));
        let mut t = Trajectory::new(vec![f]);

        smooth_ball_track(&mut t, &FilterConfig::default());
        assert!(t.frames[0].ball[&1].position_smoothed.is_none());
    }
}
