//! Two-cluster colour segmentation of a candidate's neighbourhood.
//!
//! ## Algorithm
//! 1. Take the top half of the HSV crop (the lower half tends to hold the
//!    shadow and the grass under the ball).
//! 2. Fit k-means with k = 2 (k-means++ seeding, single initialisation).
//! 3. The cluster owning most of the four corner pixels is background; the
//!    other centroid is the ball colour.
//!
//! Each call fits its own model; nothing is cached between candidates.

use super::color::{Hsv, HsvRegion};
use crate::config::BallValidationConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of a 2-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoMeans {
    pub centers: [[f32; 3]; 2],
    pub labels: Vec<usize>,
    pub iterations: usize,
}

#[inline]
fn dist2(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

#[inline]
fn nearest(p: &[f32; 3], centers: &[[f32; 3]; 2]) -> usize {
    // Ties go to the lower index
    if dist2(p, &centers[1]) < dist2(p, &centers[0]) {
        1
    } else {
        0
    }
}

fn seed_centers(points: &[[f32; 3]], rng: &mut ChaCha8Rng) -> [[f32; 3]; 2] {
    let first = points[rng.gen_range(0..points.len())];

    let weights: Vec<f32> = points.iter().map(|p| dist2(p, &first)).collect();
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        // Single colour: both centres coincide
        return [first, first];
    }

    let mut target = rng.gen::<f32>() * total;
    let mut second = points[points.len() - 1];
    for (p, w) in points.iter().zip(&weights) {
        if *w > 0.0 && target < *w {
            second = *p;
            break;
        }
        target -= w;
    }
    [first, second]
}

/// Lloyd's algorithm with k = 2. `points` must not be empty.
pub fn two_means(points: &[[f32; 3]], seed: u64, max_iterations: usize) -> TwoMeans {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut centers = seed_centers(points, &mut rng);
    let mut labels: Vec<usize> = points.iter().map(|p| nearest(p, &centers)).collect();
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;

        let mut sums = [[0.0f64; 3]; 2];
        let mut counts = [0usize; 2];
        for (p, &l) in points.iter().zip(&labels) {
            counts[l] += 1;
            for c in 0..3 {
                sums[l][c] += p[c] as f64;
            }
        }
        for k in 0..2 {
            // An emptied cluster keeps its previous centre
            if counts[k] > 0 {
                for c in 0..3 {
                    centers[k][c] = (sums[k][c] / counts[k] as f64) as f32;
                }
            }
        }

        let next: Vec<usize> = points.iter().map(|p| nearest(p, &centers)).collect();
        if next == labels {
            break;
        }
        labels = next;
    }

    TwoMeans {
        centers,
        labels,
        iterations,
    }
}

/// Infer the ball colour from a candidate crop.
///
/// Returns `None` when the top half of the region is empty, which makes the
/// colour check fail closed.
pub fn infer_dominant_color(region: &HsvRegion, config: &BallValidationConfig) -> Option<Hsv> {
    let top = region.top_half();
    if top.is_empty() {
        return None;
    }

    let points: Vec<[f32; 3]> = top
        .pixels
        .iter()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();
    let fit = two_means(&points, config.cluster_seed, config.max_cluster_iterations);

    let label_at = |row: usize, col: usize| fit.labels[row * top.width + col];
    let (last_row, last_col) = (top.height - 1, top.width - 1);
    let corners = [
        label_at(0, 0),
        label_at(0, last_col),
        label_at(last_row, 0),
        label_at(last_row, last_col),
    ];
    let ones = corners.iter().filter(|&&l| l == 1).count();
    let background = if ones > corners.len() - ones { 1 } else { 0 };
    let ball = 1 - background;

    let c = fit.centers[ball];
    Some([
        c[0].round().clamp(0.0, 255.0) as u8,
        c[1].round().clamp(0.0, 255.0) as u8,
        c[2].round().clamp(0.0, 255.0) as u8,
    ])
}
