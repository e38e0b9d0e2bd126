//! HSV conversion and box cropping over `image::RgbImage` frames.
//!
//! HSV uses the common 8-bit layout: H in [0, 180), S and V in [0, 255].

use crate::models::BBox;
use image::RgbImage;

pub type Hsv = [u8; 3];

/// Convert an 8-bit RGB pixel to 8-bit HSV (hue halved to fit a byte).
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

    let mut h = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h = (h / 2.0).round() as u32 % 180;
    [h as u8, s.round() as u8, max as u8]
}

/// Row-major block of HSV pixels cut out of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvRegion {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Hsv>,
}

impl HsvRegion {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The first `height / 2` rows. Empty when the region is one row tall.
    pub fn top_half(&self) -> HsvRegion {
        let rows = self.height / 2;
        HsvRegion {
            width: self.width,
            height: rows,
            pixels: self.pixels[..rows * self.width].to_vec(),
        }
    }
}

/// Cut the box out of the frame and convert it to HSV.
///
/// Coordinates are truncated to integers and clamped to the frame. Returns
/// `None` when nothing of the box lies inside the frame or the box is
/// degenerate.
pub fn crop_hsv(frame: &RgbImage, bbox: &BBox) -> Option<HsvRegion> {
    if bbox.is_degenerate() {
        return None;
    }
    let (fw, fh) = (frame.width() as i64, frame.height() as i64);
    let clamp_x = |v: f32| (v as i64).clamp(0, fw) as u32;
    let clamp_y = |v: f32| (v as i64).clamp(0, fh) as u32;

    let (x1, x2) = (clamp_x(bbox.left), clamp_x(bbox.right));
    let (y1, y2) = (clamp_y(bbox.top), clamp_y(bbox.bottom));
    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    let width = (x2 - x1) as usize;
    let height = (y2 - y1) as usize;
    let mut pixels = Vec::with_capacity(width * height);
    for y in y1..y2 {
        for x in x1..x2 {
            let [r, g, b] = frame.get_pixel(x, y).0;
            pixels.push(rgb_to_hsv(r, g, b));
        }
    }

    Some(HsvRegion {
        width,
        height,
        pixels,
    })
}
