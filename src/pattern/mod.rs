//! Centered binary contour patterns.
//!
//! A `Pattern` is the fixed-size square bitmap the transform search scores
//! against: every contour of a set drawn as 1-pixel polylines, uniformly
//! scaled so the longer bounding-box axis fills 90% of the canvas, and
//! translated so the box center lands on the canvas center. Centering
//! removes absolute translation between query and reference; uniform
//! scaling normalizes resolution differences.

pub mod warp;

use crate::contour::ContourSet;
use crate::util::{AeroMatchError, AeroMatchResult};

/// Fraction of the canvas the longer contour axis occupies after scaling.
const CANVAS_MARGIN: f64 = 0.9;

/// Square single-channel bitmap with 0/1 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    size: usize,
    bits: Vec<u8>,
    ones: u32,
}

impl Pattern {
    /// Creates an all-zero pattern.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            bits: vec![0; size * size],
            ones: 0,
        }
    }

    /// Creates a pattern from raw bytes; any non-zero byte counts as drawn.
    pub fn from_bits(bits: Vec<u8>, size: usize) -> AeroMatchResult<Self> {
        let needed = size * size;
        if bits.len() != needed {
            return Err(AeroMatchError::BufferTooSmall {
                needed,
                got: bits.len(),
            });
        }
        let mut ones = 0u32;
        let bits = bits
            .into_iter()
            .map(|b| {
                let bit = u8::from(b != 0);
                ones += u32::from(bit);
                bit
            })
            .collect();
        Ok(Self { size, bits, ones })
    }

    /// Renders a contour set onto a `size`-by-`size` canvas.
    pub fn rasterize(set: &ContourSet, size: usize) -> Self {
        let Some(bbox) = set.bounding_box() else {
            return Self::zeros(size);
        };

        let extent = (bbox.width().max(bbox.height())) as f64;
        let scale = (size as f64) * CANVAS_MARGIN / extent;
        let (cx, cy) = bbox.center();
        let target = (size as f64) / 2.0;

        let mut pattern = Self::zeros(size);
        for contour in set.contours() {
            let mapped: Vec<(i32, i32)> = contour
                .points()
                .iter()
                .map(|p| {
                    let px = (f64::from(p.x) - cx) * scale + target;
                    let py = (f64::from(p.y) - cy) * scale + target;
                    (px.round() as i32, py.round() as i32)
                })
                .collect();

            if mapped.len() == 1 {
                pattern.set(mapped[0].0, mapped[0].1);
                continue;
            }
            for i in 0..mapped.len() {
                let a = mapped[i];
                let b = mapped[(i + 1) % mapped.len()];
                pattern.draw_segment(a, b);
            }
        }
        pattern
    }

    /// Side length of the square canvas.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of drawn pixels.
    pub fn ones(&self) -> u32 {
        self.ones
    }

    /// Returns true if nothing was drawn.
    pub fn is_blank(&self) -> bool {
        self.ones == 0
    }

    /// Returns the 0/1 bytes in row-major order.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Returns row `y` as a contiguous slice.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.size;
        &self.bits[start..start + self.size]
    }

    /// Returns the bit at `(x, y)`, or 0 outside the canvas.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return 0;
        }
        self.bits[y as usize * self.size + x as usize]
    }

    /// Centroid of the drawn pixels, or `None` for a blank pattern.
    pub fn drawn_centroid(&self) -> Option<(f64, f64)> {
        if self.ones == 0 {
            return None;
        }
        let mut sx = 0.0f64;
        let mut sy = 0.0f64;
        for y in 0..self.size {
            let row = self.row(y);
            for (x, &bit) in row.iter().enumerate() {
                if bit != 0 {
                    sx += x as f64;
                    sy += y as f64;
                }
            }
        }
        let n = f64::from(self.ones);
        Some((sx / n, sy / n))
    }

    fn set(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return;
        }
        let idx = y as usize * self.size + x as usize;
        if self.bits[idx] == 0 {
            self.bits[idx] = 1;
            self.ones += 1;
        }
    }

    /// Draws a 1-pixel segment with Bresenham stepping, clipping to canvas.
    fn draw_segment(&mut self, a: (i32, i32), b: (i32, i32)) {
        let (mut x, mut y) = a;
        let (x1, y1) = b;
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Pattern;
    use crate::contour::{Contour, ContourSet, Point};

    fn rect_set(x0: i32, y0: i32, x1: i32, y1: i32, w: usize, h: usize) -> ContourSet {
        let contour = Contour::new(vec![
            Point { x: x0, y: y0 },
            Point { x: x1, y: y0 },
            Point { x: x1, y: y1 },
            Point { x: x0, y: y1 },
        ]);
        ContourSet::new(vec![contour], w, h)
    }

    #[test]
    fn empty_set_rasterizes_to_blank() {
        let set = ContourSet::new(Vec::new(), 64, 64);
        let pattern = Pattern::rasterize(&set, 64);
        assert!(pattern.is_blank());
        assert_eq!(pattern.size(), 64);
    }

    #[test]
    fn rectangle_is_centered_and_scaled() {
        let pattern = Pattern::rasterize(&rect_set(10, 20, 60, 50, 128, 128), 128);
        assert!(!pattern.is_blank());

        let (cx, cy) = pattern.drawn_centroid().unwrap();
        assert!((cx - 64.0).abs() <= 1.0, "centroid x {cx}");
        assert!((cy - 64.0).abs() <= 1.0, "centroid y {cy}");

        // The longer axis should span roughly 90% of the canvas.
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        for y in 0..128 {
            for x in 0..128 {
                if pattern.get(x, y) != 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                }
            }
        }
        // Vertex extent 50 of a 51-pixel box maps to about 113 of 128.
        let span = max_x - min_x;
        assert!((span - 113).abs() <= 4, "span {span}");
    }

    #[test]
    fn rasterize_is_deterministic() {
        let set = rect_set(5, 5, 40, 30, 64, 64);
        assert_eq!(Pattern::rasterize(&set, 96), Pattern::rasterize(&set, 96));
    }

    #[test]
    fn segment_drawing_clips_to_canvas() {
        let mut pattern = Pattern::zeros(8);
        pattern.draw_segment((-4, 3), (12, 3));
        assert_eq!(pattern.ones(), 8);
    }
}
