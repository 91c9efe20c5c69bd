//! Canny-style edge detection on smoothed grayscale buffers.
//!
//! Three stages: 3x3 Sobel gradients with the direction quantized into four
//! bins, non-maximum suppression along the quantized direction, then
//! two-threshold hysteresis grown from strong seeds with a stack. The caller
//! smooths the input first; this module assumes noise is already suppressed.

use crate::raster::GrayBuffer;

/// Binary edge map: 1 on edge pixels, 0 elsewhere.
pub(crate) struct EdgeMap {
    pub(crate) data: Vec<u8>,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

fn gradients(src: &GrayBuffer) -> (Vec<f32>, Vec<u8>) {
    let width = src.width();
    let height = src.height();
    let data = src.data();
    let mut magnitude = vec![0.0f32; width * height];
    let mut direction = vec![0u8; width * height];

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let p = |xx: usize, yy: usize| f32::from(data[yy * width + xx]);

            let gx = -p(x - 1, y - 1) + p(x + 1, y - 1) - 2.0 * p(x - 1, y) + 2.0 * p(x + 1, y)
                - p(x - 1, y + 1)
                + p(x + 1, y + 1);
            let gy = -p(x - 1, y - 1) - 2.0 * p(x, y - 1) - p(x + 1, y - 1)
                + p(x - 1, y + 1)
                + 2.0 * p(x, y + 1)
                + p(x + 1, y + 1);

            let idx = y * width + x;
            magnitude[idx] = (gx * gx + gy * gy).sqrt();

            let angle = gy.atan2(gx).to_degrees().rem_euclid(180.0);
            direction[idx] = if !(22.5..157.5).contains(&angle) {
                0 // horizontal gradient, east-west neighbors
            } else if angle < 67.5 {
                1
            } else if angle < 112.5 {
                2
            } else {
                3
            };
        }
    }

    (magnitude, direction)
}

fn suppress_non_maxima(width: usize, height: usize, mag: &[f32], dir: &[u8]) -> Vec<f32> {
    let mut out = vec![0.0f32; width * height];

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let idx = y * width + x;
            let m = mag[idx];
            let (m1, m2) = match dir[idx] {
                0 => (mag[idx - 1], mag[idx + 1]),
                1 => (
                    mag[(y - 1) * width + (x + 1)],
                    mag[(y + 1) * width + (x - 1)],
                ),
                2 => (mag[(y - 1) * width + x], mag[(y + 1) * width + x]),
                _ => (
                    mag[(y - 1) * width + (x - 1)],
                    mag[(y + 1) * width + (x + 1)],
                ),
            };

            if m >= m1 && m >= m2 {
                out[idx] = m;
            }
        }
    }

    out
}

fn hysteresis(width: usize, height: usize, nms: &[f32], low: f32, high: f32) -> Vec<u8> {
    const STRONG: u8 = 2;
    const WEAK: u8 = 1;

    let mut state = vec![0u8; width * height];
    let mut stack = Vec::new();

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let idx = y * width + x;
            let v = nms[idx];
            if v >= high {
                state[idx] = STRONG;
                stack.push((x, y));
            } else if v >= low {
                state[idx] = WEAK;
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(height - 1);
        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(width - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                let nidx = ny * width + nx;
                if state[nidx] == WEAK {
                    state[nidx] = STRONG;
                    stack.push((nx, ny));
                }
            }
        }
    }

    state
        .into_iter()
        .map(|s| u8::from(s == STRONG))
        .collect()
}

/// Runs the detector over a pre-smoothed buffer with explicit thresholds.
pub(crate) fn detect(src: &GrayBuffer, low: f32, high: f32) -> EdgeMap {
    let width = src.width();
    let height = src.height();
    let (mag, dir) = gradients(src);
    let nms = suppress_non_maxima(width, height, &mag, &dir);
    let data = hysteresis(width, height, &nms, low, high.max(low));
    EdgeMap {
        data,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::detect;
    use crate::raster::GrayBuffer;

    #[test]
    fn step_edge_is_detected() {
        let width = 64;
        let height = 32;
        let mut data = vec![20u8; width * height];
        for y in 0..height {
            for x in 32..width {
                data[y * width + x] = 220;
            }
        }
        let src = GrayBuffer::new(data, width, height).unwrap();
        let edges = detect(&src, 40.0, 100.0);
        let count = edges.data.iter().filter(|&&v| v > 0).count();
        assert!(count > 0, "vertical intensity step should produce edges");
    }

    #[test]
    fn flat_image_has_no_edges() {
        let src = GrayBuffer::new(vec![128; 40 * 40], 40, 40).unwrap();
        let edges = detect(&src, 20.0, 40.0);
        assert!(edges.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn tighter_thresholds_never_add_edges() {
        let width = 48;
        let height = 48;
        let mut data = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                data[y * width + x] = (((x * 37) ^ (y * 61)) & 0xFF) as u8;
            }
        }
        let src = GrayBuffer::new(data, width, height).unwrap();
        let loose = detect(&src, 30.0, 60.0);
        let tight = detect(&src, 80.0, 160.0);
        let loose_count = loose.data.iter().filter(|&&v| v > 0).count();
        let tight_count = tight.data.iter().filter(|&&v| v > 0).count();
        assert!(tight_count <= loose_count);
    }
}
