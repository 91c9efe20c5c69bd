//! Separable binomial smoothing for the extractor front end.
//!
//! The 5-tap binomial kernel `[1, 4, 6, 4, 1] / 16` approximates a Gaussian
//! with sigma near 1.1 at radius 2, which is what the edge detector needs to
//! suppress sensor noise ahead of gradient estimation. Borders replicate the
//! edge pixel. Integer arithmetic keeps the pass deterministic.

use crate::raster::GrayBuffer;

const TAPS: [u32; 5] = [1, 4, 6, 4, 1];
const RADIUS: i64 = 2;

/// Smooths a grayscale buffer with a radius-2 binomial kernel.
pub(crate) fn smooth(src: &GrayBuffer) -> GrayBuffer {
    let width = src.width();
    let height = src.height();

    // Horizontal pass into a u16 intermediate to avoid double rounding.
    let mut tmp = vec![0u16; width * height];
    for y in 0..height {
        let row = src.row(y);
        for x in 0..width {
            let mut acc = 0u32;
            for (k, tap) in TAPS.iter().enumerate() {
                let sx = (x as i64 + k as i64 - RADIUS).clamp(0, width as i64 - 1);
                acc += tap * u32::from(row[sx as usize]);
            }
            tmp[y * width + x] = acc as u16;
        }
    }

    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (k, tap) in TAPS.iter().enumerate() {
                let sy = (y as i64 + k as i64 - RADIUS).clamp(0, height as i64 - 1);
                acc += tap * u32::from(tmp[sy as usize * width + x]);
            }
            out[y * width + x] = ((acc + 128) / 256) as u8;
        }
    }

    GrayBuffer::new(out, width, height).expect("smoothing preserves dimensions")
}

#[cfg(test)]
mod tests {
    use super::smooth;
    use crate::raster::GrayBuffer;

    #[test]
    fn constant_image_is_unchanged() {
        let src = GrayBuffer::new(vec![137; 64], 8, 8).unwrap();
        let out = smooth(&src);
        assert!(out.data().iter().all(|&v| v == 137));
    }

    #[test]
    fn impulse_spreads_symmetrically() {
        let mut data = vec![0u8; 81];
        data[4 * 9 + 4] = 255;
        let src = GrayBuffer::new(data, 9, 9).unwrap();
        let out = smooth(&src);
        let center = out.get(4, 4).unwrap();
        assert!(center > 0);
        assert_eq!(out.get(3, 4), out.get(5, 4));
        assert_eq!(out.get(4, 3), out.get(4, 5));
        assert!(out.get(3, 4).unwrap() < center);
    }
}
