//! Counting kernels for translation scoring.
//!
//! The inner loop of the holistic search only shifts an already-warped
//! query pattern, so its cost is two counts per offset: how many query
//! pixels stay on canvas (answered in O(1) by an integral table) and how
//! many of those land on reference pixels (a row-sliced intersection walk).

use crate::pattern::Pattern;

/// Summed-area table over a pattern's bits.
///
/// `counts[(y, x)]` holds the number of set pixels in the half-open
/// rectangle `[0, x) x [0, y)`, so any axis-aligned region is a
/// four-corner lookup.
pub(crate) struct IntegralCounts {
    counts: Vec<u32>,
    side: usize,
}

impl IntegralCounts {
    pub(crate) fn build(pattern: &Pattern) -> Self {
        let size = pattern.size();
        let side = size + 1;
        let mut counts = vec![0u32; side * side];
        for y in 0..size {
            let row = pattern.row(y);
            let mut row_acc = 0u32;
            for x in 0..size {
                row_acc += u32::from(row[x]);
                counts[(y + 1) * side + (x + 1)] = counts[y * side + (x + 1)] + row_acc;
            }
        }
        Self { counts, side }
    }

    /// Set-pixel count in the half-open rectangle `[x0, x1) x [y0, y1)`.
    pub(crate) fn count_rect(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u32 {
        debug_assert!(x0 <= x1 && y0 <= y1);
        debug_assert!(x1 < self.side && y1 < self.side);
        self.counts[y1 * self.side + x1] + self.counts[y0 * self.side + x0]
            - self.counts[y0 * self.side + x1]
            - self.counts[y1 * self.side + x0]
    }
}

/// Clipped overlap of the shifted query canvas with the reference canvas,
/// in query coordinates: the half-open ranges of query pixels that remain
/// on canvas after shifting by `(tx, ty)`.
fn overlap(size: usize, t: i32) -> Option<(usize, usize)> {
    let size = size as i32;
    let lo = (-t).max(0);
    let hi = (size - t).min(size);
    if lo >= hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

/// Number of query pixels still on canvas after shifting by `(tx, ty)`.
pub(crate) fn shifted_ones(integral: &IntegralCounts, size: usize, tx: i32, ty: i32) -> u32 {
    let Some((x0, x1)) = overlap(size, tx) else {
        return 0;
    };
    let Some((y0, y1)) = overlap(size, ty) else {
        return 0;
    };
    integral.count_rect(x0, y0, x1, y1)
}

/// Number of pixels set in both the shifted query and the reference.
pub(crate) fn shifted_intersection(query: &Pattern, reference: &Pattern, tx: i32, ty: i32) -> u32 {
    let size = query.size();
    debug_assert_eq!(size, reference.size());
    let Some((x0, x1)) = overlap(size, tx) else {
        return 0;
    };
    let Some((y0, y1)) = overlap(size, ty) else {
        return 0;
    };

    let mut acc = 0u32;
    for qy in y0..y1 {
        let ry = (qy as i32 + ty) as usize;
        let q_row = &query.row(qy)[x0..x1];
        let r_start = (x0 as i32 + tx) as usize;
        let r_row = &reference.row(ry)[r_start..r_start + (x1 - x0)];
        for (&q, &r) in q_row.iter().zip(r_row) {
            acc += u32::from(q & r);
        }
    }
    acc
}

/// IoU of the shifted query against the reference.
///
/// Query pixels shifted off canvas are dropped from both counts; a zero
/// union scores zero.
pub(crate) fn shifted_iou(
    query: &Pattern,
    query_integral: &IntegralCounts,
    reference: &Pattern,
    tx: i32,
    ty: i32,
) -> f32 {
    let inter = shifted_intersection(query, reference, tx, ty);
    let q_in = shifted_ones(query_integral, query.size(), tx, ty);
    let union = q_in + reference.ones() - inter;
    if union == 0 {
        return 0.0;
    }
    inter as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::{shifted_intersection, shifted_iou, shifted_ones, IntegralCounts};
    use crate::pattern::Pattern;

    fn block_pattern(size: usize, x0: usize, y0: usize, w: usize, h: usize) -> Pattern {
        let mut bits = vec![0u8; size * size];
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                bits[y * size + x] = 1;
            }
        }
        Pattern::from_bits(bits, size).unwrap()
    }

    #[test]
    fn integral_counts_match_direct_counts() {
        let pattern = block_pattern(16, 3, 5, 6, 4);
        let integral = IntegralCounts::build(&pattern);
        assert_eq!(integral.count_rect(0, 0, 16, 16), 24);
        assert_eq!(integral.count_rect(3, 5, 9, 9), 24);
        assert_eq!(integral.count_rect(4, 6, 9, 9), 15);
        assert_eq!(integral.count_rect(0, 0, 3, 16), 0);
    }

    #[test]
    fn shift_drops_pixels_leaving_the_canvas() {
        let pattern = block_pattern(8, 6, 6, 2, 2);
        let integral = IntegralCounts::build(&pattern);
        assert_eq!(shifted_ones(&integral, 8, 0, 0), 4);
        assert_eq!(shifted_ones(&integral, 8, 1, 0), 2);
        assert_eq!(shifted_ones(&integral, 8, 2, 2), 0);
        assert_eq!(shifted_ones(&integral, 8, -6, -6), 4);
        assert_eq!(shifted_ones(&integral, 8, -7, 0), 2);
        assert_eq!(shifted_ones(&integral, 8, -8, 0), 0);
    }

    #[test]
    fn intersection_tracks_the_shift() {
        let a = block_pattern(16, 4, 4, 4, 4);
        let b = block_pattern(16, 6, 5, 4, 4);
        assert_eq!(shifted_intersection(&a, &b, 2, 1), 16);
        assert_eq!(shifted_intersection(&a, &b, 0, 0), 6);
        assert_eq!(shifted_intersection(&a, &b, 8, 8), 0);
    }

    #[test]
    fn iou_is_one_for_aligned_identical_blocks() {
        let a = block_pattern(16, 4, 4, 4, 4);
        let integral = IntegralCounts::build(&a);
        assert_eq!(shifted_iou(&a, &integral, &a, 0, 0), 1.0);
        let shifted = shifted_iou(&a, &integral, &a, 1, 0);
        assert!(shifted < 1.0 && shifted > 0.0);
    }

    #[test]
    fn blank_patterns_score_zero() {
        let blank = Pattern::zeros(8);
        let integral = IntegralCounts::build(&blank);
        assert_eq!(shifted_iou(&blank, &integral, &blank, 0, 0), 0.0);
    }
}
