//! Shape descriptors for individual contour scoring.
//!
//! The cheaper alternative to the holistic search: each contour is reduced
//! to its polygon area, perimeter, circularity, and the seven Hu moment
//! invariants (computed exactly over the polygon with Green's theorem, then
//! log-compressed). Two contour sets are scored by matching every query
//! contour to its most similar reference contour and averaging. Robust to
//! large positional offsets, weak under rotation-plus-scale composition.

use crate::contour::{Contour, ContourSet};
use tracing::debug;

const DENOM_EPSILON: f64 = 1e-12;
/// Moment weight in the combined similarity; the remainder goes to the
/// area/perimeter/circularity ratio bag.
const MOMENT_WEIGHT: f64 = 0.6;

/// Scalar shape summary of one contour.
#[derive(Clone, Copy, Debug)]
pub struct ShapeDescriptor {
    /// Absolute polygon area.
    pub area: f64,
    /// Closed perimeter.
    pub perimeter: f64,
    /// `4 * pi * area / perimeter^2`, 1.0 for a circle.
    pub circularity: f64,
    /// Log-compressed Hu invariants.
    pub hu: [f64; 7],
}

impl ShapeDescriptor {
    /// Computes the descriptor for a contour.
    ///
    /// Near-degenerate polygons (no enclosed area) yield the zero
    /// descriptor, mirroring the zero-moment guard of the matcher this
    /// scorer replaces.
    pub fn from_contour(contour: &Contour) -> Self {
        let Some(moments) = PolygonMoments::of(contour) else {
            return Self {
                area: 0.0,
                perimeter: 0.0,
                circularity: 0.0,
                hu: [0.0; 7],
            };
        };

        let area = moments.m00;
        let perimeter = contour.perimeter();
        let circularity = if perimeter > 0.0 {
            4.0 * std::f64::consts::PI * area / (perimeter * perimeter)
        } else {
            0.0
        };

        Self {
            area,
            perimeter,
            circularity,
            hu: moments.hu_log(),
        }
    }
}

/// Polygon raw moments up to order three, orientation-normalized so the
/// zeroth moment is positive.
struct PolygonMoments {
    m00: f64,
    m10: f64,
    m01: f64,
    m20: f64,
    m11: f64,
    m02: f64,
    m30: f64,
    m21: f64,
    m12: f64,
    m03: f64,
}

impl PolygonMoments {
    fn of(contour: &Contour) -> Option<Self> {
        let pts = contour.points();
        let n = pts.len();
        if n < 3 {
            return None;
        }

        let mut m = Self {
            m00: 0.0,
            m10: 0.0,
            m01: 0.0,
            m20: 0.0,
            m11: 0.0,
            m02: 0.0,
            m30: 0.0,
            m21: 0.0,
            m12: 0.0,
            m03: 0.0,
        };

        for i in 0..n {
            let a = pts[i];
            let b = pts[(i + 1) % n];
            let (xa, ya) = (f64::from(a.x), f64::from(a.y));
            let (xb, yb) = (f64::from(b.x), f64::from(b.y));
            let cross = xa * yb - xb * ya;

            m.m00 += cross;
            m.m10 += (xa + xb) * cross;
            m.m01 += (ya + yb) * cross;
            m.m20 += (xa * xa + xa * xb + xb * xb) * cross;
            m.m11 += (2.0 * xa * ya + xa * yb + xb * ya + 2.0 * xb * yb) * cross;
            m.m02 += (ya * ya + ya * yb + yb * yb) * cross;
            m.m30 += (xa * xa * xa + xa * xa * xb + xa * xb * xb + xb * xb * xb) * cross;
            m.m21 += (xa * xa * (3.0 * ya + yb)
                + 2.0 * xa * xb * (ya + yb)
                + xb * xb * (ya + 3.0 * yb))
                * cross;
            m.m12 += (ya * ya * (3.0 * xa + xb)
                + 2.0 * ya * yb * (xa + xb)
                + yb * yb * (xa + 3.0 * xb))
                * cross;
            m.m03 += (ya * ya * ya + ya * ya * yb + ya * yb * yb + yb * yb * yb) * cross;
        }

        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m.m20 /= 12.0;
        m.m11 /= 24.0;
        m.m02 /= 12.0;
        m.m30 /= 20.0;
        m.m21 /= 60.0;
        m.m12 /= 60.0;
        m.m03 /= 20.0;

        // A clockwise polygon flips every moment; renormalize the winding
        // instead of propagating the sign into the powers below.
        if m.m00 < 0.0 {
            for v in [
                &mut m.m00, &mut m.m10, &mut m.m01, &mut m.m20, &mut m.m11, &mut m.m02,
                &mut m.m30, &mut m.m21, &mut m.m12, &mut m.m03,
            ] {
                *v = -*v;
            }
        }

        if m.m00 < DENOM_EPSILON {
            return None;
        }
        Some(m)
    }

    /// The seven Hu invariants of the polygon, log-compressed with the sign
    /// preserved (`-sign(h) * log10(|h|)`).
    fn hu_log(&self) -> [f64; 7] {
        let cx = self.m10 / self.m00;
        let cy = self.m01 / self.m00;

        let mu20 = self.m20 - cx * self.m10;
        let mu02 = self.m02 - cy * self.m01;
        let mu11 = self.m11 - cx * self.m01;
        let mu30 = self.m30 - 3.0 * cx * self.m20 + 2.0 * cx * cx * self.m10;
        let mu21 = self.m21 - 2.0 * cx * self.m11 - cy * self.m20 + 2.0 * cx * cx * self.m01;
        let mu12 = self.m12 - 2.0 * cy * self.m11 - cx * self.m02 + 2.0 * cy * cy * self.m10;
        let mu03 = self.m03 - 3.0 * cy * self.m02 + 2.0 * cy * cy * self.m01;

        let norm2 = self.m00.powi(2);
        let norm3 = self.m00.powf(2.5);
        let n20 = mu20 / norm2;
        let n02 = mu02 / norm2;
        let n11 = mu11 / norm2;
        let n30 = mu30 / norm3;
        let n21 = mu21 / norm3;
        let n12 = mu12 / norm3;
        let n03 = mu03 / norm3;

        let h1 = n20 + n02;
        let h2 = (n20 - n02).powi(2) + 4.0 * n11 * n11;
        let h3 = (n30 - 3.0 * n12).powi(2) + (3.0 * n21 - n03).powi(2);
        let h4 = (n30 + n12).powi(2) + (n21 + n03).powi(2);
        let h5 = (n30 - 3.0 * n12)
            * (n30 + n12)
            * ((n30 + n12).powi(2) - 3.0 * (n21 + n03).powi(2))
            + (3.0 * n21 - n03) * (n21 + n03) * (3.0 * (n30 + n12).powi(2) - (n21 + n03).powi(2));
        let h6 = (n20 - n02) * ((n30 + n12).powi(2) - (n21 + n03).powi(2))
            + 4.0 * n11 * (n30 + n12) * (n21 + n03);
        let h7 = (3.0 * n21 - n03)
            * (n30 + n12)
            * ((n30 + n12).powi(2) - 3.0 * (n21 + n03).powi(2))
            - (n30 - 3.0 * n12) * (n21 + n03) * (3.0 * (n30 + n12).powi(2) - (n21 + n03).powi(2));

        [h1, h2, h3, h4, h5, h6, h7].map(log_compress)
    }
}

fn log_compress(h: f64) -> f64 {
    if h == 0.0 {
        0.0
    } else {
        -h.signum() * h.abs().log10()
    }
}

fn ratio_diff(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.max(b).max(DENOM_EPSILON)
}

/// Similarity between two descriptors in `[0, 1]`.
pub fn descriptor_similarity(a: &ShapeDescriptor, b: &ShapeDescriptor) -> f64 {
    let hu_distance: f64 = a
        .hu
        .iter()
        .zip(&b.hu)
        .map(|(ha, hb)| (ha - hb).abs())
        .sum();
    let moment_sim = 1.0 / (1.0 + hu_distance);

    let ratio_avg = (ratio_diff(a.perimeter, b.perimeter)
        + ratio_diff(a.area, b.area)
        + ratio_diff(a.circularity, b.circularity))
        / 3.0;
    let ratio_sim = (1.0 - ratio_avg).clamp(0.0, 1.0);

    MOMENT_WEIGHT * moment_sim + (1.0 - MOMENT_WEIGHT) * ratio_sim
}

/// Scores two contour sets in `[0, 100]`.
///
/// Every query contour is matched to its best reference contour; the score
/// is the mean of those maxima. Either side empty scores zero.
pub fn score_sets(query: &ContourSet, reference: &ContourSet) -> f64 {
    if query.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let query_descs: Vec<_> = query
        .contours()
        .iter()
        .map(ShapeDescriptor::from_contour)
        .collect();
    let ref_descs: Vec<_> = reference
        .contours()
        .iter()
        .map(ShapeDescriptor::from_contour)
        .collect();

    let mut total = 0.0f64;
    for q in &query_descs {
        let best = ref_descs
            .iter()
            .map(|r| descriptor_similarity(q, r))
            .fold(0.0f64, f64::max);
        total += best;
    }
    let score = total / query_descs.len() as f64 * 100.0;
    debug!(
        query_contours = query_descs.len(),
        reference_contours = ref_descs.len(),
        score,
        "individual contour score"
    );
    score
}
