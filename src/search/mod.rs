//! Holistic transform search.
//!
//! Finds the similarity transform that best aligns a query pattern with a
//! reference pattern by exhaustive enumeration of a discrete
//! scale/rotation/translation grid, maximizing IoU of the drawn pixel sets.

mod holistic;

pub use holistic::best_alignment;

use crate::grid::{AngleGrid, ScaleLadder, SearchGrid, TranslationGrid};
use crate::util::math::wrap_deg;
use crate::util::AeroMatchResult;
use std::cmp::Ordering;

/// A 2D similarity applied to the query pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Uniform scale factor.
    pub scale: f32,
    /// Counterclockwise rotation in degrees, in `[0, 360)`.
    pub angle_deg: f32,
    /// Horizontal translation in pixels.
    pub tx: i32,
    /// Vertical translation in pixels.
    pub ty: i32,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            angle_deg: 0.0,
            tx: 0,
            ty: 0,
        }
    }
}

/// A transform together with the IoU it achieved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    pub transform: Transform,
    pub iou: f32,
}

impl Alignment {
    pub(crate) fn none() -> Self {
        Self {
            transform: Transform::identity(),
            iou: 0.0,
        }
    }
}

/// Total order over alignments: higher IoU first, ties broken toward the
/// transform closest to identity (`|s - 1|`, then circular distance of the
/// angle from zero, then `|tx|`, `|ty|`), with the raw parameters as final
/// keys so the order is independent of enumeration order. Both the serial
/// and the parallel search reduce with this comparator, which is what makes
/// their results bit-identical.
pub(crate) fn cmp_alignment(a: &Alignment, b: &Alignment) -> Ordering {
    b.iou
        .total_cmp(&a.iou)
        .then_with(|| {
            (a.transform.scale - 1.0)
                .abs()
                .total_cmp(&(b.transform.scale - 1.0).abs())
        })
        .then_with(|| {
            wrap_deg(a.transform.angle_deg)
                .abs()
                .total_cmp(&wrap_deg(b.transform.angle_deg).abs())
        })
        .then_with(|| a.transform.tx.abs().cmp(&b.transform.tx.abs()))
        .then_with(|| a.transform.ty.abs().cmp(&b.transform.ty.abs()))
        .then_with(|| a.transform.scale.total_cmp(&b.transform.scale))
        .then_with(|| a.transform.angle_deg.total_cmp(&b.transform.angle_deg))
        .then_with(|| a.transform.tx.cmp(&b.transform.tx))
        .then_with(|| a.transform.ty.cmp(&b.transform.ty))
}

/// Knobs for the transform grid.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    /// Lower end of the scale ladder.
    pub min_scale: f32,
    /// Upper end of the scale ladder.
    pub max_scale: f32,
    /// Number of ladder samples (endpoints included).
    pub scale_steps: usize,
    /// Rotation increment in degrees over `[0, 360)`.
    pub angle_step_deg: f32,
    /// Half-width of the translation lattice in pixels.
    pub translation_range: i32,
    /// Lattice spacing in pixels.
    pub translation_step: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 2.0,
            scale_steps: 10,
            angle_step_deg: 10.0,
            translation_range: 50,
            translation_step: 10,
        }
    }
}

impl SearchParams {
    /// Builds the full scale x rotation x translation grid.
    pub fn full_grid(&self) -> AeroMatchResult<SearchGrid> {
        Ok(SearchGrid {
            scales: ScaleLadder::new(self.min_scale, self.max_scale, self.scale_steps)?,
            angles: AngleGrid::full_circle(self.angle_step_deg)?,
            translations: TranslationGrid::new(self.translation_range, self.translation_step)?,
        })
    }

    /// Builds the translation-only grid used by simplified mode.
    pub fn simplified_grid(&self) -> AeroMatchResult<SearchGrid> {
        Ok(SearchGrid {
            scales: ScaleLadder::identity(),
            angles: AngleGrid::zero_only(),
            translations: TranslationGrid::new(self.translation_range, self.translation_step)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{cmp_alignment, Alignment, Transform};
    use std::cmp::Ordering;

    fn alignment(iou: f32, scale: f32, angle_deg: f32, tx: i32, ty: i32) -> Alignment {
        Alignment {
            transform: Transform {
                scale,
                angle_deg,
                tx,
                ty,
            },
            iou,
        }
    }

    #[test]
    fn higher_iou_ranks_first() {
        let a = alignment(0.8, 2.0, 180.0, 50, 50);
        let b = alignment(0.7, 1.0, 0.0, 0, 0);
        assert_eq!(cmp_alignment(&a, &b), Ordering::Less);
    }

    #[test]
    fn ties_prefer_identity_scale_then_angle() {
        let near = alignment(0.5, 1.0, 10.0, 0, 0);
        let far = alignment(0.5, 1.5, 0.0, 0, 0);
        assert_eq!(cmp_alignment(&near, &far), Ordering::Less);

        let small_angle = alignment(0.5, 1.0, 10.0, 0, 0);
        let large_angle = alignment(0.5, 1.0, 90.0, 0, 0);
        assert_eq!(cmp_alignment(&small_angle, &large_angle), Ordering::Less);
    }

    #[test]
    fn angle_ties_use_circular_distance() {
        let wrapped = alignment(0.5, 1.0, 350.0, 0, 0);
        let plain = alignment(0.5, 1.0, 20.0, 0, 0);
        assert_eq!(cmp_alignment(&wrapped, &plain), Ordering::Less);
    }

    #[test]
    fn translation_ties_prefer_smaller_magnitude() {
        let near = alignment(0.5, 1.0, 0.0, -10, 0);
        let far = alignment(0.5, 1.0, 0.0, 20, 0);
        assert_eq!(cmp_alignment(&near, &far), Ordering::Less);
        // Equal magnitudes fall through to the raw-value key.
        let neg = alignment(0.5, 1.0, 0.0, -10, 0);
        let pos = alignment(0.5, 1.0, 0.0, 10, 0);
        assert_eq!(cmp_alignment(&neg, &pos), Ordering::Less);
    }
}
