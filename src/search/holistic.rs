//! Exhaustive alignment search over the transform grid.
//!
//! Rotating and scaling the query is the expensive part, so each (scale,
//! angle) pair is warped exactly once and the translation lattice is scored
//! against that scratch bitmap. (scale, angle) jobs are independent; the
//! parallel path hands each one to a rayon worker that owns its scratch
//! pattern, then reduces with the shared comparator.

use crate::grid::SearchGrid;
use crate::kernel::{shifted_iou, IntegralCounts};
use crate::pattern::{warp, Pattern};
use crate::search::{cmp_alignment, Alignment, Transform};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, info_span};

fn score_job(
    query: &Pattern,
    reference: &Pattern,
    grid: &SearchGrid,
    scale: f32,
    angle_deg: f32,
) -> Alignment {
    let warped = warp::rotate_scale(query, scale, angle_deg);
    if warped.is_blank() {
        return Alignment {
            transform: Transform {
                scale,
                angle_deg,
                tx: 0,
                ty: 0,
            },
            iou: 0.0,
        };
    }
    let integral = IntegralCounts::build(&warped);

    let mut best = Alignment {
        transform: Transform {
            scale,
            angle_deg,
            tx: grid.translations.values()[0],
            ty: grid.translations.values()[0],
        },
        iou: -1.0,
    };
    for &tx in grid.translations.values() {
        for &ty in grid.translations.values() {
            let iou = shifted_iou(&warped, &integral, reference, tx, ty);
            let candidate = Alignment {
                transform: Transform {
                    scale,
                    angle_deg,
                    tx,
                    ty,
                },
                iou,
            };
            if cmp_alignment(&candidate, &best) == Ordering::Less {
                best = candidate;
            }
        }
    }
    best
}

fn reduce(results: Vec<Alignment>) -> Alignment {
    results
        .into_iter()
        .min_by(cmp_alignment)
        .unwrap_or_else(Alignment::none)
}

/// Finds the grid transform maximizing IoU of the query against the
/// reference.
///
/// Blank patterns on either side short-circuit to IoU 0 with the identity
/// transform. The parallel and serial paths return bit-identical results.
pub fn best_alignment(
    query: &Pattern,
    reference: &Pattern,
    grid: &SearchGrid,
    parallel: bool,
) -> Alignment {
    let _span = info_span!(
        "holistic_search",
        transforms = grid.transform_count(),
        parallel
    )
    .entered();

    if query.is_blank() || reference.is_blank() {
        return Alignment::none();
    }

    let jobs: Vec<(f32, f32)> = grid
        .scales
        .values()
        .iter()
        .flat_map(|&s| grid.angles.iter().map(move |a| (s, a)))
        .collect();

    #[cfg(feature = "rayon")]
    let best = if parallel {
        let results: Vec<Alignment> = jobs
            .par_iter()
            .map(|&(s, a)| score_job(query, reference, grid, s, a))
            .collect();
        reduce(results)
    } else {
        reduce(
            jobs.iter()
                .map(|&(s, a)| score_job(query, reference, grid, s, a))
                .collect(),
        )
    };

    #[cfg(not(feature = "rayon"))]
    let best = {
        let _ = parallel;
        reduce(
            jobs.iter()
                .map(|&(s, a)| score_job(query, reference, grid, s, a))
                .collect(),
        )
    };

    debug!(
        iou = best.iou,
        scale = best.transform.scale,
        angle_deg = best.transform.angle_deg,
        tx = best.transform.tx,
        ty = best.transform.ty,
        "best alignment"
    );
    best
}
