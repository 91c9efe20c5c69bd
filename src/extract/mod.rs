//! Edge and contour extraction.
//!
//! Turns a color raster into a filtered set of boundary contours: Rec. 601
//! luminance, binomial smoothing, Canny-style hysteresis edges, external
//! boundary tracing, then an area/perimeter filter that keeps only contours
//! enclosing a meaningful share of the frame.

mod boundary;
pub(crate) mod canny;

use crate::contour::ContourSet;
use crate::raster::{blur, Raster};
use tracing::debug;

/// Extraction knobs.
///
/// `threshold` is the single strength knob exposed to callers (0 loosest,
/// 100 tightest); the mapping to hysteresis thresholds lives in
/// [`canny_thresholds`] so it can be re-tuned without touching the engine.
#[derive(Clone, Copy, Debug)]
pub struct ExtractorConfig {
    /// Edge strength knob in `[0, 100]`. Higher keeps fewer, stronger edges.
    pub threshold: f32,
    /// Minimum contour area as a fraction of the source image area.
    pub min_area_frac: f64,
    /// Minimum closed perimeter in pixels.
    pub min_perimeter: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            min_area_frac: 0.0005,
            min_perimeter: 150.0,
        }
    }
}

/// Maps the `[0, 100]` strength knob to Canny (low, high) thresholds.
///
/// Monotone in `threshold`: raising the knob tightens both thresholds, so
/// the surviving edge set (and therefore the contour count) never grows.
pub fn canny_thresholds(threshold: f32) -> (f32, f32) {
    let low = (30.0 + (threshold - 50.0) * 1.4).clamp(10.0, 255.0);
    let high = (2.0 * low).clamp(20.0, 255.0);
    (low, high)
}

/// Extracts the filtered contour set from a raster.
///
/// An empty result is a legitimate outcome for featureless input; callers
/// decide how to react.
pub fn extract_contours(raster: &Raster, cfg: &ExtractorConfig) -> ContourSet {
    let width = raster.width();
    let height = raster.height();

    let luma = raster.to_luma();
    let smoothed = blur::smooth(&luma);
    let (low, high) = canny_thresholds(cfg.threshold);
    let edges = canny::detect(&smoothed, low, high);
    let traced = boundary::external_contours(&edges);

    let min_area = cfg.min_area_frac * (width as f64) * (height as f64);
    let total = traced.len();
    let kept: Vec<_> = traced
        .into_iter()
        .filter(|c| c.area() >= min_area && c.perimeter() >= cfg.min_perimeter)
        .collect();

    debug!(
        threshold = cfg.threshold,
        low,
        high,
        traced = total,
        kept = kept.len(),
        "contours extracted"
    );

    ContourSet::new(kept, width, height)
}

#[cfg(test)]
mod tests {
    use super::canny_thresholds;

    #[test]
    fn threshold_mapping_is_monotone() {
        let mut prev = canny_thresholds(0.0);
        for t in 1..=100 {
            let next = canny_thresholds(t as f32);
            assert!(next.0 >= prev.0);
            assert!(next.1 >= prev.1);
            prev = next;
        }
    }

    #[test]
    fn threshold_mapping_hits_documented_endpoints() {
        assert_eq!(canny_thresholds(0.0), (10.0, 20.0));
        assert_eq!(canny_thresholds(50.0), (30.0, 60.0));
        assert_eq!(canny_thresholds(100.0), (100.0, 200.0));
    }

    #[test]
    fn high_is_always_at_least_low() {
        for t in 0..=100 {
            let (low, high) = canny_thresholds(t as f32);
            assert!(high >= low);
        }
    }
}
