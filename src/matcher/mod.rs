//! Matcher facade.
//!
//! Orchestrates the pipeline for one query against N references: extract
//! and rasterize the query once, then score every reference with the mode
//! the caller picked, and return a deterministically ranked list. Scores
//! are IoU in `[0, 1]` inside the engine and percent at this boundary.

mod tiles;

pub use tiles::{CandidateLocation, TileProvider};

use crate::contour::ContourSet;
use crate::extract::{extract_contours, ExtractorConfig};
use crate::pattern::Pattern;
use crate::raster::Raster;
use crate::search::{best_alignment, SearchParams, Transform};
use crate::util::{AeroMatchError, AeroMatchResult};
use crate::{descriptor, grid::SearchGrid};
use tracing::{debug, info_span};

/// How references are scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Per-contour shape descriptors; fast, translation-robust.
    Individual,
    /// Full scale x rotation x translation holistic search.
    HolisticFull,
    /// Translation-only holistic search; the default trade-off when query
    /// and reference share orientation and ground-sample distance.
    #[default]
    HolisticSimple,
}

/// Immutable configuration for one matcher instance.
#[derive(Clone, Copy, Debug)]
pub struct MatchConfig {
    pub mode: MatchMode,
    pub extractor: ExtractorConfig,
    /// Side length of the square contour patterns.
    pub pattern_size: usize,
    pub search: SearchParams,
    /// IoU below which an outcome is reported but not flagged confident.
    pub min_score: f32,
    /// Score (s, angle) jobs on rayon workers.
    pub parallel: bool,
    /// Ground width of fetched reference tiles in meters.
    pub tile_width_m: f64,
    /// Pixel size of fetched reference tiles.
    pub tile_pixels: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            extractor: ExtractorConfig::default(),
            pattern_size: 512,
            search: SearchParams::default(),
            min_score: 0.15,
            parallel: true,
            tile_width_m: 250.0,
            tile_pixels: 640,
        }
    }
}

impl MatchConfig {
    /// Validates every knob, surfacing the first violation.
    pub fn validate(&self) -> AeroMatchResult<()> {
        if !(0.0..=100.0).contains(&self.extractor.threshold) {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "threshold",
                reason: "must be within [0, 100]",
            });
        }
        if !(0.0..=1.0).contains(&self.extractor.min_area_frac) {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "min_area_frac",
                reason: "must be within [0, 1]",
            });
        }
        if self.extractor.min_perimeter < 0.0 {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "min_perimeter",
                reason: "must be non-negative",
            });
        }
        if self.pattern_size < 32 {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "pattern_size",
                reason: "must be at least 32",
            });
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "min_score",
                reason: "must be within [0, 1] IoU",
            });
        }
        if self.tile_width_m <= 0.0 {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "tile_width_m",
                reason: "must be positive",
            });
        }
        if self.tile_pixels == 0 {
            return Err(AeroMatchError::ConfigOutOfRange {
                param: "tile_pixels",
                reason: "must be positive",
            });
        }
        // Grid construction re-checks the search knobs; doing it here keeps
        // every violation ahead of any pixel work.
        self.search.full_grid()?;
        Ok(())
    }

    fn grid(&self) -> AeroMatchResult<SearchGrid> {
        match self.mode {
            MatchMode::HolisticFull => self.search.full_grid(),
            _ => self.search.simplified_grid(),
        }
    }
}

/// Outcome of matching one reference.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    /// Position of this reference in the caller's input list.
    pub index: usize,
    /// Percent score, `100 * iou`.
    pub score: f32,
    /// IoU in `[0, 1]`.
    pub iou: f32,
    /// Best transform found (identity when no search ran).
    pub transform: Transform,
    /// The reference produced no contours.
    pub featureless: bool,
    /// The score cleared the configured `min_score` bar.
    pub confident: bool,
    /// Tile fetch failed; the outcome is excluded from best-match selection.
    pub fetch_error: Option<String>,
}

impl MatchOutcome {
    fn zero(index: usize) -> Self {
        Self {
            index,
            score: 0.0,
            iou: 0.0,
            transform: Transform::identity(),
            featureless: false,
            confident: false,
            fetch_error: None,
        }
    }
}

/// Ranked outcome of one query against N references.
#[derive(Clone, Debug)]
pub struct RankedMatches {
    /// Input index of the best-scoring fetchable reference; 0 when nothing
    /// could be scored.
    pub best_index: usize,
    /// Percent score of the best reference.
    pub best_score: f32,
    /// The query produced no contours; every score is zero.
    pub query_featureless: bool,
    /// All outcomes, best first. Fetch failures rank after scored entries.
    pub per_reference: Vec<MatchOutcome>,
}

/// Facade over the extraction, rasterization, and search pipeline.
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Creates a matcher, validating the configuration up front.
    pub fn new(config: MatchConfig) -> AeroMatchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Matches a query raster against references the caller already holds.
    pub fn match_rasters(
        &self,
        query: &Raster,
        references: &[Raster],
    ) -> AeroMatchResult<RankedMatches> {
        let prepared: Vec<Result<&Raster, String>> = references.iter().map(Ok).collect();
        self.run(query, prepared)
    }

    /// Fetches one tile per candidate location and matches against them.
    ///
    /// A failed fetch degrades to a flagged outcome instead of aborting the
    /// run; invalid coordinates abort before any tile is requested.
    pub fn match_locations(
        &self,
        query: &Raster,
        candidates: &[CandidateLocation],
        provider: &dyn TileProvider,
    ) -> AeroMatchResult<RankedMatches> {
        for candidate in candidates {
            candidate.validate()?;
        }

        let tiles: Vec<AeroMatchResult<Raster>> = candidates
            .iter()
            .map(|c| {
                provider.fetch_tile(
                    c.lat,
                    c.lon,
                    self.config.tile_width_m,
                    self.config.tile_pixels,
                )
            })
            .collect();
        let prepared: Vec<Result<&Raster, String>> = tiles
            .iter()
            .map(|r| r.as_ref().map_err(|err| err.to_string()))
            .collect();
        self.run(query, prepared)
    }

    fn run(
        &self,
        query: &Raster,
        references: Vec<Result<&Raster, String>>,
    ) -> AeroMatchResult<RankedMatches> {
        let _span = info_span!(
            "match",
            references = references.len(),
            mode = ?self.config.mode
        )
        .entered();

        let query_set = extract_contours(query, &self.config.extractor);
        let query_featureless = query_set.is_empty();
        if query_featureless {
            debug!("query produced no contours; reporting zero scores");
            let per_reference: Vec<_> = (0..references.len()).map(MatchOutcome::zero).collect();
            return Ok(RankedMatches {
                best_index: 0,
                best_score: 0.0,
                query_featureless: true,
                per_reference,
            });
        }

        let grid = self.config.grid()?;
        let query_pattern = Pattern::rasterize(&query_set, self.config.pattern_size);

        let mut per_reference = Vec::with_capacity(references.len());
        for (index, reference) in references.into_iter().enumerate() {
            let outcome = match reference {
                Ok(raster) => self.score_reference(index, &query_set, &query_pattern, raster, &grid),
                Err(reason) => {
                    debug!(index, error = %reason, "reference tile unavailable");
                    MatchOutcome {
                        fetch_error: Some(reason),
                        ..MatchOutcome::zero(index)
                    }
                }
            };
            per_reference.push(outcome);
        }

        // Fetch failures sink below every scored outcome; within each group
        // the order is score-descending with the input index as the final
        // deterministic key.
        per_reference.sort_by(|a, b| {
            a.fetch_error
                .is_some()
                .cmp(&b.fetch_error.is_some())
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| a.index.cmp(&b.index))
        });

        let best = per_reference
            .iter()
            .find(|o| o.fetch_error.is_none());
        let (best_index, best_score) = match best {
            Some(outcome) => (outcome.index, outcome.score),
            None => (0, 0.0),
        };

        Ok(RankedMatches {
            best_index,
            best_score,
            query_featureless: false,
            per_reference,
        })
    }

    fn score_reference(
        &self,
        index: usize,
        query_set: &ContourSet,
        query_pattern: &Pattern,
        reference: &Raster,
        grid: &SearchGrid,
    ) -> MatchOutcome {
        let _span = info_span!("reference", index).entered();

        let reference_set = extract_contours(reference, &self.config.extractor);
        if reference_set.is_empty() {
            return MatchOutcome {
                featureless: true,
                ..MatchOutcome::zero(index)
            };
        }

        let (iou, transform) = match self.config.mode {
            MatchMode::Individual => {
                let score = descriptor::score_sets(query_set, &reference_set);
                ((score / 100.0) as f32, Transform::identity())
            }
            MatchMode::HolisticFull | MatchMode::HolisticSimple => {
                let reference_pattern =
                    Pattern::rasterize(&reference_set, self.config.pattern_size);
                let alignment =
                    best_alignment(query_pattern, &reference_pattern, grid, self.config.parallel);
                (alignment.iou, alignment.transform)
            }
        };

        let score = 100.0 * iou;
        debug!(index, score, "reference scored");
        MatchOutcome {
            index,
            score,
            iou,
            transform,
            featureless: false,
            confident: iou >= self.config.min_score,
            fetch_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchConfig, Matcher};
    use crate::util::AeroMatchError;

    #[test]
    fn default_config_validates() {
        assert!(Matcher::new(MatchConfig::default()).is_ok());
    }

    #[test]
    fn tiny_pattern_size_is_rejected() {
        let config = MatchConfig {
            pattern_size: 16,
            ..MatchConfig::default()
        };
        let err = Matcher::new(config).map(|_| ()).unwrap_err();
        match err {
            AeroMatchError::ConfigOutOfRange { param, .. } => assert_eq!(param, "pattern_size"),
            other => panic!("expected ConfigOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn zero_scale_steps_are_rejected() {
        let mut config = MatchConfig::default();
        config.search.scale_steps = 0;
        let err = Matcher::new(config).map(|_| ()).unwrap_err();
        match err {
            AeroMatchError::ConfigOutOfRange { param, .. } => assert_eq!(param, "scale_steps"),
            other => panic!("expected ConfigOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = MatchConfig::default();
        config.extractor.threshold = 120.0;
        assert!(Matcher::new(config).is_err());
    }
}
