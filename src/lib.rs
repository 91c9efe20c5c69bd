//! AeroMatch locates a downward-facing aerial photograph among candidate
//! satellite reference tiles.
//!
//! Both sides are reduced to binary contour patterns (Canny edges, traced
//! boundaries, a centered fixed-size rasterization), then a discrete
//! scale/rotation/translation grid is searched for the transform that
//! maximizes IoU of the two patterns. The [`matcher::Matcher`] facade runs
//! the pipeline for one query against N references and returns a ranked
//! list; [`extract::extract_contours`] is exposed separately for preview
//! callers.

pub mod contour;
pub mod descriptor;
pub mod extract;
pub mod grid;
pub mod matcher;
pub mod pattern;
pub mod raster;
pub mod search;
pub mod util;

mod kernel;

pub use contour::{Contour, ContourSet};
pub use extract::{canny_thresholds, extract_contours, ExtractorConfig};
pub use matcher::{
    CandidateLocation, MatchConfig, MatchMode, MatchOutcome, Matcher, RankedMatches, TileProvider,
};
pub use pattern::Pattern;
pub use raster::Raster;
pub use search::{Alignment, SearchParams, Transform};
pub use util::{AeroMatchError, AeroMatchResult};
