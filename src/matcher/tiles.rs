//! Reference tile acquisition interface.
//!
//! The engine does not fetch imagery itself; callers hand it a provider
//! that turns a coordinate into an RGB raster. The facade passes a fixed
//! ground width so every tile arrives at a comparable ground-sample
//! distance to the query photograph.

use crate::raster::Raster;
use crate::util::{AeroMatchError, AeroMatchResult};

/// One candidate coordinate handed to the facade by a front end.
#[derive(Clone, Debug)]
pub struct CandidateLocation {
    /// Latitude in degrees, `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub lon: f64,
    /// Optional human-readable label, echoed through to results.
    pub description: Option<String>,
}

impl CandidateLocation {
    /// Rejects coordinates outside WGS84 bounds.
    pub fn validate(&self) -> AeroMatchResult<()> {
        if !(-90.0..=90.0).contains(&self.lat)
            || !(-180.0..=180.0).contains(&self.lon)
            || !self.lat.is_finite()
            || !self.lon.is_finite()
        {
            return Err(AeroMatchError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            });
        }
        Ok(())
    }
}

/// Source of satellite reference tiles.
///
/// `width_m` is the ground width the tile should cover; `pixels` its square
/// pixel size. Implementations report failures as
/// [`AeroMatchError::TileFetch`]; the facade degrades those to flagged
/// outcomes instead of aborting the run.
pub trait TileProvider {
    fn fetch_tile(
        &self,
        lat: f64,
        lon: f64,
        width_m: f64,
        pixels: u32,
    ) -> AeroMatchResult<Raster>;
}

#[cfg(test)]
mod tests {
    use super::CandidateLocation;

    fn location(lat: f64, lon: f64) -> CandidateLocation {
        CandidateLocation {
            lat,
            lon,
            description: None,
        }
    }

    #[test]
    fn wgs84_bounds_are_enforced() {
        assert!(location(48.8584, 2.2945).validate().is_ok());
        assert!(location(90.0, -180.0).validate().is_ok());
        assert!(location(90.5, 0.0).validate().is_err());
        assert!(location(0.0, 180.5).validate().is_err());
        assert!(location(f64::NAN, 0.0).validate().is_err());
    }
}
