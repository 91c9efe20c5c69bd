//! Error types for aeromatch.

use thiserror::Error;

/// Result alias for aeromatch operations.
pub type AeroMatchResult<T> = std::result::Result<T, AeroMatchError>;

/// Errors that can occur when running the matching engine.
#[derive(Debug, Error)]
pub enum AeroMatchError {
    /// A raster was constructed with zero or overflowing dimensions.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer does not match its declared dimensions.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// An image file could not be read or decoded.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
    /// A configuration knob is outside its accepted range.
    #[error("config out of range: {param} ({reason})")]
    ConfigOutOfRange {
        param: &'static str,
        reason: &'static str,
    },
    /// A candidate record carries coordinates outside WGS84 bounds.
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    /// A tile provider failed to produce a reference tile.
    #[error("tile fetch failed at ({lat}, {lon}): {reason}")]
    TileFetch { lat: f64, lon: f64, reason: String },
}
