//! Contour geometry.
//!
//! A `Contour` is an ordered polyline traced along the boundary of a
//! connected edge component, in source-image pixel coordinates. Derived
//! quantities (shoelace area, closed perimeter, bounding box, centroid)
//! treat the polyline as a closed polygon, which is how both the filter
//! stage and the shape descriptors consume it.

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned bounding box over contour points, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Width in pixels (at least 1 for a non-empty contour).
    pub fn width(&self) -> i64 {
        i64::from(self.max_x) - i64::from(self.min_x) + 1
    }

    /// Height in pixels (at least 1 for a non-empty contour).
    pub fn height(&self) -> i64 {
        i64::from(self.max_y) - i64::from(self.min_y) + 1
    }

    /// Geometric center of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (f64::from(self.min_x) + f64::from(self.max_x)) / 2.0,
            (f64::from(self.min_y) + f64::from(self.max_y)) / 2.0,
        )
    }

    fn merge(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Closed polyline in image coordinates.
#[derive(Clone, Debug)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Creates a contour from an ordered point sequence.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Returns the ordered boundary points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of boundary points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the contour has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed polygon area via the shoelace formula.
    ///
    /// The sign encodes winding order; use [`Contour::area`] for the
    /// magnitude the filters and descriptors work with.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += f64::from(a.x) * f64::from(b.y) - f64::from(b.x) * f64::from(a.y);
        }
        acc * 0.5
    }

    /// Absolute polygon area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Closed perimeter: sum of segment lengths including the closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut acc = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let dx = f64::from(b.x - a.x);
            let dy = f64::from(b.y - a.y);
            acc += (dx * dx + dy * dy).sqrt();
        }
        acc
    }

    /// Tight bounding box, or `None` for an empty contour.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bbox = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &self.points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    /// Mean of the boundary points, or `None` for an empty contour.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let mut sx = 0.0f64;
        let mut sy = 0.0f64;
        for p in &self.points {
            sx += f64::from(p.x);
            sy += f64::from(p.y);
        }
        let n = self.points.len() as f64;
        Some((sx / n, sy / n))
    }
}

/// All contours extracted from one raster, with the source dimensions the
/// area filter was evaluated against.
#[derive(Clone, Debug)]
pub struct ContourSet {
    contours: Vec<Contour>,
    source_width: usize,
    source_height: usize,
}

impl ContourSet {
    /// Creates a set from already-extracted contours.
    pub fn new(contours: Vec<Contour>, source_width: usize, source_height: usize) -> Self {
        Self {
            contours,
            source_width,
            source_height,
        }
    }

    /// Returns the extracted contours.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Number of contours in the set.
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Returns true if no contour survived extraction.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Width of the source raster.
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    /// Height of the source raster.
    pub fn source_height(&self) -> usize {
        self.source_height
    }

    /// Bounding box over every point of every contour.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.contours
            .iter()
            .filter_map(Contour::bounding_box)
            .reduce(BoundingBox::merge)
    }
}

#[cfg(test)]
mod tests {
    use super::{Contour, ContourSet, Point};

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Contour {
        Contour::new(vec![
            Point { x: x0, y: y0 },
            Point { x: x1, y: y0 },
            Point { x: x1, y: y1 },
            Point { x: x0, y: y1 },
        ])
    }

    #[test]
    fn rectangle_area_and_perimeter() {
        let c = rect(0, 0, 10, 6);
        assert!((c.area() - 60.0).abs() < 1e-9);
        assert!((c.perimeter() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn winding_order_flips_signed_area_only() {
        let cw = Contour::new(vec![
            Point { x: 0, y: 0 },
            Point { x: 0, y: 6 },
            Point { x: 10, y: 6 },
            Point { x: 10, y: 0 },
        ]);
        assert!((cw.signed_area() + 60.0).abs() < 1e-9);
        assert!((cw.area() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn set_bounding_box_spans_all_contours() {
        let set = ContourSet::new(vec![rect(2, 3, 5, 7), rect(10, 1, 14, 4)], 32, 32);
        let bbox = set.bounding_box().unwrap();
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (2, 1, 14, 7));
        assert_eq!(bbox.width(), 13);
        assert_eq!(bbox.height(), 7);
    }

    #[test]
    fn centroid_is_the_vertex_mean() {
        let c = rect(0, 0, 10, 6);
        let (cx, cy) = c.centroid().unwrap();
        assert!((cx - 5.0).abs() < 1e-9);
        assert!((cy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_contours_have_zero_area() {
        let segment = Contour::new(vec![Point { x: 0, y: 0 }, Point { x: 5, y: 0 }]);
        assert_eq!(segment.signed_area(), 0.0);
        assert!((segment.perimeter() - 10.0).abs() < 1e-9);
        assert!(Contour::new(Vec::new()).bounding_box().is_none());
    }
}
