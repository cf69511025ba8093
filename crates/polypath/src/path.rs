use std::fmt;

use geo::{BoundingRect, Coord, LineString, Rect};

use crate::winding::{self, FillRule};

/// Batches at least this large are split across the rayon pool when the
/// `parallel` feature is enabled.
pub const PARALLEL_THRESHOLD: usize = 4096;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when constructing a `ClosedPath`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// Fewer than three distinct vertices were supplied.
    TooFewVertices(usize),
    /// A vertex coordinate is NaN or infinite.
    NonFinite { index: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::TooFewVertices(n) => write!(f, "a closed path needs at least 3 vertices, got {n}"),
            PathError::NonFinite { index } => write!(f, "vertex {index} is not finite"),
        }
    }
}

impl std::error::Error for PathError {}

// ---------------------------------------------------------------------------
// ClosedPath
// ---------------------------------------------------------------------------

/// An immutable closed polygon ring in some local 2-D coordinate space.
///
/// The ring is closed on construction (the first vertex is repeated at the
/// end if needed) and never mutated afterwards. Containment counts points on
/// the boundary as inside.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPath {
    ring: LineString<f64>,
    bounds: Rect<f64>,
    fill_rule: FillRule,
}

impl ClosedPath {
    /// Build a closed path from an ordered vertex sequence.
    pub fn new<I, C>(vertices: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Coord<f64>>,
    {
        let mut coords: Vec<Coord<f64>> = vertices.into_iter().map(Into::into).collect();

        if let Some(index) = coords.iter().position(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(PathError::NonFinite { index });
        }

        /// Ensure first and last are the same
        fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
            if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
                if first != last { coords.push(first) }
            }
        }
        coords.dedup();
        ensure_closed(&mut coords);

        let distinct = coords.len().saturating_sub(1);
        if distinct < 3 { return Err(PathError::TooFewVertices(distinct)) }

        let ring = LineString(coords);
        let bounds = ring.bounding_rect()
            .ok_or(PathError::TooFewVertices(0))?;

        Ok(Self { ring, bounds, fill_rule: FillRule::default() })
    }

    /// Replace the fill rule used for containment.
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// The closed vertex ring (last vertex repeats the first).
    #[inline] pub fn vertices(&self) -> &[Coord<f64>] { &self.ring.0 }

    /// The closed ring as a `geo::LineString`.
    #[inline] pub fn ring(&self) -> &LineString<f64> { &self.ring }

    /// Number of distinct vertices (the closing duplicate is not counted).
    #[inline] pub fn len(&self) -> usize { self.ring.0.len() - 1 }

    /// Always false: a valid path has at least three vertices.
    #[inline] pub fn is_empty(&self) -> bool { false }

    /// Axis-aligned bounding rectangle of the ring.
    #[inline] pub fn bounds(&self) -> Rect<f64> { self.bounds }

    #[inline] pub fn fill_rule(&self) -> FillRule { self.fill_rule }

    /// Vertices as plain `[x, y]` pairs, closing vertex included.
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.ring.0.iter().map(|c| [c.x, c.y]).collect()
    }

    /// Test a single point: inside or on the boundary.
    pub fn contains_point(&self, p: Coord<f64>) -> bool {
        if !p.x.is_finite() || !p.y.is_finite() { return false }

        let (min, max) = (self.bounds.min(), self.bounds.max());
        if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y { return false }

        winding::on_boundary(&self.ring.0, p)
            || winding::crossings(&self.ring.0, p).is_inside(self.fill_rule)
    }

    /// Test a batch of points. The output has one entry per input point, in
    /// input order.
    pub fn contains_points(&self, points: &[Coord<f64>]) -> Vec<bool> {
        #[cfg(feature = "parallel")]
        {
            if points.len() >= PARALLEL_THRESHOLD {
                use rayon::prelude::*;
                return points.par_iter().map(|&p| self.contains_point(p)).collect();
            }
        }
        points.iter().map(|&p| self.contains_point(p)).collect()
    }

    /// Same as `contains_points`, for `[x, y]` pairs.
    pub fn contains_pairs(&self, points: &[[f64; 2]]) -> Vec<bool> {
        let coords: Vec<Coord<f64>> = points.iter().map(|&[x, y]| Coord { x, y }).collect();
        self.contains_points(&coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ring_is_closed() {
        let path = ClosedPath::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.vertices().first(), path.vertices().last());
        assert_eq!(path.vertices().len(), 4);
    }

    #[test]
    fn closed_ring_is_kept_as_is() {
        let path = ClosedPath::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_pairs(), vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn too_few_vertices() {
        assert_eq!(ClosedPath::new([(0.0, 0.0), (1.0, 0.0)]), Err(PathError::TooFewVertices(2)));
        assert_eq!(
            ClosedPath::new(Vec::<(f64, f64)>::new()),
            Err(PathError::TooFewVertices(0))
        );
    }

    #[test]
    fn repeated_vertices_do_not_count() {
        assert_eq!(ClosedPath::new([(0.0, 0.0); 4]), Err(PathError::TooFewVertices(0)));
        assert_eq!(
            ClosedPath::new([(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 0.0)]),
            Err(PathError::TooFewVertices(2))
        );

        let path = ClosedPath::new([(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_pairs(), vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn non_finite_vertex() {
        let err = ClosedPath::new([(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]).unwrap_err();
        assert_eq!(err, PathError::NonFinite { index: 1 });
    }

    #[test]
    fn nan_point_is_outside() {
        let path = ClosedPath::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(!path.contains_point(Coord { x: f64::NAN, y: 0.5 }));
    }

    #[test]
    fn empty_batch() {
        let path = ClosedPath::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(path.contains_points(&[]).is_empty());
        assert!(path.contains_pairs(&[]).is_empty());
    }
}
