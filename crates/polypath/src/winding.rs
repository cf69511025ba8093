//! Crossing and winding-number tests against a closed ring.
//!
//! The ring is the exterior of a `ClosedPath`: a coordinate slice whose last
//! element repeats the first. Self-intersecting rings are allowed; how their
//! overlapping lobes count is decided by the [`FillRule`].

use geo::{Coord, Intersects, Line};

/// Rule deciding which winding numbers count as "inside".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside wherever the ring winds around the point at least once.
    #[default]
    NonZero,
    /// Inside wherever a ray from the point crosses the ring an odd number of times.
    EvenOdd,
}

impl FillRule {
    pub fn to_str(&self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

/// Crossing tallies of a horizontal ray cast from a point towards +x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crossings {
    /// Signed sum: +1 for each upward crossing, -1 for each downward one.
    pub winding: i32,
    /// Unsigned number of crossings.
    pub count: u32,
}

impl Crossings {
    /// Apply a fill rule to the tallies.
    #[inline]
    pub fn is_inside(&self, rule: FillRule) -> bool {
        match rule {
            FillRule::NonZero => self.winding != 0,
            FillRule::EvenOdd => self.count % 2 == 1,
        }
    }
}

/// Twice the signed area of the triangle (a, b, p): > 0 when p is left of a -> b.
#[inline]
fn is_left(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

/// Cast a ray from `p` and tally the edges of `ring` it crosses.
///
/// Half-open edge rule (Sunday): an upward edge includes its start and
/// excludes its end, a downward edge the reverse, so vertices on the ray are
/// counted exactly once.
pub fn crossings(ring: &[Coord<f64>], p: Coord<f64>) -> Crossings {
    let mut tally = Crossings::default();
    for w in ring.windows(2) {
        let (a, b) = (w[0], w[1]);
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > 0.0 {
                tally.winding += 1;
                tally.count += 1;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0.0 {
            tally.winding -= 1;
            tally.count += 1;
        }
    }
    tally
}

/// True if `p` lies exactly on one of the ring's edges (vertices included).
pub fn on_boundary(ring: &[Coord<f64>], p: Coord<f64>) -> bool {
    ring.windows(2).any(|w| Line::new(w[0], w[1]).intersects(&p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        let mut coords: Vec<Coord<f64>> = pts.iter().map(|&(x, y)| Coord { x, y }).collect();
        coords.push(coords[0]);
        coords
    }

    #[test]
    fn ccw_square_winds_positive() {
        let sq = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let c = crossings(&sq, Coord { x: 0.5, y: 0.5 });
        assert_eq!(c.winding, 1);
        assert_eq!(c.count, 1);
    }

    #[test]
    fn cw_square_winds_negative() {
        let sq = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let c = crossings(&sq, Coord { x: 0.5, y: 0.5 });
        assert_eq!(c.winding, -1);
        assert!(c.is_inside(FillRule::NonZero));
        assert!(c.is_inside(FillRule::EvenOdd));
    }

    #[test]
    fn outside_point_has_no_net_winding() {
        let sq = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let c = crossings(&sq, Coord { x: -0.5, y: 0.5 });
        assert_eq!(c.winding, 0);
        assert_eq!(c.count % 2, 0);
    }

    #[test]
    fn doubly_wound_ring_differs_between_rules() {
        // Pentagram traced as one ring: the central pentagon is wound twice.
        let star = ring(&[
            (0.0, 3.0),
            (1.76, -2.43),
            (-2.85, 0.93),
            (2.85, 0.93),
            (-1.76, -2.43),
        ]);
        let c = crossings(&star, Coord { x: 0.0, y: 0.0 });
        assert!(c.is_inside(FillRule::NonZero));
        assert!(!c.is_inside(FillRule::EvenOdd));
    }

    #[test]
    fn boundary_detection_includes_vertices_and_edges() {
        let sq = ring(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert!(on_boundary(&sq, Coord { x: 0.0, y: 0.0 }));
        assert!(on_boundary(&sq, Coord { x: 1.0, y: 0.0 }));
        assert!(on_boundary(&sq, Coord { x: 2.0, y: 1.5 }));
        assert!(!on_boundary(&sq, Coord { x: 1.0, y: 1.0 }));
        assert!(!on_boundary(&sq, Coord { x: 3.0, y: 0.0 }));
    }

    #[test]
    fn fill_rule_names() {
        assert_eq!(FillRule::default(), FillRule::NonZero);
        assert_eq!(FillRule::EvenOdd.to_str(), "evenodd");
    }
}
