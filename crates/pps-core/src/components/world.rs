//! World Components
//!
//! The square domain agents move in and how its edges are handled.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Default side length of the domain
pub const DEFAULT_DOMAIN_SIZE: f64 = 750.0;

/// Default correction applied to an out-of-range coordinate
pub const DEFAULT_BOUNDARY_QUANTUM: f64 = 5.0;

/// How coordinates that leave the domain are brought back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Shift an out-of-range coordinate by a fixed quantum back toward the
    /// domain. Only lands inside when one step moves less than `quantum`.
    Nudge { quantum: f64 },
    /// Exact toroidal wrap (modulo the domain size)
    Wrap,
}

impl Default for BoundaryMode {
    fn default() -> Self {
        BoundaryMode::Nudge {
            quantum: DEFAULT_BOUNDARY_QUANTUM,
        }
    }
}

/// Square simulation domain `[0, size)²`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub size: f64,
    pub boundary: BoundaryMode,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            size: DEFAULT_DOMAIN_SIZE,
            boundary: BoundaryMode::default(),
        }
    }
}

impl Domain {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryMode) -> Self {
        self.boundary = boundary;
        self
    }

    /// Whether `point` lies in `[0, size)²`.
    pub fn contains(&self, point: Point) -> bool {
        (0.0..self.size).contains(&point.x) && (0.0..self.size).contains(&point.y)
    }

    /// Uniformly sample a point in the domain.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(rng.gen_range(0.0..self.size), rng.gen_range(0.0..self.size))
    }

    /// Apply the boundary rule to each coordinate independently.
    pub fn confine(&self, point: Point) -> Point {
        Point::new(self.confine_axis(point.x), self.confine_axis(point.y))
    }

    fn confine_axis(&self, value: f64) -> f64 {
        match self.boundary {
            BoundaryMode::Nudge { quantum } => {
                if value < 0.0 {
                    value + quantum
                } else if value >= self.size {
                    value - quantum
                } else {
                    value
                }
            }
            BoundaryMode::Wrap => {
                let wrapped = value.rem_euclid(self.size);
                // rem_euclid can round up to exactly `size` for tiny negatives
                if wrapped >= self.size {
                    0.0
                } else {
                    wrapped
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_domain() {
        let domain = Domain::default();
        assert_eq!(domain.size, 750.0);
        assert_eq!(domain.boundary, BoundaryMode::Nudge { quantum: 5.0 });
    }

    #[test]
    fn test_contains() {
        let domain = Domain::new(100.0);
        assert!(domain.contains(Point::new(0.0, 0.0)));
        assert!(domain.contains(Point::new(99.9, 50.0)));
        assert!(!domain.contains(Point::new(100.0, 50.0)));
        assert!(!domain.contains(Point::new(50.0, -0.1)));
    }

    #[test]
    fn test_nudge_is_not_modulo() {
        let domain = Domain::new(100.0);

        let p = domain.confine(Point::new(-1.0, 101.0));
        assert_eq!(p, Point::new(4.0, 96.0));

        // Exactly at the far edge counts as outside
        let p = domain.confine(Point::new(100.0, 0.0));
        assert_eq!(p, Point::new(95.0, 0.0));

        // Too far out stays out
        let p = domain.confine(Point::new(-20.0, 50.0));
        assert!(!domain.contains(p));
    }

    #[test]
    fn test_wrap_is_modulo() {
        let domain = Domain::new(100.0).with_boundary(BoundaryMode::Wrap);

        let p = domain.confine(Point::new(-1.0, 101.0));
        assert!((p.x - 99.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);

        let p = domain.confine(Point::new(-1e-18, 350.0));
        assert!(domain.contains(p));
        assert!((p.y - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_points_inside() {
        let domain = Domain::new(30.0);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(domain.contains(domain.random_point(&mut rng)));
        }
    }
}
