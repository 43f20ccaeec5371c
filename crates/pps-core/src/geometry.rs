//! Geometry
//!
//! Plane points and the angle helpers shared by agents and sensing.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// A point on the simulation plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset from this point to `other`.
    pub fn delta_to(&self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance_squared(&self, other: Point) -> f64 {
        let (dx, dy) = self.delta_to(other);
        dx * dx + dy * dy
    }

    /// Absolute bearing from this point toward `other`, as atan2(dy, dx).
    pub fn bearing_to(&self, other: Point) -> f64 {
        let (dx, dy) = self.delta_to(other);
        dy.atan2(dx)
    }
}

/// Normalize an angle into (-pi, pi].
///
/// Non-finite input is returned unchanged.
pub fn fix_angle(mut angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    while angle <= -PI {
        angle += TAU;
    }
    while angle > PI {
        angle -= TAU;
    }
    angle
}

/// Signed angle from `heading` to `bearing`, normalized into (-pi, pi].
pub fn relative_angle(heading: f64, bearing: f64) -> f64 {
    fix_angle(fix_angle(bearing) - heading)
}

/// Which side of an observer a neighbor lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Strictly positive relative angles are Right; zero and negative are Left.
    pub fn from_relative_angle(angle: f64) -> Self {
        if angle > 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Classify `neighbor` as seen from `observer` facing `heading`.
    pub fn classify(observer: Point, heading: f64, neighbor: Point) -> Self {
        Self::from_relative_angle(relative_angle(heading, observer.bearing_to(neighbor)))
    }
}
