//! Planar geometry for the arena.
//!
//! Coordinates are `f64` in arena units with the origin at the centre of the
//! world, `+x` to the right and `+y` up.  Headings and bearings are in degrees,
//! measured counter-clockwise from `+x`, and always normalised to `[0, 360)`.

use rand::Rng;

/// Bring any angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if h >= 360.0 { 0.0 } else { h }
}

/// Absolute bearing from `from` to `to` in `[0, 360)`.
#[inline]
pub fn bearing_deg(from: Point, to: Point) -> f64 {
    normalize_heading((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

// ── Point ─────────────────────────────────────────────────────────────────────

/// A position in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `true` when both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// The point reached by travelling `distance` along `heading_deg`.
    /// Negative distances travel backwards.
    #[inline]
    pub fn advanced(self, heading_deg: f64, distance: f64) -> Point {
        let rad = heading_deg.to_radians();
        Point::new(self.x + distance * rad.cos(), self.y + distance * rad.sin())
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Axis ──────────────────────────────────────────────────────────────────────

/// Which coordinate left the world when a boundary is crossed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// `x` left `[min_x, max_x]`.
    Horizontal,
    /// `y` left `[min_y, max_y]`.
    Vertical,
}

impl Axis {
    /// Heading after bouncing off a wall perpendicular to this axis.
    ///
    /// - horizontal violation: `360 - (h + 180)`
    /// - vertical violation:   `360 - h`
    ///
    /// both reduced modulo 360.
    #[inline]
    pub fn reflect(self, heading_deg: f64) -> f64 {
        match self {
            Axis::Horizontal => normalize_heading(360.0 - (heading_deg + 180.0)),
            Axis::Vertical   => normalize_heading(360.0 - heading_deg),
        }
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Rectangular world limits, fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// A `width × height` world centred on the origin.
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            min_x: -width / 2.0,
            max_x:  width / 2.0,
            min_y: -height / 2.0,
            max_y:  height / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Strictly inside the world (points on the boundary line are outside).
    #[inline]
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.min_x && p.x < self.max_x && p.y > self.min_y && p.y < self.max_y
    }

    /// Inside the world or on its boundary.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Uniformly random point in the world.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let x = self.min_x + rng.r#gen::<f64>() * self.width();
        let y = self.min_y + rng.r#gen::<f64>() * self.height();
        Point::new(x, y)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::centered(700.0, 700.0)
    }
}
