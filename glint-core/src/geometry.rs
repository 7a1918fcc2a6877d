//! Screen-space geometry and probe point types.

use std::fmt;

use nalgebra::{Point2, Vector2};

/// An axis-aligned rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point2<f64>,
    /// Width and height.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.x
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.y
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point2<f64> {
        self.origin + self.size / 2.0
    }

    /// Position of a point relative to the rectangle, each axis clamped to
    /// `[0, 1]`. Degenerate axes map to `0`.
    pub fn relative_position(&self, point: Point2<f64>) -> Vector2<f64> {
        let axis = |offset: f64, extent: f64| {
            if extent <= 0.0 {
                0.0
            } else {
                (offset / extent).clamp(0.0, 1.0)
            }
        };
        Vector2::new(
            axis(point.x - self.origin.x, self.size.x),
            axis(point.y - self.origin.y, self.size.y),
        )
    }

    /// Five representative sample points: the center plus the 25%/75% marks
    /// on each axis. Averaging backdrops over these smooths out local noise
    /// behind wide chrome elements.
    pub fn spread(&self) -> [Point2<f64>; 5] {
        let center = self.center();
        [
            center,
            Point2::new(self.origin.x + self.size.x * 0.25, center.y),
            Point2::new(self.origin.x + self.size.x * 0.75, center.y),
            Point2::new(center.x, self.origin.y + self.size.y * 0.25),
            Point2::new(center.x, self.origin.y + self.size.y * 0.75),
        ]
    }
}

/// Identifier for a tracked probe point.
///
/// Hosts pick the naming; per-glyph probes conventionally use
/// [ProbeId::glyph] so a label and its letters stay related:
///
/// ```rust
/// use glint_core::geometry::ProbeId;
///
/// let label = ProbeId::new("nav:contact");
/// let third_letter = ProbeId::glyph("nav:contact", 2);
/// assert_eq!(third_letter.as_str(), "nav:contact:2");
/// # let _ = label;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProbeId(String);

impl ProbeId {
    /// Create a probe identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create an identifier for a single glyph of a labeled element.
    pub fn glyph(base: &str, index: usize) -> Self {
        Self(format!("{base}:{index}"))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProbeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A screen coordinate tied to a chrome element, sampled to decide its
/// local theme. Ephemeral; hosts recompute positions from element geometry
/// and feed them back before each pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbePoint {
    /// Identifier of the chrome element (or glyph) this probe belongs to.
    pub id: ProbeId,
    /// Current screen position to sample behind.
    pub position: Point2<f64>,
}

impl ProbePoint {
    /// Create a probe point.
    pub fn new(id: ProbeId, position: Point2<f64>) -> Self {
        Self { id, position }
    }
}
