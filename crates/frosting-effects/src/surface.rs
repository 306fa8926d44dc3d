//! Drawing surface interface and the primitives passed through it.

use std::f64::consts::TAU;

use frosting_core::Rgba;
use kurbo::{Point, Rect, Size};
use serde::Serialize;

/// Segments used to approximate a full circle.
const CIRCLE_SEGMENTS: usize = 48;

/// A 2D drawing surface sized to the viewport.
///
/// Transform and alpha state behave like a canvas context: `save` pushes
/// both, `restore` pops them, and every primitive is drawn through them.
pub trait Surface {
    /// Current logical dimensions, or `None` when no drawing context is available.
    fn size(&self) -> Option<Size>;
    fn resize(&mut self, size: Size);
    /// Clear the whole surface to transparent.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    /// Rotate by `angle` radians.
    fn rotate(&mut self, angle: f64);
    /// Set the global alpha applied to subsequent fills and glyphs.
    fn set_alpha(&mut self, alpha: f64);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn draw_glyph(&mut self, glyph: &Glyph);
    /// Finish the frame's drawing. Buffered backends rasterize here.
    fn present(&mut self) {}
}

/// A set of closed polygons. Every subpath is implicitly closed when filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Path {
    subpaths: Vec<Vec<Point>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.subpaths.push(vec![p]);
        self
    }

    /// Extend the current subpath, starting one if none is open.
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        match self.subpaths.last_mut() {
            Some(current) => current.push(p),
            None => self.subpaths.push(vec![p]),
        }
        self
    }

    /// Polygon through `points`.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            subpaths: vec![points.into_iter().collect()],
        }
    }

    pub fn rect(rect: Rect) -> Self {
        Self::polygon([
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ])
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self::polygon((0..CIRCLE_SEGMENTS).map(|i| {
            let angle = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
            Point::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
            )
        }))
    }

    pub fn subpaths(&self) -> &[Vec<Point>] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(Vec::is_empty)
    }
}

/// A color stop along a gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

impl GradientStop {
    pub fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Fill style for a path. Coordinates are in the space the path is drawn in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

/// A symbolic glyph drawn centered on `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glyph {
    pub position: Point,
    pub symbol: char,
    /// Font size in logical pixels, before `scale`.
    pub size: f64,
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Tint, or `None` for the glyph's own colors.
    pub color: Option<Rgba>,
    pub opacity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_builder() {
        let mut path = Path::new();
        path.line_to(Point::new(1.0, 1.0))
            .move_to(Point::new(5.0, 5.0))
            .line_to(Point::new(6.0, 5.0));
        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[1].len(), 2);
        assert_eq!(Path::circle(Point::ORIGIN, 1.0).subpaths()[0].len(), 48);
        assert!(Path::new().is_empty());
    }
}
