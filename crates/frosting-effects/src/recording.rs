//! Headless surface that records draw calls.

use kurbo::Size;
use serde::Serialize;

use crate::surface::{Glyph, Paint, Path, Surface};

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    Clear,
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { angle: f64 },
    SetAlpha { alpha: f64 },
    FillPath { path: Path, paint: Paint },
    Glyph { glyph: Glyph },
}

/// Surface double that keeps every call for later assertion or dumping.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Option<Size>,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size: Some(size),
            calls: Vec::new(),
        }
    }

    /// A surface whose drawing context cannot be obtained.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Attach or detach the drawing context.
    pub fn set_available(&mut self, size: Option<Size>) {
        self.size = size;
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of path fills recorded so far.
    pub fn fill_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillPath { .. }))
            .count()
    }

    /// Number of glyphs recorded so far.
    pub fn glyph_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Glyph { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Option<Size> {
        self.size
    }

    fn resize(&mut self, size: Size) {
        if self.size.is_some() {
            self.size = Some(size);
        }
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(DrawCall::Translate { dx, dy });
    }

    fn rotate(&mut self, angle: f64) {
        self.calls.push(DrawCall::Rotate { angle });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.calls.push(DrawCall::SetAlpha { alpha });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.calls.push(DrawCall::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn draw_glyph(&mut self, glyph: &Glyph) {
        self.calls.push(DrawCall::Glyph { glyph: *glyph });
    }
}

#[cfg(test)]
mod tests {
    use frosting_core::Rgba;
    use kurbo::Point;

    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new(Size::new(10.0, 10.0));
        surface.clear();
        surface.save();
        surface.fill_path(
            &Path::circle(Point::ORIGIN, 1.0),
            &Paint::Solid(Rgba::WHITE),
        );
        surface.restore();
        assert_eq!(surface.calls().len(), 4);
        assert_eq!(surface.fill_count(), 1);
        assert_eq!(surface.take_calls()[0], DrawCall::Clear);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_unavailable_ignores_resize() {
        let mut surface = RecordingSurface::unavailable();
        surface.resize(Size::new(5.0, 5.0));
        assert_eq!(surface.size(), None);
    }

    #[test]
    fn test_serializes_with_op_tag() {
        let json = serde_json::to_string(&DrawCall::SetAlpha { alpha: 0.5 }).unwrap();
        assert_eq!(json, r#"{"op":"set_alpha","alpha":0.5}"#);
    }
}
