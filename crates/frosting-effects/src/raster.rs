//! Raster surface backed by `vello_cpu`.
//!
//! Paths and paints are handed to a [`vello_cpu::RenderContext`] and
//! rendered into a [`vello_cpu::Pixmap`] on [`Surface::present`]. Glyphs are
//! not rasterized; they are collected with their device position so a text
//! backend can place them.

use std::fmt;

use frosting_core::Rgba;
use kurbo::{Affine, Size};
use vello_cpu::peniko::{self, ColorStop};

use crate::surface::{Glyph, GradientStop, Paint, Path, Surface};

/// A glyph resolved to device pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub x: f64,
    pub y: f64,
    pub glyph: Glyph,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine,
    alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Render target sized in device pixels. Absent while either side is zero.
struct Target {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

/// RGBA pixel buffer with a uniform logical-to-device scale.
pub struct RasterSurface {
    width: usize,
    height: usize,
    /// Device pixels per logical unit.
    scale: f64,
    target: Option<Target>,
    glyphs: Vec<PlacedGlyph>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("glyphs", &self.glyphs.len())
            .finish_non_exhaustive()
    }
}

fn target(width: usize, height: usize) -> Option<Target> {
    let w = u16::try_from(width).ok().filter(|w| *w > 0)?;
    let h = u16::try_from(height).ok().filter(|h| *h > 0)?;
    Some(Target {
        ctx: vello_cpu::RenderContext::new(w, h),
        pixmap: vello_cpu::Pixmap::new(w, h),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn color_to_cpu(c: Rgba) -> peniko::Color {
    peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn path_to_cpu(path: &Path) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for subpath in path.subpaths().iter().filter(|sp| sp.len() >= 3) {
        out.move_to(point_to_cpu(subpath[0]));
        for p in &subpath[1..] {
            out.line_to(point_to_cpu(*p));
        }
        out.close_path();
    }
    out
}

fn stops_to_cpu(stops: &[GradientStop]) -> Vec<ColorStop> {
    stops
        .iter()
        .map(|s| ColorStop::from((s.offset.clamp(0.0, 1.0) as f32, color_to_cpu(s.color))))
        .collect()
}

/// Set `paint` on the context. Returns `false` when nothing would be drawn.
///
/// Degenerate gradients collapse to the stop a zero-length axis lands on.
fn set_paint(ctx: &mut vello_cpu::RenderContext, paint: &Paint) -> bool {
    match paint {
        Paint::Solid(color) => ctx.set_paint(color_to_cpu(*color)),
        Paint::Linear { start, end, stops } => {
            let Some(first) = stops.first() else {
                return false;
            };
            if stops.len() == 1 || start.distance(*end) <= f64::EPSILON {
                ctx.set_paint(color_to_cpu(first.color));
            } else {
                let gradient =
                    peniko::Gradient::new_linear(point_to_cpu(*start), point_to_cpu(*end))
                        .with_stops(stops_to_cpu(stops).as_slice());
                ctx.set_paint(gradient);
            }
        }
        Paint::Radial {
            center,
            radius,
            stops,
        } => {
            let Some(last) = stops.last() else {
                return false;
            };
            if stops.len() == 1 || *radius <= 0.0 {
                ctx.set_paint(color_to_cpu(last.color));
            } else {
                let gradient =
                    peniko::Gradient::new_radial(point_to_cpu(*center), *radius as f32)
                        .with_stops(stops_to_cpu(stops).as_slice());
                ctx.set_paint(gradient);
            }
        }
    }
    true
}

/// Straight-alpha color of a premultiplied RGBA8 pixel.
fn unpremultiply(px: &[u8]) -> Rgba {
    let a = px[3];
    if a == 0 {
        return Rgba::TRANSPARENT;
    }
    let a16 = u16::from(a);
    let channel = |c: u8| ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8;
    Rgba::new(channel(px[0]), channel(px[1]), channel(px[2]), a)
}

impl RasterSurface {
    /// Create a surface of `width` x `height` device pixels.
    pub fn new(width: usize, height: usize, scale: f64) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Self {
            width,
            height,
            scale,
            target: target(width, height),
            glyphs: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel at `(x, y)` as of the last [`present`](Surface::present), or
    /// `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let Some(target) = &self.target else {
            return Some(Rgba::TRANSPARENT);
        };
        let idx = (y * self.width + x) * 4;
        target
            .pixmap
            .data_as_u8_slice()
            .get(idx..idx + 4)
            .map(unpremultiply)
    }

    pub fn glyphs(&self) -> &[PlacedGlyph] {
        &self.glyphs
    }

    /// Resize the device buffer directly, discarding its contents.
    pub fn resize_pixels(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.target = target(width, height);
        self.glyphs.clear();
    }

    fn device_transform(&self) -> Affine {
        Affine::scale(self.scale) * self.state.transform
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Option<Size> {
        Some(Size::new(
            self.width as f64 / self.scale,
            self.height as f64 / self.scale,
        ))
    }

    fn resize(&mut self, size: Size) {
        let width = (size.width.max(0.0) * self.scale).round() as usize;
        let height = (size.height.max(0.0) * self.scale).round() as usize;
        self.resize_pixels(width, height);
    }

    fn clear(&mut self) {
        if let Some(target) = &mut self.target {
            target.ctx.reset();
            target.pixmap.data_as_u8_slice_mut().fill(0);
        }
        self.glyphs.clear();
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform *= Affine::translate((dx, dy));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform *= Affine::rotate(angle);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let alpha = self.state.alpha;
        let transform = self.device_transform();
        let Some(target) = &mut self.target else {
            return;
        };
        if alpha <= 0.0 {
            return;
        }
        let path = path_to_cpu(path);
        if path.elements().is_empty() {
            return;
        }

        let ctx = &mut target.ctx;
        if !set_paint(ctx, paint) {
            return;
        }
        ctx.set_blend_mode(peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        if alpha < 1.0 {
            ctx.push_opacity_layer(alpha as f32);
        }
        ctx.fill_path(&path);
        if alpha < 1.0 {
            ctx.pop_layer();
        }
    }

    fn draw_glyph(&mut self, glyph: &Glyph) {
        let at = self.device_transform() * glyph.position;
        self.glyphs.push(PlacedGlyph {
            x: at.x,
            y: at.y,
            glyph: Glyph {
                opacity: (glyph.opacity * self.state.alpha).clamp(0.0, 1.0),
                ..*glyph
            },
        });
    }

    fn present(&mut self) {
        if let Some(target) = &mut self.target {
            target.ctx.flush();
            target.ctx.render_to_pixmap(&mut target.pixmap);
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::*;

    fn fill(surface: &mut RasterSurface, rect: Rect, paint: Paint) {
        surface.fill_path(&Path::rect(rect), &paint);
        surface.present();
    }

    #[test]
    fn test_fill_rect_covers_interior_only() {
        let mut surface = RasterSurface::new(10, 10, 1.0);
        fill(
            &mut surface,
            Rect::new(2.0, 2.0, 6.0, 6.0),
            Paint::Solid(Rgba::rgb(255, 0, 0)),
        );
        assert_eq!(surface.pixel(3, 3), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(2, 2), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(6, 6), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(1, 3), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(10, 0), None);
    }

    #[test]
    fn test_nothing_visible_before_present() {
        let mut surface = RasterSurface::new(4, 4, 1.0);
        surface.fill_path(
            &Path::rect(Rect::new(0.0, 0.0, 4.0, 4.0)),
            &Paint::Solid(Rgba::WHITE),
        );
        assert_eq!(surface.pixel(1, 1), Some(Rgba::TRANSPARENT));
        surface.present();
        assert_eq!(surface.pixel(1, 1), Some(Rgba::WHITE));
        surface.clear();
        surface.present();
        assert_eq!(surface.pixel(1, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_scale_maps_logical_units() {
        let mut surface = RasterSurface::new(20, 20, 0.5);
        assert_eq!(surface.size(), Some(Size::new(40.0, 40.0)));
        fill(
            &mut surface,
            Rect::new(0.0, 0.0, 4.0, 4.0),
            Paint::Solid(Rgba::WHITE),
        );
        assert_eq!(surface.pixel(1, 1), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_alpha_and_state_stack() {
        let mut surface = RasterSurface::new(4, 4, 1.0);
        surface.save();
        surface.set_alpha(0.5);
        surface.translate(2.0, 0.0);
        surface.fill_path(
            &Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            &Paint::Solid(Rgba::WHITE),
        );
        surface.restore();
        surface.fill_path(
            &Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            &Paint::Solid(Rgba::WHITE),
        );
        surface.present();

        let px = surface.pixel(2, 0).unwrap();
        assert!((126..=129).contains(&px.a), "alpha {}", px.a);
        assert_eq!(surface.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(1, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_linear_gradient_fades_to_stops() {
        let color = Rgba::rgb(255, 0, 0);
        let mut surface = RasterSurface::new(1, 100, 1.0);
        fill(
            &mut surface,
            Rect::new(0.0, 0.0, 1.0, 100.0),
            Paint::Linear {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, 100.0),
                stops: vec![
                    GradientStop::new(0.0, color.with_alpha(0)),
                    GradientStop::new(0.5, color.with_alpha(0x40)),
                    GradientStop::new(1.0, color.with_alpha(0)),
                ],
            },
        );
        let middle = surface.pixel(0, 50).unwrap();
        assert!((0x3c..=0x44).contains(&middle.a), "alpha {}", middle.a);
        assert!(surface.pixel(0, 0).unwrap().a <= 2);
        assert!(surface.pixel(0, 99).unwrap().a <= 2);
    }

    #[test]
    fn test_radial_gradient_clamps_outside_radius() {
        let mut surface = RasterSurface::new(40, 1, 1.0);
        fill(
            &mut surface,
            Rect::new(0.0, 0.0, 40.0, 1.0),
            Paint::Radial {
                center: Point::new(0.0, 0.5),
                radius: 10.0,
                stops: vec![
                    GradientStop::new(0.0, Rgba::WHITE),
                    GradientStop::new(1.0, Rgba::TRANSPARENT),
                ],
            },
        );
        assert!(surface.pixel(0, 0).unwrap().a > 230);
        assert_eq!(surface.pixel(30, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_empty_gradient_draws_nothing() {
        let mut surface = RasterSurface::new(4, 4, 1.0);
        fill(
            &mut surface,
            Rect::new(0.0, 0.0, 4.0, 4.0),
            Paint::Radial {
                center: Point::ORIGIN,
                radius: 4.0,
                stops: Vec::new(),
            },
        );
        assert_eq!(surface.pixel(1, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_glyphs_collected_and_cleared() {
        let mut surface = RasterSurface::new(8, 8, 0.5);
        surface.draw_glyph(&Glyph {
            position: Point::new(4.0, 6.0),
            symbol: '✨',
            size: 12.0,
            scale: 1.0,
            rotation: 0.0,
            color: None,
            opacity: 0.8,
        });
        assert_eq!(surface.glyphs().len(), 1);
        assert_eq!(surface.glyphs()[0].x, 2.0);
        assert_eq!(surface.glyphs()[0].y, 3.0);
        surface.clear();
        assert!(surface.glyphs().is_empty());
    }

    #[test]
    fn test_resize_uses_logical_size() {
        let mut surface = RasterSurface::new(0, 0, 0.25);
        surface.resize(Size::new(80.0, 40.0));
        assert_eq!((surface.width(), surface.height()), (20, 10));
        assert_eq!(surface.pixel(19, 9), Some(Rgba::TRANSPARENT));
    }
}
