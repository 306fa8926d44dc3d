//! Terminal compositing of raster layers.
//!
//! Each terminal cell shows two vertically stacked device pixels with the
//! upper half block: the top pixel as foreground, the bottom as background.
//! Glyphs are placed on top as text, one cell per glyph.

use frosting_core::Rgba;
use frosting_effects::RasterSurface;
use kurbo::{Point, Size};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
};

/// Canvas color under every layer.
pub const BASE: Rgba = Rgba::rgb(0x1a, 0x14, 0x1e);

/// Logical units per device pixel, horizontally and vertically.
pub const UNITS_PER_PIXEL: f64 = 8.0;

const HALF_BLOCK: &str = "▀";

/// Glyphs fainter than this are not drawn.
const MIN_GLYPH_OPACITY: f64 = 0.15;

/// Logical size of a surface covering `area`.
pub fn logical_size(area: Rect) -> Size {
    Size::new(
        f64::from(area.width) * UNITS_PER_PIXEL,
        f64::from(area.height) * 2.0 * UNITS_PER_PIXEL,
    )
}

/// A raster surface covering `area`, two pixels per cell.
pub fn surface_for(area: Rect) -> RasterSurface {
    RasterSurface::new(
        usize::from(area.width),
        usize::from(area.height) * 2,
        1.0 / UNITS_PER_PIXEL,
    )
}

/// Logical point at the center of the cell `(col, row)`, if it lies in `area`.
pub fn to_logical(area: Rect, col: u16, row: u16) -> Option<Point> {
    if !area.contains(Position::new(col, row)) {
        return None;
    }
    Some(Point::new(
        (f64::from(col - area.x) + 0.5) * UNITS_PER_PIXEL,
        (f64::from(row - area.y) * 2.0 + 1.0) * UNITS_PER_PIXEL,
    ))
}

/// `src` composited over an opaque `dst`.
pub fn over(dst: Rgba, src: Rgba) -> Rgba {
    dst.lerp(src.with_alpha(0xff), src.alpha_f64())
}

fn color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Opaque pixel grid the layers are flattened into.
#[derive(Debug, Clone)]
pub struct Canvas {
    area: Rect,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(area: Rect) -> Self {
        let len = usize::from(area.width) * usize::from(area.height) * 2;
        Self {
            area,
            pixels: vec![BASE; len],
        }
    }

    fn width(&self) -> usize {
        usize::from(self.area.width)
    }

    /// Pixel at canvas coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        let width = self.width();
        (x < width && y < usize::from(self.area.height) * 2).then(|| self.pixels[y * width + x])
    }

    /// Composite a layer whose surface covers `at`, clipped to the canvas.
    pub fn composite(&mut self, surface: &RasterSurface, at: Rect) {
        let clipped = at.intersection(self.area);
        if clipped.is_empty() {
            return;
        }
        let width = self.width();
        let ox = usize::from(clipped.x - at.x);
        let oy = usize::from(clipped.y - at.y) * 2;
        let cx = usize::from(clipped.x - self.area.x);
        let cy = usize::from(clipped.y - self.area.y) * 2;
        for y in 0..usize::from(clipped.height) * 2 {
            for x in 0..usize::from(clipped.width) {
                let Some(src) = surface.pixel(ox + x, oy + y) else {
                    continue;
                };
                if src.a == 0 {
                    continue;
                }
                let idx = (cy + y) * width + cx + x;
                self.pixels[idx] = over(self.pixels[idx], src);
            }
        }
    }

    /// Half-block lines, one per terminal row.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let width = self.width();
        (0..usize::from(self.area.height))
            .map(|row| {
                let top = &self.pixels[row * 2 * width..(row * 2 + 1) * width];
                let bottom = &self.pixels[(row * 2 + 1) * width..(row * 2 + 2) * width];
                let spans: Vec<Span> = top
                    .iter()
                    .zip(bottom)
                    .map(|(t, b)| {
                        Span::styled(HALF_BLOCK, Style::new().fg(color(*t)).bg(color(*b)))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Write the glyphs of a surface covering `at` into the buffer.
pub fn draw_glyphs(buf: &mut Buffer, surface: &RasterSurface, at: Rect) {
    for placed in surface.glyphs() {
        let opacity = placed.glyph.opacity.clamp(0.0, 1.0);
        if opacity < MIN_GLYPH_OPACITY || placed.x < 0.0 || placed.y < 0.0 {
            continue;
        }
        let col = placed.x.floor() as u32;
        let row = (placed.y / 2.0).floor() as u32;
        let (Ok(col), Ok(row)) = (u16::try_from(col), u16::try_from(row)) else {
            continue;
        };
        let (x, y) = (at.x.saturating_add(col), at.y.saturating_add(row));
        if !at.contains(Position::new(x, y)) || !buf.area.contains(Position::new(x, y)) {
            continue;
        }

        let bg = buf.cell(Position::new(x, y)).map_or(color(BASE), |cell| cell.bg);
        let mut style = Style::new().bg(bg);
        if let Some(tint) = placed.glyph.color {
            style = style.fg(color(BASE.lerp(tint.with_alpha(0xff), opacity)));
        }
        let mut symbol = [0u8; 4];
        buf.set_string(x, y, placed.glyph.symbol.encode_utf8(&mut symbol), style);
    }
}
