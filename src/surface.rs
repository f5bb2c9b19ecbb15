use egui::{Color32, Pos2};
use image::RgbaImage;

/// Whether new paint is laid on top of the board or subtracted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Draw,
    Erase,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Draw => Self::Erase,
            Self::Erase => Self::Draw,
        }
    }
}

/// Stroke rendering parameters for a single segment.
#[derive(Debug, Clone, Copy)]
pub struct Brush {
    /// Line width in surface pixels, never below 1.
    pub size: f32,
    pub color: Color32,
}

/// A raw RGBA pixel rectangle, read from and written back to a surface
/// atomically around a fill operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2]]
    }

    #[inline]
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let o = self.offset(x, y);
        [
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ]
    }

    #[inline]
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let o = self.offset(x, y);
        self.data[o..o + 4].copy_from_slice(&rgba);
    }
}

/// The raster primitives the board needs from its host, with
/// browser-canvas semantics: clearing, solid fills, smoothed stroke
/// segments, image compositing, and whole-buffer pixel access.
pub trait Surface {
    /// Intrinsic pixel size, `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Replace every pixel with `color`.
    fn fill_rect(&mut self, color: Color32);

    /// Stroke one smoothed curve segment: a quadratic from `from` to `to`
    /// through control point `ctrl`, with round caps and joins.
    fn stroke_segment(&mut self, from: Pos2, ctrl: Pos2, to: Pos2, brush: &Brush);

    /// Composite `image` scaled to the full surface. When `is_overlay` is
    /// false the current content is discarded first.
    fn draw_image(&mut self, image: &RgbaImage, is_overlay: bool);

    /// Copy out the full pixel buffer.
    fn read_pixels(&self) -> PixelBuffer;

    /// Write a full pixel buffer back in one call. Buffers of a different
    /// size than the surface are ignored.
    fn write_pixels(&mut self, pixels: &PixelBuffer);
}

/// In-memory software rasterizer used by the demo app and the tests.
///
/// Quadratic segments are flattened and stamped as filled discs, which
/// gives the round-cap/round-join look of the canvas stroke primitive.
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    pixels: PixelBuffer,
}

impl SoftwareSurface {
    /// A fully transparent surface of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: PixelBuffer::new(width, height),
        }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    fn stamp_disc(&mut self, center: Pos2, radius: f32, color: Color32) {
        let (w, h) = (self.pixels.width as i32, self.pixels.height as i32);
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i32;
        let x1 = (center.x + radius).ceil() as i32;
        let y0 = (center.y - radius).floor() as i32;
        let y1 = (center.y + radius).ceil() as i32;

        for y in y0.max(0)..(y1 + 1).min(h) {
            for x in x0.max(0)..(x1 + 1).min(w) {
                // test against the pixel center
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.pixels
                        .set_rgba(x as u32, y as u32, color.to_array());
                }
            }
        }
    }
}

#[inline]
fn quad_point(from: Pos2, ctrl: Pos2, to: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    Pos2::new(
        u * u * from.x + 2.0 * u * t * ctrl.x + t * t * to.x,
        u * u * from.y + 2.0 * u * t * ctrl.y + t * t * to.y,
    )
}

impl Surface for SoftwareSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixels.width, self.pixels.height)
    }

    fn fill_rect(&mut self, color: Color32) {
        let rgba = color.to_array();
        for px in self.pixels.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn stroke_segment(&mut self, from: Pos2, ctrl: Pos2, to: Pos2, brush: &Brush) {
        let radius = (brush.size * 0.5).max(0.5);

        // Flatten the quadratic; the control polygon length bounds the arc
        // length, so one stamp per pixel of it leaves no gaps.
        let approx_len = (ctrl - from).length() + (to - ctrl).length();
        let steps = (approx_len.ceil() as usize).max(1);

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp_disc(quad_point(from, ctrl, to, t), radius, brush.color);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, is_overlay: bool) {
        let (w, h) = self.size();
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 {
            return;
        }

        for y in 0..h {
            for x in 0..w {
                // nearest-neighbor scale to the surface size
                let sx = (x as u64 * iw as u64 / w as u64) as u32;
                let sy = (y as u64 * ih as u64 / h as u64) as u32;
                let src = image.get_pixel(sx, sy).0;

                if is_overlay {
                    let dst = self.pixels.rgba_at(x, y);
                    self.pixels.set_rgba(x, y, blend_over(src, dst));
                } else {
                    self.pixels.set_rgba(x, y, src);
                }
            }
        }
    }

    fn read_pixels(&self) -> PixelBuffer {
        self.pixels.clone()
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) {
        if pixels.width != self.pixels.width || pixels.height != self.pixels.height {
            log::warn!(
                "ignoring pixel write of mismatched size {}x{} (surface is {}x{})",
                pixels.width,
                pixels.height,
                self.pixels.width,
                self.pixels.height
            );
            return;
        }
        self.pixels = pixels.clone();
    }
}

/// Straight-alpha source-over compositing on u8 channels.
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = ((src[c] as u32 * sa + dst[c] as u32 * inv) / 255) as u8;
    }
    out[3] = (sa + dst[3] as u32 * inv / 255) as u8;
    out
}
