//! CPU pixel surface with source-over blending
//!
//! Everything the battlefield paints ends up here. The host copies
//! `as_bytes()` into whatever presents frames (window, framebuffer, PNG).

use bytemuck::{Pod, Zeroable};
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color, laid out to match RGBA8 pixel buffers
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque color from a packed 0xRRGGBB value
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Same color with alpha scaled by `opacity` (clamped to 0..1)
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)) as u8;
        Self { a, ..self }
    }

    /// Composite `self` over `dst`
    #[inline]
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let a = a as u16;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * inv + 127) / 255) as u8;
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (a + (dst.a as u16 * inv + 127) / 255).min(255) as u8,
                }
            }
        }
    }
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgba::rgb(r, g, b)
    }
}

/// Row-major RGBA pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x as i64, y as i64).map(|i| self.pixels[i])
    }

    /// Overwrite a pixel (no blending); out-of-bounds writes are dropped
    pub fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x as i64, y as i64) {
            self.pixels[i] = color;
        }
    }

    /// Blend a pixel over the existing one; out-of-bounds writes are dropped
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x as i64, y as i64) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Overwrite an axis-aligned rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        for py in y0..y1 {
            let row = py as usize * self.width as usize;
            for px in x0..x1 {
                self.pixels[row + px as usize] = color;
            }
        }
    }

    /// Blend a filled disc of integer radius centered on `center`
    ///
    /// Covers pixels whose offset satisfies dx² + dy² <= r². Radius 0 paints
    /// a single pixel. Only the on-surface part of the bounding box is walked,
    /// so huge or far off-screen centers are cheap.
    pub fn fill_circle(&mut self, center: IVec2, radius: i32, color: Rgba) {
        if color.a == 0 || radius < 0 {
            return;
        }
        let (cx, cy, r) = (center.x as i64, center.y as i64, radius as i64);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.height as i64 - 1);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.width as i64 - 1);
        let r2 = r * r;
        for py in y0..=y1 {
            let dy = py - cy;
            for px in x0..=x1 {
                let dx = px - cx;
                if dx * dx + dy * dy <= r2 {
                    let i = py as usize * self.width as usize + px as usize;
                    self.pixels[i] = color.over(self.pixels[i]);
                }
            }
        }
    }

    /// Blend `src` onto this surface with its top-left corner at `top_left`
    pub fn blit(&mut self, src: &Surface, top_left: IVec2) {
        let (ox, oy) = (top_left.x as i64, top_left.y as i64);
        let y0 = oy.max(0);
        let y1 = (oy + src.height as i64).min(self.height as i64);
        let x0 = ox.max(0);
        let x1 = (ox + src.width as i64).min(self.width as i64);
        for py in y0..y1 {
            let sy = (py - oy) as usize;
            for px in x0..x1 {
                let sx = (px - ox) as usize;
                let color = src.pixels[sy * src.width as usize + sx];
                if color.a != 0 {
                    let i = py as usize * self.width as usize + px as usize;
                    self.pixels[i] = color.over(self.pixels[i]);
                }
            }
        }
    }

    /// Blit `src` so that its center lands on `center`
    ///
    /// Uses the source's own (possibly rotated) dimensions.
    pub fn blit_centered(&mut self, src: &Surface, center: IVec2) {
        let half = IVec2::new((src.width / 2) as i32, (src.height / 2) as i32);
        self.blit(src, center - half);
    }

    /// Number of pixels with non-zero alpha
    pub fn opaque_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a != 0).count()
    }
}
