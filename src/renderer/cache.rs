//! Crisp scale + rotate cache for pixel-art sprites
//!
//! Sprites are scaled by an integer factor with nearest-neighbor sampling and
//! rotated with nearest-neighbor sampling at quantized angles, so every
//! (sprite, frame, scale, angle) combination is rasterized at most once.
//! The cache only grows; the keyspace is bounded by 4 scales x 360/step
//! angles x frame count.

use std::collections::HashMap;
use std::rc::Rc;

use super::sprite::{Sprite, SpriteKind};
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScaleKey {
    kind: SpriteKind,
    frame: usize,
    scale: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RotationKey {
    kind: SpriteKind,
    frame: usize,
    scale: u32,
    angle: i32,
}

/// Instance-owned render cache shared by the ship and alien sprites
#[derive(Debug, Default)]
pub struct SpriteRenderCache {
    scaled: HashMap<ScaleKey, Surface>,
    rotated: HashMap<RotationKey, Rc<Surface>>,
}

impl SpriteRenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scaled and rotated surface for `sprite`
    ///
    /// `scale` is rounded to the nearest integer (minimum 1). `angle_deg` is
    /// clockwise-positive on screen and snapped to a multiple of `step`
    /// degrees. The returned surface is sized to hold the whole rotated
    /// sprite; callers must center it using its own dimensions.
    pub fn get(
        &mut self,
        sprite: &Sprite,
        scale: f32,
        angle_deg: f32,
        frame: usize,
        step: u32,
    ) -> Rc<Surface> {
        let scale = integer_scale(scale);
        let frame = frame % sprite.frame_count();
        let angle = quantize_angle(angle_deg, step);

        let key = RotationKey {
            kind: sprite.kind,
            frame,
            scale,
            angle,
        };
        if let Some(surface) = self.rotated.get(&key) {
            return Rc::clone(surface);
        }

        let scaled = self
            .scaled
            .entry(ScaleKey {
                kind: sprite.kind,
                frame,
                scale,
            })
            .or_insert_with(|| scale_nearest(sprite.frame(frame), scale));
        let rotated = Rc::new(rotate_nearest(scaled, angle as f32));
        log::trace!(
            "render cache miss: {:?} frame={} scale={} angle={} -> {}x{}",
            sprite.kind,
            frame,
            scale,
            angle,
            rotated.width(),
            rotated.height()
        );
        self.rotated.insert(key, Rc::clone(&rotated));
        rotated
    }

    /// Number of cached rotated surfaces
    pub fn len(&self) -> usize {
        self.rotated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotated.is_empty()
    }

    /// Drop every cached surface (theme change, resize, memory pressure)
    pub fn clear(&mut self) {
        self.scaled.clear();
        self.rotated.clear();
    }
}

/// Round a render scale to a whole factor of at least 1
pub fn integer_scale(scale: f32) -> u32 {
    let s = scale.round();
    if s.is_finite() && s >= 1.0 { s as u32 } else { 1 }
}

/// Snap an angle to the nearest multiple of `step`, wrapped into [0, 360)
pub fn quantize_angle(angle_deg: f32, step: u32) -> i32 {
    if !angle_deg.is_finite() {
        return 0;
    }
    let step = step.max(1) as i32;
    let wrapped = angle_deg.rem_euclid(360.0);
    ((wrapped / step as f32).round() as i32 * step).rem_euclid(360)
}

/// Bounding box of a `width` x `height` rectangle rotated by `angle_deg`
pub fn rotated_size(width: u32, height: u32, angle_deg: f32) -> (u32, u32) {
    let (sin, cos) = (angle_deg as f64).to_radians().sin_cos();
    let (w, h) = (width as f64, height as f64);
    // Tolerance keeps exact right angles from growing a pixel through rounding noise
    let fit = |v: f64| ((v - 1e-3).ceil().max(1.0)) as u32;
    (
        fit(w * cos.abs() + h * sin.abs()),
        fit(w * sin.abs() + h * cos.abs()),
    )
}

/// Integer nearest-neighbor upscale
pub fn scale_nearest(src: &Surface, factor: u32) -> Surface {
    let factor = factor.max(1);
    if factor == 1 {
        return src.clone();
    }
    let (w, h) = (src.width() * factor, src.height() * factor);
    let mut out = Surface::new(w, h);
    for y in 0..h {
        for x in 0..w {
            if let Some(color) = src.get((x / factor) as i32, (y / factor) as i32) {
                out.set(x as i32, y as i32, color);
            }
        }
    }
    out
}

/// Nearest-neighbor rotation, clockwise-positive on a y-down screen
///
/// The output is the rotated bounding box, so no content is cropped.
pub fn rotate_nearest(src: &Surface, angle_deg: f32) -> Surface {
    let (w, h) = rotated_size(src.width(), src.height(), angle_deg);
    let mut out = Surface::new(w, h);
    let (sin, cos) = (angle_deg as f64).to_radians().sin_cos();
    let (src_cx, src_cy) = (src.width() as f64 / 2.0, src.height() as f64 / 2.0);
    let (dst_cx, dst_cy) = (w as f64 / 2.0, h as f64 / 2.0);

    for y in 0..h {
        let dy = y as f64 + 0.5 - dst_cy;
        for x in 0..w {
            let dx = x as f64 + 0.5 - dst_cx;
            // Inverse rotation back into source space
            let sx = (cos * dx + sin * dy + src_cx).floor();
            let sy = (-sin * dx + cos * dy + src_cy).floor();
            if let Some(color) = src.get(sx as i32, sy as i32) {
                if color.a != 0 {
                    out.set(x as i32, y as i32, color);
                }
            }
        }
    }
    out
}
