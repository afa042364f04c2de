//! Composite 2D primitives: stars, exhaust glow, bullets

use glam::{IVec2, Vec2};

use super::surface::{Rgba, Surface};

/// Exhaust core color (alpha scaled by particle opacity)
pub const EXHAUST_CORE: Rgba = Rgba::new(180, 220, 255, 200);
/// Exhaust halo color (alpha scaled by particle opacity)
pub const EXHAUST_HALO: Rgba = Rgba::new(0, 100, 255, 80);
pub const BULLET: Rgba = Rgba::WHITE;

/// Fraction of the core opacity used by a star halo
const STAR_HALO_OPACITY: f32 = 0.4;

/// Truncate a float position to pixel coordinates
#[inline]
pub fn to_pixel(pos: Vec2) -> IVec2 {
    // `as` saturates, so far off-screen projections stay harmless
    IVec2::new(pos.x as i32, pos.y as i32)
}

/// Star dot, optionally with a wider faint halo standing in for blur
pub fn star(surface: &mut Surface, pos: Vec2, size: i32, color: Rgba, opacity: f32, halo: bool) {
    let center = to_pixel(pos);
    let core = color.with_opacity(opacity);
    if halo {
        let halo_radius = (size * 3).max(2);
        surface.fill_circle(center, halo_radius, core.with_opacity(STAR_HALO_OPACITY));
    }
    surface.fill_circle(center, size, core);
}

/// Radial glow approximated by a dim halo under a bright core
pub fn exhaust_glow(surface: &mut Surface, pos: Vec2, radius: f32, alpha: f32) {
    let center = to_pixel(pos);
    let alpha = alpha.clamp(0.0, 1.0);
    let core_radius = (radius as i32).max(1);
    let halo_radius = ((radius * 1.8) as i32).max(core_radius + 1);
    surface.fill_circle(center, halo_radius, EXHAUST_HALO.with_opacity(alpha));
    surface.fill_circle(center, core_radius, EXHAUST_CORE.with_opacity(alpha));
}

/// Solid bullet dot
pub fn bullet(surface: &mut Surface, pos: Vec2, radius: f32) {
    surface.fill_circle(to_pixel(pos), (radius as i32).max(1), BULLET);
}
