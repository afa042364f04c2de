//! Pixel-art sprites for the battle actors
//!
//! Sprites are authored as 15x15 cell grids, one digit per cell indexing a
//! palette (0 = empty), and rasterized once at `PIXEL_SIZE` pixels per cell.

use super::surface::{Rgba, Surface};
use crate::consts::{PIXEL_SIZE, SPRITE_CELLS};

/// Identifies a sprite in the render cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Ship,
    Alien,
}

const SHIP_GRID: [&str; 15] = [
    "000000000000000",
    "000000000000000",
    "000000000000000",
    "001111000000000",
    "000110000000000",
    "000011000000000",
    "000011110000000",
    "001111111111100",
    "000011110000000",
    "000011000000000",
    "000110000000000",
    "001111000000000",
    "000000000000000",
    "000000000000000",
    "000000000000000",
];

const ALIEN_GRID_0: [&str; 15] = [
    "000000000000000",
    "000001100000000",
    "000001110000000",
    "000110112220000",
    "000111012002000",
    "000011213300000",
    "000022223320000",
    "000222222200000",
    "000022223320000",
    "000011213300000",
    "000111012002000",
    "000110112220000",
    "000001110000000",
    "000001100000000",
    "000000000000000",
];

const ALIEN_GRID_1: [&str; 15] = [
    "000000000000000",
    "000000000000000",
    "000001100000000",
    "000001112200000",
    "000110112020000",
    "000011213300000",
    "000022223320000",
    "000222222200000",
    "000022223320000",
    "000011213300000",
    "000110112020000",
    "000001112200000",
    "000001100000000",
    "000000000000000",
    "000000000000000",
];

const SHIP_PALETTE: [Rgba; 1] = [Rgba::WHITE];
const ALIEN_PALETTE: [Rgba; 3] = [
    Rgba::hex(0x60c494),
    Rgba::hex(0x68a22a),
    Rgba::hex(0xb9712f),
];

/// A rasterized sprite with one or more animation frames
#[derive(Debug, Clone)]
pub struct Sprite {
    pub kind: SpriteKind,
    frames: Vec<Surface>,
}

impl Sprite {
    /// The white arrowhead ship (single frame, nose along +x)
    pub fn ship() -> Self {
        Self {
            kind: SpriteKind::Ship,
            frames: vec![rasterize(&SHIP_GRID, &SHIP_PALETTE, PIXEL_SIZE)],
        }
    }

    /// The two-frame alien escort
    pub fn alien() -> Self {
        Self {
            kind: SpriteKind::Alien,
            frames: vec![
                rasterize(&ALIEN_GRID_0, &ALIEN_PALETTE, PIXEL_SIZE),
                rasterize(&ALIEN_GRID_1, &ALIEN_PALETTE, PIXEL_SIZE),
            ],
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Base (unscaled) frame; out-of-range indices wrap
    pub fn frame(&self, index: usize) -> &Surface {
        &self.frames[index % self.frames.len()]
    }

    /// Side length of the base sprite in pixels
    pub const fn base_size() -> u32 {
        SPRITE_CELLS * PIXEL_SIZE
    }
}

/// Paint a digit grid into a surface, `cell` pixels per grid cell
fn rasterize(grid: &[&str], palette: &[Rgba], cell: u32) -> Surface {
    let rows = grid.len() as u32;
    let cols = grid.first().map_or(0, |r| r.len()) as u32;
    let mut surface = Surface::new(cols * cell, rows * cell);
    for (r, row) in grid.iter().enumerate() {
        for (c, ch) in row.bytes().enumerate() {
            let index = ch.wrapping_sub(b'0') as usize;
            if index == 0 {
                continue;
            }
            if let Some(&color) = palette.get(index - 1) {
                surface.fill_rect(
                    c as i32 * cell as i32,
                    r as i32 * cell as i32,
                    cell,
                    cell,
                    color,
                );
            }
        }
    }
    surface
}
