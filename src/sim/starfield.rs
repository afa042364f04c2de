//! Layered parallax starfield
//!
//! Stars live in canvas space with a depth `z`. Every update pulls them
//! toward the viewer; a star reaching z <= 0 is recycled in place with a new
//! position and a depth drawn from its own layer's range. The star array is
//! sized once per canvas size and reused forever.

use glam::Vec2;
use rand::Rng;

use super::rng::SimRng;
use crate::consts::*;
use crate::renderer::{Rgba, Surface, shapes};

/// Immutable description of one depth band
#[derive(Debug, Clone, PartialEq)]
pub struct StarLayer {
    pub count: usize,
    pub zmin: f32,
    pub zmax: f32,
    pub color: Rgba,
    /// Draw a faint halo under the core dot
    pub halo: bool,
}

impl StarLayer {
    /// Uniform depth within this layer's range
    fn random_depth(&self, rng: &mut SimRng) -> f32 {
        (rng.random::<f32>() * (self.zmax - self.zmin) + self.zmin).min(self.zmax)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub z: f32,
    /// Opacity in [STAR_OPACITY_MIN, STAR_OPACITY_MAX]
    pub opacity: f32,
    /// Index into the owning starfield's layers
    pub layer: usize,
}

/// Four fixed layers, depth ranges proportional to canvas width
pub fn generate_layers(width: u32, density: f32) -> Vec<StarLayer> {
    let w = width as f32;
    let count = |base: f32| (base * density.max(0.0)).round() as usize;
    vec![
        StarLayer {
            count: count(50.0),
            zmin: w * 0.95,
            zmax: w,
            color: Rgba::hex(0xffffff),
            halo: true,
        },
        StarLayer {
            count: count(75.0),
            zmin: w * 0.7,
            zmax: w,
            color: Rgba::hex(0x88ccff),
            halo: false,
        },
        StarLayer {
            count: count(100.0),
            zmin: w * 0.4,
            zmax: w * 0.7,
            color: Rgba::hex(0xffffff),
            halo: false,
        },
        StarLayer {
            count: count(125.0),
            zmin: w * 0.1,
            zmax: w * 0.4,
            color: Rgba::hex(0xff99cc),
            halo: false,
        },
    ]
}

pub struct Starfield {
    width: u32,
    height: u32,
    background: Rgba,
    density: f32,
    /// Seconds of accumulated update time (drives projection drift)
    time: f32,
    layers: Vec<StarLayer>,
    stars: Vec<Star>,
    rng: SimRng,
}

impl Starfield {
    pub fn new(width: u32, height: u32, background: Rgba, density: f32, rng: SimRng) -> Self {
        let mut starfield = Self {
            width,
            height,
            background,
            density,
            time: 0.0,
            layers: Vec::new(),
            stars: Vec::new(),
            rng,
        };
        starfield.regenerate();
        starfield
    }

    /// Rebuild layers and stars for a new canvas size; no star state survives
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.regenerate();
    }

    /// Change the layer count multiplier; regenerates when it differs
    pub fn set_density(&mut self, density: f32) {
        if density != self.density {
            self.density = density;
            self.regenerate();
        }
    }

    fn regenerate(&mut self) {
        self.layers = generate_layers(self.width, self.density);
        self.stars.clear();
        if self.width == 0 || self.height == 0 {
            log::info!("Starfield {}x{} is empty", self.width, self.height);
            return;
        }

        let (w, h) = (self.width as f32, self.height as f32);
        let total: usize = self.layers.iter().map(|l| l.count).sum();
        self.stars.reserve(total);
        for (index, layer) in self.layers.iter().enumerate() {
            for _ in 0..layer.count {
                let pos = Vec2::new(self.rng.random::<f32>() * w, self.rng.random::<f32>() * h);
                let z = layer.random_depth(&mut self.rng);
                let opacity = self.rng.random_range(STAR_OPACITY_MIN..=STAR_OPACITY_MAX);
                self.stars.push(Star {
                    pos,
                    z,
                    opacity,
                    layer: index,
                });
            }
        }
        log::info!(
            "Starfield {}x{}: {} stars in {} layers",
            self.width,
            self.height,
            self.stars.len(),
            self.layers.len()
        );
    }

    /// Advance depth and opacity jitter
    ///
    /// The jitter step is applied once per call regardless of `dt`.
    pub fn update(&mut self, dt: f32) {
        self.time = (self.time + dt.rem_euclid(DRIFT_PERIOD)).rem_euclid(DRIFT_PERIOD);
        let (w, h) = (self.width as f32, self.height as f32);
        let Self {
            stars, layers, rng, ..
        } = self;

        for star in stars.iter_mut() {
            star.z -= STAR_SPEED * dt;
            if star.z <= 0.0 {
                let layer = &layers[star.layer];
                star.z = layer.random_depth(rng);
                star.pos = Vec2::new(rng.random::<f32>() * w, rng.random::<f32>() * h);
            }

            star.opacity += rng.random_range(-STAR_OPACITY_JITTER..STAR_OPACITY_JITTER);
            star.opacity = star.opacity.clamp(STAR_OPACITY_MIN, STAR_OPACITY_MAX);
        }
    }

    /// Drifting projection center
    pub fn projection_center(&self) -> Vec2 {
        let (w, h) = (self.width as f32, self.height as f32);
        Vec2::new(
            w / 2.0 + (self.time * DRIFT_SPEED_X).sin() * w * DRIFT_AMOUNT,
            h / 2.0 + (self.time * DRIFT_SPEED_Y).cos() * h * DRIFT_AMOUNT,
        )
    }

    /// Clear to the background color and paint every star in perspective
    pub fn draw(&self, surface: &mut Surface) {
        surface.fill(self.background);
        if self.width == 0 || self.height == 0 {
            return;
        }

        let center = self.projection_center();
        let w = self.width as f32;
        for star in &self.stars {
            if star.z <= 0.0 {
                continue;
            }
            let layer = &self.layers[star.layer];
            let screen = (star.pos - center) * (STAR_FOCAL / star.z) + center;
            let size = (((1.0 - star.z / w) * 2.0) as i32).max(1);
            shapes::star(surface, screen, size, layer.color, star.opacity, layer.halo);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn layers(&self) -> &[StarLayer] {
        &self.layers
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }
}
