//! Taplist Battlefield - animated backdrop for a taplist kiosk display
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (starfield, ship, alien escort, bullets, exhaust)
//! - `renderer`: CPU pixel surface, pixel-art sprites and the rotation cache
//! - `battlefield`: Top-level composition consumed by the host loop
//! - `settings`: Data-driven configuration

pub mod battlefield;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use battlefield::{ArcadeBattlefield, DebugSnapshot};
pub use renderer::{Rgba, Surface};
pub use settings::{GateTiming, QualityPreset, Settings, Theme};
pub use sim::ShipMode;

use glam::Vec2;

/// Simulation constants.
///
/// Values marked "frames" were authored against a 60 Hz loop and are
/// advanced by `dt * FRAME_RATE` so the visual rate holds at any tick rate.
pub mod consts {
    /// Reference tick rate the frame-unit constants were authored at
    pub const FRAME_RATE: f32 = 60.0;

    /// Starfield depth speed (units per second along z)
    pub const STAR_SPEED: f32 = 80.0;
    /// Projection focal constant (screen = offset * FOCAL / z)
    pub const STAR_FOCAL: f32 = 128.0;
    /// Drift sinusoid angular speeds (rad per second of starfield clock)
    pub const DRIFT_SPEED_X: f32 = 0.001;
    pub const DRIFT_SPEED_Y: f32 = 0.0013;
    /// Drift amplitude as a fraction of canvas size
    pub const DRIFT_AMOUNT: f32 = 0.1;
    /// Shared period of both drift sinusoids (10 x-cycles = 13 y-cycles);
    /// the starfield clock wraps here so it never overflows
    pub const DRIFT_PERIOD: f32 = 20_000.0 * std::f32::consts::PI;
    /// Per-update opacity jitter half-width
    pub const STAR_OPACITY_JITTER: f32 = 0.025;
    pub const STAR_OPACITY_MIN: f32 = 0.1;
    pub const STAR_OPACITY_MAX: f32 = 1.0;

    /// Default per-update activation probability
    pub const ACTIVATION_CHANCE: f32 = 0.002;
    /// Spawn distance outside the chosen screen edge (px)
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Out-of-bounds buffer before the ship is retired (px)
    pub const BOUNDS_BUFFER: f32 = 100.0;
    /// Side of the target square around screen center, as a fraction of min(w, h)
    pub const TARGET_SPREAD: f32 = 0.25;

    /// Sprite grid cell size in base pixels
    pub const PIXEL_SIZE: u32 = 2;
    /// Sprite grid side length in cells
    pub const SPRITE_CELLS: u32 = 15;

    /// Broken-mode spin (degrees per frame)
    pub const BROKEN_SPIN: f32 = 0.5;

    /// Muzzle speed added along heading (px/s)
    pub const BULLET_SPEED: f32 = 1000.0;
    /// Bullet lifetime (frames)
    pub const BULLET_LIFE: f32 = 240.0;
    /// Interval before the first volley of a sortie (frames)
    pub const FIRST_VOLLEY_INTERVAL: f32 = 20.0;
    /// Gun mounts as (column, row) sprite cells
    pub const GUN_MOUNTS: [(f32, f32); 2] = [(6.0, 4.0), (6.0, 11.0)];

    /// Alien distance ahead of the ship (px)
    pub const ALIEN_FORWARD: f32 = 200.0;
    /// Alien perpendicular bob amplitude (px) and angular frequency (rad/s)
    pub const ALIEN_BOB_AMPLITUDE: f32 = 50.0;
    pub const ALIEN_BOB_FREQUENCY: f32 = 2.0;
    /// Frames between alien flipbook frames
    pub const ALIEN_ANIMATION_FRAMES: f32 = 30.0;
    /// Parking spot for an idle alien
    pub const ALIEN_PARKED: f32 = -9999.0;

    /// Exhaust particles per emission
    pub const THRUST_PARTICLES: usize = 4;
    /// Exhaust cone width (radians)
    pub const THRUST_SPREAD: f32 = 0.6;
    /// Per-frame exhaust radius decay factor
    pub const PARTICLE_RADIUS_DECAY: f32 = 0.9;
    /// Per-frame exhaust alpha fade
    pub const PARTICLE_FADE: f32 = 0.1;
}

/// Unit vector for a heading given in degrees (screen space, y down)
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    Vec2::from_angle(angle_deg.to_radians())
}

/// Rotate a sprite-local offset into world space by a heading in degrees
#[inline]
pub fn rotate_offset(offset: Vec2, angle_deg: f32) -> Vec2 {
    heading(angle_deg).rotate(offset)
}

/// Heading in degrees of a velocity vector
#[inline]
pub fn velocity_heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x).to_degrees()
}
