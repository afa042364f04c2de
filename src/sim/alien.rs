//! Alien escort slaved to a combat ship

use glam::Vec2;
use serde::Serialize;

use super::ship::{ShipActor, ShipScale};
use crate::consts::*;

#[derive(Debug, Clone, Serialize)]
pub struct AlienActor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in degrees, copied from the ship
    pub angle: f32,
    pub scale: ShipScale,
    pub active: bool,
    /// Flipbook frame (0 or 1)
    pub frame: usize,
    /// Frames accumulated toward the next flip
    pub ticker: f32,
}

impl Default for AlienActor {
    fn default() -> Self {
        Self {
            pos: Vec2::splat(ALIEN_PARKED),
            vel: Vec2::ZERO,
            angle: 0.0,
            scale: ShipScale::default(),
            active: false,
            frame: 0,
            ticker: 0.0,
        }
    }
}

impl AlienActor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, scale: ShipScale) {
        self.active = true;
        self.scale = scale;
        self.frame = 0;
        self.ticker = 0.0;
    }

    /// Deactivate and move off-canvas
    pub fn park(&mut self) {
        *self = Self::default();
    }

    /// Ahead of the ship along its heading, bobbing on the perpendicular
    pub fn escort_position(ship: &ShipActor) -> Vec2 {
        let forward = ship.heading();
        let bob = (ship.timer * ALIEN_BOB_FREQUENCY).sin() * ALIEN_BOB_AMPLITUDE;
        ship.pos + forward * ALIEN_FORWARD + forward.perp() * bob
    }

    /// Snap to the escort position, copy the ship's motion, and advance the
    /// two-frame animation
    pub fn follow(&mut self, ship: &ShipActor, dt: f32) {
        if !self.active {
            return;
        }

        self.pos = Self::escort_position(ship);
        self.vel = ship.vel;
        self.angle = ship.angle;
        self.scale = ship.scale;

        self.ticker += dt * FRAME_RATE;
        if self.ticker >= ALIEN_ANIMATION_FRAMES {
            self.ticker = 0.0;
            self.frame = (self.frame + 1) % 2;
        }
    }
}
