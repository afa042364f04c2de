//! The ship: activation, spawn kinematics, per-mode lifetime

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use crate::consts::*;
use crate::renderer::Sprite;
use crate::{heading, rotate_offset, velocity_heading};

/// Behaviour of an active ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShipMode {
    /// Cruises across with an exhaust trail
    #[default]
    Normal,
    /// Drifts slowly while spinning, no exhaust
    Broken,
    /// Fires volleys with an alien escort ahead of it
    Combat,
}

impl ShipMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipMode::Normal => "normal",
            ShipMode::Broken => "broken",
            ShipMode::Combat => "combat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(ShipMode::Normal),
            "broken" => Some(ShipMode::Broken),
            "combat" => Some(ShipMode::Combat),
            _ => None,
        }
    }

    /// Mode for a uniform roll in [0, 1): 10% broken, 30% combat, 60% normal
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.1 {
            ShipMode::Broken
        } else if roll < 0.4 {
            ShipMode::Combat
        } else {
            ShipMode::Normal
        }
    }

    /// Seconds before an active ship is retired
    pub fn time_limit(&self) -> f32 {
        match self {
            ShipMode::Normal => 20.0,
            ShipMode::Combat => 25.0,
            ShipMode::Broken => 50.0,
        }
    }

    /// Spawn speed range (px/s), authored as px/frame at 60 Hz
    pub fn speed_range(&self) -> (f32, f32) {
        match self {
            ShipMode::Broken => (0.8 * FRAME_RATE, 1.6 * FRAME_RATE),
            ShipMode::Normal | ShipMode::Combat => (2.0 * FRAME_RATE, 8.0 * FRAME_RATE),
        }
    }

    pub fn emits_thrust(&self) -> bool {
        match self {
            ShipMode::Normal | ShipMode::Combat => true,
            ShipMode::Broken => false,
        }
    }
}

/// Whole-number sprite scale in 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ShipScale(u8);

impl ShipScale {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(scale: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&scale).then_some(Self(scale))
    }

    pub fn random(rng: &mut SimRng) -> Self {
        Self(rng.random_range(Self::MIN..=Self::MAX))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn factor(self) -> f32 {
        self.0 as f32
    }
}

impl Default for ShipScale {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for ShipScale {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("ship scale {value} outside 1..=4"))
    }
}

impl From<ShipScale> for u8 {
    fn from(scale: ShipScale) -> u8 {
        scale.0
    }
}

/// Why an active ship was retired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    OutOfBounds,
    TimeLimit,
}

/// The ship entity
#[derive(Debug, Clone, Serialize)]
pub struct ShipActor {
    /// Sprite center in canvas space
    pub pos: Vec2,
    /// Velocity (px/s)
    pub vel: Vec2,
    pub active: bool,
    /// Heading in degrees, clockwise-positive on screen
    pub angle: f32,
    /// Seconds since activation
    pub timer: f32,
    pub scale: ShipScale,
    pub mode: ShipMode,
}

impl Default for ShipActor {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            active: false,
            angle: 0.0,
            timer: 0.0,
            scale: ShipScale::default(),
            mode: ShipMode::Normal,
        }
    }
}

impl ShipActor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate just outside a random edge of `arena`, flying toward a random
    /// point near its center
    pub fn spawn(&mut self, mode: ShipMode, arena: Vec2, rng: &mut SimRng) {
        let scale = ShipScale::random(rng);

        let pos = match rng.random_range(0..4) {
            0 => Vec2::new(rng.random::<f32>() * arena.x, -SPAWN_MARGIN),
            1 => Vec2::new(arena.x + SPAWN_MARGIN, rng.random::<f32>() * arena.y),
            2 => Vec2::new(rng.random::<f32>() * arena.x, arena.y + SPAWN_MARGIN),
            _ => Vec2::new(-SPAWN_MARGIN, rng.random::<f32>() * arena.y),
        };

        let spread = arena.x.min(arena.y) * TARGET_SPREAD;
        let target = arena / 2.0
            + Vec2::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            );

        let (lo, hi) = mode.speed_range();
        let speed = lo + rng.random::<f32>() * (hi - lo);

        self.launch(mode, scale, pos, target, speed);
    }

    /// Activate at `pos` heading for `target` at `speed` px/s
    pub fn launch(&mut self, mode: ShipMode, scale: ShipScale, pos: Vec2, target: Vec2, speed: f32) {
        let delta = target - pos;
        let dist = delta.length();
        let dist = if dist > 0.0 { dist } else { 1.0 };

        self.active = true;
        self.mode = mode;
        self.scale = scale;
        self.pos = pos;
        self.vel = delta / dist * speed;
        self.angle = velocity_heading(self.vel);
        self.timer = 0.0;
    }

    /// Integrate motion and the activity timer, then retire the ship if it
    /// left the arena (plus buffer) or outlived its mode's limit
    pub fn advance(&mut self, dt: f32, arena: Vec2) -> Option<Deactivation> {
        if !self.active {
            return None;
        }

        self.pos += self.vel * dt;
        self.timer += dt;

        let reason = if self.pos.x < -BOUNDS_BUFFER
            || self.pos.x > arena.x + BOUNDS_BUFFER
            || self.pos.y < -BOUNDS_BUFFER
            || self.pos.y > arena.y + BOUNDS_BUFFER
        {
            Some(Deactivation::OutOfBounds)
        } else if self.timer > self.mode.time_limit() {
            Some(Deactivation::TimeLimit)
        } else {
            None
        };

        if reason.is_some() {
            self.active = false;
        }
        reason
    }

    /// Broken-mode tumble; overrides the velocity heading
    pub fn spin(&mut self, dt: f32) {
        self.angle += BROKEN_SPIN * dt * FRAME_RATE;
    }

    /// Half the scaled sprite side (px)
    pub fn half_extent(&self) -> f32 {
        Sprite::base_size() as f32 * self.scale.factor() / 2.0
    }

    /// Unit heading vector
    pub fn heading(&self) -> Vec2 {
        heading(self.angle)
    }

    /// Sprite-local offset (px, unrotated) to canvas space
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.pos + rotate_offset(local, self.angle)
    }

    /// Exhaust origin at the tail, behind the sprite center
    pub fn thrust_origin(&self) -> Vec2 {
        self.to_world(Vec2::new(-self.half_extent(), 0.0))
    }

    /// Muzzle positions of both gun mounts
    pub fn gun_positions(&self) -> [Vec2; 2] {
        let center = SPRITE_CELLS as f32 / 2.0;
        let cell = PIXEL_SIZE as f32 * self.scale.factor();
        GUN_MOUNTS.map(|(col, row)| self.to_world(Vec2::new(col - center, row - center) * cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{BATTLE_STREAM, RngState};

    const ARENA: Vec2 = Vec2::new(800.0, 480.0);

    fn parked(mode: ShipMode) -> ShipActor {
        let mut ship = ShipActor::new();
        ship.launch(mode, ShipScale::default(), ARENA / 2.0, ARENA / 2.0, 0.0);
        ship.vel = Vec2::ZERO;
        ship
    }

    #[test]
    fn test_mode_roll_thresholds() {
        assert_eq!(ShipMode::from_roll(0.0), ShipMode::Broken);
        assert_eq!(ShipMode::from_roll(0.099), ShipMode::Broken);
        assert_eq!(ShipMode::from_roll(0.1), ShipMode::Combat);
        assert_eq!(ShipMode::from_roll(0.399), ShipMode::Combat);
        assert_eq!(ShipMode::from_roll(0.4), ShipMode::Normal);
        assert_eq!(ShipMode::from_roll(0.999), ShipMode::Normal);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ShipMode::from_str("Combat"), Some(ShipMode::Combat));
        assert_eq!(ShipMode::from_str("broken"), Some(ShipMode::Broken));
        assert_eq!(ShipMode::from_str("warp"), None);
        assert_eq!(ShipMode::Normal.as_str(), "normal");
    }

    #[test]
    fn test_scale_bounds() {
        assert!(ShipScale::new(0).is_none());
        assert!(ShipScale::new(5).is_none());
        assert_eq!(ShipScale::new(3).map(ShipScale::get), Some(3));
        assert!(serde_json::from_str::<ShipScale>("7").is_err());
        assert_eq!(serde_json::from_str::<ShipScale>("2").ok(), ShipScale::new(2));
    }

    #[test]
    fn test_spawn_outside_edge_aimed_at_center() {
        let mut rng = RngState::new(1234, BATTLE_STREAM).to_rng();
        for mode in [ShipMode::Normal, ShipMode::Broken, ShipMode::Combat] {
            for _ in 0..200 {
                let mut ship = ShipActor::new();
                ship.spawn(mode, ARENA, &mut rng);
                assert!(ship.active);
                assert_eq!(ship.mode, mode);
                assert_eq!(ship.timer, 0.0);

                let on_edge = ship.pos.x == -SPAWN_MARGIN
                    || ship.pos.x == ARENA.x + SPAWN_MARGIN
                    || ship.pos.y == -SPAWN_MARGIN
                    || ship.pos.y == ARENA.y + SPAWN_MARGIN;
                assert!(on_edge, "spawn {:?} not on an edge", ship.pos);

                let (lo, hi) = mode.speed_range();
                let speed = ship.vel.length();
                assert!(speed >= lo - 1e-3 && speed <= hi + 1e-3);

                // Aimed into the central target square
                let to_center = ARENA / 2.0 - ship.pos;
                assert!(ship.vel.dot(to_center) > 0.0);
                assert!((ship.heading() - ship.vel.normalize()).length() < 1e-4);
            }
        }
    }

    #[test]
    fn test_speed_ranges() {
        assert_eq!(ShipMode::Broken.speed_range(), (48.0, 96.0));
        assert_eq!(ShipMode::Normal.speed_range(), (120.0, 480.0));
        assert_eq!(ShipMode::Combat.speed_range(), ShipMode::Normal.speed_range());
    }

    #[test]
    fn test_time_limit_retires_ship_on_screen() {
        for mode in [ShipMode::Normal, ShipMode::Combat, ShipMode::Broken] {
            let mut ship = parked(mode);
            let dt = 1.0 / 60.0;
            let mut ticks = 0;
            let reason = loop {
                ticks += 1;
                if let Some(reason) = ship.advance(dt, ARENA) {
                    break reason;
                }
                assert!(ship.timer <= mode.time_limit());
                assert!(ticks < 100_000);
            };
            assert_eq!(reason, Deactivation::TimeLimit);
            assert!(!ship.active);
            assert!(ship.timer > mode.time_limit());
            assert!(ship.timer <= mode.time_limit() + dt + 1e-3);
        }
    }

    #[test]
    fn test_bounds_retire_ship_regardless_of_timer() {
        let mut ship = parked(ShipMode::Normal);
        ship.pos = Vec2::new(ARENA.x + BOUNDS_BUFFER - 0.5, 100.0);
        ship.vel = Vec2::new(60.0, 0.0);
        assert_eq!(ship.advance(1.0 / 60.0, ARENA), Some(Deactivation::OutOfBounds));
        assert!(!ship.active);
        assert!(ship.timer < 1.0);

        let mut ship = parked(ShipMode::Broken);
        ship.pos = Vec2::new(300.0, -BOUNDS_BUFFER + 0.1);
        ship.vel = Vec2::new(0.0, -30.0);
        assert_eq!(ship.advance(0.1, ARENA), Some(Deactivation::OutOfBounds));
    }

    #[test]
    fn test_inactive_ship_does_not_move() {
        let mut ship = ShipActor::new();
        ship.vel = Vec2::new(100.0, 0.0);
        assert_eq!(ship.advance(1.0, ARENA), None);
        assert_eq!(ship.pos, Vec2::ZERO);
    }

    #[test]
    fn test_spin_rate() {
        let mut ship = parked(ShipMode::Broken);
        ship.angle = 10.0;
        ship.spin(1.0);
        assert!((ship.angle - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_gun_and_thrust_offsets() {
        let mut ship = parked(ShipMode::Combat);
        ship.pos = Vec2::new(100.0, 100.0);
        ship.angle = 0.0;
        let [a, b] = ship.gun_positions();
        assert!((a - Vec2::new(97.0, 93.0)).length() < 1e-4);
        assert!((b - Vec2::new(97.0, 107.0)).length() < 1e-4);
        assert!((ship.thrust_origin() - Vec2::new(85.0, 100.0)).length() < 1e-4);

        // Facing down, scale 2: offsets rotate and double
        ship.angle = 90.0;
        ship.scale = ShipScale::new(2).unwrap();
        let [a, _] = ship.gun_positions();
        assert!((a - Vec2::new(114.0, 94.0)).length() < 1e-3);
        assert!((ship.thrust_origin() - Vec2::new(100.0, 70.0)).length() < 1e-3);
    }
}
