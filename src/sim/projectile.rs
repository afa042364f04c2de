//! Combat volleys and bullet lifetime

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::rng::SimRng;
use super::ship::{ShipActor, ShipMode};
use crate::consts::*;
use crate::renderer::{Surface, shapes};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining life in frames
    pub life: f32,
}

#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    bullets: Vec<Bullet>,
    /// Frames since the last volley
    accumulator: f32,
    /// Frames required before the next volley
    next_interval: f32,
}

impl Default for ProjectileSystem {
    fn default() -> Self {
        Self {
            bullets: Vec::new(),
            accumulator: 0.0,
            next_interval: FIRST_VOLLEY_INTERVAL,
        }
    }
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sortie: the first volley comes after the fixed opening interval.
    ///
    /// Called on every activation, including forced spawns. Unlike a
    /// free-running volley timer, cadence deliberately does not carry over
    /// from the previous sortie.
    pub fn reset_volley_timer(&mut self) {
        self.accumulator = 0.0;
        self.next_interval = FIRST_VOLLEY_INTERVAL;
    }

    /// Advance the volley timer; fires both guns and rerolls the interval once
    /// it elapses. Returns whether a volley was fired.
    pub fn tick_volley(&mut self, ship: &ShipActor, dt: f32, rng: &mut SimRng) -> bool {
        if !ship.active || ship.mode != ShipMode::Combat {
            return false;
        }

        self.accumulator += dt * FRAME_RATE;
        if self.accumulator < self.next_interval {
            return false;
        }

        self.fire_pair(ship);
        self.accumulator = 0.0;
        self.next_interval = rng.random_range(5..55) as f32;
        true
    }

    /// One bullet from each gun mount, inheriting the ship's velocity.
    /// No-op unless the ship is an active combat ship.
    pub fn fire_pair(&mut self, ship: &ShipActor) {
        if !ship.active || ship.mode != ShipMode::Combat {
            return;
        }

        let vel = ship.heading() * BULLET_SPEED + ship.vel;
        for pos in ship.gun_positions() {
            self.bullets.push(Bullet {
                pos,
                vel,
                radius: ship.scale.factor(),
                life: BULLET_LIFE,
            });
        }
    }

    /// Move bullets and burn their life; expired bullets are removed
    pub fn update(&mut self, dt: f32) {
        for bullet in &mut self.bullets {
            bullet.pos += bullet.vel * dt;
            bullet.life -= dt * FRAME_RATE;
        }
        self.bullets.retain(|b| b.life > 0.0);
    }

    pub fn draw(&self, surface: &mut Surface) {
        for bullet in &self.bullets {
            shapes::bullet(surface, bullet.pos, bullet.radius);
        }
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    pub fn next_interval(&self) -> f32 {
        self.next_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{BATTLE_STREAM, RngState};
    use crate::sim::ship::ShipScale;
    use proptest::prelude::*;

    fn ship(mode: ShipMode) -> ShipActor {
        let mut ship = ShipActor::new();
        ship.launch(
            mode,
            ShipScale::new(3).unwrap(),
            Vec2::new(200.0, 200.0),
            Vec2::new(400.0, 200.0),
            120.0,
        );
        ship
    }

    #[test]
    fn test_fire_pair_only_for_active_combat_ship() {
        let mut projectiles = ProjectileSystem::new();
        projectiles.fire_pair(&ship(ShipMode::Normal));
        projectiles.fire_pair(&ship(ShipMode::Broken));
        assert!(projectiles.is_empty());

        let mut idle = ship(ShipMode::Combat);
        idle.active = false;
        projectiles.fire_pair(&idle);
        assert!(projectiles.is_empty());

        projectiles.fire_pair(&ship(ShipMode::Combat));
        assert_eq!(projectiles.len(), 2);
        let b = &projectiles.bullets()[0];
        assert_eq!(b.radius, 3.0);
        assert_eq!(b.life, BULLET_LIFE);
        assert!((b.vel - Vec2::new(1120.0, 0.0)).length() < 1e-2);
    }

    #[test]
    fn test_first_volley_after_twenty_frames() {
        let mut rng = RngState::new(5, BATTLE_STREAM).to_rng();
        let ship = ship(ShipMode::Combat);
        let mut projectiles = ProjectileSystem::new();
        let mut fired_at = None;
        for frame in 1..=40 {
            if projectiles.tick_volley(&ship, 1.0 / 60.0, &mut rng) {
                fired_at = Some(frame);
                break;
            }
        }
        assert!(matches!(fired_at, Some(20) | Some(21)));
        assert_eq!(projectiles.len(), 2);
        assert!((5.0..55.0).contains(&projectiles.next_interval()));
    }

    #[test]
    fn test_volley_timer_ignores_non_combat() {
        let mut rng = RngState::new(5, BATTLE_STREAM).to_rng();
        let ship = ship(ShipMode::Normal);
        let mut projectiles = ProjectileSystem::new();
        for _ in 0..600 {
            assert!(!projectiles.tick_volley(&ship, 1.0 / 60.0, &mut rng));
        }
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_bullets_expire_after_life() {
        let mut projectiles = ProjectileSystem::new();
        projectiles.fire_pair(&ship(ShipMode::Combat));
        projectiles.update(3.9);
        assert_eq!(projectiles.len(), 2);
        projectiles.update(0.2);
        assert!(projectiles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_life_strictly_decreases(dts in proptest::collection::vec(0.001f32..0.5, 1..200)) {
            let mut projectiles = ProjectileSystem::new();
            projectiles.fire_pair(&ship(ShipMode::Combat));
            let mut last = BULLET_LIFE;
            for dt in dts {
                projectiles.update(dt);
                match projectiles.bullets().first() {
                    Some(b) => {
                        prop_assert!(b.life < last);
                        prop_assert!(b.life > 0.0);
                        last = b.life;
                    }
                    None => {
                        prop_assert!(last - dt * FRAME_RATE <= 1e-3);
                        break;
                    }
                }
            }
        }
    }
}
