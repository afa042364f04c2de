//! Ship sorties: activation gate, per-mode behaviour, effects and drawing
//!
//! Update order: gate, ship motion and retirement, mode behaviour (volleys
//! and alien escort, or spin), thrust emission, then bullet and particle
//! aging. Bullets and particles keep aging after the ship retires so they
//! expire naturally.

use glam::Vec2;
use rand::Rng;

use super::alien::AlienActor;
use super::particle::ParticleSystem;
use super::projectile::ProjectileSystem;
use super::rng::SimRng;
use super::ship::{Deactivation, ShipActor, ShipMode};
use crate::renderer::{Sprite, SpriteRenderCache, Surface, shapes};
use crate::settings::Settings;

pub struct Battle {
    width: u32,
    height: u32,
    pub ship: ShipActor,
    pub alien: AlienActor,
    pub projectiles: ProjectileSystem,
    pub particles: ParticleSystem,
    settings: Settings,
    ship_sprite: Sprite,
    alien_sprite: Sprite,
    cache: SpriteRenderCache,
    rng: SimRng,
}

impl Battle {
    pub fn new(width: u32, height: u32, settings: &Settings, rng: SimRng) -> Self {
        Self {
            width,
            height,
            ship: ShipActor::new(),
            alien: AlienActor::new(),
            projectiles: ProjectileSystem::new(),
            particles: ParticleSystem::new(settings.max_particles()),
            settings: settings.clone(),
            ship_sprite: Sprite::ship(),
            alien_sprite: Sprite::alien(),
            cache: SpriteRenderCache::new(),
            rng,
        }
    }

    /// Arena size; actors keep their positions and are retired by the
    /// usual bounds check if now outside
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn arena(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: &Settings) {
        if settings.angle_step != self.settings.angle_step
            || settings.angle_step_broken != self.settings.angle_step_broken
        {
            self.cache.clear();
        }
        self.particles.set_max_particles(settings.max_particles());
        self.settings = settings.clone();
    }

    pub fn update(&mut self, dt: f32) {
        if !self.ship.active {
            let chance = self
                .settings
                .activation_timing
                .chance(self.settings.activation_chance, dt);
            if self.rng.random::<f32>() < chance {
                self.activate(None);
            }
        }

        if self.ship.active {
            match self.ship.advance(dt, self.arena()) {
                Some(reason) => self.retire(reason),
                None => self.step_sortie(dt),
            }
        }

        self.projectiles.update(dt);
        self.particles.update(dt);
    }

    fn step_sortie(&mut self, dt: f32) {
        match self.ship.mode {
            ShipMode::Combat => {
                if self.projectiles.tick_volley(&self.ship, dt, &mut self.rng) {
                    log::trace!("volley at {:?}", self.ship.pos);
                }
                self.alien.follow(&self.ship, dt);
            }
            ShipMode::Broken => self.ship.spin(dt),
            ShipMode::Normal => {}
        }
        self.particles.emit_thrust(&self.ship, &mut self.rng);
    }

    fn retire(&mut self, reason: Deactivation) {
        log::debug!(
            "{} ship retired after {:.1}s: {:?}",
            self.ship.mode.as_str(),
            self.ship.timer,
            reason
        );
        self.alien.park();
    }

    /// Start a sortie, rolling the mode when none is given
    fn activate(&mut self, mode: Option<ShipMode>) {
        let mode = mode.unwrap_or_else(|| ShipMode::from_roll(self.rng.random()));
        let arena = self.arena();
        self.ship.spawn(mode, arena, &mut self.rng);
        self.projectiles.reset_volley_timer();

        if mode == ShipMode::Combat {
            self.alien.activate(self.ship.scale);
            self.alien.follow(&self.ship, 0.0);
        } else {
            self.alien.park();
        }

        log::debug!(
            "{} ship x{} launched from ({:.0}, {:.0}) heading {:.0} deg at {:.0} px/s",
            mode.as_str(),
            self.ship.scale.get(),
            self.ship.pos.x,
            self.ship.pos.y,
            self.ship.angle,
            self.ship.vel.length()
        );
    }

    /// Immediately (re)activate with `mode`, interrupting any sortie in flight
    pub fn force_spawn(&mut self, mode: ShipMode) {
        self.activate(Some(mode));
    }

    /// Bullets, exhaust, ship, then alien
    pub fn draw(&mut self, surface: &mut Surface) {
        self.projectiles.draw(surface);
        self.particles.draw(surface);

        let step = self
            .settings
            .effective_angle_step(self.ship.mode == ShipMode::Broken);

        if self.ship.active {
            let sprite = self.cache.get(
                &self.ship_sprite,
                self.ship.scale.factor(),
                self.ship.angle,
                0,
                step,
            );
            surface.blit_centered(&sprite, shapes::to_pixel(self.ship.pos));
        }

        if self.alien.active {
            let sprite = self.cache.get(
                &self.alien_sprite,
                self.alien.scale.factor(),
                self.alien.angle,
                self.alien.frame,
                step,
            );
            surface.blit_centered(&sprite, shapes::to_pixel(self.alien.pos));
        }
    }

    pub fn render_cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_render_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Rgba;
    use crate::sim::rng::{BATTLE_STREAM, RngState};

    const DT: f32 = 1.0 / 60.0;

    fn battle(seed: u64, settings: &Settings) -> Battle {
        Battle::new(800, 480, settings, RngState::new(seed, BATTLE_STREAM).to_rng())
    }

    fn quiet() -> Settings {
        Settings {
            activation_chance: 0.0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_gate_never_fires_at_zero_chance() {
        let mut battle = battle(1, &quiet());
        for _ in 0..10_000 {
            battle.update(DT);
            assert!(!battle.ship.active);
        }
    }

    #[test]
    fn test_gate_always_fires_at_full_chance() {
        let settings = Settings {
            activation_chance: 1.0,
            ..Settings::default()
        };
        let mut battle = battle(1, &settings);
        battle.update(DT);
        assert!(battle.ship.active);
    }

    #[test]
    fn test_force_spawn_sets_up_escort() {
        let mut battle = battle(2, &quiet());
        battle.force_spawn(ShipMode::Combat);
        assert!(battle.ship.active);
        assert!(battle.alien.active);
        assert_eq!(battle.alien.scale, battle.ship.scale);
        assert_eq!(battle.alien.pos, AlienActor::escort_position(&battle.ship));

        battle.force_spawn(ShipMode::Normal);
        assert_eq!(battle.ship.mode, ShipMode::Normal);
        assert!(!battle.alien.active);
    }

    #[test]
    fn test_only_combat_ships_fire() {
        for mode in [ShipMode::Normal, ShipMode::Broken] {
            let mut battle = battle(3, &quiet());
            battle.force_spawn(mode);
            for _ in 0..3000 {
                battle.update(DT);
                assert!(battle.projectiles.is_empty());
            }
        }

        let mut battle = battle(3, &quiet());
        battle.force_spawn(ShipMode::Combat);
        let mut prev = 0;
        let mut fired = false;
        for _ in 0..3000 {
            battle.update(DT);
            let now = battle.projectiles.len();
            if now > prev {
                assert!(battle.ship.active);
                assert_eq!(battle.ship.mode, ShipMode::Combat);
                fired = true;
            }
            prev = now;
        }
        assert!(fired);
    }

    #[test]
    fn test_broken_ship_spins_without_exhaust() {
        let mut battle = battle(4, &quiet());
        battle.force_spawn(ShipMode::Broken);
        let angle = battle.ship.angle;
        battle.update(DT);
        assert!(battle.ship.active);
        assert!((battle.ship.angle - angle - 0.5).abs() < 1e-3);
        assert!(battle.particles.is_empty());
    }

    #[test]
    fn test_normal_ship_emits_four_particles_per_update() {
        let mut battle = battle(5, &quiet());
        battle.force_spawn(ShipMode::Normal);
        battle.update(DT);
        assert_eq!(battle.particles.len(), 4);
        battle.update(DT);
        assert_eq!(battle.particles.len(), 8);
    }

    #[test]
    fn test_time_limit_parks_alien() {
        let mut battle = battle(6, &quiet());
        battle.force_spawn(ShipMode::Combat);
        battle.ship.pos = Vec2::new(400.0, 240.0);
        battle.ship.vel = Vec2::ZERO;
        let mut ticks = 0;
        while battle.ship.active {
            battle.update(DT);
            ticks += 1;
            assert!(ticks < 2000);
        }
        assert!(battle.ship.timer > ShipMode::Combat.time_limit());
        assert!(!battle.alien.active);
        assert_eq!(battle.alien.pos, Vec2::splat(crate::consts::ALIEN_PARKED));

        // Effects outlive the ship and expire on their own
        for _ in 0..300 {
            battle.update(DT);
        }
        assert!(battle.projectiles.is_empty());
        assert!(battle.particles.is_empty());
    }

    #[test]
    fn test_same_seed_same_battle() {
        let settings = Settings::default();
        let mut a = battle(77, &settings);
        let mut b = battle(77, &settings);
        a.force_spawn(ShipMode::Combat);
        b.force_spawn(ShipMode::Combat);
        for _ in 0..2000 {
            a.update(DT);
            b.update(DT);
            assert_eq!(a.ship.pos, b.ship.pos);
            assert_eq!(a.ship.active, b.ship.active);
            assert_eq!(a.alien.pos, b.alien.pos);
            assert_eq!(a.projectiles.bullets(), b.projectiles.bullets());
            assert_eq!(a.particles.particles(), b.particles.particles());
        }
    }

    #[test]
    fn test_seeded_combat_sortie_golden() {
        // Pins the random draw order: scale, edge, edge coordinate, target,
        // speed, then per tick volley interval and 4 x 3 exhaust draws
        let mut battle = battle(2024, &quiet());
        battle.force_spawn(ShipMode::Combat);
        assert_eq!(battle.ship.scale.get(), 1);
        assert_eq!(battle.ship.pos.y, 580.0);

        for _ in 0..60 {
            battle.update(DT);
        }
        assert!(battle.ship.active);
        assert!((battle.ship.pos - Vec2::new(411.334_29, 293.292_05)).length() < 1e-3);
        assert!((battle.alien.pos - Vec2::new(291.540_6, 126.809_2)).length() < 1e-2);
        // Volleys on ticks 20 and 31
        assert_eq!(battle.projectiles.len(), 4);
    }

    #[test]
    fn test_force_spawn_restarts_volley_cadence() {
        let mut battle = battle(14, &quiet());
        battle.force_spawn(ShipMode::Combat);
        for _ in 0..30 {
            battle.update(DT);
        }
        assert_eq!(battle.projectiles.len(), 2);

        battle.force_spawn(ShipMode::Combat);
        let mut ticks = 0;
        while battle.projectiles.len() == 2 {
            battle.update(DT);
            ticks += 1;
            assert!(ticks <= 20);
        }
        assert_eq!(ticks, 20);
    }

    #[test]
    fn test_huge_dt_retires_and_clears() {
        let mut battle = battle(8, &quiet());
        battle.force_spawn(ShipMode::Combat);
        for _ in 0..30 {
            battle.update(DT);
        }
        battle.update(1.0e6);
        assert!(!battle.ship.active);
        assert!(!battle.alien.active);
        assert!(battle.projectiles.is_empty());
        assert!(battle.particles.is_empty());
    }

    #[test]
    fn test_zero_dt_freezes_ship() {
        let mut battle = battle(9, &quiet());
        battle.force_spawn(ShipMode::Normal);
        let pos = battle.ship.pos;
        battle.update(0.0);
        assert_eq!(battle.ship.pos, pos);
        assert_eq!(battle.ship.timer, 0.0);
    }

    #[test]
    fn test_draw_blits_active_ship_only() {
        let mut battle = battle(10, &quiet());
        let bg = Surface::filled(800, 480, Rgba::rgb(0, 0, 0));
        let mut frame = bg.clone();
        battle.draw(&mut frame);
        assert_eq!(frame, bg);

        battle.force_spawn(ShipMode::Normal);
        battle.ship.pos = Vec2::new(400.0, 240.0);
        let mut frame = bg.clone();
        battle.draw(&mut frame);
        assert_ne!(frame, bg);
        assert_eq!(battle.render_cache_len(), 1);

        battle.clear_render_cache();
        assert_eq!(battle.render_cache_len(), 0);
    }

    #[test]
    fn test_broken_ship_uses_fine_angle_step() {
        let mut battle = battle(11, &quiet());
        battle.force_spawn(ShipMode::Broken);
        battle.ship.pos = Vec2::new(400.0, 240.0);
        let mut frame = Surface::new(800, 480);
        // 0.5 deg per update: a 1 deg step rerenders every other frame
        for _ in 0..12 {
            battle.update(DT);
            battle.draw(&mut frame);
        }
        assert!(battle.render_cache_len() >= 5);
    }

    #[test]
    fn test_settings_change_resizes_particle_cap() {
        let mut battle = battle(12, &quiet());
        let mut settings = quiet();
        settings.particles = false;
        battle.set_settings(&settings);
        battle.force_spawn(ShipMode::Normal);
        battle.update(DT);
        assert!(battle.particles.is_empty());
    }
}
