//! Top-level composition driven by the host loop

use serde::Serialize;

use crate::renderer::{Rgba, Surface};
use crate::settings::Settings;
use crate::sim::{
    AlienActor, BATTLE_STREAM, Battle, RngState, STARFIELD_STREAM, ShipActor, ShipMode,
    Starfield, entropy_seed,
};

/// Point-in-time view of the simulation for logs and tooling
#[derive(Debug, Clone, Serialize)]
pub struct DebugSnapshot {
    pub seed: u64,
    /// Seconds of simulated time
    pub clock: f32,
    pub ship: ShipActor,
    pub alien: AlienActor,
    pub bullets: usize,
    pub particles: usize,
    pub stars: usize,
    pub render_cache_entries: usize,
}

/// Starfield backdrop plus the ship battle in front of it
pub struct ArcadeBattlefield {
    width: u32,
    height: u32,
    background: Rgba,
    seed: u64,
    clock: f32,
    settings: Settings,
    starfield: Starfield,
    battle: Battle,
}

impl ArcadeBattlefield {
    /// Entropy-seeded battlefield with default settings
    pub fn new(width: u32, height: u32, background: impl Into<Rgba>) -> Self {
        Self::with_seed(width, height, background, entropy_seed())
    }

    /// Reproducible battlefield with default settings
    pub fn with_seed(width: u32, height: u32, background: impl Into<Rgba>, seed: u64) -> Self {
        let mut battlefield = Self::with_settings(width, height, Settings::default(), seed);
        battlefield.set_background(background.into());
        battlefield
    }

    /// Reproducible battlefield; the background comes from the settings theme
    pub fn with_settings(width: u32, height: u32, settings: Settings, seed: u64) -> Self {
        let background = settings.background();
        let starfield = Starfield::new(
            width,
            height,
            background,
            settings.star_density(),
            RngState::new(seed, STARFIELD_STREAM).to_rng(),
        );
        let battle = Battle::new(
            width,
            height,
            &settings,
            RngState::new(seed, BATTLE_STREAM).to_rng(),
        );
        log::info!(
            "Battlefield {}x{} seed={} quality={} theme={} gate={:?}",
            width,
            height,
            seed,
            settings.quality.as_str(),
            settings.theme.as_str(),
            settings.activation_timing
        );

        Self {
            width,
            height,
            background,
            seed,
            clock: 0.0,
            settings,
            starfield,
            battle,
        }
    }

    /// Regenerate the starfield for the new size; in-flight actors keep
    /// their positions
    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!(
            "Resize {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.starfield.resize(width, height);
        self.battle.resize(width, height);
    }

    /// Advance everything by `dt` seconds. Non-finite or negative values are
    /// treated as zero.
    pub fn update(&mut self, dt: f32) {
        let dt = self.sanitize_dt(dt);
        // Saturates rather than overflowing to infinity
        self.clock = (self.clock + dt).min(f32::MAX);
        self.starfield.update(dt);
        self.battle.update(dt);
    }

    fn sanitize_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid frame time {}", dt);
            return 0.0;
        }
        match self.settings.max_frame_dt {
            Some(max) if dt > max => {
                log::debug!("Clamping frame time {:.3}s to {:.3}s", dt, max);
                max.max(0.0)
            }
            _ => dt,
        }
    }

    /// Paint a frame. With the starfield off the surface is cleared to the
    /// background instead.
    pub fn draw(&mut self, surface: &mut Surface, draw_starfield: bool, draw_battle: bool) {
        if draw_starfield {
            self.starfield.draw(surface);
        } else {
            surface.fill(self.background);
        }
        if draw_battle {
            self.battle.draw(surface);
        }
    }

    /// Activate a ship in `mode` right now, bypassing the activation gate
    pub fn force_spawn(&mut self, mode: ShipMode) {
        self.battle.force_spawn(mode);
    }

    pub fn snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            seed: self.seed,
            clock: self.clock,
            ship: self.battle.ship.clone(),
            alien: self.battle.alien.clone(),
            bullets: self.battle.projectiles.len(),
            particles: self.battle.particles.len(),
            stars: self.starfield.stars().len(),
            render_cache_entries: self.battle.render_cache_len(),
        }
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
        self.starfield.set_background(background);
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.starfield.set_density(settings.star_density());
        self.battle.set_settings(&settings);
        self.settings = settings;
    }

    pub fn clear_render_cache(&mut self) {
        self.battle.clear_render_cache();
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut Battle {
        &mut self.battle
    }
}
