//! Thrust exhaust particles

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::rng::SimRng;
use super::ship::ShipActor;
use crate::consts::*;
use crate::renderer::{Surface, shapes};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Opacity in (0, 1]
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Emission stops while this many particles are alive
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            max_particles,
        }
    }

    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles;
    }

    /// Spray a small cone of exhaust backward from the ship's tail
    pub fn emit_thrust(&mut self, ship: &ShipActor, rng: &mut SimRng) {
        if !ship.active || !ship.mode.emits_thrust() {
            return;
        }

        let origin = ship.thrust_origin();
        let backward = ship.angle.to_radians() + PI;
        let scale = ship.scale.factor();
        for _ in 0..THRUST_PARTICLES {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let direction = backward + (rng.random::<f32>() - 0.5) * THRUST_SPREAD;
            let speed = 1.0 + rng.random::<f32>() * 0.5;
            let radius = (3.0 + rng.random::<f32>()) * scale;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(direction) * speed,
                radius,
                alpha: 1.0,
            });
        }
    }

    /// Drift, shrink and fade; particles are removed once fully faded
    pub fn update(&mut self, dt: f32) {
        let frames = dt * FRAME_RATE;
        let shrink = PARTICLE_RADIUS_DECAY.powf(frames);
        for particle in &mut self.particles {
            particle.pos += particle.vel * dt;
            particle.radius *= shrink;
            particle.alpha -= PARTICLE_FADE * frames;
        }
        self.particles.retain(|p| p.alpha > 0.0);
    }

    pub fn draw(&self, surface: &mut Surface) {
        for particle in &self.particles {
            shapes::exhaust_glow(surface, particle.pos, particle.radius, particle.alpha);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
