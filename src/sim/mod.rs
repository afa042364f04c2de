//! Deterministic simulation module
//!
//! All animation state lives here:
//! - Seeded RNG streams only
//! - Time-based motion, frame-authored rates scaled by `dt * FRAME_RATE`
//! - Stable iteration order (insertion order of stars, bullets, particles)

pub mod alien;
pub mod battle;
pub mod particle;
pub mod projectile;
pub mod rng;
pub mod ship;
pub mod starfield;

pub use alien::AlienActor;
pub use battle::Battle;
pub use particle::{Particle, ParticleSystem};
pub use projectile::{Bullet, ProjectileSystem};
pub use rng::{BATTLE_STREAM, RngState, STARFIELD_STREAM, SimRng, entropy_seed};
pub use ship::{Deactivation, ShipActor, ShipMode, ShipScale};
pub use starfield::{Star, StarLayer, Starfield, generate_layers};
