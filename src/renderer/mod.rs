//! CPU rendering module
//!
//! Paints onto an owned RGBA `Surface`; presentation is up to the host.

pub mod cache;
pub mod shapes;
pub mod sprite;
pub mod surface;

pub use cache::SpriteRenderCache;
pub use sprite::{Sprite, SpriteKind};
pub use surface::{Rgba, Surface};
