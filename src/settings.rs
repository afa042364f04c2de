//! Battlefield settings and preferences
//!
//! Loaded from an optional JSON file next to the kiosk launcher. Every field
//! has a default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::ACTIVATION_CHANCE;
use crate::renderer::Rgba;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live exhaust particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }

    /// Multiplier applied to every starfield layer count
    pub fn star_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }
}

/// Display theme (background tint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Red,
    Blue,
    Black,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Red => "red",
            Theme::Blue => "blue",
            Theme::Black => "black",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Theme::Red),
            "blue" => Some(Theme::Blue),
            "black" => Some(Theme::Black),
            _ => None,
        }
    }

    pub fn background(&self) -> Rgba {
        match self {
            Theme::Red => Rgba::rgb(24, 2, 6),
            Theme::Blue => Rgba::rgb(10, 16, 32),
            Theme::Black => Rgba::rgb(0, 0, 0),
        }
    }
}

/// How the ship activation chance relates to time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum GateTiming {
    /// One Bernoulli draw per update call; spawn frequency follows frame rate
    #[default]
    PerUpdate,
    /// Chance rescaled by elapsed time, as if drawn `reference_hz` times a second
    WallClock { reference_hz: f32 },
}

impl GateTiming {
    /// Probability of activating during an update of length `dt`
    pub fn chance(&self, per_tick: f32, dt: f32) -> f32 {
        let p = per_tick.clamp(0.0, 1.0);
        match *self {
            GateTiming::PerUpdate => p,
            GateTiming::WallClock { reference_hz } => {
                let ticks = (dt * reference_hz).max(0.0);
                1.0 - (1.0 - p).powf(ticks)
            }
        }
    }
}

/// Battlefield settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Background theme
    pub theme: Theme,

    // === Sprite cache ===
    /// Angle quantization (degrees) for normal and combat ships
    pub angle_step: u32,
    /// Finer quantization while the ship is spinning out
    pub angle_step_broken: u32,

    // === Ship activation ===
    /// Activation chance per gate draw
    pub activation_chance: f32,
    pub activation_timing: GateTiming,

    // === Robustness ===
    /// Clamp for a single update's dt after a stall (None = unclamped)
    pub max_frame_dt: Option<f32>,

    // === Effects ===
    /// Thrust exhaust particles
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            theme: Theme::Red,

            angle_step: 3,
            angle_step_broken: 1,

            activation_chance: ACTIVATION_CHANCE,
            activation_timing: GateTiming::PerUpdate,

            max_frame_dt: None,

            particles: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset trades rotation smoothness for fewer cached surfaces
        if preset == QualityPreset::Low {
            self.angle_step = self.angle_step.max(6);
            self.angle_step_broken = self.angle_step_broken.max(3);
        }
    }

    pub fn background(&self) -> Rgba {
        self.theme.background()
    }

    /// Quantization step for the current ship state, never below 1
    pub fn effective_angle_step(&self, broken: bool) -> u32 {
        let step = if broken {
            self.angle_step_broken
        } else {
            self.angle_step
        };
        step.max(1)
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn star_density(&self) -> f32 {
        self.quality.star_density()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
