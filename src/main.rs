//! Taplist Battlefield headless runner
//!
//! Drives the battlefield at a fixed timestep without a window: useful for
//! previewing a theme, soaking the simulation, or dumping a frame to PNG.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use taplist_battlefield::sim::entropy_seed;
use taplist_battlefield::{ArcadeBattlefield, Settings, ShipMode, Surface, Theme};

#[derive(Parser, Debug)]
#[command(name = "taplist-battlefield")]
#[command(about = "Arcade starfield battle backdrop for the taplist kiosk")]
struct Cli {
    /// Canvas size as WIDTHxHEIGHT
    #[arg(long, default_value = "800x480", value_parser = parse_size)]
    size: (u32, u32),
    /// Background theme (overrides the settings file)
    #[arg(long, value_enum)]
    bg: Option<CliTheme>,
    /// Force a ship in this mode on the first frame
    #[arg(long, value_enum)]
    force: Option<CliMode>,
    /// Rotation cache angle step in degrees (overrides the settings file)
    #[arg(long)]
    angle_step: Option<u32>,
    /// Simulation seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Fixed tick rate; each frame advances 1/fps seconds
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Re-force the --force mode every N frames
    #[arg(long)]
    spawn_every: Option<u32>,
    /// Log a JSON snapshot every N frames
    #[arg(long)]
    stats_every: Option<u32>,
    /// Write the final frame as PNG
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMode {
    Normal,
    Broken,
    Combat,
}

impl From<CliMode> for ShipMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Normal => ShipMode::Normal,
            CliMode::Broken => ShipMode::Broken,
            CliMode::Combat => ShipMode::Combat,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliTheme {
    Red,
    Blue,
    Black,
}

impl From<CliTheme> for Theme {
    fn from(value: CliTheme) -> Self {
        match value {
            CliTheme::Red => Theme::Red,
            CliTheme::Blue => Theme::Blue,
            CliTheme::Black => Theme::Black,
        }
    }
}

fn parse_size(raw: &str) -> Result<(u32, u32)> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width = w.trim().parse().with_context(|| format!("bad width {w:?}"))?;
    let height = h.trim().parse().with_context(|| format!("bad height {h:?}"))?;
    Ok((width, height))
}

fn load_settings(cli: &Cli) -> Settings {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(theme) = cli.bg {
        settings.theme = theme.into();
    }
    if let Some(step) = cli.angle_step {
        settings.angle_step = step;
    }
    settings
}

fn write_png(surface: &Surface, path: &Path) -> Result<()> {
    let (width, height) = surface.size();
    let image = image::RgbaImage::from_raw(width, height, surface.as_bytes().to_vec())
        .ok_or_else(|| anyhow!("surface buffer does not match {width}x{height}"))?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.fps == 0 {
        return Err(anyhow!("--fps must be at least 1"));
    }

    let settings = load_settings(&cli);
    let seed = cli.seed.unwrap_or_else(entropy_seed);
    let (width, height) = cli.size;
    let dt = 1.0 / cli.fps as f32;

    log::info!("Taplist Battlefield starting...");
    let mut battlefield = ArcadeBattlefield::with_settings(width, height, settings, seed);
    let mut surface = Surface::new(width, height);

    if let Some(mode) = cli.force {
        battlefield.force_spawn(mode.into());
    }

    let started = Instant::now();
    for frame in 1..=cli.frames {
        if let (Some(mode), Some(every)) = (cli.force, cli.spawn_every)
            && every > 0
            && frame % every == 0
        {
            battlefield.force_spawn(mode.into());
        }

        battlefield.update(dt);
        battlefield.draw(&mut surface, true, true);

        if let Some(every) = cli.stats_every
            && every > 0
            && frame % every == 0
        {
            let snapshot = serde_json::to_string(&battlefield.snapshot())
                .context("failed to serialize snapshot")?;
            log::info!("frame {}: {}", frame, snapshot);
        }
    }
    let elapsed = started.elapsed().as_secs_f64();

    let fps = if elapsed > 0.0 {
        cli.frames as f64 / elapsed
    } else {
        f64::INFINITY
    };
    log::info!(
        "Simulated {} frames ({:.1}s of animation) in {:.2}s: {:.0} fps, {} cached sprites",
        cli.frames,
        battlefield.clock(),
        elapsed,
        fps,
        battlefield.snapshot().render_cache_entries
    );

    if let Some(path) = &cli.dump {
        write_png(&surface, path)?;
    }

    Ok(())
}
