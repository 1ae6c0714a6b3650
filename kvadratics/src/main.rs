// main.rs - Life of Kvadratics: toroidal Game of Life with mouse and keyboard editing

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use life_engine::{patterns, Grid, Pattern};

mod config;
mod driver;
mod ui;

use config::Config;
use driver::DriverState;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        width = config.width,
        height = config.height,
        cell_size = config.cell_size,
        speed = config.speed,
        "starting Life of Kvadratics v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = LifeApp::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width as f32, config.height as f32])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Life of Kvadratics",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|err| anyhow!("window closed with an error: {err}"))
}

/// Front end: owns the engine and the playback state, and is the only
/// thing that talks to either.
pub struct LifeApp {
    grid: Grid,
    state: DriverState,
    cell_size: f32,
    last_step: Instant,
    shift_down: bool,

    runtime: tokio::runtime::Runtime,
}

impl LifeApp {
    pub fn new(config: &Config) -> Result<Self> {
        let grid = Grid::new(config.rows(), config.cols())?;
        let runtime = tokio::runtime::Runtime::new().context("failed to start the step runtime")?;

        let mut app = Self {
            grid,
            state: DriverState::new(config.speed),
            cell_size: config.cell_size as f32,
            last_step: Instant::now(),
            shift_down: false,
            runtime,
        };
        if let Some(name) = &config.pattern {
            let pattern = patterns::find(name).with_context(|| format!("unknown pattern '{name}'"))?;
            app.stamp_centered(pattern);
        }
        Ok(app)
    }

    /// Stamps a preset with its top-left corner at the middle of the grid.
    fn stamp_centered(&mut self, pattern: &Pattern) {
        self.grid.stamp(pattern, self.grid.rows() / 2, self.grid.cols() / 2);
    }
}
