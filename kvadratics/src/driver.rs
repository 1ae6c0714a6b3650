// driver.rs - Playback state owned by the front end, never by the engine

use std::time::{Duration, Instant};

use tracing::info;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 60;

#[derive(Debug, Clone)]
pub struct DriverState {
    running: bool,
    speed: u32,
    music_playing: bool,
    music_position: Duration, // Accumulated play time before the current run
    music_started: Option<Instant>,
}

impl DriverState {
    pub fn new(speed: u32) -> Self {
        Self {
            running: false,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            music_playing: false,
            music_position: Duration::ZERO,
            music_started: None,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        info!(running = self.running, "simulation toggled");
    }

    pub fn speed_up(&mut self) {
        self.speed = (self.speed + 1).min(MAX_SPEED);
        info!(speed = self.speed, "speed changed");
    }

    pub fn slow_down(&mut self) {
        self.speed = self.speed.saturating_sub(1).max(MIN_SPEED);
        info!(speed = self.speed, "speed changed");
    }

    /// Pausing remembers how far the track got; playing again resumes there.
    pub fn toggle_music(&mut self, now: Instant) {
        if let Some(started) = self.music_started.take() {
            self.music_position += now.saturating_duration_since(started);
            self.music_playing = false;
        } else {
            self.music_started = Some(now);
            self.music_playing = true;
        }
        info!(playing = self.music_playing, position = ?self.music_position, "music toggled");
    }

    pub fn music_position(&self, now: Instant) -> Duration {
        match self.music_started {
            Some(started) => self.music_position + now.saturating_duration_since(started),
            None => self.music_position,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.speed
    }

    /// Whether a step is owed given the time of the previous one.
    pub fn due(&self, last_step: Instant, now: Instant) -> bool {
        self.running && now.saturating_duration_since(last_step) >= self.tick_interval()
    }
}

/// Maps a pointer position, relative to the grid's top-left corner, to
/// `(row, col)`. Positions left of or above the grid have no cell; positions
/// past the far edges are passed through for the engine to reject.
pub fn cell_at(x: f32, y: f32, cell_size: f32) -> Option<(usize, usize)> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    Some(((y / cell_size) as usize, (x / cell_size) as usize))
}
