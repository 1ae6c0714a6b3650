use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use life_engine::patterns;

use crate::driver::{MAX_SPEED, MIN_SPEED};

/// Startup configuration, read once from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub speed: u32,
    pub pattern: Option<String>, // Preset stamped at the centre on startup
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            cell_size: 10,
            speed: 10,
            pattern: None,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            width: env_or("LIFE_WIDTH", defaults.width)?,
            height: env_or("LIFE_HEIGHT", defaults.height)?,
            cell_size: env_or("LIFE_CELL_SIZE", defaults.cell_size)?,
            speed: env_or("LIFE_SPEED", defaults.speed)?,
            pattern: std::env::var("LIFE_PATTERN").ok().filter(|name| !name.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "window size must be non-zero, got {}x{}",
            self.width,
            self.height
        );
        ensure!(self.cell_size > 0, "LIFE_CELL_SIZE must be non-zero");
        ensure!(
            self.cell_size <= self.width && self.cell_size <= self.height,
            "cell size {} does not fit a {}x{} window",
            self.cell_size,
            self.width,
            self.height
        );
        ensure!(
            (MIN_SPEED..=MAX_SPEED).contains(&self.speed),
            "LIFE_SPEED must be within {MIN_SPEED}..={MAX_SPEED}, got {}",
            self.speed
        );
        if let Some(name) = &self.pattern {
            ensure!(patterns::find(name).is_some(), "LIFE_PATTERN '{name}' is not a known pattern");
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        (self.height / self.cell_size) as usize
    }

    pub fn cols(&self) -> usize {
        (self.width / self.cell_size) as usize
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(key, std::env::var(key).ok().as_deref(), default)
}

/// Parses `raw` when the variable is set, otherwise falls back to `default`.
fn parse_or<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_dimensions() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows(), 60);
        assert_eq!(config.cols(), 80);
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let config = Config { cell_size: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_cell_larger_than_window() {
        let config = Config { width: 8, cell_size: 10, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_value_is_an_error() {
        let err = parse_or::<u32>("LIFE_SPEED", Some("fast"), 10).unwrap_err();
        assert!(err.to_string().contains("LIFE_SPEED"), "unexpected message: {err}");
        assert!(parse_or::<u32>("LIFE_WIDTH", Some("-800"), 800).is_err());
    }

    #[test]
    fn test_unset_value_uses_default() {
        assert_eq!(parse_or::<u32>("LIFE_SPEED", None, 10).unwrap(), 10);
        assert_eq!(parse_or::<u32>("LIFE_SPEED", Some(" 42 "), 10).unwrap(), 42);
    }

    #[test]
    fn test_pattern_must_be_known() {
        let known = Config { pattern: Some("glider".to_string()), ..Config::default() };
        assert!(known.validate().is_ok());

        let unknown = Config { pattern: Some("spaceship".to_string()), ..Config::default() };
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn test_speed_bounds() {
        for speed in [0, 61] {
            let config = Config { speed, ..Config::default() };
            assert!(config.validate().is_err(), "speed {speed} should be rejected");
        }
        for speed in [1, 60] {
            let config = Config { speed, ..Config::default() };
            assert!(config.validate().is_ok(), "speed {speed} should be accepted");
        }
    }
}
