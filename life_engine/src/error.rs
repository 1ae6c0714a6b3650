use thiserror::Error;

/// Everything the engine can refuse. Both variants come from externally
/// supplied values; `step`, `randomize` and `clear` never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifeError {
    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}
