// concurrent.rs - Generation step with one coroutine per row

use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::grid::{count_neighbors_in, next_state, Grid};

/// Read-only view of the prior generation shared by every row task.
struct Snapshot {
    cells: Vec<u8>,
    rows: usize,
    cols: usize,
}

/// Computes the next state of one row against the snapshot, yielding to
/// the scheduler after every cell.
async fn process_row(row: usize, snapshot: Arc<Snapshot>) -> (usize, Vec<u8>) {
    let mut next_row = Vec::with_capacity(snapshot.cols);
    for col in 0..snapshot.cols {
        let count = count_neighbors_in(&snapshot.cells, snapshot.rows, snapshot.cols, row, col);
        let cell = snapshot.cells[row * snapshot.cols + col];
        next_row.push(next_state(cell, count));

        tokio::task::yield_now().await;
    }
    (row, next_row)
}

impl Grid {
    /// Same result as [`Grid::step`], but every row is computed by its own
    /// task on `runtime`. Nothing is written until all rows are done.
    pub fn step_concurrent(&mut self, runtime: &Runtime) {
        let (rows, cols) = (self.rows(), self.cols());
        let snapshot = Arc::new(Snapshot {
            cells: self.cells().to_vec(),
            rows,
            cols,
        });

        let results = runtime.block_on(async {
            let handles: Vec<_> = (0..rows)
                .map(|row| tokio::spawn(process_row(row, Arc::clone(&snapshot))))
                .collect();

            let mut results = Vec::with_capacity(rows);
            for handle in handles {
                match handle.await {
                    Ok(result) => results.push(result),
                    // Row computation is pure; a failed task is a panic inside it.
                    Err(err) => std::panic::resume_unwind(err.into_panic()),
                }
            }
            results
        });

        let scratch = self.scratch_mut();
        for (row, next_row) in results {
            scratch[row * cols..(row + 1) * cols].copy_from_slice(&next_row);
        }
        self.finish_step();
    }
}
