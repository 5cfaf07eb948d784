//! Anti-diagonal (wavefront) schedule.
//!
//! Every cell on diagonal `d = i + j` depends only on diagonal `d - 1`, so a
//! whole diagonal is computed in parallel against an immutable view of the
//! grid and written back before the next one starts. The collect is the
//! barrier between diagonals.

use rayon::prelude::*;

use super::evaluation::Evaluation;
use super::solver::PartitionGrid;
use crate::disorder::PotentialGrid;
use crate::error::Result;

/// Diagonals shorter than this are not worth splitting across threads.
const MIN_CELLS_PER_TASK: usize = 64;

pub(super) fn fill(
    grid: &mut PartitionGrid,
    potential: &PotentialGrid,
    temperature: f64,
    evaluation: Evaluation,
) -> Result<()> {
    let dimension = potential.nrows();
    let mut diagonal = Vec::with_capacity(dimension);

    for d in 0..(2 * dimension - 1) {
        let rows = d.saturating_sub(dimension - 1)..d.min(dimension - 1) + 1;

        let view: &PartitionGrid = grid;
        rows.clone()
            .into_par_iter()
            .with_min_len(MIN_CELLS_PER_TASK)
            .map(|i| evaluation.site(view, potential, temperature, i, d - i))
            .collect_into_vec(&mut diagonal);

        for (i, &value) in rows.zip(diagonal.iter()) {
            grid[(i, d - i)] = evaluation.accept(i, d - i, value)?;
        }
    }
    Ok(())
}
