//! Fire spread transition rule
//!
//! One step maps the whole grid to its successor:
//!
//! - every burning cell becomes ash
//! - every tree orthogonally adjacent to a burning cell ignites with the
//!   spread probability, drawn independently per burning neighbour
//!
//! The rule reads only the previous grid and writes only the new one, so
//! fire started this step cannot spread again until the next step.

use crate::cell::Cell;
use crate::grid::Grid;
use rand::Rng;

/// Orthogonal neighbour offsets `(d_row, d_col)`: up, right, down, left
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Compute the next grid state
///
/// For each burning cell, in row-major order, one uniform value in `[0, 1)`
/// is drawn for each in-bounds neighbour that is a tree in `grid`. The tree
/// ignites if the draw is below `spread_probability`. A tree next to several
/// fires is drawn for once per fire, so its overall chance of igniting grows
/// with the number of burning neighbours.
///
/// # Arguments
///
/// * `grid` - Current state (not modified)
/// * `spread_probability` - Per-neighbour ignition chance in `[0, 1]`
/// * `rng` - Random source; pass a seeded generator for reproducible runs
///
/// # Returns
///
/// Tuple of `(next_grid, fire_remains)` where `fire_remains` is true if any
/// cell of `next_grid` is burning
pub fn advance<R: Rng + ?Sized>(
    grid: &Grid,
    spread_probability: f64,
    rng: &mut R,
) -> (Grid, bool) {
    let mut next = grid.clone();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = grid.cells()[grid.index(row, col)];
            if !cell.is_burning() {
                continue;
            }

            next.set(row, col, cell.decayed());

            for &(d_row, d_col) in &NEIGHBOR_OFFSETS {
                let Some((n_row, n_col)) = grid.offset(row, col, d_row, d_col) else {
                    continue;
                };
                if grid.cells()[grid.index(n_row, n_col)] != Cell::Tree {
                    continue;
                }
                if rng.random::<f64>() < spread_probability {
                    next.set(n_row, n_col, Cell::Fire);
                }
            }
        }
    }

    let fire_remains = next.has_fire();
    (next, fire_remains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Counts how many 64-bit draws the rule makes
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.inner.fill_bytes(dst);
        }
    }

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn test_fire_becomes_ash_and_ignites_all_neighbors_at_p1() {
        let mut rng = StdRng::seed_from_u64(1);
        let (next, fire_remains) = advance(&grid("TTT\nTFT\nTTT"), 1.0, &mut rng);
        assert_eq!(next, grid("TFT\nFAF\nTFT"));
        assert!(fire_remains);
    }

    #[test]
    fn test_no_spread_at_p0() {
        let mut rng = StdRng::seed_from_u64(2);
        let (next, fire_remains) = advance(&grid("TTT\nTFT\nTTT"), 0.0, &mut rng);
        assert_eq!(next, grid("TTT\nTAT\nTTT"));
        assert!(!fire_remains);
    }

    #[test]
    fn test_spread_reads_previous_state_only() {
        // Fire lit this step must not spread further in the same step
        let mut rng = StdRng::seed_from_u64(3);
        let (next, _) = advance(&grid("FTTTT"), 1.0, &mut rng);
        assert_eq!(next, grid("AFTTT"));
    }

    #[test]
    fn test_ash_and_fire_are_never_reignited() {
        let mut rng = StdRng::seed_from_u64(4);
        let (next, _) = advance(&grid("AFA\nFFF"), 1.0, &mut rng);
        assert_eq!(next, grid("AAA\nAAA"));
    }

    #[test]
    fn test_no_fire_is_a_noop() {
        let start = grid("TAT\nAAT");
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(5),
            draws: 0,
        };
        let (next, fire_remains) = advance(&start, 0.7, &mut rng);
        assert_eq!(next, start);
        assert!(!fire_remains);
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn test_one_draw_per_burning_neighbor() {
        // The middle tree borders two fires and is tested twice
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(6),
            draws: 0,
        };
        let _ = advance(&grid("FTF"), 0.0, &mut rng);
        assert_eq!(rng.draws, 2);
    }

    #[test]
    fn test_same_seed_same_result() {
        let start = grid("TTTTT\nTTTTT\nTTFTT\nTTTTT\nTTTTT");
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(advance(&start, 0.5, &mut a), advance(&start, 0.5, &mut b));
    }

    #[test]
    fn test_input_grid_is_untouched() {
        let start = grid("TFT");
        let copy = start.clone();
        let mut rng = StdRng::seed_from_u64(7);
        let _ = advance(&start, 1.0, &mut rng);
        assert_eq!(start, copy);
    }
}
