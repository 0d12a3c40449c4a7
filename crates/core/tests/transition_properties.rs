//! Property tests for the transition rule over arbitrary grids

use forest_fire_core::{advance, Cell, Grid};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![Just(Cell::Tree), Just(Cell::Fire), Just(Cell::Ash)]
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..12, 1usize..12).prop_flat_map(|(height, width)| {
        prop::collection::vec(arb_cell(), height * width)
            .prop_map(move |cells| Grid::from_cells(height, width, cells).unwrap())
    })
}

fn arb_fire_free_grid() -> impl Strategy<Value = Grid> {
    (1usize..12, 1usize..12).prop_flat_map(|(height, width)| {
        prop::collection::vec(prop_oneof![Just(Cell::Tree), Just(Cell::Ash)], height * width)
            .prop_map(move |cells| Grid::from_cells(height, width, cells).unwrap())
    })
}

/// True if some orthogonal neighbour of `(row, col)` is burning
fn touches_fire(grid: &Grid, row: usize, col: usize) -> bool {
    let candidates = [
        row.checked_sub(1).map(|r| (r, col)),
        Some((row, col + 1)),
        Some((row + 1, col)),
        col.checked_sub(1).map(|c| (row, c)),
    ];
    candidates
        .into_iter()
        .flatten()
        .any(|(r, c)| grid.get(r, c) == Some(Cell::Fire))
}

proptest! {
    #[test]
    fn ash_is_terminal_and_fire_decays(grid in arb_grid(), p in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (next, _) = advance(&grid, p, &mut rng);

        prop_assert_eq!(next.height(), grid.height());
        prop_assert_eq!(next.width(), grid.width());
        for (before, after) in grid.cells().iter().zip(next.cells()) {
            match before {
                Cell::Ash | Cell::Fire => {
                    prop_assert_eq!(*after, Cell::Ash);
                }
                Cell::Tree => {
                    prop_assert_ne!(*after, Cell::Ash);
                }
            }
        }
    }

    #[test]
    fn only_trees_next_to_fire_can_ignite(grid in arb_grid(), p in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (next, _) = advance(&grid, p, &mut rng);

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                if grid.get(row, col) == Some(Cell::Tree) && next.get(row, col) == Some(Cell::Fire) {
                    prop_assert!(touches_fire(&grid, row, col));
                }
            }
        }
    }

    #[test]
    fn zero_probability_never_ignites(grid in arb_grid(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (next, fire_remains) = advance(&grid, 0.0, &mut rng);

        prop_assert!(!fire_remains);
        prop_assert_eq!(next.counts().fires, 0);
        prop_assert_eq!(next.counts().trees, grid.counts().trees);
    }

    #[test]
    fn certain_probability_ignites_every_exposed_tree(grid in arb_grid(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (next, _) = advance(&grid, 1.0, &mut rng);

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                if grid.get(row, col) == Some(Cell::Tree) {
                    let expected = if touches_fire(&grid, row, col) { Cell::Fire } else { Cell::Tree };
                    prop_assert_eq!(next.get(row, col), Some(expected));
                }
            }
        }
    }

    #[test]
    fn fire_free_grid_is_unchanged(grid in arb_fire_free_grid(), p in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (next, fire_remains) = advance(&grid, p, &mut rng);

        prop_assert!(!fire_remains);
        prop_assert_eq!(next, grid);
    }

    #[test]
    fn fire_remains_matches_next_grid(grid in arb_grid(), p in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (next, fire_remains) = advance(&grid, p, &mut rng);
        prop_assert_eq!(fire_remains, next.has_fire());
    }

    #[test]
    fn text_rendering_round_trips(grid in arb_grid()) {
        let parsed: Grid = grid.to_string().parse().unwrap();
        prop_assert_eq!(parsed, grid);
    }
}
