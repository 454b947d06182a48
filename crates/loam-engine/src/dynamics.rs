//! Per-step environmental dynamics: pollution drift and flower growth.

use loam_grid::Grid;

/// Advance the non-agent-driven grid state by one step.
///
/// Every pollution-bearing cell is processed exactly once, and the
/// per-cell operations are independent, so the result does not depend
/// on iteration order:
///
/// - a cell with a flower loses that flower's current-stage pollution
///   reduction (floored at the minimum), then the flower grows one
///   stage if it is below its type's maximum;
/// - a flowerless cell gains the pollution increment (capped at the
///   maximum);
/// - cells without pollution (obstacles, water) are untouched.
pub fn update_dynamics(grid: &mut Grid) {
    let bounds = *grid.bounds();

    // The reduction and stage cap depend on the catalog, which cannot be
    // borrowed while the cells are mutated; gather them first.
    let flower_params: Vec<Option<(f32, u32)>> = grid
        .iter()
        .map(|(_, cell)| {
            cell.flower().map(|flower| {
                let spec = grid
                    .catalog()
                    .get(flower.flower_type())
                    .expect("planted flowers always reference the catalog");
                (spec.reduction_at(flower.stage()), spec.max_stage())
            })
        })
        .collect();

    for ((_, cell), params) in grid.iter_mut().zip(flower_params) {
        cell.update_pollution(&bounds, params.map(|(reduction, _)| reduction));
        if let (Some(flower), Some((_, max_stage))) = (cell.flower_mut(), params) {
            flower.grow(max_stage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::{
        AgentId, Cell, Flower, FlowerCatalog, FlowerSpec, FlowerTypeId, GridPos, PollutionBounds,
    };
    use loam_grid::DEFAULT_POLLUTION;
    use proptest::prelude::*;

    fn test_grid(catalog: FlowerCatalog) -> Grid {
        Grid::filled(3, 3, PollutionBounds::default(), catalog, DEFAULT_POLLUTION).unwrap()
    }

    #[test]
    fn empty_cells_gain_increment() {
        let mut grid = test_grid(FlowerCatalog::default());
        update_dynamics(&mut grid);
        for (_, cell) in grid.iter() {
            assert_eq!(cell.pollution(), Some(DEFAULT_POLLUTION + 1.0));
        }
    }

    #[test]
    fn flower_cell_loses_current_stage_reduction_then_grows() {
        // Reduction table [2, 7]: stage 0 reduces 2 this step, and the
        // flower reaches stage 1 afterwards.
        let catalog = FlowerCatalog::new(vec![FlowerSpec::new(1.0, [2.0, 7.0])]).unwrap();
        let mut grid = test_grid(catalog);
        let pos = GridPos::new(1, 1);
        grid.get_cell_mut(pos)
            .unwrap()
            .plant(Flower::new(FlowerTypeId(0), AgentId(0)));

        update_dynamics(&mut grid);

        let cell = grid.get_cell(pos).unwrap();
        assert_eq!(cell.pollution(), Some(DEFAULT_POLLUTION - 2.0));
        assert_eq!(cell.flower().unwrap().stage(), 1);

        update_dynamics(&mut grid);
        let cell = grid.get_cell(pos).unwrap();
        assert_eq!(cell.pollution(), Some(DEFAULT_POLLUTION - 2.0 - 7.0));
        assert_eq!(cell.flower().unwrap().stage(), 1, "stage saturates");
    }

    #[test]
    fn obstacles_are_skipped() {
        let mut grid = test_grid(FlowerCatalog::default());
        *grid.get_cell_mut(GridPos::new(0, 0)).unwrap() = Cell::obstacle();
        *grid.get_cell_mut(GridPos::new(0, 1)).unwrap() = Cell::water();
        update_dynamics(&mut grid);
        assert_eq!(grid.get_cell(GridPos::new(0, 0)).unwrap().pollution(), None);
        assert_eq!(grid.get_cell(GridPos::new(0, 1)).unwrap().pollution(), None);
    }

    #[test]
    fn growth_stops_at_max_stage() {
        let catalog = FlowerCatalog::default();
        let mut grid = test_grid(catalog);
        let pos = GridPos::new(0, 0);
        grid.get_cell_mut(pos)
            .unwrap()
            .plant(Flower::new(FlowerTypeId(1), AgentId(0)));
        for _ in 0..10 {
            update_dynamics(&mut grid);
        }
        assert_eq!(grid.get_cell(pos).unwrap().flower().unwrap().stage(), 3);
    }

    proptest! {
        #[test]
        fn pollution_always_within_bounds(
            initial in 0.0f32..=100.0,
            with_flower in proptest::bool::ANY,
            steps in 1usize..30,
        ) {
            let mut grid = test_grid(FlowerCatalog::default());
            let pos = GridPos::new(2, 2);
            {
                let cell = grid.get_cell_mut(pos).unwrap();
                *cell = Cell::ground(initial);
                if with_flower {
                    cell.plant(Flower::new(FlowerTypeId(0), AgentId(0)));
                }
            }
            for _ in 0..steps {
                update_dynamics(&mut grid);
                for (_, cell) in grid.iter() {
                    if let Some(p) = cell.pollution() {
                        prop_assert!(grid.bounds().contains(p));
                    }
                }
            }
        }
    }
}
