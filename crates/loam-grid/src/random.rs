//! Seeded random grid generation.

use crate::grid::{Grid, DEFAULT_POLLUTION};
use loam_core::{Agent, AgentId, Cell, FlowerCatalog, GridError, GridPos, PollutionBounds};
use rand::seq::SliceRandom;
use rand::Rng;

/// Parameters for random grid generation.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayout {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Fraction of cells that become obstacles, `0.0..=1.0`.
    pub obstacle_ratio: f32,
    /// Fraction of cells that become water, `0.0..=1.0`.
    pub water_ratio: f32,
    /// Number of agents to place on distinct walkable cells.
    pub agent_count: usize,
    /// Starting money per agent.
    pub starting_money: f32,
    /// Starting seeds per agent per flower type.
    pub starting_seeds: u32,
}

impl Default for RandomLayout {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            obstacle_ratio: 0.2,
            water_ratio: 0.0,
            agent_count: 2,
            starting_money: 0.0,
            starting_seeds: 10,
        }
    }
}

impl Grid {
    /// Generate a random grid: obstacles and water first, then agents,
    /// all on distinct cells chosen without replacement.
    ///
    /// The generation is fully determined by `rng`; seeding the RNG
    /// identically reproduces the same garden.
    ///
    /// # Errors
    ///
    /// [`GridError::InsufficientSpace`] if, after placing obstacles and
    /// water, fewer walkable cells remain than `agent_count`;
    /// [`GridError::EmptyGrid`] for zero dimensions.
    pub fn random<R: Rng>(
        params: &RandomLayout,
        bounds: PollutionBounds,
        catalog: FlowerCatalog,
        rng: &mut R,
    ) -> Result<(Grid, Vec<Agent>), GridError> {
        let num_types = catalog.len();
        let mut grid = Grid::filled(
            params.width,
            params.height,
            bounds,
            catalog,
            DEFAULT_POLLUTION,
        )?;

        let cell_count = grid.cell_count();
        let num_obstacles = (params.obstacle_ratio as f64 * cell_count as f64) as usize;
        let num_water = (params.water_ratio as f64 * cell_count as f64) as usize;
        let blocked = (num_obstacles + num_water).min(cell_count);
        let available = cell_count - blocked;
        if available < params.agent_count {
            return Err(GridError::InsufficientSpace {
                requested: params.agent_count,
                available,
            });
        }

        // One shuffle decides everything: the first segment becomes
        // obstacles, the next water, and agents take the cells after
        // that. Every placement is therefore without replacement.
        let width = params.width as i32;
        let mut positions: Vec<GridPos> = (0..cell_count as i32)
            .map(|i| GridPos::new(i / width, i % width))
            .collect();
        positions.shuffle(rng);

        for &pos in &positions[..num_obstacles] {
            *grid.get_cell_mut(pos).expect("generated in bounds") = Cell::obstacle();
        }
        for &pos in &positions[num_obstacles..blocked] {
            *grid.get_cell_mut(pos).expect("generated in bounds") = Cell::water();
        }

        let mut agents = Vec::with_capacity(params.agent_count);
        for (index, &pos) in positions[blocked..blocked + params.agent_count]
            .iter()
            .enumerate()
        {
            let id = AgentId(index as u32);
            grid.get_cell_mut(pos)
                .expect("generated in bounds")
                .set_occupant(Some(id));
            agents.push(Agent::with_uniform_seeds(
                id,
                pos,
                params.starting_money,
                params.starting_seeds,
                num_types,
            ));
        }

        Ok((grid, agents))
    }
}
