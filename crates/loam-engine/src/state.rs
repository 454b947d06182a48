//! The combined grid + agent snapshot a session steps over.

use indexmap::IndexMap;
use loam_core::{Agent, AgentId};
use loam_grid::Grid;

/// One complete, cloneable snapshot of the simulation state.
///
/// The session holds the live `WorldState` and clones it at the start of
/// each step; the clone serves as both the reward baseline and the
/// rollback point when a step fails.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldState {
    /// The garden grid.
    pub grid: Grid,
    /// Agent registry in ascending-ID order.
    pub agents: IndexMap<AgentId, Agent>,
}

impl WorldState {
    /// Assemble a state, ordering the registry by ascending agent ID.
    pub fn new(grid: Grid, mut agents: Vec<Agent>) -> Self {
        agents.sort_by_key(|a| a.id());
        let agents = agents.into_iter().map(|a| (a.id(), a)).collect();
        Self { grid, agents }
    }

    /// Agent by ID, if present.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Cumulative flowers planted per type, summed over all agents.
    ///
    /// The vector is indexed by flower type and sized from the grid's
    /// catalog.
    pub fn planted_counts(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.grid.catalog().len()];
        for agent in self.agents.values() {
            for (i, n) in agent.flowers_planted().iter().enumerate() {
                if let Some(slot) = counts.get_mut(i) {
                    *slot += *n as u64;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::{FlowerCatalog, FlowerTypeId, GridPos, PollutionBounds};
    use loam_grid::DEFAULT_POLLUTION;

    fn grid() -> Grid {
        Grid::filled(
            3,
            3,
            PollutionBounds::default(),
            FlowerCatalog::default(),
            DEFAULT_POLLUTION,
        )
        .unwrap()
    }

    #[test]
    fn registry_is_sorted_by_id() {
        let agents = vec![
            Agent::with_uniform_seeds(AgentId(2), GridPos::new(0, 0), 0.0, 1, 3),
            Agent::with_uniform_seeds(AgentId(0), GridPos::new(1, 1), 0.0, 1, 3),
            Agent::with_uniform_seeds(AgentId(1), GridPos::new(2, 2), 0.0, 1, 3),
        ];
        let state = WorldState::new(grid(), agents);
        let ids: Vec<AgentId> = state.agents.keys().copied().collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(2)]);
    }

    #[test]
    fn planted_counts_sum_across_agents() {
        let mut a = Agent::with_uniform_seeds(AgentId(0), GridPos::new(0, 0), 0.0, 5, 3);
        let mut b = Agent::with_uniform_seeds(AgentId(1), GridPos::new(1, 1), 0.0, 5, 3);
        a.record_planted(FlowerTypeId(0));
        a.record_planted(FlowerTypeId(1));
        b.record_planted(FlowerTypeId(0));
        let state = WorldState::new(grid(), vec![a, b]);
        assert_eq!(state.planted_counts(), vec![2, 1, 0]);
    }
}
