//! Gardener agents: position, money, seed inventory, and statistics.

use crate::id::{AgentId, FlowerTypeId};
use crate::pos::GridPos;

/// Per-agent mutable state.
///
/// Agents are owned by the simulation session; cells hold only an
/// occupancy index back to the agent's ID. Seed counts are per flower
/// type; a count of `None` means an infinite supply (never decremented).
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    id: AgentId,
    position: GridPos,
    money: f32,
    seeds: Vec<Option<u32>>,
    flowers_planted: Vec<u32>,
    flowers_harvested: Vec<u32>,
    turns_without_income: u32,
}

impl Agent {
    /// Create an agent with one seed-count slot per flower type.
    pub fn new(id: AgentId, position: GridPos, money: f32, seeds: Vec<Option<u32>>) -> Self {
        let num_types = seeds.len();
        Self {
            id,
            position,
            money,
            seeds,
            flowers_planted: vec![0; num_types],
            flowers_harvested: vec![0; num_types],
            turns_without_income: 0,
        }
    }

    /// Create an agent holding `count` seeds of each of `num_types` types.
    pub fn with_uniform_seeds(
        id: AgentId,
        position: GridPos,
        money: f32,
        count: u32,
        num_types: usize,
    ) -> Self {
        Self::new(id, position, money, vec![Some(count); num_types])
    }

    /// This agent's identifier.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Current grid position.
    pub fn position(&self) -> GridPos {
        self.position
    }

    /// Move the agent's own record; the grid occupancy index is updated
    /// separately by the resolver.
    pub fn set_position(&mut self, position: GridPos) {
        self.position = position;
    }

    /// Current money balance.
    pub fn money(&self) -> f32 {
        self.money
    }

    /// Credit harvest proceeds.
    pub fn add_money(&mut self, amount: f32) {
        debug_assert!(amount >= 0.0);
        self.money += amount;
    }

    /// Seed count for a flower type: `Some(n)` finite, `None` infinite.
    pub fn seed_count(&self, flower_type: FlowerTypeId) -> Option<u32> {
        self.seeds
            .get(flower_type.0 as usize)
            .copied()
            .unwrap_or(Some(0))
    }

    /// Whether the agent can plant this type right now.
    pub fn has_seed(&self, flower_type: FlowerTypeId) -> bool {
        match self.seed_count(flower_type) {
            None => true,
            Some(n) => n > 0,
        }
    }

    /// Consume one seed of `flower_type`; infinite stocks are left
    /// untouched. Returns `false` (and changes nothing) without a seed.
    pub fn consume_seed(&mut self, flower_type: FlowerTypeId) -> bool {
        let Some(slot) = self.seeds.get_mut(flower_type.0 as usize) else {
            return false;
        };
        match slot {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

    /// Add seeds of `flower_type` (no-op on an infinite stock).
    pub fn add_seeds(&mut self, flower_type: FlowerTypeId, count: u32) {
        if let Some(Some(n)) = self.seeds.get_mut(flower_type.0 as usize) {
            *n += count;
        }
    }

    /// Cumulative flowers planted, indexed by flower type.
    pub fn flowers_planted(&self) -> &[u32] {
        &self.flowers_planted
    }

    /// Cumulative flowers harvested, indexed by flower type.
    pub fn flowers_harvested(&self) -> &[u32] {
        &self.flowers_harvested
    }

    /// Record a successful plant of `flower_type`.
    pub fn record_planted(&mut self, flower_type: FlowerTypeId) {
        if let Some(n) = self.flowers_planted.get_mut(flower_type.0 as usize) {
            *n += 1;
        }
    }

    /// Record a successful harvest of `flower_type` and reset the
    /// income drought counter.
    pub fn record_harvested(&mut self, flower_type: FlowerTypeId) {
        if let Some(n) = self.flowers_harvested.get_mut(flower_type.0 as usize) {
            *n += 1;
        }
        self.turns_without_income = 0;
    }

    /// Consecutive steps since the agent last earned money.
    pub fn turns_without_income(&self) -> u32 {
        self.turns_without_income
    }

    /// Note a step that produced no income (move, plant, wait).
    pub fn note_turn_without_income(&mut self) {
        self.turns_without_income += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Agent {
        Agent::with_uniform_seeds(AgentId(0), GridPos::new(1, 1), 0.0, 2, 3)
    }

    #[test]
    fn consume_seed_decrements() {
        let mut a = agent();
        assert!(a.consume_seed(FlowerTypeId(0)));
        assert_eq!(a.seed_count(FlowerTypeId(0)), Some(1));
        assert!(a.consume_seed(FlowerTypeId(0)));
        assert_eq!(a.seed_count(FlowerTypeId(0)), Some(0));
        assert!(!a.consume_seed(FlowerTypeId(0)));
        assert_eq!(a.seed_count(FlowerTypeId(0)), Some(0));
    }

    #[test]
    fn infinite_seeds_never_deplete() {
        let mut a = Agent::new(AgentId(1), GridPos::new(0, 0), 0.0, vec![None]);
        for _ in 0..100 {
            assert!(a.has_seed(FlowerTypeId(0)));
            assert!(a.consume_seed(FlowerTypeId(0)));
        }
        assert_eq!(a.seed_count(FlowerTypeId(0)), None);
    }

    #[test]
    fn add_seeds_ignores_infinite_stock() {
        let mut a = Agent::new(AgentId(1), GridPos::new(0, 0), 0.0, vec![None, Some(1)]);
        a.add_seeds(FlowerTypeId(0), 5);
        a.add_seeds(FlowerTypeId(1), 5);
        assert_eq!(a.seed_count(FlowerTypeId(0)), None);
        assert_eq!(a.seed_count(FlowerTypeId(1)), Some(6));
    }

    #[test]
    fn unknown_type_has_no_seeds() {
        let mut a = agent();
        assert!(!a.has_seed(FlowerTypeId(7)));
        assert!(!a.consume_seed(FlowerTypeId(7)));
    }

    #[test]
    fn harvest_resets_income_drought() {
        let mut a = agent();
        a.note_turn_without_income();
        a.note_turn_without_income();
        assert_eq!(a.turns_without_income(), 2);
        a.record_harvested(FlowerTypeId(1));
        assert_eq!(a.turns_without_income(), 0);
        assert_eq!(a.flowers_harvested()[1], 1);
    }

    #[test]
    fn statistics_track_per_type() {
        let mut a = agent();
        a.record_planted(FlowerTypeId(0));
        a.record_planted(FlowerTypeId(0));
        a.record_planted(FlowerTypeId(2));
        assert_eq!(a.flowers_planted(), &[2, 0, 1]);
    }
}
