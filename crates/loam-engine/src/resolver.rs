//! Applies one step's worth of agent actions against the world state.
//!
//! All agents act "simultaneously" within a step; simultaneity is
//! resolved by applying actions in ascending agent-ID order. When two
//! agents target the same free cell, the lower ID claims it and the
//! higher ID sees an occupied cell and stays put.

use crate::config::SeedReturnPolicy;
use crate::mask::is_action_legal;
use crate::state::WorldState;
use loam_core::{Action, AgentId, Flower, IllegalReason, StepError};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Apply every agent's action for this step, in ascending-ID order.
///
/// Agents missing from `actions` wait. Occupancy conflicts under
/// collisions fail silently (the mover stays); every other precondition
/// violation is a mask bypass and fails the step with
/// [`StepError::IllegalAction`]. The caller owns rollback: on error the
/// state may be partially mutated and must be discarded.
pub fn resolve_actions(
    state: &mut WorldState,
    actions: &indexmap::IndexMap<AgentId, Action>,
    collisions: bool,
    seed_return: SeedReturnPolicy,
    rng: &mut ChaCha8Rng,
) -> Result<(), StepError> {
    for id in actions.keys() {
        if !state.agents.contains_key(id) {
            return Err(StepError::UnknownAgent { agent: *id });
        }
    }

    // The registry is kept in ascending-ID order, which is exactly the
    // resolution order.
    let ids: Vec<AgentId> = state.agents.keys().copied().collect();
    for id in ids {
        let action = actions.get(&id).copied().unwrap_or(Action::Wait);
        apply_one(state, id, action, collisions, seed_return, rng)?;
    }
    Ok(())
}

fn illegal(agent: AgentId, action: Action, reason: IllegalReason) -> StepError {
    StepError::IllegalAction {
        agent,
        action,
        reason,
    }
}

fn apply_one(
    state: &mut WorldState,
    id: AgentId,
    action: Action,
    collisions: bool,
    seed_return: SeedReturnPolicy,
    rng: &mut ChaCha8Rng,
) -> Result<(), StepError> {
    match action {
        Action::Move(direction) => {
            let from = state.agents[&id].position();
            let target = from.step(direction);
            if !state.grid.contains(target) {
                return Err(illegal(id, action, IllegalReason::MoveOutOfBounds));
            }
            let cell = state.grid.get_cell(target).expect("contains checked");
            if !cell.can_walk_on() {
                return Err(illegal(id, action, IllegalReason::MoveBlockedByTerrain));
            }
            if collisions && cell.has_agent() {
                // Blocked by an occupant (possibly one that claimed the
                // cell earlier this same step): stay in place, no error.
                return Ok(());
            }
            // Under collisions-off the occupancy index keeps the most
            // recent arrival, so only clear the source cell if this
            // agent is still the one recorded there.
            let source = state.grid.get_cell_mut(from).expect("agent stands in bounds");
            if source.occupant() == Some(id) {
                source.set_occupant(None);
            }
            state
                .grid
                .get_cell_mut(target)
                .expect("contains checked")
                .set_occupant(Some(id));
            let agent = state.agents.get_mut(&id).expect("registry checked");
            agent.set_position(target);
            agent.note_turn_without_income();
            Ok(())
        }
        Action::Harvest => {
            let position = state.agents[&id].position();
            let legal = is_action_legal(state, &state.agents[&id], action, collisions);
            if !legal {
                let cell = state.grid.get_cell(position).expect("agent stands in bounds");
                let reason = if cell.has_flower() {
                    IllegalReason::FlowerNotGrown
                } else {
                    IllegalReason::NothingToHarvest
                };
                return Err(illegal(id, action, reason));
            }
            let flower = state
                .grid
                .get_cell_mut(position)
                .expect("agent stands in bounds")
                .take_flower()
                .expect("legality check saw a flower");
            let spec = state
                .grid
                .catalog()
                .get(flower.flower_type())
                .expect("flower types come from the catalog");
            let price = spec.price;
            let seeds = match seed_return {
                SeedReturnPolicy::Fixed(n) => n,
                SeedReturnPolicy::Disabled => 0,
                SeedReturnPolicy::RandomPerHarvest => rng.random_range(1..5),
            };
            let agent = state.agents.get_mut(&id).expect("registry checked");
            agent.add_money(price);
            if !matches!(seed_return, SeedReturnPolicy::Disabled) {
                agent.add_seeds(flower.flower_type(), seeds);
            }
            agent.record_harvested(flower.flower_type());
            Ok(())
        }
        Action::Wait => {
            state
                .agents
                .get_mut(&id)
                .expect("registry checked")
                .note_turn_without_income();
            Ok(())
        }
        Action::Plant(flower_type) => {
            if !state.grid.catalog().contains(flower_type) {
                return Err(illegal(id, action, IllegalReason::UnknownFlowerType));
            }
            let position = state.agents[&id].position();
            let cell = state.grid.get_cell(position).expect("agent stands in bounds");
            if !cell.can_plant_on() {
                return Err(illegal(id, action, IllegalReason::CellNotPlantable));
            }
            if !state.agents[&id].has_seed(flower_type) {
                return Err(illegal(id, action, IllegalReason::NoSeeds));
            }
            let agent = state.agents.get_mut(&id).expect("registry checked");
            agent.consume_seed(flower_type);
            agent.record_planted(flower_type);
            agent.note_turn_without_income();
            state
                .grid
                .get_cell_mut(position)
                .expect("agent stands in bounds")
                .plant(Flower::new(flower_type, id));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use loam_core::{
        Agent, Cell, Direction, FlowerCatalog, FlowerTypeId, GridPos, PollutionBounds,
    };
    use loam_grid::{Grid, DEFAULT_POLLUTION};
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0)
    }

    fn three_by_three(agent_positions: &[GridPos]) -> WorldState {
        let mut grid = Grid::filled(
            3,
            3,
            PollutionBounds::default(),
            FlowerCatalog::default(),
            DEFAULT_POLLUTION,
        )
        .unwrap();
        let mut agents = Vec::new();
        for (i, &pos) in agent_positions.iter().enumerate() {
            let id = AgentId(i as u32);
            grid.get_cell_mut(pos).unwrap().set_occupant(Some(id));
            agents.push(Agent::with_uniform_seeds(id, pos, 0.0, 10, 3));
        }
        WorldState::new(grid, agents)
    }

    fn act(pairs: &[(u32, Action)]) -> IndexMap<AgentId, Action> {
        pairs.iter().map(|&(id, a)| (AgentId(id), a)).collect()
    }

    #[test]
    fn simple_move_updates_both_cells() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Move(Direction::Up))]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(0)].position(), GridPos::new(0, 1));
        assert_eq!(state.grid.get_cell(GridPos::new(1, 1)).unwrap().occupant(), None);
        assert_eq!(
            state.grid.get_cell(GridPos::new(0, 1)).unwrap().occupant(),
            Some(AgentId(0))
        );
    }

    #[test]
    fn move_off_grid_is_illegal() {
        let mut state = three_by_three(&[GridPos::new(0, 0)]);
        let err = resolve_actions(
            &mut state,
            &act(&[(0, Action::Move(Direction::Up))]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StepError::IllegalAction {
                reason: IllegalReason::MoveOutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn move_into_obstacle_is_illegal() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        *state.grid.get_cell_mut(GridPos::new(0, 1)).unwrap() = Cell::obstacle();
        let err = resolve_actions(
            &mut state,
            &act(&[(0, Action::Move(Direction::Up))]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StepError::IllegalAction {
                reason: IllegalReason::MoveBlockedByTerrain,
                ..
            }
        ));
    }

    #[test]
    fn lower_id_claims_contested_cell() {
        // Both agents target (1, 1): agent 0 from the left, agent 1 from
        // the right. Agent 0 resolves first and claims the cell.
        let mut state = three_by_three(&[GridPos::new(1, 0), GridPos::new(1, 2)]);
        resolve_actions(
            &mut state,
            &act(&[
                (1, Action::Move(Direction::Left)),
                (0, Action::Move(Direction::Right)),
            ]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(0)].position(), GridPos::new(1, 1));
        assert_eq!(state.agents[&AgentId(1)].position(), GridPos::new(1, 2));
        assert_eq!(
            state.grid.get_cell(GridPos::new(1, 1)).unwrap().occupant(),
            Some(AgentId(0))
        );
    }

    #[test]
    fn blocked_move_is_silent_with_collisions_on() {
        let mut state = three_by_three(&[GridPos::new(1, 0), GridPos::new(1, 1)]);
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Move(Direction::Right))]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(0)].position(), GridPos::new(1, 0));
    }

    #[test]
    fn agents_share_cells_with_collisions_off() {
        let mut state = three_by_three(&[GridPos::new(1, 0), GridPos::new(1, 1)]);
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Move(Direction::Right))]),
            false,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(0)].position(), GridPos::new(1, 1));
        assert_eq!(state.agents[&AgentId(1)].position(), GridPos::new(1, 1));
    }

    #[test]
    fn plant_consumes_exactly_one_seed() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Plant(FlowerTypeId(1)))]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        let agent = &state.agents[&AgentId(0)];
        assert_eq!(agent.seed_count(FlowerTypeId(1)), Some(9));
        assert_eq!(agent.flowers_planted(), &[0, 1, 0]);
        let flower = state
            .grid
            .get_cell(GridPos::new(1, 1))
            .unwrap()
            .flower()
            .unwrap();
        assert_eq!(flower.flower_type(), FlowerTypeId(1));
        assert_eq!(flower.stage(), 0);
        assert_eq!(flower.owner(), AgentId(0));
    }

    #[test]
    fn plant_without_seeds_is_illegal() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        let agent = state.agents.get_mut(&AgentId(0)).unwrap();
        while agent.consume_seed(FlowerTypeId(0)) {}
        let err = resolve_actions(
            &mut state,
            &act(&[(0, Action::Plant(FlowerTypeId(0)))]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StepError::IllegalAction {
                reason: IllegalReason::NoSeeds,
                ..
            }
        ));
    }

    #[test]
    fn harvest_pays_price_and_returns_seeds() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        // Single-stage type 2: grown the moment it is planted.
        state
            .grid
            .get_cell_mut(GridPos::new(1, 1))
            .unwrap()
            .plant(Flower::new(FlowerTypeId(2), AgentId(0)));
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Harvest)]),
            true,
            SeedReturnPolicy::Fixed(2),
            &mut rng(),
        )
        .unwrap();
        let agent = &state.agents[&AgentId(0)];
        assert_eq!(agent.money(), 2.0);
        assert_eq!(agent.seed_count(FlowerTypeId(2)), Some(12));
        assert_eq!(agent.flowers_harvested(), &[0, 0, 1]);
        assert!(!state.grid.get_cell(GridPos::new(1, 1)).unwrap().has_flower());
    }

    #[test]
    fn harvest_with_disabled_seed_return() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        state
            .grid
            .get_cell_mut(GridPos::new(1, 1))
            .unwrap()
            .plant(Flower::new(FlowerTypeId(2), AgentId(0)));
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Harvest)]),
            true,
            SeedReturnPolicy::Disabled,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(0)].seed_count(FlowerTypeId(2)), Some(10));
    }

    #[test]
    fn harvest_immature_flower_is_illegal() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        state
            .grid
            .get_cell_mut(GridPos::new(1, 1))
            .unwrap()
            .plant(Flower::new(FlowerTypeId(0), AgentId(0)));
        let err = resolve_actions(
            &mut state,
            &act(&[(0, Action::Harvest)]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StepError::IllegalAction {
                reason: IllegalReason::FlowerNotGrown,
                ..
            }
        ));
    }

    #[test]
    fn harvest_empty_cell_is_illegal() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        let err = resolve_actions(
            &mut state,
            &act(&[(0, Action::Harvest)]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StepError::IllegalAction {
                reason: IllegalReason::NothingToHarvest,
                ..
            }
        ));
    }

    #[test]
    fn unknown_agent_rejected_before_any_mutation() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        let before = state.clone();
        let err = resolve_actions(
            &mut state,
            &act(&[(0, Action::Wait), (5, Action::Wait)]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err, StepError::UnknownAgent { agent: AgentId(5) });
        assert_eq!(state, before);
    }

    #[test]
    fn missing_action_defaults_to_wait() {
        let mut state = three_by_three(&[GridPos::new(1, 1), GridPos::new(0, 0)]);
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Wait)]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(1)].turns_without_income(), 1);
    }

    #[test]
    fn income_drought_counter_tracks_actions() {
        let mut state = three_by_three(&[GridPos::new(1, 1)]);
        state
            .grid
            .get_cell_mut(GridPos::new(1, 1))
            .unwrap()
            .plant(Flower::new(FlowerTypeId(2), AgentId(0)));
        // Wait, wait, harvest: counter 1, 2, then reset.
        for _ in 0..2 {
            resolve_actions(
                &mut state,
                &act(&[(0, Action::Wait)]),
                true,
                SeedReturnPolicy::default(),
                &mut rng(),
            )
            .unwrap();
        }
        assert_eq!(state.agents[&AgentId(0)].turns_without_income(), 2);
        resolve_actions(
            &mut state,
            &act(&[(0, Action::Harvest)]),
            true,
            SeedReturnPolicy::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(state.agents[&AgentId(0)].turns_without_income(), 0);
    }
}
