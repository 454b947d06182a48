//! Action legality predicates and mask computation.
//!
//! The mask and the resolver share one set of predicates, so an action
//! the mask marks legal is exactly an action the resolver will accept
//! (the one exception is same-step occupancy conflicts, which the mask
//! cannot foresee and the resolver handles silently).

use crate::state::WorldState;
use loam_core::{Action, ActionMask, ActionSet, Agent};

/// Whether `action` is legal for `agent` against the current state.
pub fn is_action_legal(
    state: &WorldState,
    agent: &Agent,
    action: Action,
    collisions: bool,
) -> bool {
    match action {
        Action::Move(direction) => {
            let target = agent.position().step(direction);
            if !state.grid.is_walkable(target) {
                return false;
            }
            if collisions {
                let occupant = state
                    .grid
                    .get_cell(target)
                    .expect("walkable implies in bounds")
                    .occupant();
                if occupant.is_some() && occupant != Some(agent.id()) {
                    return false;
                }
            }
            true
        }
        Action::Harvest => {
            let Ok(cell) = state.grid.get_cell(agent.position()) else {
                return false;
            };
            match cell.flower() {
                Some(flower) => state
                    .grid
                    .catalog()
                    .get(flower.flower_type())
                    .map(|spec| flower.is_grown(spec))
                    .unwrap_or(false),
                None => false,
            }
        }
        Action::Wait => true,
        Action::Plant(flower_type) => {
            if !state.grid.catalog().contains(flower_type) {
                return false;
            }
            let Ok(cell) = state.grid.get_cell(agent.position()) else {
                return false;
            };
            cell.can_plant_on() && agent.has_seed(flower_type)
        }
    }
}

/// Compute the full legality vector for one agent.
///
/// Returns `None` when the agent is not in the registry. The mask is a
/// snapshot: any change to the agent's position, cell contents, or seed
/// counts invalidates it, so callers recompute rather than cache.
pub fn action_mask(
    state: &WorldState,
    agent_id: loam_core::AgentId,
    set: &ActionSet,
    collisions: bool,
) -> Option<ActionMask> {
    let agent = state.agent(agent_id)?;
    let legal = set
        .iter()
        .map(|action| is_action_legal(state, agent, action, collisions))
        .collect();
    Some(ActionMask::new(legal))
}
