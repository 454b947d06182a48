//! Loam quickstart: a complete, minimal garden episode from scratch.
//!
//! Demonstrates:
//!   1. Building a `SessionConfig` with a random garden
//!   2. Resetting an episode under a seed
//!   3. Consulting action masks and submitting one action per agent
//!   4. Reading per-agent reward breakdowns and grid state
//!
//! Run with:
//!   cargo run --example quickstart

use indexmap::IndexMap;
use loam_core::{Action, AgentId, CellType, FlowerTypeId};
use loam_engine::{GardenSession, GridInit, SessionConfig};
use loam_grid::RandomLayout;

const STEPS: u64 = 25;

fn main() {
    let config = SessionConfig::new(GridInit::Random(RandomLayout {
        width: 8,
        height: 8,
        obstacle_ratio: 0.15,
        agent_count: 2,
        ..RandomLayout::default()
    }));
    let mut session = GardenSession::new(config).expect("valid config");
    session.reset(42).expect("random init fits the grid");

    println!(
        "garden {}x{}, {} agents, {} actions",
        session.grid().width(),
        session.grid().height(),
        session.agents().len(),
        session.action_set().len(),
    );

    for _ in 0..STEPS {
        let set = session.action_set().clone();
        let ids: Vec<AgentId> = session.agents().keys().copied().collect();

        // Greedy gardener policy: harvest when possible, otherwise plant
        // the cheapest type, otherwise wander, otherwise wait.
        let actions: IndexMap<AgentId, Action> = ids
            .iter()
            .map(|&id| {
                let mask = session.action_mask(id).expect("agent exists");
                let preferred = [
                    Action::Harvest,
                    Action::Plant(FlowerTypeId(2)),
                    Action::Move(loam_core::Direction::Right),
                    Action::Move(loam_core::Direction::Down),
                ];
                let action = preferred
                    .into_iter()
                    .find(|&a| mask.allows(&set, a))
                    .unwrap_or(Action::Wait);
                (id, action)
            })
            .collect();

        let outcome = session.apply_actions(&actions).expect("masked actions");
        for (id, reward) in &outcome.rewards {
            let ecology = reward.components.get("ecology").copied().unwrap_or(0.0);
            println!(
                "step {:>2} agent {id}: total {:+.4} (ecology {ecology:+.5})",
                outcome.step, reward.total,
            );
        }
    }

    let flowers = session
        .grid()
        .iter()
        .filter(|(_, c)| c.has_flower())
        .count();
    let ground = session
        .grid()
        .iter()
        .filter(|(_, c)| c.cell_type() == CellType::Ground)
        .count();
    println!(
        "after {STEPS} steps: {flowers} flowers on {ground} ground cells, \
         mean pollution {:.1}",
        session.grid().mean_pollution(),
    );
    for agent in session.agents().values() {
        println!(
            "agent {} at {}: money {:.1}, planted {:?}, harvested {:?}",
            agent.id(),
            agent.position(),
            agent.money(),
            agent.flowers_planted(),
            agent.flowers_harvested(),
        );
    }
}
