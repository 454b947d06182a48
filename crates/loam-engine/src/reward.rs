//! Multi-objective reward computation.
//!
//! Rewards are computed per agent from the pre- and post-step snapshots
//! plus the action taken. Each named objective implements
//! [`RewardComponent`]; the calculator aggregates the enabled components
//! into an unweighted mean. Adding an objective means adding one
//! implementation and listing it at construction; existing components
//! are untouched.
//!
//! The computation is pure: identical snapshots and action always give
//! identical rewards.

use crate::state::WorldState;
use indexmap::IndexMap;
use loam_core::{Action, Agent, AgentId, FlowerCatalog, PollutionBounds};

/// Everything a component may look at when scoring one agent's step.
pub struct RewardContext<'a> {
    /// Snapshot taken before the step's action resolution.
    pub before: &'a WorldState,
    /// Snapshot after action resolution and dynamics.
    pub after: &'a WorldState,
    /// The agent being scored.
    pub agent_id: AgentId,
    /// The action this agent took.
    pub action: Action,
}

impl<'a> RewardContext<'a> {
    /// The scored agent's post-step record.
    pub fn agent_after(&self) -> &'a Agent {
        self.after
            .agent(self.agent_id)
            .expect("scored agents exist in the post-step snapshot")
    }

    /// The pollution bounds in effect.
    pub fn bounds(&self) -> &'a PollutionBounds {
        self.after.grid.bounds()
    }

    /// The flower catalog in effect.
    pub fn catalog(&self) -> &'a FlowerCatalog {
        self.after.grid.catalog()
    }
}

/// One named reward objective.
///
/// Implementations must be pure functions of the context.
pub trait RewardComponent: Send {
    /// Stable component name, used as the key in the breakdown map.
    fn name(&self) -> &'static str;

    /// Score one agent's step.
    fn compute(&self, ctx: &RewardContext<'_>) -> f32;
}

// ── Ecology ─────────────────────────────────────────────────────

/// Pollution-centred objective.
///
/// Planting is scored by the type's total reduction potential against
/// how polluted the planted cell is (planting where pollution is near
/// the maximum scores highest); harvesting by the final-stage reduction
/// given up, scaled by how polluted the cell still is. Other actions
/// score zero.
pub struct EcologyReward;

impl EcologyReward {
    /// Keeps the plant-score denominator away from zero at maximum
    /// pollution, and fixes the normalization scale.
    const EPSILON: f32 = 0.01;
}

impl RewardComponent for EcologyReward {
    fn name(&self) -> &'static str {
        "ecology"
    }

    fn compute(&self, ctx: &RewardContext<'_>) -> f32 {
        let bounds = ctx.bounds();
        let position = ctx.agent_after().position();
        match ctx.action {
            Action::Plant(flower_type) => {
                let Some(spec) = ctx.catalog().get(flower_type) else {
                    return 0.0;
                };
                let Some(pollution) = ctx
                    .after
                    .grid
                    .get_cell(position)
                    .ok()
                    .and_then(|c| c.pollution())
                else {
                    return 0.0;
                };
                let score =
                    spec.total_reduction() * (1.0 / (pollution - bounds.max + Self::EPSILON));
                let max_score = (bounds.max - bounds.min) * (1.0 / Self::EPSILON);
                score / max_score
            }
            Action::Harvest => {
                let Some(flower) = ctx
                    .before
                    .grid
                    .get_cell(position)
                    .ok()
                    .and_then(|c| c.flower())
                else {
                    return 0.0;
                };
                let Some(spec) = ctx.catalog().get(flower.flower_type()) else {
                    return 0.0;
                };
                let Some(pollution) = ctx
                    .after
                    .grid
                    .get_cell(position)
                    .ok()
                    .and_then(|c| c.pollution())
                else {
                    return 0.0;
                };
                let score = spec.final_reduction() * (pollution - bounds.min);
                score / (bounds.max - bounds.min)
            }
            _ => 0.0,
        }
    }
}

// ── Well-being ──────────────────────────────────────────────────

/// Income-centred objective.
///
/// Harvesting scores the harvested type's price relative to the most
/// valuable type in the catalog. Every other action is penalized by how
/// long the agent has gone without income, saturating at −1 after
/// [`WellbeingReward::MAX_PENALTY_TURNS`] turns.
pub struct WellbeingReward;

impl WellbeingReward {
    /// Turns without income at which the penalty reaches −1.
    pub const MAX_PENALTY_TURNS: u32 = 10;
}

impl RewardComponent for WellbeingReward {
    fn name(&self) -> &'static str {
        "wellbeing"
    }

    fn compute(&self, ctx: &RewardContext<'_>) -> f32 {
        match ctx.action {
            Action::Harvest => {
                let position = ctx.agent_after().position();
                let Some(flower) = ctx
                    .before
                    .grid
                    .get_cell(position)
                    .ok()
                    .and_then(|c| c.flower())
                else {
                    return 0.0;
                };
                let Some(spec) = ctx.catalog().get(flower.flower_type()) else {
                    return 0.0;
                };
                let max_price = ctx.catalog().max_price();
                if max_price > 0.0 {
                    spec.price / max_price
                } else {
                    0.0
                }
            }
            _ => {
                let drought = ctx.agent_after().turns_without_income();
                -(drought as f32 / Self::MAX_PENALTY_TURNS as f32).min(1.0)
            }
        }
    }
}

// ── Biodiversity ────────────────────────────────────────────────

/// Variety-centred objective.
///
/// Planting is scored by the change in the Shannon index of cumulative
/// planted-flower counts (summed over all agents) caused by this plant,
/// normalized by the maximum possible index `ln(num_types)`. Planting an
/// underrepresented type scores positive, an overrepresented one
/// negative. Other actions score zero.
pub struct BiodiversityReward;

/// Shannon index of a count distribution, in nats.
fn shannon_index(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    -counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p.ln()
        })
        .sum::<f64>()
}

impl RewardComponent for BiodiversityReward {
    fn name(&self) -> &'static str {
        "biodiversity"
    }

    fn compute(&self, ctx: &RewardContext<'_>) -> f32 {
        let Action::Plant(flower_type) = ctx.action else {
            return 0.0;
        };
        let num_types = ctx.catalog().len();
        if num_types < 2 {
            // ln(1) = 0: with a single type there is no diversity to move.
            return 0.0;
        }
        let counts_after = ctx.after.planted_counts();
        let mut counts_before = counts_after.clone();
        if let Some(count) = counts_before.get_mut(flower_type.0 as usize) {
            *count = count.saturating_sub(1);
        }
        let delta = shannon_index(&counts_after) - shannon_index(&counts_before);
        (delta / (num_types as f64).ln()) as f32
    }
}

// ── Aggregation ─────────────────────────────────────────────────

/// Per-agent reward: named components plus their mean.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardBreakdown {
    /// Component values keyed by component name, in registration order.
    pub components: IndexMap<&'static str, f32>,
    /// Unweighted mean of the component values.
    pub total: f32,
}

/// Aggregates a configured set of [`RewardComponent`]s.
pub struct RewardCalculator {
    components: Vec<Box<dyn RewardComponent>>,
}

impl RewardCalculator {
    /// Build a calculator over an explicit component list.
    pub fn new(components: Vec<Box<dyn RewardComponent>>) -> Self {
        Self { components }
    }

    /// Names of the enabled components, in order.
    pub fn component_names(&self) -> Vec<&'static str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Score one agent's step.
    pub fn compute(&self, ctx: &RewardContext<'_>) -> RewardBreakdown {
        let mut components = IndexMap::with_capacity(self.components.len());
        let mut sum = 0.0f32;
        for component in &self.components {
            let value = component.compute(ctx);
            components.insert(component.name(), value);
            sum += value;
        }
        let total = if components.is_empty() {
            0.0
        } else {
            sum / components.len() as f32
        };
        RewardBreakdown { components, total }
    }
}

impl Default for RewardCalculator {
    /// Ecology, well-being, and biodiversity.
    fn default() -> Self {
        Self::new(vec![
            Box::new(EcologyReward),
            Box::new(WellbeingReward),
            Box::new(BiodiversityReward),
        ])
    }
}
