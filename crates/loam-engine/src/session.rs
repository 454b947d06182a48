//! The step-synchronous session: the engine's public surface.

use crate::config::{ConfigError, GridInit, SessionConfig};
use crate::dynamics::update_dynamics;
use crate::mask;
use crate::resolver::resolve_actions;
use crate::reward::{RewardBreakdown, RewardCalculator, RewardContext};
use crate::state::WorldState;
use indexmap::IndexMap;
use loam_core::{
    Action, ActionMask, ActionSet, Agent, AgentId, Cell, FlowerCatalog, GridError, GridPos,
    PollutionBounds, StepError, StepId,
};
use loam_grid::Grid;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Result of a successful [`GardenSession::apply_actions`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// The step just completed (1 for the first step after a reset).
    pub step: StepId,
    /// Per-agent reward breakdowns, in ascending agent-ID order.
    pub rewards: IndexMap<AgentId, RewardBreakdown>,
}

/// A garden simulation session.
///
/// Owns the grid and the agents for one episode at a time. The expected
/// call pattern from an RL-protocol wrapper is `new` once, then per
/// episode `reset(seed)` followed by repeated `apply_actions`, reading
/// state and [`action_mask`](GardenSession::action_mask)s in between.
///
/// All mutation goes through `&mut self`; a step either completes fully
/// or returns a [`StepError`] with the state rolled back to the
/// pre-step snapshot.
///
/// # Example
///
/// ```
/// use loam_engine::{GardenSession, SessionConfig};
/// use loam_core::Action;
/// use indexmap::IndexMap;
///
/// let mut session = GardenSession::new(SessionConfig::default()).unwrap();
/// session.reset(42).unwrap();
///
/// let actions: IndexMap<_, _> = session
///     .agents()
///     .keys()
///     .map(|&id| (id, Action::Wait))
///     .collect();
/// let outcome = session.apply_actions(&actions).unwrap();
/// assert_eq!(outcome.rewards.len(), session.agents().len());
/// ```
pub struct GardenSession {
    config: SessionConfig,
    state: WorldState,
    action_set: ActionSet,
    calculator: RewardCalculator,
    rng: ChaCha8Rng,
    step: StepId,
    seed: u64,
}

impl GardenSession {
    /// Validate the configuration and build the initial episode state.
    ///
    /// Uses `config.seed` until the first explicit
    /// [`reset`](GardenSession::reset).
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_calculator(config, RewardCalculator::default())
    }

    /// Like [`new`](GardenSession::new), with an explicit reward
    /// component set.
    pub fn with_calculator(
        config: SessionConfig,
        calculator: RewardCalculator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = build_state(&config, &mut rng)?;
        let action_set = ActionSet::new(state.grid.catalog().len());
        Ok(Self {
            config,
            state,
            action_set,
            calculator,
            rng,
            step: StepId(0),
            seed,
        })
    }

    /// Start a new episode: rebuild the grid and agents from the
    /// configured strategy under a fresh seed, and return to step 0.
    ///
    /// Returns views of the freshly initialized grid and agent registry.
    ///
    /// # Errors
    ///
    /// Initialization errors are fatal to the episode and leave the
    /// previous episode's state untouched.
    pub fn reset(
        &mut self,
        seed: u64,
    ) -> Result<(&Grid, &IndexMap<AgentId, Agent>), ConfigError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = build_state(&self.config, &mut rng)?;
        self.action_set = ActionSet::new(state.grid.catalog().len());
        self.state = state;
        self.rng = rng;
        self.step = StepId(0);
        self.seed = seed;
        Ok((&self.state.grid, &self.state.agents))
    }

    /// Apply one synchronous step: resolve every agent's action, run the
    /// dynamics update, and score the step per agent.
    ///
    /// `actions` maps agent IDs to their chosen action; agents without
    /// an entry wait. Conflicts are resolved deterministically in
    /// ascending agent-ID order.
    ///
    /// # Errors
    ///
    /// [`StepError::UnknownAgent`] for an action addressed to a
    /// non-existent agent, [`StepError::IllegalAction`] when a caller
    /// bypasses the action mask. On error the session state is exactly
    /// as it was before the call.
    pub fn apply_actions(
        &mut self,
        actions: &IndexMap<AgentId, Action>,
    ) -> Result<StepOutcome, StepError> {
        let before = self.state.clone();
        let rng_checkpoint = self.rng.clone();

        if let Err(e) = resolve_actions(
            &mut self.state,
            actions,
            self.config.collisions,
            self.config.seed_return,
            &mut self.rng,
        ) {
            self.state = before;
            self.rng = rng_checkpoint;
            return Err(e);
        }

        update_dynamics(&mut self.state.grid);
        self.step = StepId(self.step.0 + 1);

        let mut rewards = IndexMap::with_capacity(self.state.agents.len());
        for &id in self.state.agents.keys() {
            let ctx = RewardContext {
                before: &before,
                after: &self.state,
                agent_id: id,
                action: actions.get(&id).copied().unwrap_or(Action::Wait),
            };
            rewards.insert(id, self.calculator.compute(&ctx));
        }

        Ok(StepOutcome {
            step: self.step,
            rewards,
        })
    }

    /// Legality mask for one agent over the full action set.
    ///
    /// # Errors
    ///
    /// [`StepError::UnknownAgent`] if the agent does not exist.
    pub fn action_mask(&self, agent_id: AgentId) -> Result<ActionMask, StepError> {
        mask::action_mask(
            &self.state,
            agent_id,
            &self.action_set,
            self.config.collisions,
        )
        .ok_or(StepError::UnknownAgent { agent: agent_id })
    }

    /// The cell at `position`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] outside the grid.
    pub fn get_cell(&self, position: GridPos) -> Result<&Cell, GridError> {
        self.state.grid.get_cell(position)
    }

    /// The current grid.
    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    /// The agent registry, in ascending-ID order.
    pub fn agents(&self) -> &IndexMap<AgentId, Agent> {
        &self.state.agents
    }

    /// One agent, if it exists.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.state.agent(id)
    }

    /// The episode's immutable action set.
    pub fn action_set(&self) -> &ActionSet {
        &self.action_set
    }

    /// Pollution bounds, for observation encoders that normalize.
    pub fn pollution_bounds(&self) -> &PollutionBounds {
        self.state.grid.bounds()
    }

    /// The flower catalog in effect this episode.
    pub fn catalog(&self) -> &FlowerCatalog {
        self.state.grid.catalog()
    }

    /// Steps completed since the last reset.
    pub fn current_step(&self) -> StepId {
        self.step
    }

    /// The seed of the current episode.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl std::fmt::Debug for GardenSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GardenSession")
            .field("step", &self.step)
            .field("seed", &self.seed)
            .field("agents", &self.state.agents.len())
            .field(
                "grid",
                &format_args!("{}x{}", self.state.grid.width(), self.state.grid.height()),
            )
            .finish()
    }
}

/// Run the configured initialization strategy.
fn build_state(config: &SessionConfig, rng: &mut ChaCha8Rng) -> Result<WorldState, ConfigError> {
    let (grid, agents) = match &config.init {
        GridInit::Random(params) => Grid::random(
            params,
            config.bounds,
            config.catalog.clone(),
            rng,
        )?,
        GridInit::Layout(layout) => {
            Grid::from_layout(layout, config.bounds, config.catalog.clone())?
        }
        GridInit::Text(text) => Grid::from_text(text, config.bounds)?,
    };
    Ok(WorldState::new(grid, agents))
}
