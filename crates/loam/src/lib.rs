//! Loam: a multi-agent garden gridworld simulation engine for
//! reinforcement learning.
//!
//! Agents move across a 2D garden, plant flowers, and harvest them once
//! grown, while a bounded per-cell pollution field rises on bare ground
//! and falls under flowers. The engine is step-synchronous and fully
//! deterministic under a seed; it exposes raw structured state and
//! per-agent multi-objective rewards for an external RL-protocol
//! wrapper to encode.
//!
//! This is the top-level facade crate re-exporting the public API of
//! the Loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//! use indexmap::IndexMap;
//!
//! // A 10x10 random garden with two agents.
//! let mut session = GardenSession::new(SessionConfig::default()).unwrap();
//! session.reset(42).unwrap();
//!
//! for _ in 0..10 {
//!     // Consult the mask, then submit one action per agent.
//!     let set = session.action_set().clone();
//!     let actions: IndexMap<AgentId, Action> = session
//!         .agents()
//!         .keys()
//!         .map(|&id| {
//!             let mask = session.action_mask(id).unwrap();
//!             let action = set
//!                 .iter()
//!                 .find(|&a| matches!(a, Action::Plant(_)) && mask.allows(&set, a))
//!                 .unwrap_or(Action::Wait);
//!             (id, action)
//!         })
//!         .collect();
//!     let outcome = session.apply_actions(&actions).unwrap();
//!     for (id, reward) in &outcome.rewards {
//!         let _ = (id, reward.total, &reward.components);
//!     }
//! }
//! assert_eq!(session.current_step(), loam::types::StepId(10));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `loam-core` | IDs, cells, flowers, agents, actions, errors |
//! | [`grid`] | `loam-grid` | Grid storage and the three init strategies |
//! | [`engine`] | `loam-engine` | Session, resolver, dynamics, rewards |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: IDs, positions, cells, flowers, agents, actions, and the
/// error taxonomy (`loam-core`).
pub use loam_core as types;

/// Grid storage, spatial queries, and initialization strategies
/// (`loam-grid`).
pub use loam_grid as grid;

/// The step engine: session surface, action resolution, dynamics, and
/// reward computation (`loam-engine`).
pub use loam_engine as engine;

/// Common imports for typical Loam usage.
///
/// ```rust
/// use loam::prelude::*;
/// ```
pub mod prelude {
    // Core data model
    pub use loam_core::{
        Action, ActionMask, ActionSet, Agent, AgentId, Cell, CellType, Direction, Flower,
        FlowerCatalog, FlowerSpec, FlowerTypeId, GridPos, PollutionBounds, StepId,
    };

    // Errors
    pub use loam_core::{GridError, IllegalReason, ParseError, StepError};

    // Grid
    pub use loam_grid::{Grid, GridLayout, RandomLayout};

    // Engine
    pub use loam_engine::{
        ConfigError, GardenSession, GridInit, RewardBreakdown, RewardCalculator, RewardComponent,
        RewardContext, SeedReturnPolicy, SessionConfig, StepOutcome, WorldState,
    };
}
