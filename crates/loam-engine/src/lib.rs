//! Step-synchronous simulation engine for the Loam garden.
//!
//! [`GardenSession`] is the public surface consumed by RL-protocol
//! wrappers: `new` → `reset` → `apply_actions`, with read access to the
//! grid, agents, and per-agent action masks in between. Each step runs
//! three atomic phases in order:
//!
//! 1. action resolution ([`resolver`]): one action per agent, applied
//!    in ascending agent-ID order with deterministic conflict handling
//! 2. dynamics ([`dynamics`]): flower growth and the pollution field
//! 3. rewards ([`reward`]): multi-objective per-agent rewards computed
//!    from the pre- and post-step snapshots
//!
//! A step either completes fully or fails with a [`StepError`] and no
//! observable state change.
//!
//! [`StepError`]: loam_core::StepError

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dynamics;
pub mod mask;
pub mod resolver;
pub mod reward;
pub mod session;
pub mod state;

pub use config::{ConfigError, GridInit, SeedReturnPolicy, SessionConfig};
pub use reward::{
    BiodiversityReward, EcologyReward, RewardBreakdown, RewardCalculator, RewardComponent,
    RewardContext, WellbeingReward,
};
pub use session::{GardenSession, StepOutcome};
pub use state::WorldState;
