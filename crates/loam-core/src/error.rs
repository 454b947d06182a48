//! Error types for the Loam simulation engine, organized by subsystem:
//! spatial queries, textual/declarative initialization, and step
//! execution.
//!
//! None of these are retried internally: initialization errors abort
//! episode setup, and an illegal action aborts (and rolls back) the
//! whole step it belongs to.

use crate::action::Action;
use crate::id::{AgentId, FlowerTypeId};
use crate::pos::GridPos;
use std::error::Error;
use std::fmt;

/// Errors from spatial queries and random grid generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A position outside `[0, width) × [0, height)` was queried.
    OutOfBounds {
        /// The offending position.
        position: GridPos,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },
    /// Random initialization cannot place the requested obstacles and
    /// agents on distinct cells.
    InsufficientSpace {
        /// Number of cells the placement needed.
        requested: usize,
        /// Number of cells actually available.
        available: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "grid must have at least one cell, got {width}x{height}")
            }
            Self::OutOfBounds {
                position,
                width,
                height,
            } => {
                write!(f, "position {position} outside {width}x{height} grid")
            }
            Self::InsufficientSpace {
                requested,
                available,
            } => {
                write!(
                    f,
                    "placement needs {requested} free cells but only {available} are available"
                )
            }
        }
    }
}

impl Error for GridError {}

/// Errors from parsing a textual grid description or validating a
/// declarative layout.
///
/// Parsing is strict: every malformed line, unknown cell code, and
/// dangling reference is fatal to initialization.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// A line could not be interpreted at all.
    Syntax {
        /// 1-based line number in the input.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// The declared `width height` header disagrees with the actual
    /// row or column count.
    DimensionMismatch {
        /// 1-based line number of the offending row (or header).
        line: usize,
        /// Cell count the header promised.
        expected: usize,
        /// Cell count actually found.
        found: usize,
    },
    /// A grid token used a cell-code prefix the format does not define.
    UnknownCellCode {
        /// 1-based line number of the offending row.
        line: usize,
        /// The unrecognized token.
        token: String,
    },
    /// A cell or definition line referenced an agent never declared.
    UndeclaredAgent {
        /// The dangling agent ID.
        agent: AgentId,
    },
    /// A cell or agent line referenced a flower type never declared.
    UndeclaredFlowerType {
        /// The dangling flower type.
        flower_type: FlowerTypeId,
    },
    /// A layout or grid token places an entity on an invalid cell.
    InvalidPlacement {
        /// Where the placement was attempted.
        position: GridPos,
        /// Why the cell cannot host the entity.
        reason: String,
    },
    /// An agent's per-type seed list does not match the catalog size.
    SeedCountMismatch {
        /// The agent whose seed list is malformed.
        agent: AgentId,
        /// Number of flower types in the catalog.
        expected: usize,
        /// Number of seed counts supplied.
        found: usize,
    },
    /// A restored flower's growth stage exceeds its type's maximum.
    StageOutOfRange {
        /// Where the flower was declared.
        position: GridPos,
        /// The declared stage.
        stage: u32,
        /// The type's maximum stage.
        max_stage: u32,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { line, reason } => write!(f, "line {line}: {reason}"),
            Self::DimensionMismatch {
                line,
                expected,
                found,
            } => {
                write!(
                    f,
                    "line {line}: grid dimension mismatch: expected {expected}, found {found}"
                )
            }
            Self::UnknownCellCode { line, token } => {
                write!(f, "line {line}: unknown cell code '{token}'")
            }
            Self::UndeclaredAgent { agent } => {
                write!(f, "reference to undeclared agent {agent}")
            }
            Self::UndeclaredFlowerType { flower_type } => {
                write!(f, "reference to undeclared flower type {flower_type}")
            }
            Self::InvalidPlacement { position, reason } => {
                write!(f, "invalid placement at {position}: {reason}")
            }
            Self::SeedCountMismatch {
                agent,
                expected,
                found,
            } => {
                write!(
                    f,
                    "agent {agent}: expected {expected} seed counts, found {found}"
                )
            }
            Self::StageOutOfRange {
                position,
                stage,
                max_stage,
            } => {
                write!(
                    f,
                    "flower at {position}: stage {stage} exceeds maximum {max_stage}"
                )
            }
        }
    }
}

impl Error for ParseError {}

/// Why an action failed its legality check.
///
/// Mirrors the predicates used by action masking; under normal operation
/// callers consult the mask first and never see these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalReason {
    /// Movement target is outside the grid.
    MoveOutOfBounds,
    /// Movement target is an obstacle or other non-walkable cell.
    MoveBlockedByTerrain,
    /// Harvest on a cell with no flower.
    NothingToHarvest,
    /// Harvest on a flower below its maximum growth stage.
    FlowerNotGrown,
    /// Plant on a cell that cannot host a flower.
    CellNotPlantable,
    /// Plant without a seed of the requested type.
    NoSeeds,
    /// Plant referenced a flower type outside the catalog.
    UnknownFlowerType,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MoveOutOfBounds => "movement target is out of bounds",
            Self::MoveBlockedByTerrain => "movement target is not walkable",
            Self::NothingToHarvest => "no flower to harvest here",
            Self::FlowerNotGrown => "flower is not fully grown",
            Self::CellNotPlantable => "cell cannot host a flower",
            Self::NoSeeds => "no seeds of the requested type",
            Self::UnknownFlowerType => "flower type not in the catalog",
        };
        write!(f, "{msg}")
    }
}

/// Errors from applying one step's worth of actions.
///
/// Any of these aborts the step for the whole batch; the engine rolls
/// the world back to its pre-step state before returning.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// An action violated its preconditions (mask bypassed).
    IllegalAction {
        /// The agent whose action was illegal.
        agent: AgentId,
        /// The offending action.
        action: Action,
        /// Which precondition failed.
        reason: IllegalReason,
    },
    /// An action was submitted for an agent the session does not know.
    UnknownAgent {
        /// The unknown agent ID.
        agent: AgentId,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalAction {
                agent,
                action,
                reason,
            } => {
                write!(f, "agent {agent}: illegal action {action:?}: {reason}")
            }
            Self::UnknownAgent { agent } => {
                write!(f, "no agent with id {agent} in this session")
            }
        }
    }
}

impl Error for StepError {}
