//! Cells: the smallest unit of grid state.

use crate::flower::Flower;
use crate::id::AgentId;

/// Terrain classification of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Walkable soil: agents can stand here, flowers can be planted,
    /// and the cell carries a pollution level.
    Ground,
    /// Impassable cell; holds no pollution, flower, or agent.
    Obstacle,
    /// Water: impassable and unplantable, like an obstacle, but a
    /// distinct terrain for layouts that want it.
    Water,
}

/// Global pollution parameters shared by every ground cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollutionBounds {
    /// Floor for any cell's pollution.
    pub min: f32,
    /// Ceiling for any cell's pollution.
    pub max: f32,
    /// Amount added each step to a flowerless ground cell.
    pub increment: f32,
}

impl PollutionBounds {
    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for PollutionBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            increment: 1.0,
        }
    }
}

/// A single cell of the garden grid.
///
/// Fields are private so the type invariants hold by construction: a
/// non-[`Ground`](CellType::Ground) cell never carries pollution, a
/// flower, or an occupant.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    cell_type: CellType,
    pollution: Option<f32>,
    flower: Option<Flower>,
    occupant: Option<AgentId>,
}

impl Cell {
    /// A ground cell with the given initial pollution level.
    pub fn ground(pollution: f32) -> Self {
        Self {
            cell_type: CellType::Ground,
            pollution: Some(pollution),
            flower: None,
            occupant: None,
        }
    }

    /// An obstacle cell.
    pub fn obstacle() -> Self {
        Self {
            cell_type: CellType::Obstacle,
            pollution: None,
            flower: None,
            occupant: None,
        }
    }

    /// A water cell.
    pub fn water() -> Self {
        Self {
            cell_type: CellType::Water,
            pollution: None,
            flower: None,
            occupant: None,
        }
    }

    /// Build a cell of the given terrain; ground cells get
    /// `default_pollution`.
    pub fn of_type(cell_type: CellType, default_pollution: f32) -> Self {
        match cell_type {
            CellType::Ground => Self::ground(default_pollution),
            CellType::Obstacle => Self::obstacle(),
            CellType::Water => Self::water(),
        }
    }

    /// Terrain type of this cell.
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Current pollution level; `None` for non-ground cells.
    pub fn pollution(&self) -> Option<f32> {
        self.pollution
    }

    /// The flower planted here, if any.
    pub fn flower(&self) -> Option<&Flower> {
        self.flower.as_ref()
    }

    /// Mutable access to the flower planted here, if any.
    pub fn flower_mut(&mut self) -> Option<&mut Flower> {
        self.flower.as_mut()
    }

    /// ID of the agent standing on this cell, if any.
    ///
    /// This is an occupancy index, not ownership: the agent itself lives
    /// in the session registry.
    pub fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    /// Whether agents can walk on this cell.
    pub fn can_walk_on(&self) -> bool {
        self.cell_type == CellType::Ground
    }

    /// Whether a flower can be planted here right now.
    pub fn can_plant_on(&self) -> bool {
        self.cell_type == CellType::Ground && self.flower.is_none()
    }

    /// Whether the cell contains a flower.
    pub fn has_flower(&self) -> bool {
        self.flower.is_some()
    }

    /// Whether the cell is occupied by an agent.
    pub fn has_agent(&self) -> bool {
        self.occupant.is_some()
    }

    /// Record or clear the occupying agent.
    ///
    /// Callers check walkability first; occupancy on a non-walkable cell
    /// would violate the cell invariant.
    pub fn set_occupant(&mut self, agent: Option<AgentId>) {
        debug_assert!(agent.is_none() || self.can_walk_on());
        self.occupant = agent;
    }

    /// Put a flower on this cell.
    ///
    /// Callers check [`can_plant_on`](Cell::can_plant_on) first.
    pub fn plant(&mut self, flower: Flower) {
        debug_assert!(self.can_plant_on());
        self.flower = Some(flower);
    }

    /// Remove and return the flower on this cell, if any.
    pub fn take_flower(&mut self) -> Option<Flower> {
        self.flower.take()
    }

    /// Advance this cell's pollution by one step.
    ///
    /// `flower_reduction` is the current-stage reduction of the flower
    /// on this cell (`None` when the cell is flowerless). The result is
    /// clamped to `[bounds.min, bounds.max]`; non-ground cells are
    /// untouched.
    pub fn update_pollution(&mut self, bounds: &PollutionBounds, flower_reduction: Option<f32>) {
        let Some(p) = self.pollution else {
            return;
        };
        let next = match flower_reduction {
            Some(reduction) => (p - reduction).max(bounds.min),
            None => (p + bounds.increment).min(bounds.max),
        };
        self.pollution = Some(next);
    }
}
