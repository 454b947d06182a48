//! Declarative grid initialization.
//!
//! A [`GridLayout`] lists everything that differs from an all-ground
//! grid: non-default cells, agents, and pre-placed flowers. Unlisted
//! cells default to ground at the layout's default pollution.

use crate::grid::{Grid, DEFAULT_POLLUTION};
use loam_core::{
    Agent, AgentId, Cell, CellType, Flower, FlowerCatalog, FlowerTypeId, GridPos, ParseError,
    PollutionBounds,
};

/// A non-default cell in a [`GridLayout`].
#[derive(Clone, Debug, PartialEq)]
pub struct CellDecl {
    /// Where the cell sits.
    pub position: GridPos,
    /// The terrain to place there.
    pub cell_type: CellType,
}

/// An agent to create, in declaration order.
///
/// Agent IDs are assigned from the declaration index: the first agent
/// becomes `AgentId(0)`, the second `AgentId(1)`, and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentDecl {
    /// Starting position; must be a walkable, unoccupied cell.
    pub position: GridPos,
    /// Starting money.
    pub money: f32,
    /// Per-type seed counts (`None` = infinite). Must have one entry
    /// per catalog type.
    pub seeds: Vec<Option<u32>>,
}

/// A flower to restore at a given growth stage.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerDecl {
    /// Where the flower grows; must be a plantable cell.
    pub position: GridPos,
    /// Catalog index of the flower type.
    pub flower_type: FlowerTypeId,
    /// Declaration index of the owning agent.
    pub owner: AgentId,
    /// Growth stage to restore, `0..=max_stage` for the type.
    pub stage: u32,
}

/// Declarative description of an episode's starting grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Pollution for cells the layout does not mention.
    pub default_pollution: f32,
    /// Cells that are not plain ground.
    pub cells: Vec<CellDecl>,
    /// Agents to create.
    pub agents: Vec<AgentDecl>,
    /// Flowers to restore.
    pub flowers: Vec<FlowerDecl>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            default_pollution: DEFAULT_POLLUTION,
            cells: Vec::new(),
            agents: Vec::new(),
            flowers: Vec::new(),
        }
    }
}

impl Grid {
    /// Build a grid and its agents from an explicit layout.
    ///
    /// # Errors
    ///
    /// Fails on out-of-bounds or conflicting placements, seed lists
    /// that do not match the catalog, references to undeclared agents
    /// or flower types, and restored stages beyond a type's maximum.
    /// Layout validation is strict; there is no partial initialization.
    pub fn from_layout(
        layout: &GridLayout,
        bounds: PollutionBounds,
        catalog: FlowerCatalog,
    ) -> Result<(Grid, Vec<Agent>), ParseError> {
        let mut grid = Grid::filled(
            layout.width,
            layout.height,
            bounds,
            catalog,
            layout.default_pollution,
        )
        .map_err(|e| ParseError::Syntax {
            line: 0,
            reason: e.to_string(),
        })?;

        for decl in &layout.cells {
            if !grid.contains(decl.position) {
                return Err(ParseError::InvalidPlacement {
                    position: decl.position,
                    reason: "cell declaration outside the grid".into(),
                });
            }
            *grid.get_cell_mut(decl.position).expect("checked above") =
                Cell::of_type(decl.cell_type, layout.default_pollution);
        }

        let mut agents = Vec::with_capacity(layout.agents.len());
        for (index, decl) in layout.agents.iter().enumerate() {
            let id = AgentId(index as u32);
            if !grid.is_walkable(decl.position) {
                return Err(ParseError::InvalidPlacement {
                    position: decl.position,
                    reason: format!("agent {id} cannot stand here"),
                });
            }
            let cell = grid.get_cell_mut(decl.position).expect("walkable implies in bounds");
            if cell.has_agent() {
                return Err(ParseError::InvalidPlacement {
                    position: decl.position,
                    reason: format!("agent {id} placed on an occupied cell"),
                });
            }
            if decl.seeds.len() != grid.catalog().len() {
                return Err(ParseError::SeedCountMismatch {
                    agent: id,
                    expected: grid.catalog().len(),
                    found: decl.seeds.len(),
                });
            }
            if !decl.money.is_finite() || decl.money < 0.0 {
                return Err(ParseError::Syntax {
                    line: 0,
                    reason: format!("agent {id}: money must be finite and >= 0"),
                });
            }
            grid.get_cell_mut(decl.position)
                .expect("checked above")
                .set_occupant(Some(id));
            agents.push(Agent::new(id, decl.position, decl.money, decl.seeds.clone()));
        }

        for decl in &layout.flowers {
            let spec = grid
                .catalog()
                .get(decl.flower_type)
                .ok_or(ParseError::UndeclaredFlowerType {
                    flower_type: decl.flower_type,
                })?
                .clone();
            if (decl.owner.0 as usize) >= agents.len() {
                return Err(ParseError::UndeclaredAgent { agent: decl.owner });
            }
            if decl.stage > spec.max_stage() {
                return Err(ParseError::StageOutOfRange {
                    position: decl.position,
                    stage: decl.stage,
                    max_stage: spec.max_stage(),
                });
            }
            let cell = grid
                .get_cell_mut(decl.position)
                .map_err(|_| ParseError::InvalidPlacement {
                    position: decl.position,
                    reason: "flower declaration outside the grid".into(),
                })?;
            if !cell.can_plant_on() {
                return Err(ParseError::InvalidPlacement {
                    position: decl.position,
                    reason: "flower on a cell that cannot host one".into(),
                });
            }
            cell.plant(Flower::at_stage(decl.flower_type, decl.owner, decl.stage));
        }

        Ok((grid, agents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_layout() -> GridLayout {
        GridLayout {
            width: 5,
            height: 4,
            cells: vec![CellDecl {
                position: GridPos::new(2, 2),
                cell_type: CellType::Obstacle,
            }],
            agents: vec![AgentDecl {
                position: GridPos::new(1, 1),
                money: 0.0,
                seeds: vec![Some(10), Some(10), Some(10)],
            }],
            ..GridLayout::default()
        }
    }

    fn build(layout: &GridLayout) -> Result<(Grid, Vec<Agent>), ParseError> {
        Grid::from_layout(layout, PollutionBounds::default(), FlowerCatalog::default())
    }

    #[test]
    fn unlisted_cells_default_to_ground() {
        let (grid, agents) = build(&base_layout()).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        let plain = grid.get_cell(GridPos::new(0, 0)).unwrap();
        assert_eq!(plain.cell_type(), CellType::Ground);
        assert_eq!(plain.pollution(), Some(DEFAULT_POLLUTION));
        assert_eq!(
            grid.get_cell(GridPos::new(2, 2)).unwrap().cell_type(),
            CellType::Obstacle
        );
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id(), AgentId(0));
        assert_eq!(
            grid.get_cell(GridPos::new(1, 1)).unwrap().occupant(),
            Some(AgentId(0))
        );
    }

    #[test]
    fn flower_restored_at_declared_stage() {
        let mut layout = base_layout();
        layout.flowers.push(FlowerDecl {
            position: GridPos::new(0, 3),
            flower_type: FlowerTypeId(1),
            owner: AgentId(0),
            stage: 2,
        });
        let (grid, _) = build(&layout).unwrap();
        let flower = grid.get_cell(GridPos::new(0, 3)).unwrap().flower().unwrap();
        assert_eq!(flower.flower_type(), FlowerTypeId(1));
        assert_eq!(flower.stage(), 2);
        assert_eq!(flower.owner(), AgentId(0));
    }

    #[test]
    fn agent_on_obstacle_is_rejected() {
        let mut layout = base_layout();
        layout.agents[0].position = GridPos::new(2, 2);
        assert!(matches!(
            build(&layout),
            Err(ParseError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn two_agents_on_one_cell_rejected() {
        let mut layout = base_layout();
        layout.agents.push(AgentDecl {
            position: GridPos::new(1, 1),
            money: 0.0,
            seeds: vec![Some(1), Some(1), Some(1)],
        });
        assert!(matches!(
            build(&layout),
            Err(ParseError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn seed_list_must_match_catalog() {
        let mut layout = base_layout();
        layout.agents[0].seeds = vec![Some(10)];
        assert!(matches!(
            build(&layout),
            Err(ParseError::SeedCountMismatch {
                expected: 3,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn flower_with_unknown_owner_rejected() {
        let mut layout = base_layout();
        layout.flowers.push(FlowerDecl {
            position: GridPos::new(0, 0),
            flower_type: FlowerTypeId(0),
            owner: AgentId(7),
            stage: 0,
        });
        assert!(matches!(
            build(&layout),
            Err(ParseError::UndeclaredAgent { agent: AgentId(7) })
        ));
    }

    #[test]
    fn flower_stage_beyond_max_rejected() {
        let mut layout = base_layout();
        layout.flowers.push(FlowerDecl {
            position: GridPos::new(0, 0),
            flower_type: FlowerTypeId(2), // single-stage type
            owner: AgentId(0),
            stage: 1,
        });
        assert!(matches!(
            build(&layout),
            Err(ParseError::StageOutOfRange { max_stage: 0, .. })
        ));
    }

    #[test]
    fn flower_on_obstacle_rejected() {
        let mut layout = base_layout();
        layout.flowers.push(FlowerDecl {
            position: GridPos::new(2, 2),
            flower_type: FlowerTypeId(0),
            owner: AgentId(0),
            stage: 0,
        });
        assert!(matches!(
            build(&layout),
            Err(ParseError::InvalidPlacement { .. })
        ));
    }
}
