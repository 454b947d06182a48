//! Strict parser for the textual grid format.
//!
//! ```text
//! width height
//! <height> rows of <width> space-separated cell tokens
//! one line per placed agent:   id,money,seeds0|seeds1|...
//! one line per flower type:    type,price,red0|red1|...
//! ```
//!
//! Cell tokens: `G` (ground), `O` (obstacle), `W` (water), `A<id>`
//! (ground occupied by agent `id`), `F<type>_<owner>_<stage>` (ground
//! with a flower). Seed counts of `-1` mean an infinite supply. Flower
//! types must be declared contiguously from 0; the reduction list length
//! defines the type's stage count.

use crate::grid::{Grid, DEFAULT_POLLUTION};
use loam_core::{
    Agent, AgentId, Cell, Flower, FlowerCatalog, FlowerSpec, FlowerTypeId, GridPos, ParseError,
    PollutionBounds,
};
use std::collections::BTreeMap;

/// A numbered, trimmed, non-empty input line.
struct Line<'a> {
    number: usize,
    text: &'a str,
}

fn syntax(line: usize, reason: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        reason: reason.into(),
    }
}

impl Grid {
    /// Parse the textual grid format into a grid and its agents.
    ///
    /// The flower catalog is taken from the file's trailer lines;
    /// `bounds` supplies the pollution parameters the format does not
    /// carry.
    ///
    /// # Examples
    ///
    /// ```
    /// use loam_core::PollutionBounds;
    /// use loam_grid::Grid;
    ///
    /// let input = "\
    /// 3 2
    /// G A0 O
    /// G F0_0_1 W
    /// 0,100,5|2
    /// 0,10,0|0|4
    /// 1,5,1|3
    /// ";
    /// let (grid, agents) = Grid::from_text(input, PollutionBounds::default()).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(agents.len(), 1);
    /// assert_eq!(grid.catalog().len(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ParseError`] on any malformed line, unknown cell code, wrong
    /// token count ([`ParseError::DimensionMismatch`]), or reference to
    /// an undeclared agent or flower type.
    pub fn from_text(input: &str, bounds: PollutionBounds) -> Result<(Grid, Vec<Agent>), ParseError> {
        let lines: Vec<Line<'_>> = input
            .lines()
            .enumerate()
            .map(|(i, l)| Line {
                number: i + 1,
                text: l.trim(),
            })
            .filter(|l| !l.text.is_empty())
            .collect();

        let header = lines.first().ok_or_else(|| syntax(1, "empty input"))?;
        let mut dims = header.text.split_whitespace();
        let width: u32 = dims
            .next()
            .and_then(|t| t.parse().ok())
            .filter(|w| *w > 0)
            .ok_or_else(|| syntax(header.number, "expected 'width height'"))?;
        let height: u32 = dims
            .next()
            .and_then(|t| t.parse().ok())
            .filter(|h| *h > 0)
            .ok_or_else(|| syntax(header.number, "expected 'width height'"))?;
        if dims.next().is_some() {
            return Err(syntax(header.number, "trailing tokens after 'width height'"));
        }

        let rows = &lines[1..];
        if rows.len() < height as usize {
            return Err(ParseError::DimensionMismatch {
                line: lines.last().map(|l| l.number).unwrap_or(1),
                expected: height as usize,
                found: rows.len().min(height as usize),
            });
        }

        // First pass over the cell rows: terrain plus deferred agent and
        // flower placements, validated once the trailer is parsed.
        let mut terrain: Vec<Cell> = Vec::with_capacity((width * height) as usize);
        let mut agent_positions: BTreeMap<AgentId, GridPos> = BTreeMap::new();
        let mut flower_tokens: Vec<(GridPos, FlowerTypeId, AgentId, u32, usize)> = Vec::new();

        for (row_idx, row) in rows[..height as usize].iter().enumerate() {
            let tokens: Vec<&str> = row.text.split_whitespace().collect();
            if tokens.len() != width as usize {
                return Err(ParseError::DimensionMismatch {
                    line: row.number,
                    expected: width as usize,
                    found: tokens.len(),
                });
            }
            for (col_idx, token) in tokens.iter().enumerate() {
                let pos = GridPos::new(row_idx as i32, col_idx as i32);
                match *token {
                    "G" => terrain.push(Cell::ground(DEFAULT_POLLUTION)),
                    "O" => terrain.push(Cell::obstacle()),
                    "W" => terrain.push(Cell::water()),
                    t if t.starts_with('A') => {
                        let id: u32 = t[1..]
                            .parse()
                            .map_err(|_| syntax(row.number, format!("bad agent token '{t}'")))?;
                        if agent_positions.insert(AgentId(id), pos).is_some() {
                            return Err(syntax(
                                row.number,
                                format!("agent {id} placed more than once"),
                            ));
                        }
                        terrain.push(Cell::ground(DEFAULT_POLLUTION));
                    }
                    t if t.starts_with('F') => {
                        let fields: Vec<&str> = t[1..].split('_').collect();
                        let parsed: Option<(u32, u32, u32)> = match fields.as_slice() {
                            [ty, owner, stage] => match (ty.parse(), owner.parse(), stage.parse())
                            {
                                (Ok(ty), Ok(owner), Ok(stage)) => Some((ty, owner, stage)),
                                _ => None,
                            },
                            _ => None,
                        };
                        let (ty, owner, stage) = parsed.ok_or_else(|| {
                            syntax(row.number, format!("bad flower token '{t}'"))
                        })?;
                        flower_tokens.push((
                            pos,
                            FlowerTypeId(ty),
                            AgentId(owner),
                            stage,
                            row.number,
                        ));
                        terrain.push(Cell::ground(DEFAULT_POLLUTION));
                    }
                    _ => {
                        return Err(ParseError::UnknownCellCode {
                            line: row.number,
                            token: token.to_string(),
                        });
                    }
                }
            }
        }

        // Trailer: one definition line per placed agent, then the
        // flower-type catalog.
        let trailer = &rows[height as usize..];
        let num_agents = agent_positions.len();
        if trailer.len() < num_agents {
            let at = trailer
                .last()
                .or_else(|| rows.last())
                .map(|l| l.number)
                .unwrap_or(1);
            return Err(syntax(at, "missing agent definition lines"));
        }

        let mut agent_defs: BTreeMap<AgentId, (f32, Vec<Option<u32>>)> = BTreeMap::new();
        for line in &trailer[..num_agents] {
            let (id, money, seeds) = parse_agent_def(line)?;
            if !agent_positions.contains_key(&id) {
                return Err(ParseError::UndeclaredAgent { agent: id });
            }
            if agent_defs.insert(id, (money, seeds)).is_some() {
                return Err(syntax(line.number, format!("agent {id} defined twice")));
            }
        }

        let type_lines = &trailer[num_agents..];
        if type_lines.is_empty() {
            let at = rows.last().map(|l| l.number).unwrap_or(1);
            return Err(syntax(at, "no flower types declared"));
        }
        let mut specs = Vec::with_capacity(type_lines.len());
        for (expected_type, line) in type_lines.iter().enumerate() {
            let (declared, spec) = parse_flower_def(line)?;
            if declared != expected_type as u32 {
                return Err(syntax(
                    line.number,
                    format!("flower types must be contiguous from 0, got {declared}"),
                ));
            }
            specs.push(spec);
        }
        let catalog = FlowerCatalog::new(specs)
            .map_err(|reason| syntax(type_lines[0].number, reason))?;

        // Assemble the grid, then replay the deferred placements against
        // the now-known catalog and agent set.
        let mut grid = Grid::filled(width, height, bounds, catalog, DEFAULT_POLLUTION)
            .expect("dimensions validated above");
        for (pos, cell) in grid.iter_mut() {
            *cell = terrain[(pos.row as usize) * (width as usize) + pos.col as usize].clone();
        }

        let mut agents = Vec::with_capacity(num_agents);
        for (&id, &pos) in &agent_positions {
            let (money, seeds) = agent_defs
                .get(&id)
                .cloned()
                .ok_or(ParseError::UndeclaredAgent { agent: id })?;
            if seeds.len() != grid.catalog().len() {
                return Err(ParseError::SeedCountMismatch {
                    agent: id,
                    expected: grid.catalog().len(),
                    found: seeds.len(),
                });
            }
            grid.get_cell_mut(pos)
                .expect("agent token position is in bounds")
                .set_occupant(Some(id));
            agents.push(Agent::new(id, pos, money, seeds));
        }

        for (pos, flower_type, owner, stage, line) in flower_tokens {
            let spec = grid
                .catalog()
                .get(flower_type)
                .ok_or(ParseError::UndeclaredFlowerType { flower_type })?;
            let max_stage = spec.max_stage();
            if !agent_positions.contains_key(&owner) {
                return Err(ParseError::UndeclaredAgent { agent: owner });
            }
            if stage > max_stage {
                return Err(ParseError::StageOutOfRange {
                    position: pos,
                    stage,
                    max_stage,
                });
            }
            let cell = grid.get_cell_mut(pos).expect("flower token position is in bounds");
            debug_assert!(cell.can_plant_on(), "line {line} produced a bad flower cell");
            cell.plant(Flower::at_stage(flower_type, owner, stage));
        }

        Ok((grid, agents))
    }
}

/// Parse `id,money,seeds0|seeds1|...`.
fn parse_agent_def(line: &Line<'_>) -> Result<(AgentId, f32, Vec<Option<u32>>), ParseError> {
    let fields: Vec<&str> = line.text.split(',').collect();
    let [id, money, seeds] = fields.as_slice() else {
        return Err(syntax(
            line.number,
            "expected 'id,money,seeds0|seeds1|...'",
        ));
    };
    let id: u32 = id
        .trim()
        .parse()
        .map_err(|_| syntax(line.number, format!("bad agent id '{id}'")))?;
    let money: f32 = money
        .trim()
        .parse()
        .map_err(|_| syntax(line.number, format!("bad money value '{money}'")))?;
    if !money.is_finite() || money < 0.0 {
        return Err(syntax(line.number, "money must be finite and >= 0"));
    }
    let mut counts = Vec::new();
    for part in seeds.split('|') {
        let n: i64 = part
            .trim()
            .parse()
            .map_err(|_| syntax(line.number, format!("bad seed count '{part}'")))?;
        counts.push(match n {
            -1 => None,
            n if n >= 0 => Some(n as u32),
            _ => return Err(syntax(line.number, format!("bad seed count '{n}'"))),
        });
    }
    Ok((AgentId(id), money, counts))
}

/// Parse `type,price,red0|red1|...`.
fn parse_flower_def(line: &Line<'_>) -> Result<(u32, FlowerSpec), ParseError> {
    let fields: Vec<&str> = line.text.split(',').collect();
    let [ty, price, reductions] = fields.as_slice() else {
        return Err(syntax(line.number, "expected 'type,price,red0|red1|...'"));
    };
    let ty: u32 = ty
        .trim()
        .parse()
        .map_err(|_| syntax(line.number, format!("bad flower type '{ty}'")))?;
    let price: f32 = price
        .trim()
        .parse()
        .map_err(|_| syntax(line.number, format!("bad price '{price}'")))?;
    let mut table = Vec::new();
    for part in reductions.split('|') {
        let r: f32 = part
            .trim()
            .parse()
            .map_err(|_| syntax(line.number, format!("bad reduction '{part}'")))?;
        table.push(r);
    }
    Ok((ty, FlowerSpec::new(price, table)))
}
