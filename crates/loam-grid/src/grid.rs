//! Row-major cell storage and spatial queries.

use loam_core::{Cell, FlowerCatalog, GridError, GridPos, PollutionBounds};

/// Pollution level a ground cell starts with when nothing says otherwise.
pub const DEFAULT_POLLUTION: f32 = 50.0;

/// The 2D garden grid.
///
/// Owns every [`Cell`] plus the global pollution bounds and the flower
/// catalog. Cells are stored row-major; positions are `(row, col)` with
/// the origin at the top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    bounds: PollutionBounds,
    catalog: FlowerCatalog,
}

impl Grid {
    /// A grid of all-ground cells at `default_pollution`.
    ///
    /// Initialization strategies start from this and overwrite cells.
    pub fn filled(
        width: u32,
        height: u32,
        bounds: PollutionBounds,
        catalog: FlowerCatalog,
        default_pollution: f32,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        let count = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            cells: vec![Cell::ground(default_pollution); count],
            bounds,
            catalog,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The pollution bounds shared by every ground cell.
    pub fn bounds(&self) -> &PollutionBounds {
        &self.bounds
    }

    /// The flower-type catalog for this episode.
    pub fn catalog(&self) -> &FlowerCatalog {
        &self.catalog
    }

    /// Whether `position` lies within `[0, width) × [0, height)`.
    pub fn contains(&self, position: GridPos) -> bool {
        position.row >= 0
            && position.col >= 0
            && (position.row as u32) < self.height
            && (position.col as u32) < self.width
    }

    fn index(&self, position: GridPos) -> Option<usize> {
        self.contains(position)
            .then(|| (position.row as usize) * (self.width as usize) + position.col as usize)
    }

    /// The cell at `position`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] if the position is outside the grid.
    pub fn get_cell(&self, position: GridPos) -> Result<&Cell, GridError> {
        self.index(position)
            .map(|i| &self.cells[i])
            .ok_or(GridError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            })
    }

    /// Mutable access to the cell at `position`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] if the position is outside the grid.
    pub fn get_cell_mut(&mut self, position: GridPos) -> Result<&mut Cell, GridError> {
        let idx = self.index(position).ok_or(GridError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        })?;
        Ok(&mut self.cells[idx])
    }

    /// Whether an agent could stand at `position`: in bounds and walkable.
    pub fn is_walkable(&self, position: GridPos) -> bool {
        self.get_cell(position)
            .map(|c| c.can_walk_on())
            .unwrap_or(false)
    }

    /// Iterate over `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Cell)> {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let pos = GridPos::new((i / width) as i32, (i % width) as i32);
            (pos, cell)
        })
    }

    /// Iterate mutably over `(position, cell)` pairs in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GridPos, &mut Cell)> {
        let width = self.width as usize;
        self.cells.iter_mut().enumerate().map(move |(i, cell)| {
            let pos = GridPos::new((i / width) as i32, (i % width) as i32);
            (pos, cell)
        })
    }

    /// Mean pollution over all pollution-bearing cells.
    ///
    /// Returns 0.0 when the grid has no ground cells at all.
    pub fn mean_pollution(&self) -> f32 {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for cell in &self.cells {
            if let Some(p) = cell.pollution() {
                sum += p as f64;
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            (sum / count as f64) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::CellType;

    fn grid(width: u32, height: u32) -> Grid {
        Grid::filled(
            width,
            height,
            PollutionBounds::default(),
            FlowerCatalog::default(),
            DEFAULT_POLLUTION,
        )
        .unwrap()
    }

    #[test]
    fn filled_rejects_zero_dimensions() {
        let catalog = FlowerCatalog::default();
        let bounds = PollutionBounds::default();
        assert!(matches!(
            Grid::filled(0, 5, bounds, catalog.clone(), 50.0),
            Err(GridError::EmptyGrid { .. })
        ));
        assert!(matches!(
            Grid::filled(5, 0, bounds, catalog, 50.0),
            Err(GridError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn get_cell_out_of_bounds() {
        let g = grid(4, 3);
        for pos in [
            GridPos::new(-1, 0),
            GridPos::new(0, -1),
            GridPos::new(3, 0),
            GridPos::new(0, 4),
        ] {
            assert!(matches!(
                g.get_cell(pos),
                Err(GridError::OutOfBounds { .. })
            ));
        }
        assert!(g.get_cell(GridPos::new(2, 3)).is_ok());
    }

    #[test]
    fn iter_is_row_major() {
        let g = grid(3, 2);
        let positions: Vec<GridPos> = g.iter().map(|(p, _)| p).collect();
        assert_eq!(positions[0], GridPos::new(0, 0));
        assert_eq!(positions[1], GridPos::new(0, 1));
        assert_eq!(positions[2], GridPos::new(0, 2));
        assert_eq!(positions[3], GridPos::new(1, 0));
        assert_eq!(positions.len(), 6);
    }

    #[test]
    fn walkability_tracks_terrain() {
        let mut g = grid(3, 3);
        assert!(g.is_walkable(GridPos::new(1, 1)));
        *g.get_cell_mut(GridPos::new(1, 1)).unwrap() = Cell::obstacle();
        assert!(!g.is_walkable(GridPos::new(1, 1)));
        assert!(!g.is_walkable(GridPos::new(5, 5)));
        assert_eq!(
            g.get_cell(GridPos::new(1, 1)).unwrap().cell_type(),
            CellType::Obstacle
        );
    }

    #[test]
    fn mean_pollution_skips_obstacles() {
        let mut g = grid(2, 1);
        *g.get_cell_mut(GridPos::new(0, 0)).unwrap() = Cell::obstacle();
        // Only the remaining ground cell (50.0) counts.
        assert_eq!(g.mean_pollution(), DEFAULT_POLLUTION);
    }
}
