//! Dense wall lattice and the line-of-sight rules evaluated against it.

use grid_strike_core::{GridPos, GRID_COLUMNS, GRID_ROWS};

/// Row-major boolean lattice recording which cells hold walls.
#[derive(Debug, Clone)]
pub struct WallGrid {
    columns: i32,
    rows: i32,
    walls: Vec<bool>,
}

impl WallGrid {
    /// Creates an empty lattice with the standard arena dimensions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(GRID_COLUMNS, GRID_ROWS)
    }

    /// Creates an empty lattice with explicit dimensions.
    #[must_use]
    pub fn with_size(columns: i32, rows: i32) -> Self {
        Self {
            columns,
            rows,
            walls: vec![false; (columns * rows) as usize],
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    fn index(&self, cell: GridPos) -> Option<usize> {
        if self.in_bounds(cell) {
            Some((cell.y() * self.columns + cell.x()) as usize)
        } else {
            None
        }
    }

    /// Reports whether the cell lies on the playable lattice.
    #[must_use]
    pub const fn in_bounds(&self, cell: GridPos) -> bool {
        cell.x() >= 0 && cell.x() < self.columns && cell.y() >= 0 && cell.y() < self.rows
    }

    /// Marks a cell as holding a wall. Out-of-bounds cells are ignored.
    pub fn place_wall(&mut self, cell: GridPos) {
        if let Some(index) = self.index(cell) {
            self.walls[index] = true;
        }
    }

    /// Clears every wall from the lattice.
    pub fn clear(&mut self) {
        self.walls.fill(false);
    }

    /// Reports whether the cell holds a wall.
    #[must_use]
    pub fn is_wall(&self, cell: GridPos) -> bool {
        self.index(cell).is_some_and(|index| self.walls[index])
    }

    /// Reports whether an actor may stand on the cell: in bounds, no wall.
    #[must_use]
    pub fn is_walkable(&self, cell: GridPos) -> bool {
        self.index(cell).is_some_and(|index| !self.walls[index])
    }

    /// Reports whether a straight shot from `from` can see `to`.
    ///
    /// Orthogonally aligned pairs walk the cells between the endpoints and
    /// require every one of them to be walkable. All other pairs trace a
    /// Bresenham line and require every intermediate cell to be wall-free.
    #[must_use]
    pub fn line_of_sight(&self, from: GridPos, to: GridPos) -> bool {
        if from == to {
            return true;
        }

        if from.y() == to.y() {
            let step = (to.x() - from.x()).signum();
            let mut x = from.x() + step;
            while x != to.x() {
                if !self.is_walkable(GridPos::new(x, from.y())) {
                    return false;
                }
                x += step;
            }
            return true;
        }

        if from.x() == to.x() {
            let step = (to.y() - from.y()).signum();
            let mut y = from.y() + step;
            while y != to.y() {
                if !self.is_walkable(GridPos::new(from.x(), y)) {
                    return false;
                }
                y += step;
            }
            return true;
        }

        for cell in bresenham(from, to) {
            if cell != from && cell != to && self.is_wall(cell) {
                return false;
            }
        }
        true
    }
}

impl Default for WallGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells on the Bresenham line between two positions, endpoints included.
#[must_use]
pub fn bresenham(from: GridPos, to: GridPos) -> Vec<GridPos> {
    let mut cells = Vec::new();
    let dx = (to.x() - from.x()).abs();
    let dy = -(to.y() - from.y()).abs();
    let sx = (to.x() - from.x()).signum();
    let sy = (to.y() - from.y()).signum();
    let mut err = dx + dy;
    let mut x = from.x();
    let mut y = from.y();

    loop {
        cells.push(GridPos::new(x, y));
        if x == to.x() && y == to.y() {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_block_walkability_but_not_bounds() {
        let mut grid = WallGrid::new();
        let cell = GridPos::new(4, 4);
        assert!(grid.is_walkable(cell));
        grid.place_wall(cell);
        assert!(grid.is_wall(cell));
        assert!(!grid.is_walkable(cell));
        assert!(grid.in_bounds(cell));
    }

    #[test]
    fn out_of_bounds_cells_are_never_walkable() {
        let grid = WallGrid::new();
        assert!(!grid.is_walkable(GridPos::new(-1, 0)));
        assert!(!grid.is_walkable(GridPos::new(0, GRID_ROWS)));
        assert!(!grid.is_wall(GridPos::new(-1, 0)));
    }

    #[test]
    fn orthogonal_sight_requires_clear_intermediate_cells() {
        let mut grid = WallGrid::new();
        let from = GridPos::new(2, 5);
        let to = GridPos::new(8, 5);
        assert!(grid.line_of_sight(from, to));
        grid.place_wall(GridPos::new(5, 5));
        assert!(!grid.line_of_sight(from, to));
        // The blocked cell being an endpoint does not break sight.
        assert!(grid.line_of_sight(GridPos::new(4, 5), GridPos::new(5, 5)));
    }

    #[test]
    fn diagonal_sight_traces_a_bresenham_line() {
        let mut grid = WallGrid::new();
        let from = GridPos::new(1, 1);
        let to = GridPos::new(6, 4);
        assert!(grid.line_of_sight(from, to));
        for cell in bresenham(from, to) {
            if cell != from && cell != to {
                grid.place_wall(cell);
            }
        }
        assert!(!grid.line_of_sight(from, to));
    }

    #[test]
    fn bresenham_endpoints_are_included() {
        let cells = bresenham(GridPos::new(0, 0), GridPos::new(3, 2));
        assert_eq!(cells.first(), Some(&GridPos::new(0, 0)));
        assert_eq!(cells.last(), Some(&GridPos::new(3, 2)));
    }
}
