//! Static obstacle grid
//!
//! Built once from a level plan. Queries take axis-aligned boxes in cell
//! units and report the hazard they touch. Leaving the world through the
//! sides or top is a wall; falling out the bottom is lava.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::plan::LevelPlan;

/// Obstacle classification of a cell (or of a box touching several cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Lava,
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Row-major grid of cells, immutable after construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Empty grid of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Static cells of a plan; spawn characters leave empty cells
    pub fn from_plan(plan: &LevelPlan) -> Self {
        let mut grid = Self::new(plan.width(), plan.height());
        for (x, y, glyph) in plan.glyphs() {
            grid.cells[y * grid.width + x] = glyph.cell();
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at integer coordinates, `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Rows top to bottom, for renderers
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Classify the box `[pos, pos + size]`
    ///
    /// Covered cells run from `floor(pos)` to `ceil(pos + size)` exclusive on
    /// each axis. Out of bounds left/right/top is `Wall`, below the bottom edge
    /// is `Lava`, otherwise the first non-empty cell in row-major order.
    pub fn classify(&self, pos: Vec2, size: Vec2) -> Cell {
        let x_start = pos.x.floor() as i64;
        let x_end = (pos.x + size.x).ceil() as i64;
        let y_start = pos.y.floor() as i64;
        let y_end = (pos.y + size.y).ceil() as i64;

        if x_start < 0 || x_end > self.width as i64 || y_start < 0 {
            return Cell::Wall;
        }
        if y_end > self.height as i64 {
            return Cell::Lava;
        }

        // Bounds established above
        for y in y_start as usize..y_end as usize {
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            if let Some(&cell) = row[x_start as usize..x_end as usize]
                .iter()
                .find(|c| !c.is_empty())
            {
                return cell;
            }
        }
        Cell::Empty
    }
}
