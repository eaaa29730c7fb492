//! A terrain grid for maze-style maps.
//!
//! [`Terrain`] describes what a cell is; [`Grid`] stores one terrain value per
//! cell of a row-major rectangle anchored at the origin.

use crate::error::{Error, Result};
use crate::geom::{Point, Range};
use crate::Cost;

/// Cost of stepping onto [`Terrain::Difficult`] ("mud").
pub const DIFFICULT_COST: Cost = 5;

/// What a grid cell is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    /// Impassable.
    Wall,
    /// Cost 1.
    #[default]
    Open,
    /// Cost [`DIFFICULT_COST`].
    Difficult,
}

impl Terrain {
    /// Cost of entering a cell of this kind, or `None` for walls.
    pub const fn cost(self) -> Option<Cost> {
        match self {
            Terrain::Wall => None,
            Terrain::Open => Some(1),
            Terrain::Difficult => Some(DIFFICULT_COST),
        }
    }

    /// Whether the cell can be entered.
    pub const fn is_passable(self) -> bool {
        !matches!(self, Terrain::Wall)
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Terrain::Wall),
            '.' => Some(Terrain::Open),
            '~' => Some(Terrain::Difficult),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Terrain::Wall => '#',
            Terrain::Open => '.',
            Terrain::Difficult => '~',
        }
    }
}

/// A 2D grid of [`Terrain`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct Grid {
    cells: Vec<Terrain>,
    bounds: Range,
}

/// Unchecked wire form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    cells: Vec<Terrain>,
    bounds: Range,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        if raw.bounds.min != Point::ZERO {
            return Err(Error::config(format!(
                "grid bounds must start at the origin, got {}",
                raw.bounds.min
            )));
        }
        if raw.cells.len() != raw.bounds.len() {
            return Err(Error::config(format!(
                "grid of {}x{} needs {} cells, got {}",
                raw.bounds.width(),
                raw.bounds.height(),
                raw.bounds.len(),
                raw.cells.len()
            )));
        }
        Ok(Self {
            cells: raw.cells,
            bounds: raw.bounds,
        })
    }
}

impl Grid {
    /// Create a new grid with every cell [`Terrain::Open`].
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Terrain::Open)
    }

    /// Create a new grid with every cell set to `terrain`.
    ///
    /// Negative dimensions produce an empty grid.
    pub fn filled(width: i32, height: i32, terrain: Terrain) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            cells: vec![terrain; bounds.len()],
            bounds,
        }
    }

    /// Parse a grid from text rows: `#` wall, `.` open, `~` difficult.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(Error::config(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let t = Terrain::from_char(c).ok_or_else(|| {
                    Error::config(format!("unknown terrain {c:?} at column {x}, row {y}"))
                })?;
                cells.push(t);
            }
        }
        Ok(Self {
            cells,
            bounds: Range::sized(width as i32, height as i32),
        })
    }

    /// Returns the bounding range of this grid.
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Width of the grid.
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the grid.
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether the grid contains the given point.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    fn index(&self, p: Point) -> usize {
        (p.y * self.bounds.width() + p.x) as usize
    }

    /// Get the terrain at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Terrain> {
        if !self.contains(p) {
            return None;
        }
        Some(self.cells[self.index(p)])
    }

    /// Whether `p` is inside the grid and not a wall.
    pub fn passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(Terrain::is_passable)
    }

    /// Set the terrain at a point.
    pub fn set(&mut self, p: Point, terrain: Terrain) -> Result<()> {
        if !self.contains(p) {
            return Err(Error::bounds(p));
        }
        let i = self.index(p);
        self.cells[i] = terrain;
        Ok(())
    }

    /// Fill the entire grid with the given terrain.
    pub fn fill(&mut self, terrain: Terrain) {
        self.cells.fill(terrain);
    }

    /// Count how many cells hold the given terrain.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }

    /// Iterate over `(Point, Terrain)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Terrain)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }

    /// Passable orthogonal neighbours of `p` with the cost of entering them,
    /// in ascending coordinate order.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = (Point, Cost)> + '_ {
        p.neighbors_4()
            .into_iter()
            .filter_map(|n| self.at(n).and_then(Terrain::cost).map(|c| (n, c)))
    }

    /// Render the grid back into the text form accepted by [`Grid::from_rows`].
    pub fn to_rows(&self) -> Vec<String> {
        let w = self.bounds.width().max(1) as usize;
        self.cells
            .chunks(w)
            .map(|row| row.iter().map(|t| t.to_char()).collect())
            .collect()
    }
}
