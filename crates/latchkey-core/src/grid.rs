//! Grid of pattern points
//!
//! Points are laid out row-major, each centered in its cell. The grid is
//! generated once per capture session and never changes afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::{DEFAULT_CANVAS_SIZE, DEFAULT_GRID_DIMENSION};

/// A point in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPoint {
    pub x: f32,
    pub y: f32,
}

impl GridPoint {
    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &GridPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Shape and canvas size of a pattern grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Number of point rows
    pub rows: u32,
    /// Number of point columns
    pub columns: u32,
    /// Canvas width in layout units
    pub width: u32,
    /// Canvas height in layout units
    pub height: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_DIMENSION,
            columns: DEFAULT_GRID_DIMENSION,
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
        }
    }
}

impl GridLayout {
    /// Create a layout with the given shape and canvas size
    pub const fn new(rows: u32, columns: u32, width: u32, height: u32) -> Self {
        Self {
            rows,
            columns,
            width,
            height,
        }
    }

    /// Default 3x3 shape on a canvas of the given size
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Total number of points this layout produces
    pub fn point_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Every dimension must be positive and each cell at least one unit wide
    fn validate(&self) -> Result<()> {
        if self.rows == 0
            || self.columns == 0
            || self.width < self.columns
            || self.height < self.rows
        {
            return Err(CoreError::InvalidGeometry {
                rows: self.rows,
                columns: self.columns,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Immutable, row-major sequence of grid points
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    layout: GridLayout,
    points: Vec<GridPoint>,
}

impl Grid {
    /// Generate the grid for a layout
    ///
    /// Cell sizes use integer division, so a canvas that does not divide
    /// evenly leaves a margin on the right and bottom edges.
    pub fn new(layout: GridLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self::generate(layout))
    }

    fn generate(layout: GridLayout) -> Self {
        let cell_width = (layout.width / layout.columns) as f32;
        let cell_height = (layout.height / layout.rows) as f32;
        let x0 = cell_width / 2.0;
        let y0 = cell_height / 2.0;

        let mut points = Vec::with_capacity(layout.point_count());
        for row in 0..layout.rows {
            for column in 0..layout.columns {
                points.push(GridPoint::new(
                    x0 + cell_width * column as f32,
                    y0 + cell_height * row as f32,
                ));
            }
        }

        Self { layout, points }
    }

    /// Layout the grid was generated from
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// All points in index order
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Point at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<GridPoint> {
        self.points.get(index).copied()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the grid has no points (never true for a validated layout)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether every index fits in a single decimal digit
    ///
    /// Pattern codes concatenate indices without a delimiter, so grids with
    /// ten or more points produce codes that can collide.
    pub fn encodes_unambiguously(&self) -> bool {
        self.points.len() < 10
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::generate(GridLayout::default())
    }
}
