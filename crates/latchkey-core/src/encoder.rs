//! Gesture grid encoder
//!
//! Tracks one continuous gesture over a [`Grid`] and records which points it
//! passes through. Selection is first-match: points are scanned in index
//! order and the first unselected point inside the touch radius wins, even
//! when a later point is closer.

use crate::code::CredentialCode;
use crate::error::Result;
use crate::grid::{Grid, GridLayout, GridPoint};
use crate::{HIT_RADIUS_FACTOR, POINT_RADIUS};

/// Converts touch positions into an ordered, duplicate-free selection path
#[derive(Debug, Clone)]
pub struct PatternEncoder {
    /// Points of the pattern grid
    grid: Grid,
    /// Selected point indices in selection order
    selected: Vec<usize>,
    /// Current pointer position (None when no touch is active)
    current_touch: Option<GridPoint>,
}

impl Default for PatternEncoder {
    fn default() -> Self {
        Self::with_grid(Grid::default())
    }
}

impl PatternEncoder {
    /// Create an encoder over a freshly generated grid
    pub fn new(layout: GridLayout) -> Result<Self> {
        Ok(Self::with_grid(Grid::new(layout)?))
    }

    /// Create an encoder over an existing grid
    pub fn with_grid(grid: Grid) -> Self {
        if !grid.encodes_unambiguously() {
            tracing::warn!(
                points = grid.len(),
                "Pattern grid has 10 or more points; codes may collide"
            );
        }

        Self {
            selected: Vec::with_capacity(grid.len()),
            grid,
            current_touch: None,
        }
    }

    /// Begin a new gesture, discarding any previous selection
    pub fn start_path(&mut self, touch: GridPoint) {
        self.selected.clear();
        self.current_touch = Some(touch);
        self.try_select(touch);
    }

    /// Move the pointer and select the point under it, if any
    pub fn update_path(&mut self, touch: GridPoint) {
        self.current_touch = Some(touch);
        self.try_select(touch);
    }

    /// Lift the pointer; the selection is kept for the caller to read
    pub fn end_path(&mut self) {
        self.current_touch = None;
    }

    /// End the gesture and take its code
    ///
    /// Returns `None` for an empty selection. A returned code leaves the
    /// encoder cleared and ready for the next gesture.
    pub fn finish_gesture(&mut self) -> Option<CredentialCode> {
        self.end_path();

        if self.selected.is_empty() {
            return None;
        }

        let code = self.encode();
        tracing::debug!(points = self.selected.len(), "Pattern gesture completed");
        self.clear();
        Some(code)
    }

    /// Reset both the selection and the pointer
    pub fn clear(&mut self) {
        self.selected.clear();
        self.current_touch = None;
    }

    /// Selected indices in selection order
    pub fn selected_points(&self) -> &[usize] {
        &self.selected
    }

    /// Whether `index` is already part of the path
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Current pointer position
    pub fn current_touch(&self) -> Option<GridPoint> {
        self.current_touch
    }

    /// Grid this encoder selects from
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Encode the current path as concatenated decimal indices
    pub fn encode(&self) -> CredentialCode {
        CredentialCode::from_indices(&self.selected)
    }

    /// Radius around each point that counts as a hit
    pub fn hit_radius() -> f32 {
        POINT_RADIUS * HIT_RADIUS_FACTOR
    }

    /// Admit at most one point per call
    fn try_select(&mut self, touch: GridPoint) {
        let radius = Self::hit_radius();
        let hit = self
            .grid
            .points()
            .iter()
            .enumerate()
            .find(|(index, point)| {
                !self.selected.contains(index) && touch.distance_to(point) <= radius
            })
            .map(|(index, _)| index);

        if let Some(index) = hit {
            self.selected.push(index);
        }
    }
}
