//! Room footprints as square boolean masks
//!
//! A shape is an N×N occupancy mask stored row-major as a bit vector, where
//! local cell `[x, y]` lives at bit `x * N + y`. Shapes never change after
//! construction; orientations produce new shapes.

use bitvec::prelude::*;
use std::collections::VecDeque;
use std::fmt;

use crate::io::error::{GenerationError, Result};
use crate::math::probability::RandomSelector;

/// Local coordinate of a cell within a shape mask
pub type LocalCell = [usize; 2];

/// Direction a boundary cell was approached from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Towards increasing y
    Up,
    /// Towards decreasing y
    Down,
    /// Towards decreasing x
    Left,
    /// Towards increasing x
    Right,
}

impl Facing {
    /// All four facings in the order boundaries are enumerated
    pub const ALL: [Self; 4] = [Self::Down, Self::Up, Self::Left, Self::Right];

    /// Unit step taken when moving one cell in this direction
    pub const fn offset(self) -> [i32; 2] {
        match self {
            Self::Up => [0, 1],
            Self::Down => [0, -1],
            Self::Left => [-1, 0],
            Self::Right => [1, 0],
        }
    }

    /// The facing pointing the other way
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Immutable square occupancy mask describing one room footprint
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    size: usize,
    cells: BitVec,
}

impl Shape {
    /// Build a shape from a flattened row-major mask of length `size²`
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] if `size` is zero or
    /// the mask length is not `size * size`.
    pub fn from_cells(size: usize, cells: &[bool]) -> Result<Self> {
        if size == 0 {
            return Err(GenerationError::InvalidConfiguration {
                reason: "shape size must be at least 1".to_string(),
            });
        }
        if cells.len() != size * size {
            return Err(GenerationError::InvalidConfiguration {
                reason: format!(
                    "shape of size {size} needs {} cells, got {}",
                    size * size,
                    cells.len()
                ),
            });
        }

        Ok(Self {
            size,
            cells: cells.iter().copied().collect(),
        })
    }

    /// Build a shape from text rows, `#` marking active cells
    ///
    /// Row `x` of the text becomes local column `x` of the mask, matching the
    /// flattened layout used by [`Shape::from_cells`].
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] if the rows do not
    /// form a square.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.chars().count() != size {
                return Err(GenerationError::InvalidConfiguration {
                    reason: format!("shape row '{row}' is not {size} cells wide"),
                });
            }
            cells.extend(row.chars().map(|c| c == '#'));
        }
        Self::from_cells(size, &cells)
    }

    /// A single-cell room
    pub fn single() -> Self {
        Self {
            size: 1,
            cells: bitvec![1; 1],
        }
    }

    fn blank(size: usize) -> Self {
        Self {
            size,
            cells: bitvec![0; size * size],
        }
    }

    /// Side length of the mask
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether a local cell is occupied; out-of-mask cells are never occupied
    pub fn is_active(&self, x: i64, y: i64) -> bool {
        let size = self.size as i64;
        if x < 0 || y < 0 || x >= size || y >= size {
            return false;
        }
        self.cells.get((x * size + y) as usize).as_deref() == Some(&true)
    }

    fn active_at(&self, cell: LocalCell) -> bool {
        self.is_active(cell[0] as i64, cell[1] as i64)
    }

    fn set(&mut self, cell: LocalCell, value: bool) {
        let index = cell[0] * self.size + cell[1];
        if index < self.cells.len() {
            self.cells.set(index, value);
        }
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.count_ones()
    }

    /// Flattened mask in row-major order
    pub fn cells(&self) -> Vec<bool> {
        self.cells.iter().map(|bit| *bit).collect()
    }

    /// Occupied local cells in row-major order
    pub fn all_active(&self) -> Vec<LocalCell> {
        self.cells
            .iter_ones()
            .map(|index| [index / self.size, index % self.size])
            .collect()
    }

    /// The four orientations: identity, transpose, 180° rotation and the
    /// anti-diagonal transpose
    pub fn orientations(&self) -> [Self; 4] {
        let n = self.size;
        let mut transpose = Self::blank(n);
        let mut rotated = Self::blank(n);
        let mut anti_transpose = Self::blank(n);

        for [x, y] in self.all_active() {
            transpose.set([y, x], true);
            rotated.set([n - 1 - x, n - 1 - y], true);
            anti_transpose.set([n - 1 - y, n - 1 - x], true);
        }

        [self.clone(), transpose, rotated, anti_transpose]
    }

    /// Occupied cells with no occupied neighbour in the `facing` direction
    pub fn all_on_boundary(&self, facing: Facing) -> Vec<LocalCell> {
        let [dx, dy] = facing.offset();
        self.all_active()
            .into_iter()
            .filter(|&[x, y]| !self.is_active(x as i64 + i64::from(dx), y as i64 + i64::from(dy)))
            .collect()
    }

    /// Uniformly pick one cell exposed in the `facing` direction
    pub fn random_on_boundary(
        &self,
        facing: Facing,
        selector: &mut RandomSelector,
    ) -> Option<LocalCell> {
        selector.choose(&self.all_on_boundary(facing)).copied()
    }

    /// Uniformly pick one occupied cell
    pub fn pick_random_active(&self, selector: &mut RandomSelector) -> Option<LocalCell> {
        selector.choose(&self.all_active()).copied()
    }

    /// True iff the occupied cells form exactly one 4-connected component
    ///
    /// An empty mask is not contiguous. The flood fill starts at the first
    /// occupied cell in row-major order and the whole mask is compared
    /// afterwards, so islands on any side of the seed are detected.
    pub fn is_contiguous(&self) -> bool {
        let Some(seed) = self.cells.first_one() else {
            return false;
        };

        let n = self.size;
        let mut visited: BitVec = bitvec![0; n * n];
        visited.set(seed, true);
        let mut queue = VecDeque::from([[seed / n, seed % n]]);

        while let Some([x, y]) = queue.pop_front() {
            for facing in Facing::ALL {
                let [dx, dy] = facing.offset();
                let nx = x as i64 + i64::from(dx);
                let ny = y as i64 + i64::from(dy);
                if !self.is_active(nx, ny) {
                    continue;
                }
                let index = nx as usize * n + ny as usize;
                if visited.get(index).as_deref() == Some(&false) {
                    visited.set(index, true);
                    queue.push_back([nx as usize, ny as usize]);
                }
            }
        }

        visited == self.cells
    }

    /// Whether the anchor is an occupied cell of this shape
    pub fn contains_anchor(&self, anchor: LocalCell) -> bool {
        self.active_at(anchor)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}x{}: ", self.size, self.size)?;
        for x in 0..self.size {
            if x > 0 {
                write!(f, "/")?;
            }
            for y in 0..self.size {
                let mark = if self.active_at([x, y]) { '#' } else { '.' };
                write!(f, "{mark}")?;
            }
        }
        write!(f, ")")
    }
}
