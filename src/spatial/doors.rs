//! Doors between adjacent tiles of different rooms
//!
//! Doors are stored in two S×S arrays indexed by the lower tile of each pair:
//! one for the pair `(x, y)`–`(x + 1, y)` and one for `(x, y)`–`(x, y + 1)`.
//! A lookup with the tiles in either order reaches the same record, so every
//! door is bidirectional by construction.

use ndarray::Array2;

use crate::spatial::room::{GridCoord, RoomHandle, RoomType};

/// Axis of the wall a door sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorOrientation {
    /// Tiles differ in x
    Horizontal,
    /// Tiles share x and differ in y
    Vertical,
}

/// Adjacency between two tiles owned by different rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    /// The two tiles, lower coordinate first
    pub tiles: [GridCoord; 2],
    /// Rooms owning `tiles`, in the same order
    pub rooms: [RoomHandle; 2],
    /// Wall axis derived from the tile alignment
    pub orientation: DoorOrientation,
    /// Higher-ranked type of the two flanking rooms
    pub priority: RoomType,
}

/// Dense door storage for a square grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorMap {
    east: Array2<Option<Door>>,
    north: Array2<Option<Door>>,
    count: usize,
}

impl DoorMap {
    /// Empty door storage for an `size`×`size` grid
    pub fn new(size: usize) -> Self {
        Self {
            east: Array2::from_elem((size, size), None),
            north: Array2::from_elem((size, size), None),
            count: 0,
        }
    }

    /// Number of distinct doors (each counted once, not per direction)
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether no doors have been recorded
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Door between two tiles, in either order; `None` if not 4-adjacent
    pub fn get(&self, a: GridCoord, b: GridCoord) -> Option<&Door> {
        let (slot, low) = Self::slot(a, b)?;
        let index = [usize::try_from(low[0]).ok()?, usize::try_from(low[1]).ok()?];
        match slot {
            DoorOrientation::Horizontal => self.east.get(index),
            DoorOrientation::Vertical => self.north.get(index),
        }
        .and_then(Option::as_ref)
    }

    /// Record a door between two adjacent tiles, replacing any previous one
    pub fn insert(
        &mut self,
        a: GridCoord,
        b: GridCoord,
        rooms: [RoomHandle; 2],
        priority: RoomType,
    ) -> bool {
        let Some((orientation, low)) = Self::slot(a, b) else {
            return false;
        };
        let Ok(x) = usize::try_from(low[0]) else {
            return false;
        };
        let Ok(y) = usize::try_from(low[1]) else {
            return false;
        };

        let (tiles, rooms) = if low == a {
            ([a, b], rooms)
        } else {
            ([b, a], [rooms[1], rooms[0]])
        };

        // The far tile must be on the grid too
        let target = match orientation {
            DoorOrientation::Horizontal if x + 1 < self.east.nrows() => {
                self.east.get_mut([x, y])
            }
            DoorOrientation::Vertical if y + 1 < self.north.ncols() => {
                self.north.get_mut([x, y])
            }
            _ => None,
        };
        let Some(slot) = target else {
            return false;
        };

        if slot.is_none() {
            self.count += 1;
        }
        *slot = Some(Door {
            tiles,
            rooms,
            orientation,
            priority,
        });
        true
    }

    /// All doors, each reported once with its lower tile first
    pub fn iter(&self) -> impl Iterator<Item = &Door> {
        self.east.iter().chain(self.north.iter()).filter_map(Option::as_ref)
    }

    fn slot(a: GridCoord, b: GridCoord) -> Option<(DoorOrientation, GridCoord)> {
        let dx = b[0] - a[0];
        let dy = b[1] - a[1];
        match (dx, dy) {
            (1, 0) => Some((DoorOrientation::Horizontal, a)),
            (-1, 0) => Some((DoorOrientation::Horizontal, b)),
            (0, 1) => Some((DoorOrientation::Vertical, a)),
            (0, -1) => Some((DoorOrientation::Vertical, b)),
            _ => None,
        }
    }
}
