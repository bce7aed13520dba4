//! Placed rooms, their handles and per-tile ownership records

use std::fmt;

/// Absolute grid coordinate `[x, y]`
pub type GridCoord = [i32; 2];

/// Connection cap meaning "no limit"
pub const UNLIMITED_CONNECTIONS: usize = usize::MAX;

/// Room category; the derived ordering is the door priority ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RoomType {
    /// Empty sentinel, never active
    #[default]
    None,
    /// Ordinary room
    Normal,
    /// The room the dungeon grows from
    Start,
    /// Terminal room
    End,
}

impl RoomType {
    /// Higher-ranked of two types (End > Start > Normal > None)
    #[must_use]
    pub fn max_priority(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Stable index of a room inside its grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomHandle(pub(crate) u32);

impl RoomHandle {
    /// Position of the room in the grid's room list
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A placed, typed cluster of tiles
///
/// Created only by the grid when a placement commits. Afterwards only the
/// consumed connection count changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    room_type: RoomType,
    tiles: Vec<GridCoord>,
    connection_cap: usize,
    connections: usize,
}

impl Room {
    pub(crate) const fn new(room_type: RoomType, tiles: Vec<GridCoord>, connection_cap: usize) -> Self {
        Self {
            room_type,
            tiles,
            connection_cap,
            connections: 0,
        }
    }

    /// Category of the room
    pub const fn room_type(&self) -> RoomType {
        self.room_type
    }

    /// Occupied grid coordinates in placement order
    pub fn tiles(&self) -> &[GridCoord] {
        &self.tiles
    }

    /// Number of occupied tiles
    pub const fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Maximum connections this room accepts
    pub const fn connection_cap(&self) -> usize {
        self.connection_cap
    }

    /// Connections consumed so far
    pub const fn connections(&self) -> usize {
        self.connections
    }

    /// Whether taking `extra` more connections would pass the cap
    pub const fn would_exceed_cap(&self, extra: usize) -> bool {
        self.connections.saturating_add(extra) > self.connection_cap
    }

    pub(crate) const fn add_connections(&mut self, count: usize) {
        self.connections = self.connections.saturating_add(count);
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Room: Type = {:?}; Tiles = ", self.room_type)?;
        if self.tiles.is_empty() {
            return write!(f, "None");
        }
        for (i, [x, y]) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({x}, {y})")?;
        }
        Ok(())
    }
}

/// Ownership record for a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Absolute coordinate of the cell
    pub coords: GridCoord,
    /// Owning room, if any
    pub room: Option<RoomHandle>,
    /// Type of the owning room, `None` when unowned
    pub room_type: RoomType,
}

impl Tile {
    /// A tile is active iff it is owned by a non-sentinel room
    pub fn is_active(&self) -> bool {
        self.room.is_some() && self.room_type != RoomType::None
    }
}
