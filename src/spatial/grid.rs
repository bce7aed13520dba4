//! Bounded tile lattice partitioned into rooms
//!
//! The grid owns every room (an arena indexed by [`RoomHandle`]), the per-cell
//! ownership array and the derived door map. Placement is all-or-nothing: a
//! rejected placement leaves every structure untouched.

use ndarray::Array2;
use std::collections::HashSet;
use std::fmt;

use crate::spatial::doors::{Door, DoorMap};
use crate::spatial::room::{GridCoord, Room, RoomHandle, RoomType, Tile, UNLIMITED_CONNECTIONS};
use crate::spatial::shape::{Facing, LocalCell, Shape};

/// Cells adjacent to a set of tiles, with the rooms that own them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundary {
    /// Adjacent in-bounds cells and the direction each was approached from
    ///
    /// A cell touching several tiles of the set appears once per facing.
    pub cells: Vec<(GridCoord, Facing)>,
    /// Owners of active retained cells, once per entry in `cells`
    pub rooms: Vec<RoomHandle>,
}

/// Result of probing a prospective placement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighbourCount {
    /// Active boundary contacts of the placement
    pub count: usize,
    /// Owners of those contacts, repeated once per contact
    pub rooms: Vec<RoomHandle>,
}

impl NeighbourCount {
    /// Distinct adjacent rooms with the number of contacts each has
    pub fn contacts_per_room(&self) -> Vec<(RoomHandle, usize)> {
        let mut tally: Vec<(RoomHandle, usize)> = Vec::new();
        for &room in &self.rooms {
            match tally.iter_mut().find(|(handle, _)| *handle == room) {
                Some((_, count)) => *count += 1,
                None => tally.push((room, 1)),
            }
        }
        tally
    }
}

/// Square tile lattice with room and door bookkeeping
#[derive(Debug, Clone)]
pub struct TileGrid {
    size: usize,
    tiles: Array2<Option<RoomHandle>>,
    rooms: Vec<Room>,
    doors: DoorMap,
    active_tile_count: usize,
}

impl TileGrid {
    /// Create an empty `size`×`size` grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            tiles: Array2::from_elem((size, size), None),
            rooms: Vec::with_capacity(size),
            doors: DoorMap::new(size),
            active_tile_count: 0,
        }
    }

    /// Side length of the grid
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Centre cell, where the starting room is placed
    pub const fn middle(&self) -> GridCoord {
        let half = (self.size / 2) as i32;
        [half, half]
    }

    /// Number of tiles owned by active rooms
    pub const fn active_tile_count(&self) -> usize {
        self.active_tile_count
    }

    /// Rooms in placement order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Handles of all rooms in placement order
    pub fn handles(&self) -> impl Iterator<Item = RoomHandle> + use<> {
        (0..self.rooms.len() as u32).map(RoomHandle)
    }

    /// Look up a room by handle
    pub fn room(&self, handle: RoomHandle) -> Option<&Room> {
        self.rooms.get(handle.index())
    }

    /// Door storage
    pub const fn doors(&self) -> &DoorMap {
        &self.doors
    }

    /// Door between two tiles, in either order
    pub fn door_between(&self, a: GridCoord, b: GridCoord) -> Option<&Door> {
        self.doors.get(a, b)
    }

    /// Whether a coordinate lies inside the grid
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        self.index(coord).is_some()
    }

    fn index(&self, coord: GridCoord) -> Option<[usize; 2]> {
        let x = usize::try_from(coord[0]).ok()?;
        let y = usize::try_from(coord[1]).ok()?;
        (x < self.size && y < self.size).then_some([x, y])
    }

    fn owner(&self, coord: GridCoord) -> Option<RoomHandle> {
        self.index(coord)
            .and_then(|index| self.tiles.get(index).copied().flatten())
    }

    /// Ownership record for a cell; out-of-bounds cells read as empty
    pub fn tile(&self, coord: GridCoord) -> Tile {
        let room = self.owner(coord);
        let room_type = room
            .and_then(|handle| self.room(handle))
            .map_or(RoomType::None, Room::room_type);
        Tile {
            coords: coord,
            room,
            room_type,
        }
    }

    /// Whether a cell is owned by an active room
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.tile(coord).is_active()
    }

    /// Grid coordinates a shape would cover with `anchor` at `at`
    ///
    /// Returns `None` if the anchor is not an occupied cell of the shape.
    pub fn footprint(at: GridCoord, shape: &Shape, anchor: LocalCell) -> Option<Vec<GridCoord>> {
        if !shape.contains_anchor(anchor) {
            return None;
        }
        let origin = [at[0] - anchor[0] as i32, at[1] - anchor[1] as i32];
        Some(
            shape
                .all_active()
                .into_iter()
                .map(|[x, y]| [origin[0] + x as i32, origin[1] + y as i32])
                .collect(),
        )
    }

    /// Cells adjacent to a room but not part of it
    ///
    /// With `prospective == false` occupied cells are dropped, leaving the open
    /// frontier; with `true` they are kept and their owners reported.
    pub fn boundary_of_room(&self, handle: RoomHandle, prospective: bool) -> Boundary {
        self.room(handle).map_or_else(Boundary::default, |room| {
            self.boundary_of_tiles(room.tiles(), prospective)
        })
    }

    /// Cells adjacent to a tile set but not part of it
    pub fn boundary_of_tiles(&self, tiles: &[GridCoord], prospective: bool) -> Boundary {
        let members: HashSet<GridCoord> = tiles.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut boundary = Boundary::default();

        for &[x, y] in tiles {
            for facing in Facing::ALL {
                let [dx, dy] = facing.offset();
                let cell = [x + dx, y + dy];
                if members.contains(&cell) || !seen.insert((cell, facing)) {
                    continue;
                }
                if !self.in_bounds(cell) {
                    continue;
                }

                let tile = self.tile(cell);
                if tile.is_active() && !prospective {
                    continue;
                }
                boundary.cells.push((cell, facing));
                if let (true, Some(room)) = (tile.is_active(), tile.room) {
                    boundary.rooms.push(room);
                }
            }
        }

        boundary
    }

    /// Count active contacts around a prospective placement without mutating
    ///
    /// Returns `None` for a hard failure: the anchor is not part of the shape,
    /// or a covered cell is out of bounds or already occupied.
    pub fn count_neighbours(
        &self,
        at: GridCoord,
        shape: &Shape,
        anchor: LocalCell,
    ) -> Option<NeighbourCount> {
        let footprint = Self::footprint(at, shape, anchor)?;
        if footprint
            .iter()
            .any(|&cell| !self.in_bounds(cell) || self.is_occupied(cell))
        {
            return None;
        }

        let boundary = self.boundary_of_tiles(&footprint, true);
        Some(NeighbourCount {
            count: boundary.rooms.len(),
            rooms: boundary.rooms,
        })
    }

    /// Place a room with `anchor` aligned to `at`
    ///
    /// Fails without side effects if the anchor is not part of the shape, any
    /// covered cell is out of bounds or occupied, or `room_type` is the
    /// `None` sentinel.
    pub fn place_room(
        &mut self,
        at: GridCoord,
        shape: &Shape,
        anchor: LocalCell,
        room_type: RoomType,
        connection_cap: usize,
    ) -> Option<RoomHandle> {
        if room_type == RoomType::None {
            return None;
        }
        let footprint = Self::footprint(at, shape, anchor)?;
        let mut indices = Vec::with_capacity(footprint.len());
        for &cell in &footprint {
            let index = self.index(cell)?;
            if self.is_occupied(cell) {
                return None;
            }
            indices.push(index);
        }

        let handle = RoomHandle(u32::try_from(self.rooms.len()).ok()?);
        for index in indices {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = Some(handle);
            }
        }

        let room = Room::new(room_type, footprint, connection_cap);
        self.active_tile_count += room.tile_count();
        self.rooms.push(room);
        self.generate_doors(handle);
        Some(handle)
    }

    /// Place a room centred on `at`, trying each occupied cell as the anchor
    /// in row-major order and keeping the first that fits
    pub fn place_room_anywhere(
        &mut self,
        at: GridCoord,
        shape: &Shape,
        room_type: RoomType,
    ) -> Option<RoomHandle> {
        shape
            .all_active()
            .into_iter()
            .find_map(|anchor| self.place_room(at, shape, anchor, room_type, UNLIMITED_CONNECTIONS))
    }

    /// Whether accepting contacts with these rooms would break any cap
    pub fn violates_connection_caps(&self, neighbours: &NeighbourCount) -> bool {
        neighbours
            .contacts_per_room()
            .into_iter()
            .any(|(handle, contacts)| {
                self.room(handle)
                    .is_some_and(|room| room.would_exceed_cap(contacts))
            })
    }

    /// Consume connections after a committed placement
    ///
    /// The new room consumes one connection per contact; each adjacent room
    /// consumes one per time it appears among the contacts.
    pub fn record_connections(&mut self, placed: RoomHandle, neighbours: &NeighbourCount) {
        if let Some(room) = self.rooms.get_mut(placed.index()) {
            room.add_connections(neighbours.count);
        }
        for &handle in &neighbours.rooms {
            if let Some(room) = self.rooms.get_mut(handle.index()) {
                room.add_connections(1);
            }
        }
    }

    fn generate_doors(&mut self, handle: RoomHandle) {
        let Some(room) = self.rooms.get(handle.index()) else {
            return;
        };
        let tiles = room.tiles().to_vec();
        for cell in tiles {
            for facing in Facing::ALL {
                let [dx, dy] = facing.offset();
                self.add_door_if_divided(cell, [cell[0] + dx, cell[1] + dy]);
            }
        }
    }

    fn add_door_if_divided(&mut self, a: GridCoord, b: GridCoord) {
        let first = self.tile(a);
        let second = self.tile(b);
        if !first.is_active() || !second.is_active() {
            return;
        }
        if let (Some(room_a), Some(room_b)) = (first.room, second.room)
            && room_a != room_b
        {
            let priority = first.room_type.max_priority(second.room_type);
            self.doors.insert(a, b, [room_a, room_b], priority);
        }
    }

    /// Derive the door map from scratch over the whole grid
    ///
    /// Produces the same doors as the incremental per-placement updates.
    pub fn recompute_doors(&self) -> DoorMap {
        let mut scratch = self.clone();
        scratch.doors = DoorMap::new(self.size);
        let size = self.size as i32;
        for x in 0..size {
            for y in 0..size {
                scratch.add_door_if_divided([x, y], [x + 1, y]);
                scratch.add_door_if_divided([x, y], [x, y + 1]);
            }
        }
        scratch.doors
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A dungeon with {} rooms.", self.rooms.len())
    }
}
