//! Tests for tile ownership, placement, neighbour counting and doors

#[cfg(test)]
mod tests {
    use roomlattice::spatial::grid::TileGrid;
    use roomlattice::spatial::room::{RoomType, UNLIMITED_CONNECTIONS};
    use roomlattice::spatial::shape::Shape;

    fn single_at(grid: &mut TileGrid, at: [i32; 2]) -> roomlattice::spatial::RoomHandle {
        grid.place_room(at, &Shape::single(), [0, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .expect("single cell fits")
    }

    fn bar() -> Shape {
        Shape::from_rows(&["#.", "#."]).expect("valid bar")
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = TileGrid::new(63);
        assert_eq!(grid.size(), 63);
        assert_eq!(grid.middle(), [31, 31]);
        assert!(grid.rooms().is_empty());
        assert_eq!(grid.active_tile_count(), 0);
        assert!(grid.doors().is_empty());
        assert!(!grid.is_occupied([31, 31]));
        assert!(grid.in_bounds([0, 62]));
        assert!(!grid.in_bounds([63, 0]));
        assert!(!grid.in_bounds([-1, 0]));
    }

    #[test]
    fn test_place_room_claims_tiles() {
        let mut grid = TileGrid::new(9);
        let handle = grid
            .place_room([2, 2], &bar(), [1, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .expect("bar fits");

        assert_eq!(grid.rooms().len(), 1);
        assert_eq!(grid.active_tile_count(), 2);
        assert!(grid.is_occupied([1, 2]));
        assert!(grid.is_occupied([2, 2]));
        assert!(!grid.is_occupied([3, 2]));

        let tile = grid.tile([1, 2]);
        assert_eq!(tile.room, Some(handle));
        assert_eq!(tile.room_type, RoomType::Normal);
        assert_eq!(grid.tile([5, 5]).room, None);
    }

    // Tests failed placements leave every structure untouched
    // Verified by writing tiles before all cells were checked
    #[test]
    fn test_placement_is_atomic() {
        let mut grid = TileGrid::new(9);
        single_at(&mut grid, [1, 0]);
        let rooms_before = grid.rooms().to_vec();
        let doors_before = grid.doors().clone();

        // Second cell would overlap the existing room
        assert!(grid
            .place_room([0, 0], &bar(), [0, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .is_none());
        // Anchor at the far end pushes the first cell off the grid
        assert!(grid
            .place_room([0, 4], &bar(), [1, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .is_none());
        // Far edge of the grid
        assert!(grid
            .place_room([8, 4], &bar(), [0, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .is_none());
        // Anchor outside the mask
        assert!(grid
            .place_room([4, 4], &bar(), [0, 1], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .is_none());
        // Sentinel type
        assert!(grid
            .place_room([4, 4], &Shape::single(), [0, 0], RoomType::None, UNLIMITED_CONNECTIONS)
            .is_none());

        assert_eq!(grid.rooms(), rooms_before.as_slice());
        assert_eq!(grid.doors(), &doors_before);
        assert_eq!(grid.active_tile_count(), 1);
        assert!(!grid.is_occupied([0, 0]));
        assert!(!grid.is_occupied([4, 4]));
    }

    // Tests a cell enclosed on four sides counts four contacts
    #[test]
    fn test_count_neighbours_surrounded() {
        let mut grid = TileGrid::new(11);
        let around = [[4, 5], [6, 5], [5, 4], [5, 6]].map(|at| single_at(&mut grid, at));

        let count = grid
            .count_neighbours([5, 5], &Shape::single(), [0, 0])
            .expect("centre is free");
        assert_eq!(count.count, 4);
        for handle in around {
            assert!(count.rooms.contains(&handle));
        }
        assert_eq!(count.contacts_per_room().len(), 4);
    }

    // Tests a room touching another along a wall counts each contact
    // Verified by deduplicating boundary cells regardless of facing
    #[test]
    fn test_count_neighbours_counts_contacts() {
        let mut grid = TileGrid::new(11);
        let wall = grid
            .place_room([4, 5], &bar(), [0, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .expect("bar fits");

        let count = grid
            .count_neighbours([4, 6], &bar(), [0, 0])
            .expect("row above is free");
        assert_eq!(count.count, 2);
        assert_eq!(count.rooms, vec![wall, wall]);
        assert_eq!(count.contacts_per_room(), vec![(wall, 2)]);

        let apart = grid
            .count_neighbours([4, 8], &bar(), [0, 0])
            .expect("free and in bounds");
        assert_eq!(apart.count, 0);
    }

    #[test]
    fn test_count_neighbours_hard_failures() {
        let mut grid = TileGrid::new(5);
        single_at(&mut grid, [2, 2]);

        assert!(grid.count_neighbours([2, 2], &Shape::single(), [0, 0]).is_none());
        assert!(grid.count_neighbours([4, 0], &bar(), [0, 0]).is_none());
        assert!(grid.count_neighbours([0, 0], &bar(), [1, 1]).is_none());
    }

    // Tests open boundaries drop occupied and out-of-grid cells
    #[test]
    fn test_boundaries() {
        let mut grid = TileGrid::new(11);
        let centre = single_at(&mut grid, [5, 5]);
        assert_eq!(grid.boundary_of_room(centre, false).cells.len(), 4);

        let east = single_at(&mut grid, [6, 5]);
        let open = grid.boundary_of_room(centre, false);
        assert_eq!(open.cells.len(), 3);
        assert!(open.rooms.is_empty());

        let prospective = grid.boundary_of_room(centre, true);
        assert_eq!(prospective.cells.len(), 4);
        assert_eq!(prospective.rooms, vec![east]);

        let corner = single_at(&mut grid, [0, 0]);
        assert_eq!(grid.boundary_of_room(corner, false).cells.len(), 2);
    }

    // Tests doors appear between adjacent rooms and match a full recompute
    // Verified by skipping door generation on placement
    #[test]
    fn test_doors_between_rooms() {
        let mut grid = TileGrid::new(9);
        let start = grid
            .place_room([4, 4], &Shape::single(), [0, 0], RoomType::Start, UNLIMITED_CONNECTIONS)
            .expect("start fits");
        let next = single_at(&mut grid, [5, 4]);
        grid.place_room([4, 5], &bar(), [0, 0], RoomType::End, UNLIMITED_CONNECTIONS)
            .expect("bar fits");

        let door = grid.door_between([5, 4], [4, 4]).expect("door exists");
        assert_eq!(door.rooms, [start, next]);
        assert_eq!(door.priority, RoomType::Start);
        assert_eq!(grid.door_between([4, 4], [5, 4]), Some(door));

        // Bar covers (4,5) and (5,5): above both singles
        assert_eq!(grid.doors().len(), 3);
        assert_eq!(
            grid.door_between([5, 5], [5, 4]).map(|d| d.priority),
            Some(RoomType::End)
        );
        assert_eq!(grid.recompute_doors(), *grid.doors());
    }

    #[test]
    fn test_no_door_inside_a_room() {
        let mut grid = TileGrid::new(9);
        grid.place_room([2, 2], &bar(), [0, 0], RoomType::Normal, UNLIMITED_CONNECTIONS)
            .expect("bar fits");
        assert!(grid.door_between([2, 2], [3, 2]).is_none());
        assert!(grid.doors().is_empty());
    }

    #[test]
    fn test_place_room_anywhere_finds_anchor() {
        let mut grid = TileGrid::new(3);
        let square = Shape::from_rows(&["##", "##"]).expect("valid square");

        // At the far corner only the top-right anchor keeps the square on the grid
        let handle = grid
            .place_room_anywhere([2, 2], &square, RoomType::Start)
            .expect("some anchor fits");
        let room = grid.room(handle).expect("room exists");
        assert_eq!(room.tiles(), &[[1, 1], [1, 2], [2, 1], [2, 2]]);
        assert_eq!(room.connection_cap(), UNLIMITED_CONNECTIONS);
    }

    // Tests caps block placements and bookkeeping consumes connections
    // Verified by recording connections only on the new room
    #[test]
    fn test_connection_caps() {
        let mut grid = TileGrid::new(11);
        let capped = grid
            .place_room([5, 5], &Shape::single(), [0, 0], RoomType::Normal, 1)
            .expect("fits");

        let first = grid
            .count_neighbours([6, 5], &Shape::single(), [0, 0])
            .expect("free");
        assert!(!grid.violates_connection_caps(&first));
        let placed = single_at(&mut grid, [6, 5]);
        grid.record_connections(placed, &first);

        assert_eq!(grid.room(capped).map(|r| r.connections()), Some(1));
        assert_eq!(grid.room(placed).map(|r| r.connections()), Some(1));

        let second = grid
            .count_neighbours([4, 5], &Shape::single(), [0, 0])
            .expect("free");
        assert!(grid.violates_connection_caps(&second));
    }

    #[test]
    fn test_display_summary() {
        let mut grid = TileGrid::new(9);
        single_at(&mut grid, [1, 1]);
        single_at(&mut grid, [1, 2]);
        assert_eq!(grid.to_string(), "A dungeon with 2 rooms.");
        assert_eq!(grid.handles().count(), 2);
    }
}
