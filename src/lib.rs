//! Procedural dungeon layout by growing polyomino rooms outward from a start room
//!
//! Rooms are square occupancy masks placed on a bounded tile grid. Each pass
//! builds a queue of rooms to place, then attaches them one by one to the
//! open boundary of rooms already on the grid, accepting candidates with a
//! probability driven by how many cells they would touch. Doors are derived
//! wherever two rooms meet.

#![forbid(unsafe_code)]

/// Rulesets, room catalogs, queue building and the pass engine
pub mod algorithm;
/// Configuration, errors, logging and image export
pub mod io;
/// Interpolation and seeded random selection
pub mod math;
/// Shapes, rooms, doors and the tile grid
pub mod spatial;

pub use io::error::{GenerationError, Result};
