//! Spatial data structures for room placement
//!
//! This module contains:
//! - Shape masks and their orientations
//! - Placed rooms and tile ownership
//! - Door derivation between rooms
//! - The bounded tile grid tying them together

/// Door records between tiles of different rooms
pub mod doors;
/// Bounded tile lattice with room and door bookkeeping
pub mod grid;
/// Placed rooms, handles and tile records
pub mod room;
/// Room footprint masks
pub mod shape;

pub use grid::TileGrid;
pub use room::{GridCoord, Room, RoomHandle, RoomType};
pub use shape::{Facing, Shape};
