//! PNG export of a finished dungeon, cropped to the placed rooms
//!
//! Each tile becomes a square of [`TILE_PIXELS`] pixels filled with its
//! room's colour. Edges between different rooms (or a room and empty space)
//! are drawn as walls, with a gap where a door joins the two tiles. Grid `y`
//! grows upwards, so image rows are flipped.

use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

use crate::io::configuration::TILE_PIXELS;
use crate::io::error::{GenerationError, Result};
use crate::spatial::grid::TileGrid;
use crate::spatial::room::{GridCoord, RoomHandle, RoomType};
use crate::spatial::shape::Facing;

const EMPTY_COLOUR: Rgba<u8> = Rgba([0, 0, 0, 0]);
const WALL_COLOUR: Rgba<u8> = Rgba([32, 32, 40, 255]);
const START_COLOUR: Rgba<u8> = Rgba([96, 200, 110, 255]);
const END_COLOUR: Rgba<u8> = Rgba([220, 90, 80, 255]);
const NORMAL_PALETTE: [[u8; 4]; 8] = [
    [120, 160, 220, 255],
    [230, 190, 110, 255],
    [170, 130, 210, 255],
    [110, 200, 200, 255],
    [220, 150, 180, 255],
    [180, 200, 120, 255],
    [150, 170, 190, 255],
    [210, 170, 140, 255],
];

/// Inclusive range of grid cells covered by placed rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
    /// Lowest `[x, y]`
    pub min: GridCoord,
    /// Highest `[x, y]`
    pub max: GridCoord,
}

impl TileBounds {
    /// Width in tiles
    pub const fn width(&self) -> u32 {
        (self.max[0] - self.min[0] + 1) as u32
    }

    /// Height in tiles
    pub const fn height(&self) -> u32 {
        (self.max[1] - self.min[1] + 1) as u32
    }
}

/// Smallest rectangle containing every placed tile
pub fn occupied_bounds(grid: &TileGrid) -> Option<TileBounds> {
    let mut tiles = grid.rooms().iter().flat_map(|room| room.tiles().iter());
    let first = *tiles.next()?;
    Some(tiles.fold(
        TileBounds {
            min: first,
            max: first,
        },
        |bounds, &[x, y]| TileBounds {
            min: [bounds.min[0].min(x), bounds.min[1].min(y)],
            max: [bounds.max[0].max(x), bounds.max[1].max(y)],
        },
    ))
}

/// Fill colour for a room
pub fn room_colour(handle: RoomHandle, room_type: RoomType) -> Rgba<u8> {
    match room_type {
        RoomType::Start => START_COLOUR,
        RoomType::End => END_COLOUR,
        RoomType::None => EMPTY_COLOUR,
        RoomType::Normal => NORMAL_PALETTE
            .get(handle.index() % NORMAL_PALETTE.len())
            .copied()
            .map_or(EMPTY_COLOUR, Rgba),
    }
}

/// Draw the first `visible` rooms in placement order inside `bounds`
pub fn render_rooms(grid: &TileGrid, visible: usize, bounds: TileBounds) -> RgbaImage {
    let mut img: RgbaImage = ImageBuffer::from_pixel(
        bounds.width() * TILE_PIXELS,
        bounds.height() * TILE_PIXELS,
        EMPTY_COLOUR,
    );
    let shown = |coord: GridCoord| {
        grid.tile(coord)
            .room
            .filter(|handle| handle.index() < visible)
    };

    for (handle, room) in grid.handles().zip(grid.rooms()).take(visible) {
        let colour = room_colour(handle, room.room_type());
        for &cell in room.tiles() {
            let origin = pixel_origin(cell, bounds);
            fill_tile(&mut img, origin, colour);

            for facing in Facing::ALL {
                let [dx, dy] = facing.offset();
                let next = [cell[0] + dx, cell[1] + dy];
                match shown(next) {
                    Some(owner) if owner == handle => {}
                    Some(_) if grid.door_between(cell, next).is_some() => {
                        draw_wall(&mut img, origin, facing, true);
                    }
                    _ => draw_wall(&mut img, origin, facing, false),
                }
            }
        }
    }

    img
}

/// Render every placed room
///
/// # Errors
///
/// Returns [`GenerationError::EmptyDungeon`] if nothing has been placed.
pub fn render_grid(grid: &TileGrid) -> Result<RgbaImage> {
    let bounds = occupied_bounds(grid).ok_or(GenerationError::EmptyDungeon)?;
    Ok(render_rooms(grid, grid.rooms().len(), bounds))
}

/// Export the dungeon as a PNG with a transparent background
///
/// # Errors
///
/// Returns an error if:
/// - No rooms have been placed in the grid
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &TileGrid, output_path: &Path) -> Result<()> {
    let img = render_grid(grid)?;

    create_parent_dir(output_path)?;
    img.save(output_path)
        .map_err(|e| GenerationError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Create the directory an output file will be written into
///
/// # Errors
///
/// Returns [`GenerationError::FileSystem`] if the directory cannot be created.
pub fn create_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}

// Top-left pixel of a tile; grid y is flipped
const fn pixel_origin(cell: GridCoord, bounds: TileBounds) -> [u32; 2] {
    [
        (cell[0] - bounds.min[0]) as u32 * TILE_PIXELS,
        (bounds.max[1] - cell[1]) as u32 * TILE_PIXELS,
    ]
}

fn fill_tile(img: &mut RgbaImage, origin: [u32; 2], colour: Rgba<u8>) {
    for dx in 0..TILE_PIXELS {
        for dy in 0..TILE_PIXELS {
            put(img, origin[0] + dx, origin[1] + dy, colour);
        }
    }
}

fn draw_wall(img: &mut RgbaImage, origin: [u32; 2], facing: Facing, door: bool) {
    let last = TILE_PIXELS - 1;
    let gap = (TILE_PIXELS / 4)..(TILE_PIXELS - TILE_PIXELS / 4);
    for step in 0..TILE_PIXELS {
        if door && gap.contains(&step) {
            continue;
        }
        let [px, py] = match facing {
            Facing::Up => [step, 0],
            Facing::Down => [step, last],
            Facing::Left => [0, step],
            Facing::Right => [last, step],
        };
        put(img, origin[0] + px, origin[1] + py, WALL_COLOUR);
    }
}

fn put(img: &mut RgbaImage, x: u32, y: u32, colour: Rgba<u8>) {
    if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
        *pixel = colour;
    }
}
