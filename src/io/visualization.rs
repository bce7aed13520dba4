//! Animated GIF of a dungeon growing one room per frame

use image::{Delay, Frame};
use std::path::Path;

use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{GenerationError, Result};
use crate::io::image::{create_parent_dir, occupied_bounds, render_rooms};
use crate::spatial::grid::TileGrid;

/// Final frame is held this many frame delays
const FINAL_FRAME_HOLD: u32 = 25;

/// Frames showing the first `n` rooms for `n = 1..=rooms`, on the final bounds
///
/// Automatically skips frames if the requested frame rate exceeds viewer
/// capabilities, always keeping the complete dungeon as the last frame.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyDungeon`] if nothing has been placed.
pub fn placement_frames(grid: &TileGrid, frame_delay_ms: u32) -> Result<Vec<Frame>> {
    let bounds = occupied_bounds(grid).ok_or(GenerationError::EmptyDungeon)?;

    let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
    let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
        VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1)) as usize
    } else {
        1
    };

    let room_count = grid.rooms().len();
    let delay = Delay::from_numer_denom_ms(effective_delay_ms, 1);
    let mut frames: Vec<Frame> = (1..=room_count)
        .filter(|visible| visible % skip_factor == 0 || *visible == room_count)
        .map(|visible| Frame::from_parts(render_rooms(grid, visible, bounds), 0, 0, delay))
        .collect();

    if let Some(last) = frames.last().map(|frame| frame.buffer().clone()) {
        frames.push(Frame::from_parts(
            last,
            0,
            0,
            Delay::from_numer_denom_ms(effective_delay_ms * FINAL_FRAME_HOLD, 1),
        ));
    }

    Ok(frames)
}

/// Export the placement order as an animated GIF
///
/// # Errors
///
/// Returns an error if:
/// - No rooms have been placed in the grid
/// - File system operations fail
/// - GIF encoding fails
pub fn export_placement_gif(grid: &TileGrid, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
    let frames = placement_frames(grid, frame_delay_ms)?;

    create_parent_dir(output_path)?;
    let file = std::fs::File::create(output_path).map_err(|e| GenerationError::FileSystem {
        path: output_path.to_path_buf(),
        operation: "create file",
        source: e,
    })?;

    let mut encoder = image::codecs::gif::GifEncoder::new(file);
    encoder
        .encode_frames(frames)
        .map_err(|e| GenerationError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
