//! Can a scenery piece go on this tile?

use crate::grid::GridCoord;
use crate::ports::WorldQuery;
use crate::request::PlacementOptions;
use crate::tile::TileContents;

/// Most scenery elements a tile may already hold and still take another piece.
pub const MAX_EXISTING_SCENERY: usize = 1;

/// Why a tile was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    QueryFailed,
    NoSurface,
    Water,
    Sloped,
    Footpath,
    Crowded,
}

/// Check a tile's contents against the run options.
pub fn check_tile(tile: &TileContents, options: &PlacementOptions) -> Result<(), Rejection> {
    let surface = tile.surface().ok_or(Rejection::NoSurface)?;
    if surface.has_water() {
        return Err(Rejection::Water);
    }
    if options.avoid_slopes && !surface.slope.is_flat() {
        return Err(Rejection::Sloped);
    }
    if options.avoid_paths && tile.has_footpath() {
        return Err(Rejection::Footpath);
    }
    if tile.scenery_count() > MAX_EXISTING_SCENERY {
        return Err(Rejection::Crowded);
    }
    Ok(())
}

pub fn is_suitable(tile: &TileContents, options: &PlacementOptions) -> bool {
    check_tile(tile, options).is_ok()
}

/// Query the world and check the tile; returns the surface height on success.
///
/// A failed query counts as unsuitable.
pub fn probe_tile(
    world: &impl WorldQuery,
    at: GridCoord,
    options: &PlacementOptions,
) -> Result<i32, Rejection> {
    let tile = world.tile(at).map_err(|_| Rejection::QueryFailed)?;
    check_tile(&tile, options)?;
    Ok(tile.surface_z())
}
