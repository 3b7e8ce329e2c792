//! In-memory park implementing every host port.
//!
//! Used by the headless harness and by tests. Besides plain tile data it can
//! inject failures: tiles whose query fails, tiles that refuse placements, and
//! per-endpoint restyle capabilities.
//!
//! Worlds can be loaded from a sparse JSON [`WorldSnapshot`]: every tile not
//! listed is a flat owned surface at `base_z`.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchors::Endpoint;
use crate::grid::{GridCoord, MapSize};
use crate::ports::{
    EndpointStyle, EndpointStyling, ObjectHandle, ObjectId, ObjectRegistry, RideStyling,
    Rotation, StructureRegistry, StyleCapability, WorldError, WorldMutation, WorldQuery,
};
use crate::rides::{ColourSet, RideId, RideInfo};
use crate::scenery::PlacementPlanEntry;
use crate::tile::{Surface, TileContents, TileElement};

/// A ride plus the attributes a theme can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkRide {
    #[serde(flatten)]
    pub info: RideInfo,
    #[serde(default)]
    pub colours: Option<ColourSet>,
    #[serde(default)]
    pub music_style: Option<u8>,
    /// Some rides (e.g. transport) have no music setting.
    #[serde(default = "default_true")]
    pub has_music: bool,
}

fn default_true() -> bool {
    true
}

/// One explicitly described tile in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    /// Replaces the default flat surface entirely.
    #[serde(default)]
    pub elements: Vec<TileElement>,
    /// Appended after the default surface when `elements` is empty.
    #[serde(default)]
    pub extra: Vec<TileElement>,
}

/// Endpoint restyle capability override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapabilitySpec {
    pub x: i32,
    pub y: i32,
    pub capability: StyleCapability,
}

/// Sparse JSON description of a park.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub size: MapSize,
    #[serde(default)]
    pub base_z: i32,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    #[serde(default)]
    pub rides: Vec<ParkRide>,
    /// Objects loaded in the park; handle = position in this list.
    #[serde(default)]
    pub objects: Vec<ObjectId>,
    #[serde(default)]
    pub capabilities: Vec<CapabilitySpec>,
    #[serde(default)]
    pub failing_queries: Vec<GridCoord>,
    #[serde(default)]
    pub rejecting_tiles: Vec<GridCoord>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid world JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("map size {0:?} is empty")]
    EmptyMap(MapSize),
    #[error("tile {0} lies outside the map")]
    TileOutOfBounds(GridCoord),
    #[error("duplicate ride id {0}")]
    DuplicateRide(RideId),
    #[error("map size {0:?} exceeds 16777216 tiles")]
    MapTooLarge(MapSize),
}

/// Largest map a snapshot may describe, in tiles.
pub const MAX_MAP_TILES: usize = 1 << 24;

/// Tile count of `size`, or `None` when it does not fit in `usize`.
fn tile_count(size: MapSize) -> Option<usize> {
    let x = usize::try_from(size.x.max(0)).ok()?;
    let y = usize::try_from(size.y.max(0)).ok()?;
    x.checked_mul(y)
}

#[derive(Debug, Clone, Default)]
pub struct GridWorld {
    size: MapSize,
    tiles: Vec<TileContents>,
    rides: Vec<ParkRide>,
    objects: Vec<ObjectId>,
    object_index: HashMap<ObjectId, ObjectHandle>,
    capabilities: HashMap<GridCoord, StyleCapability>,
    failing_queries: BTreeSet<GridCoord>,
    rejecting_tiles: BTreeSet<GridCoord>,
    placements: Vec<PlacementPlanEntry>,
    endpoint_styles: HashMap<GridCoord, EndpointStyle>,
}

impl GridWorld {
    /// Map where every tile is a flat owned surface at `base_z`.
    ///
    /// Sizes past [`MAX_MAP_TILES`] get no tile storage; every query on them
    /// fails. [`GridWorld::from_snapshot`] refuses such sizes instead.
    pub fn flat(size: MapSize, base_z: i32) -> Self {
        let count = tile_count(size)
            .filter(|&n| n <= MAX_MAP_TILES)
            .unwrap_or(0);
        let ground = TileContents::new(vec![TileElement::Surface(Surface::flat(base_z))]);
        Self {
            size,
            tiles: vec![ground; count],
            ..Default::default()
        }
    }

    pub fn from_snapshot(snapshot: WorldSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.size.is_empty() {
            return Err(SnapshotError::EmptyMap(snapshot.size));
        }
        if tile_count(snapshot.size).map_or(true, |n| n > MAX_MAP_TILES) {
            return Err(SnapshotError::MapTooLarge(snapshot.size));
        }
        let mut world = Self::flat(snapshot.size, snapshot.base_z);
        for spec in snapshot.tiles {
            let at = GridCoord::new(spec.x, spec.y);
            let tile = world
                .tile_mut(at)
                .ok_or(SnapshotError::TileOutOfBounds(at))?;
            if !spec.elements.is_empty() {
                tile.elements = spec.elements;
            }
            tile.elements.extend(spec.extra);
        }
        for ride in snapshot.rides {
            if world.rides.iter().any(|r| r.info.id == ride.info.id) {
                return Err(SnapshotError::DuplicateRide(ride.info.id));
            }
            world.rides.push(ride);
        }
        for id in snapshot.objects {
            world.load_object(id.as_str());
        }
        for cap in snapshot.capabilities {
            world.set_capability(GridCoord::new(cap.x, cap.y), cap.capability);
        }
        world.failing_queries.extend(snapshot.failing_queries);
        world.rejecting_tiles.extend(snapshot.rejecting_tiles);
        Ok(world)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: WorldSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    fn index(&self, at: GridCoord) -> Option<usize> {
        self.size
            .contains(at)
            .then(|| at.y as usize * self.size.x as usize + at.x as usize)
    }

    fn tile_mut(&mut self, at: GridCoord) -> Option<&mut TileContents> {
        let i = self.index(at)?;
        self.tiles.get_mut(i)
    }

    /// Make an object available; returns its handle. Loading twice is a no-op.
    pub fn load_object(&mut self, id: &str) -> ObjectHandle {
        let id = ObjectId::from(id);
        if let Some(&handle) = self.object_index.get(&id) {
            return handle;
        }
        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(id.clone());
        self.object_index.insert(id, handle);
        handle
    }

    pub fn object_id(&self, handle: ObjectHandle) -> Option<&ObjectId> {
        self.objects.get(handle.0 as usize)
    }

    pub fn add_ride(&mut self, info: RideInfo) {
        self.rides.push(ParkRide {
            info,
            colours: None,
            music_style: None,
            has_music: true,
        });
    }

    pub fn park_ride(&self, id: RideId) -> Option<&ParkRide> {
        self.rides.iter().find(|r| r.info.id == id)
    }

    fn park_ride_mut(&mut self, id: RideId) -> Result<&mut ParkRide, WorldError> {
        self.rides
            .iter_mut()
            .find(|r| r.info.id == id)
            .ok_or_else(|| WorldError::Host(format!("no ride {id}")))
    }

    pub fn push_element(&mut self, at: GridCoord, element: TileElement) {
        if let Some(tile) = self.tile_mut(at) {
            tile.elements.push(element);
        }
    }

    /// Replace the tile's surface (or add one if it has none).
    pub fn set_surface(&mut self, at: GridCoord, surface: Surface) {
        if let Some(tile) = self.tile_mut(at) {
            tile.elements.retain(|e| !matches!(e, TileElement::Surface(_)));
            tile.elements.insert(0, TileElement::Surface(surface));
        }
    }

    pub fn clear_tile(&mut self, at: GridCoord) {
        if let Some(tile) = self.tile_mut(at) {
            tile.elements.clear();
        }
    }

    /// Queries of this tile will fail.
    pub fn fail_query(&mut self, at: GridCoord) {
        self.failing_queries.insert(at);
    }

    /// Placements on this tile will be refused.
    pub fn reject_placement(&mut self, at: GridCoord) {
        self.rejecting_tiles.insert(at);
    }

    pub fn set_capability(&mut self, at: GridCoord, capability: StyleCapability) {
        self.capabilities.insert(at, capability);
    }

    /// Successful placements, in call order.
    pub fn placements(&self) -> &[PlacementPlanEntry] {
        &self.placements
    }

    pub fn endpoint_style(&self, at: GridCoord) -> Option<EndpointStyle> {
        self.endpoint_styles.get(&at).copied()
    }
}

impl WorldQuery for GridWorld {
    fn map_size(&self) -> MapSize {
        self.size
    }

    fn tile(&self, at: GridCoord) -> Result<TileContents, WorldError> {
        if self.failing_queries.contains(&at) {
            return Err(WorldError::TileUnavailable(at));
        }
        let i = self.index(at).ok_or(WorldError::OutOfBounds(at))?;
        self.tiles
            .get(i)
            .cloned()
            .ok_or(WorldError::TileUnavailable(at))
    }
}

impl ObjectRegistry for GridWorld {
    fn resolve(&self, id: &ObjectId) -> Option<ObjectHandle> {
        self.object_index.get(id).copied()
    }
}

impl WorldMutation for GridWorld {
    fn place_object(
        &mut self,
        object: ObjectHandle,
        at: GridCoord,
        elevation: i32,
        rotation: Rotation,
    ) -> Result<(), WorldError> {
        if self.rejecting_tiles.contains(&at) {
            return Err(WorldError::PlacementRejected {
                at,
                reason: "tile refuses placements".into(),
            });
        }
        let id = self
            .object_id(object)
            .cloned()
            .ok_or_else(|| WorldError::Host(format!("unknown object handle {}", object.0)))?;
        let tile = self.tile_mut(at).ok_or(WorldError::OutOfBounds(at))?;
        tile.elements.push(TileElement::SmallScenery { object: id.0 });
        self.placements.push(PlacementPlanEntry {
            object,
            at,
            elevation,
            rotation,
        });
        Ok(())
    }
}

impl StructureRegistry for GridWorld {
    fn rides(&self) -> Vec<RideInfo> {
        self.rides.iter().map(|r| r.info.clone()).collect()
    }

    fn ride(&self, id: RideId) -> Option<RideInfo> {
        self.park_ride(id).map(|r| r.info.clone())
    }
}

impl EndpointStyling for GridWorld {
    fn style_capability(&self, endpoint: &Endpoint) -> StyleCapability {
        if self.failing_queries.contains(&endpoint.at) {
            return StyleCapability::QueryFailed;
        }
        self.capabilities
            .get(&endpoint.at)
            .copied()
            .unwrap_or(StyleCapability::Unsupported)
    }

    fn set_endpoint_style(
        &mut self,
        endpoint: &Endpoint,
        style: EndpointStyle,
    ) -> Result<(), WorldError> {
        match self.style_capability(endpoint) {
            StyleCapability::Supported(_) => {
                self.endpoint_styles.insert(endpoint.at, style);
                Ok(())
            }
            StyleCapability::Unsupported => Err(WorldError::Unsupported("endpoint style")),
            StyleCapability::QueryFailed => Err(WorldError::TileUnavailable(endpoint.at)),
        }
    }
}

impl RideStyling for GridWorld {
    fn set_ride_name(&mut self, ride: RideId, name: &str) -> Result<(), WorldError> {
        self.park_ride_mut(ride)?.info.name = name.to_string();
        Ok(())
    }

    fn set_ride_colours(&mut self, ride: RideId, colours: ColourSet) -> Result<(), WorldError> {
        self.park_ride_mut(ride)?.colours = Some(colours);
        Ok(())
    }

    fn set_ride_music(&mut self, ride: RideId, style: u8) -> Result<(), WorldError> {
        let r = self.park_ride_mut(ride)?;
        if !r.has_music {
            return Err(WorldError::Unsupported("ride music"));
        }
        r.music_style = Some(style);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Slope;

    const SNAPSHOT: &str = r#"{
        "size": {"x": 6, "y": 4},
        "base_z": 8,
        "tiles": [
            {"x": 1, "y": 1, "extra": [{"type": "footpath", "base_z": 8}]},
            {"x": 2, "y": 1, "elements": [{"type": "surface", "base_z": 10, "slope": "Steep"}]}
        ],
        "rides": [{"id": 4, "name": "Galleon"}],
        "objects": ["scenery_small.crate_1"],
        "capabilities": [{"x": 0, "y": 0, "capability": {"Supported": "EntranceType"}}],
        "rejecting_tiles": [{"x": 5, "y": 3}]
    }"#;

    #[test]
    fn snapshot_loads_sparse_tiles() {
        let w = GridWorld::from_json(SNAPSHOT).unwrap();
        assert_eq!(w.map_size(), MapSize::new(6, 4));
        assert_eq!(w.tile(GridCoord::new(0, 0)).unwrap().surface_z(), 8);
        assert!(w.tile(GridCoord::new(1, 1)).unwrap().has_footpath());
        let steep = w.tile(GridCoord::new(2, 1)).unwrap();
        assert_eq!(steep.surface().map(|s| s.slope), Some(Slope::Steep));
        assert_eq!(w.ride(RideId(4)).map(|r| r.name), Some("Galleon".to_string()));
        assert_eq!(w.resolve(&ObjectId::from("scenery_small.crate_1")), Some(ObjectHandle(0)));
    }

    #[test]
    fn snapshot_rejects_huge_maps() {
        for (x, y) in [(100_000, 100_000), (i32::MAX, i32::MAX), (4097, 4096)] {
            let json = format!(r#"{{"size": {{"x": {x}, "y": {y}}}}}"#);
            assert!(matches!(
                GridWorld::from_json(&json),
                Err(SnapshotError::MapTooLarge(_))
            ));
        }
    }

    #[test]
    fn oversized_flat_world_fails_queries() {
        let w = GridWorld::flat(MapSize::new(i32::MAX, i32::MAX), 0);
        assert!(w.tile(GridCoord::new(i32::MAX - 1, i32::MAX - 1)).is_err());
    }

    #[test]
    fn snapshot_rejects_out_of_bounds_tiles() {
        let json = r#"{"size": {"x": 2, "y": 2}, "tiles": [{"x": 5, "y": 0}]}"#;
        assert!(matches!(
            GridWorld::from_json(json),
            Err(SnapshotError::TileOutOfBounds(_))
        ));
    }

    #[test]
    fn out_of_bounds_query_fails() {
        let w = GridWorld::flat(MapSize::new(2, 2), 0);
        assert_eq!(
            w.tile(GridCoord::new(2, 0)),
            Err(WorldError::OutOfBounds(GridCoord::new(2, 0)))
        );
    }

    #[test]
    fn placement_adds_scenery_element() {
        let mut w = GridWorld::flat(MapSize::new(3, 3), 0);
        let h = w.load_object("scenery_small.crate_1");
        w.place_object(h, GridCoord::new(1, 1), 0, Rotation::new(2)).unwrap();
        assert_eq!(w.tile(GridCoord::new(1, 1)).unwrap().scenery_count(), 1);
        assert_eq!(w.placements().len(), 1);
    }

    #[test]
    fn music_unsupported_ride_errors() {
        let mut w = GridWorld::flat(MapSize::new(1, 1), 0);
        w.add_ride(RideInfo {
            id: RideId(1),
            name: "Monorail".into(),
            classification: None,
            has_shop_item: false,
        });
        w.rides[0].has_music = false;
        assert!(w.set_ride_music(RideId(1), 3).is_err());
    }
}
