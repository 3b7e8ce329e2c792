//! Host boundary: the traits the theming logic calls into.
//!
//! Everything the logic needs from the park (tile lookups, object
//! resolution, placement, ride attributes) goes through these traits so the
//! same code runs against the real host or against [`GridWorld`](crate::grid_world::GridWorld).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchors::Endpoint;
use crate::grid::{GridCoord, MapSize};
use crate::rides::{ColourSet, RideId, RideInfo};
use crate::tile::TileContents;

/// A theme-declared object identifier, `"<group>.<name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Split into `(group, name)`; `None` if the id has no group prefix.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.split_once('.')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object that is actually loaded in the current park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u32);

/// Quarter-turn orientation, 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(u8);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    /// Wraps into 0..=3.
    pub fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    pub fn quarter_turns(self) -> u8 {
        self.0
    }
}

/// A failed host call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("tile {0} could not be read")]
    TileUnavailable(GridCoord),
    #[error("tile {0} is outside the map")]
    OutOfBounds(GridCoord),
    #[error("placement rejected at {at}: {reason}")]
    PlacementRejected { at: GridCoord, reason: String },
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("host error: {0}")]
    Host(String),
}

/// Read access to park tiles.
pub trait WorldQuery {
    fn map_size(&self) -> MapSize;
    fn tile(&self, at: GridCoord) -> Result<TileContents, WorldError>;
}

/// Resolves theme object ids against the objects loaded in the park.
pub trait ObjectRegistry {
    fn resolve(&self, id: &ObjectId) -> Option<ObjectHandle>;
}

/// Places scenery objects.
pub trait WorldMutation {
    fn place_object(
        &mut self,
        object: ObjectHandle,
        at: GridCoord,
        elevation: i32,
        rotation: Rotation,
    ) -> Result<(), WorldError>;
}

/// Ride lookup.
pub trait StructureRegistry {
    fn rides(&self) -> Vec<RideInfo>;
    fn ride(&self, id: RideId) -> Option<RideInfo>;
}

/// How an entrance or exit can be restyled directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleMode {
    /// The element accepts a themed entrance object.
    ObjectSwap,
    /// The element has a numeric entrance style.
    EntranceType,
}

/// Result of asking an endpoint whether it can be restyled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleCapability {
    Supported(StyleMode),
    Unsupported,
    QueryFailed,
}

/// The style value handed to [`EndpointStyling::set_endpoint_style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointStyle {
    Object(ObjectHandle),
    EntranceType(u8),
}

/// Direct restyle of ride entrances and exits.
pub trait EndpointStyling {
    fn style_capability(&self, endpoint: &Endpoint) -> StyleCapability;
    fn set_endpoint_style(
        &mut self,
        endpoint: &Endpoint,
        style: EndpointStyle,
    ) -> Result<(), WorldError>;
}

/// Single-field ride attribute setters.
pub trait RideStyling {
    fn set_ride_name(&mut self, ride: RideId, name: &str) -> Result<(), WorldError>;
    fn set_ride_colours(&mut self, ride: RideId, colours: ColourSet) -> Result<(), WorldError>;
    fn set_ride_music(&mut self, ride: RideId, style: u8) -> Result<(), WorldError>;
}

/// Everything the scenery run needs from the host.
pub trait SceneryHost: WorldQuery + ObjectRegistry + WorldMutation {}

impl<T: WorldQuery + ObjectRegistry + WorldMutation> SceneryHost for T {}

/// Everything the entrance/exit styler needs from the host.
pub trait EndpointHost: SceneryHost + EndpointStyling {}

impl<T: SceneryHost + EndpointStyling> EndpointHost for T {}
