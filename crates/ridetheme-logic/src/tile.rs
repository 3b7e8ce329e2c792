//! Typed tile contents as reported by the host world.

use serde::{Deserialize, Serialize};

use crate::rides::RideId;

/// Slope classification of a surface element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slope {
    #[default]
    Flat,
    /// One edge raised.
    Slope,
    /// One or three corners raised.
    Corner,
    /// Diagonal steep slope.
    Steep,
}

impl Slope {
    /// Map the host's raw 5-bit slope value onto a classification.
    ///
    /// Bit 4 marks a diagonal steep slope; the low four bits are the raised corners.
    pub fn from_raw(raw: u8) -> Self {
        if raw & 0x10 != 0 {
            return Slope::Steep;
        }
        match (raw & 0x0F).count_ones() {
            0 => Slope::Flat,
            2 => Slope::Slope,
            _ => Slope::Corner,
        }
    }

    pub fn is_flat(self) -> bool {
        self == Slope::Flat
    }
}

/// Ground layer of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Surface {
    pub base_z: i32,
    #[serde(default)]
    pub slope: Slope,
    #[serde(default)]
    pub water_height: i32,
    #[serde(default = "default_ownership")]
    pub has_ownership: bool,
}

fn default_ownership() -> bool {
    true
}

impl Surface {
    pub fn flat(base_z: i32) -> Self {
        Self {
            base_z,
            slope: Slope::Flat,
            water_height: 0,
            has_ownership: true,
        }
    }

    /// Standing water on land the park owns.
    pub fn has_water(&self) -> bool {
        self.has_ownership && self.water_height > 0
    }
}

/// One element stacked on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TileElement {
    Surface(Surface),
    Footpath {
        base_z: i32,
    },
    SmallScenery {
        object: String,
    },
    LargeScenery {
        object: String,
    },
    Wall {
        object: String,
    },
    RideEntrance {
        ride: RideId,
    },
    RideExit {
        ride: RideId,
    },
    Track {
        ride: RideId,
        #[serde(default)]
        is_station: bool,
    },
}

impl TileElement {
    /// Decoration-type elements count toward the per-tile scenery cap.
    pub fn is_scenery(&self) -> bool {
        matches!(
            self,
            TileElement::SmallScenery { .. } | TileElement::LargeScenery { .. }
        )
    }

    pub fn owning_ride(&self) -> Option<RideId> {
        match self {
            TileElement::RideEntrance { ride }
            | TileElement::RideExit { ride }
            | TileElement::Track { ride, .. } => Some(*ride),
            _ => None,
        }
    }
}

/// Everything the host reports for a single tile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileContents {
    pub elements: Vec<TileElement>,
}

impl TileContents {
    pub fn new(elements: Vec<TileElement>) -> Self {
        Self { elements }
    }

    /// First surface element, if any.
    pub fn surface(&self) -> Option<&Surface> {
        self.elements.iter().find_map(|e| match e {
            TileElement::Surface(s) => Some(s),
            _ => None,
        })
    }

    /// Height to place objects at; 0 when the tile has no surface.
    pub fn surface_z(&self) -> i32 {
        self.surface().map_or(0, |s| s.base_z)
    }

    pub fn has_footpath(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, TileElement::Footpath { .. }))
    }

    pub fn scenery_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_scenery()).count()
    }
}
