//! Ride listing and the plain-data ride attributes a theme can set.

use serde::{Deserialize, Serialize};

/// Host-assigned ride identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(pub u32);

impl std::fmt::Display for RideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of attraction the host says a ride is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideClassification {
    Ride,
    Stall,
    Facility,
}

/// A ride as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideInfo {
    pub id: RideId,
    pub name: String,
    /// `None` when the host does not report a classification.
    #[serde(default)]
    pub classification: Option<RideClassification>,
    /// Shops and stalls sell an item; themed rides never do.
    #[serde(default)]
    pub has_shop_item: bool,
}

/// Rides that can be themed, sorted by name.
///
/// Stalls, facilities and anything selling a shop item are dropped. Rides
/// without a reported classification are kept.
pub fn selectable_rides(rides: &[RideInfo]) -> Vec<RideInfo> {
    let mut out: Vec<RideInfo> = rides
        .iter()
        .filter(|r| {
            !r.has_shop_item
                && matches!(r.classification, None | Some(RideClassification::Ride))
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Highest colour index the host palette accepts.
pub const MAX_COLOUR: u8 = 31;

/// Clamp a palette index into the host's colour range.
pub fn clamp_colour(n: u8) -> u8 {
    n.min(MAX_COLOUR)
}

/// Track and vehicle colours applied together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColourSet {
    pub track_main: u8,
    pub track_alt: u8,
    pub supports: u8,
    pub train_body: u8,
    pub train_trim: u8,
}

impl ColourSet {
    /// Every channel clamped into the palette range.
    pub fn clamped(self) -> Self {
        Self {
            track_main: clamp_colour(self.track_main),
            track_alt: clamp_colour(self.track_alt),
            supports: clamp_colour(self.supports),
            train_body: clamp_colour(self.train_body),
            train_trim: clamp_colour(self.train_trim),
        }
    }
}
