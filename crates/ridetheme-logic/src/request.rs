//! Scenery placement request.
//!
//! One immutable value per run. Out-of-range numbers are clamped on
//! construction, never rejected.

use serde::{Deserialize, Serialize};

use crate::anchors::Anchor;
use crate::ports::ObjectId;

pub const MIN_RADIUS: u32 = 1;
pub const MAX_RADIUS: u32 = 12;
pub const MAX_DENSITY: u32 = 100;
pub const MAX_PIECES: u32 = 200;

/// Tuning knobs for a scenery run, without anchors or palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Scan radius in tiles around each anchor (1–12).
    pub radius: u32,
    /// Percent chance each candidate tile is accepted (0–100).
    pub density: u32,
    /// Hard cap on successful placements for the whole run (0–200).
    pub max_pieces: u32,
    pub avoid_paths: bool,
    pub avoid_slopes: bool,
    pub rotate_randomly: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            radius: 5,
            density: 45,
            max_pieces: 40,
            avoid_paths: true,
            avoid_slopes: true,
            rotate_randomly: true,
        }
    }
}

impl PlacementOptions {
    /// Same options with every number forced into range.
    pub fn clamped(self) -> Self {
        Self {
            radius: self.radius.clamp(MIN_RADIUS, MAX_RADIUS),
            density: self.density.min(MAX_DENSITY),
            max_pieces: self.max_pieces.min(MAX_PIECES),
            ..self
        }
    }
}

/// Everything one scenery run needs.
///
/// Deserializing goes through [`PlacementRequest::new`], so a request read
/// from JSON is clamped like one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRequest")]
pub struct PlacementRequest {
    pub anchors: Vec<Anchor>,
    pub options: PlacementOptions,
    /// Theme object ids in declaration order; resolved once per run.
    pub palette: Vec<ObjectId>,
}

#[derive(Deserialize)]
struct RawRequest {
    anchors: Vec<Anchor>,
    #[serde(default)]
    options: PlacementOptions,
    palette: Vec<ObjectId>,
}

impl From<RawRequest> for PlacementRequest {
    fn from(raw: RawRequest) -> Self {
        Self::new(raw.anchors, raw.options, raw.palette)
    }
}

impl PlacementRequest {
    pub fn new(anchors: Vec<Anchor>, options: PlacementOptions, palette: Vec<ObjectId>) -> Self {
        Self {
            anchors,
            options: options.clamped(),
            palette,
        }
    }

    /// Re-apply clamping after the public fields were edited.
    pub fn clamped(self) -> Self {
        Self::new(self.anchors, self.options, self.palette)
    }

    pub fn radius(&self) -> u32 {
        self.options.radius
    }

    pub fn density(&self) -> u32 {
        self.options.density
    }

    pub fn max_pieces(&self) -> u32 {
        self.options.max_pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_range() {
        let o = PlacementOptions::default();
        assert_eq!(o, o.clamped());
    }

    #[test]
    fn construction_clamps() {
        let req = PlacementRequest::new(
            vec![],
            PlacementOptions {
                radius: 0,
                density: 250,
                max_pieces: 1000,
                ..Default::default()
            },
            vec![],
        );
        assert_eq!(req.radius(), 1);
        assert_eq!(req.density(), 100);
        assert_eq!(req.max_pieces(), 200);

        let wide = PlacementOptions {
            radius: 40,
            ..Default::default()
        }
        .clamped();
        assert_eq!(wide.radius, 12);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let o: PlacementOptions = serde_json::from_str(r#"{"radius": 3}"#).unwrap();
        assert_eq!(o.radius, 3);
        assert_eq!(o.density, 45);
        assert!(o.avoid_paths);
    }

    #[test]
    fn deserialized_request_is_clamped() {
        let req: PlacementRequest = serde_json::from_str(
            r#"{"anchors": [], "options": {"density": 900, "max_pieces": 1000, "radius": 40000},
                "palette": ["scenery_small.crate_1"]}"#,
        )
        .unwrap();
        assert_eq!(req.density(), 100);
        assert_eq!(req.max_pieces(), 200);
        assert_eq!(req.radius(), 12);
    }

    #[test]
    fn missing_options_take_defaults() {
        let req: PlacementRequest =
            serde_json::from_str(r#"{"anchors": [], "palette": []}"#).unwrap();
        assert_eq!(req.options, PlacementOptions::default());
    }
}
