//! Pure ride theming logic.
//!
//! This crate contains everything about applying a theme to a ride that is
//! independent of the host park. The host is reached only through the traits
//! in [`ports`], so the same logic runs against a live park, the in-memory
//! [`grid_world::GridWorld`], or a test double. Randomness is always passed in
//! as a `rand::Rng`, so a seeded source reproduces a run exactly.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`anchors`] | Station and entrance/exit tile collection for a ride |
//! | [`budget`] | Run-wide visited set and piece budget |
//! | [`endpoints`] | Entrance/exit restyle with global accent fallback gate |
//! | [`grid`] | Grid coordinates, radius scan order, neighbour pick |
//! | [`grid_world`] | In-memory park implementing every port, JSON snapshots |
//! | [`ports`] | Host traits: tile query, object registry, placement, ride setters |
//! | [`request`] | Scenery placement request with clamped options |
//! | [`rides`] | Ride listing filter, colour sets |
//! | [`sampling`] | Density roll, palette resolution, object/rotation picks |
//! | [`scenery`] | Scenery placement run around ride anchors |
//! | [`suitability`] | Per-tile scenery suitability checks |
//! | [`themes`] | Theme catalog (built-in and JSON) |
//! | [`tile`] | Typed tile contents and slope classification |

pub mod anchors;
pub mod budget;
pub mod endpoints;
pub mod grid;
pub mod grid_world;
pub mod ports;
pub mod request;
pub mod rides;
pub mod sampling;
pub mod scenery;
pub mod suitability;
pub mod themes;
pub mod tile;
