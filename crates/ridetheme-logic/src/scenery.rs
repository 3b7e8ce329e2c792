//! Scenery placement around a ride.
//!
//! For each anchor in order, every tile in its radius disk is offered to a
//! run-wide [`BudgetTracker`]. Fresh tiles get a density roll first, then the
//! suitability check, then an object and rotation draw and a placement call.
//! A rejected placement is abandoned without consuming budget. The first fresh
//! tile seen after the budget is spent ends the whole run.
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use ridetheme_logic::anchors::Anchor;
//! use ridetheme_logic::grid::{GridCoord, MapSize};
//! use ridetheme_logic::grid_world::GridWorld;
//! use ridetheme_logic::ports::ObjectId;
//! use ridetheme_logic::request::{PlacementOptions, PlacementRequest};
//! use ridetheme_logic::scenery::run_placement;
//!
//! let mut world = GridWorld::flat(MapSize::new(16, 16), 14);
//! world.load_object("scenery_small.crate_1");
//!
//! let options = PlacementOptions {
//!     radius: 1,
//!     density: 100,
//!     max_pieces: 100,
//!     ..Default::default()
//! };
//! let request = PlacementRequest::new(
//!     vec![Anchor::station(GridCoord::new(5, 5))],
//!     options,
//!     vec![ObjectId::from("scenery_small.crate_1")],
//! );
//! let run = run_placement(&mut world, &request, &mut ChaCha8Rng::seed_from_u64(1));
//! assert_eq!(run.summary.placed, 5);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::budget::{BudgetTracker, Visit};
use crate::grid::{tiles_in_radius, GridCoord};
use crate::ports::{ObjectHandle, ObjectId, Rotation, SceneryHost};
use crate::request::PlacementRequest;
use crate::sampling::{density_roll, pick_rotation, Palette};
use crate::suitability::probe_tile;

/// One successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlanEntry {
    pub object: ObjectHandle,
    pub at: GridCoord,
    pub elevation: i32,
    pub rotation: Rotation,
}

/// Aggregate counts reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tiles that passed the density roll and suitability checks.
    pub attempted: u32,
    /// Tiles where the host accepted the placement.
    pub placed: u32,
}

impl RunSummary {
    /// Attempts the host rejected.
    pub fn rejected(&self) -> u32 {
        self.attempted - self.placed
    }
}

/// Where a tile dropped out of the pipeline, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Anchors whose disk was entered.
    pub anchors_scanned: u32,
    /// Tiles marked in the run-wide visited set, including the one that
    /// found the budget spent.
    pub marked: u32,
    /// Fresh tiles that went on to the density roll.
    pub visited: u32,
    pub density_skipped: u32,
    pub unsuitable: u32,
}

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEnd {
    /// Every anchor was scanned.
    Completed,
    /// Budget hit zero with candidates still left.
    BudgetExhausted,
    /// None of the palette objects are loaded in the park.
    EmptyPalette,
    NoAnchors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRun {
    pub plan: Vec<PlacementPlanEntry>,
    pub summary: RunSummary,
    pub stats: ScanStats,
    pub end: RunEnd,
    /// Palette ids the park could not resolve.
    pub unresolved: Vec<ObjectId>,
}

impl PlacementRun {
    fn empty(end: RunEnd, unresolved: Vec<ObjectId>) -> Self {
        Self {
            plan: Vec::new(),
            summary: RunSummary::default(),
            stats: ScanStats::default(),
            end,
            unresolved,
        }
    }
}

/// Decorate the tiles around the request's anchors.
///
/// Never fails: unreadable tiles count as unsuitable and rejected placements
/// are skipped. The returned plan lists only placements the host accepted.
/// Options are clamped again here, so edited public fields cannot lift the
/// radius or budget caps.
pub fn run_placement<W: SceneryHost>(
    world: &mut W,
    request: &PlacementRequest,
    rng: &mut impl Rng,
) -> PlacementRun {
    let palette = Palette::resolve(&request.palette, &*world);
    let unresolved = palette.unresolved().to_vec();
    if palette.is_empty() {
        return PlacementRun::empty(RunEnd::EmptyPalette, unresolved);
    }
    if request.anchors.is_empty() {
        return PlacementRun::empty(RunEnd::NoAnchors, unresolved);
    }

    let options = request.options.clamped();
    let size = world.map_size();
    let mut budget = BudgetTracker::new(options.max_pieces);
    let mut run = PlacementRun::empty(RunEnd::Completed, unresolved);

    'anchors: for anchor in &request.anchors {
        run.stats.anchors_scanned += 1;
        for at in tiles_in_radius(anchor.at, options.radius, size) {
            match budget.visit(at) {
                Visit::Seen => continue,
                Visit::Exhausted => {
                    run.end = RunEnd::BudgetExhausted;
                    break 'anchors;
                }
                Visit::Fresh => run.stats.visited += 1,
            }

            if !density_roll(options.density, rng) {
                run.stats.density_skipped += 1;
                continue;
            }
            let Ok(elevation) = probe_tile(&*world, at, &options) else {
                run.stats.unsuitable += 1;
                continue;
            };
            let Some(object) = palette.pick(rng) else {
                break 'anchors;
            };
            let rotation = pick_rotation(options.rotate_randomly, rng);

            run.summary.attempted += 1;
            if world.place_object(object, at, elevation, rotation).is_ok() {
                budget.record_placement();
                run.summary.placed += 1;
                run.plan.push(PlacementPlanEntry {
                    object,
                    at,
                    elevation,
                    rotation,
                });
            }
        }
    }

    run.stats.marked = u32::try_from(budget.visited_count()).unwrap_or(u32::MAX);
    run
}
