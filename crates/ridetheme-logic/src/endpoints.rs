//! Entrance and exit styling.
//!
//! The styler first tries a direct restyle of every endpoint through the
//! host's [`EndpointStyling`](crate::ports::EndpointStyling) capability. If any
//! single endpoint of the ride was restyled, it stops there and the rest are
//! left alone. Only when no endpoint could be restyled does it fall back to
//! dropping one accent object next to each endpoint.
//!
//! Phases: `Unstyled → DirectAttempted → (FallbackAttempted →) Done`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anchors::Endpoint;
use crate::grid::first_in_bounds_neighbour;
use crate::ports::{
    EndpointHost, EndpointStyle, ObjectId, Rotation, StyleCapability, StyleMode,
};
use crate::sampling::Palette;

/// Theme inputs for entrance/exit styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointTheme {
    /// Themed entrance object for hosts that swap objects.
    pub entrance_object: ObjectId,
    /// Entrance style number for hosts with a numeric style field.
    pub entrance_type: u8,
    /// Small objects placed beside endpoints when direct restyle is unavailable.
    pub accents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StylerPhase {
    Unstyled,
    DirectAttempted,
    FallbackAttempted,
    Done,
}

/// Result of the direct restyle attempt on one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectResult {
    Restyled,
    Unsupported,
    QueryFailed,
    /// The element swaps objects but the themed entrance isn't loaded.
    ObjectUnresolved,
    /// The host refused the new style.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointOutcome {
    DirectRestyled,
    AccentPlaced,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointReport {
    /// `(endpoint, direct attempt, final outcome)` in endpoint order.
    pub endpoints: Vec<(Endpoint, DirectResult, EndpointOutcome)>,
    /// Phases passed through, in order.
    pub phases: Vec<StylerPhase>,
}

impl EndpointReport {
    pub fn count(&self, outcome: EndpointOutcome) -> usize {
        self.endpoints.iter().filter(|(_, _, o)| *o == outcome).count()
    }

    pub fn used_fallback(&self) -> bool {
        self.phases.contains(&StylerPhase::FallbackAttempted)
    }

    pub fn outcomes(&self) -> Vec<EndpointOutcome> {
        self.endpoints.iter().map(|(_, _, o)| *o).collect()
    }
}

struct EndpointStyler {
    phase: StylerPhase,
    phases: Vec<StylerPhase>,
}

impl EndpointStyler {
    fn new() -> Self {
        Self {
            phase: StylerPhase::Unstyled,
            phases: vec![StylerPhase::Unstyled],
        }
    }

    fn advance(&mut self, next: StylerPhase) {
        debug_assert!(
            matches!(
                (self.phase, next),
                (StylerPhase::Unstyled, StylerPhase::DirectAttempted)
                    | (StylerPhase::Unstyled, StylerPhase::Done)
                    | (StylerPhase::DirectAttempted, StylerPhase::FallbackAttempted)
                    | (StylerPhase::DirectAttempted, StylerPhase::Done)
                    | (StylerPhase::FallbackAttempted, StylerPhase::Done)
            ),
            "invalid styler transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
        self.phases.push(next);
    }
}

fn restyle_directly<W: EndpointHost>(
    world: &mut W,
    endpoint: &Endpoint,
    theme: &EndpointTheme,
) -> DirectResult {
    let style = match world.style_capability(endpoint) {
        StyleCapability::Unsupported => return DirectResult::Unsupported,
        StyleCapability::QueryFailed => return DirectResult::QueryFailed,
        StyleCapability::Supported(StyleMode::EntranceType) => {
            EndpointStyle::EntranceType(theme.entrance_type)
        }
        StyleCapability::Supported(StyleMode::ObjectSwap) => {
            match world.resolve(&theme.entrance_object) {
                Some(handle) => EndpointStyle::Object(handle),
                None => return DirectResult::ObjectUnresolved,
            }
        }
    };
    match world.set_endpoint_style(endpoint, style) {
        Ok(()) => DirectResult::Restyled,
        Err(_) => DirectResult::Rejected,
    }
}

/// Restyle a ride's entrances and exits, falling back to accents only if
/// nothing could be restyled directly.
pub fn style_endpoints<W: EndpointHost>(
    world: &mut W,
    endpoints: &[Endpoint],
    theme: &EndpointTheme,
    rng: &mut impl Rng,
) -> EndpointReport {
    let mut styler = EndpointStyler::new();
    if endpoints.is_empty() {
        styler.advance(StylerPhase::Done);
        return EndpointReport {
            endpoints: Vec::new(),
            phases: styler.phases,
        };
    }

    let direct: Vec<DirectResult> = endpoints
        .iter()
        .map(|ep| restyle_directly(&mut *world, ep, theme))
        .collect();
    styler.advance(StylerPhase::DirectAttempted);

    let any_restyled = direct.contains(&DirectResult::Restyled);
    let outcomes: Vec<EndpointOutcome> = if any_restyled {
        direct
            .iter()
            .map(|d| match d {
                DirectResult::Restyled => EndpointOutcome::DirectRestyled,
                _ => EndpointOutcome::Skipped,
            })
            .collect()
    } else {
        styler.advance(StylerPhase::FallbackAttempted);
        place_accents(world, endpoints, theme, rng)
    };
    styler.advance(StylerPhase::Done);

    EndpointReport {
        endpoints: endpoints
            .iter()
            .zip(direct)
            .zip(outcomes)
            .map(|((ep, d), o)| (*ep, d, o))
            .collect(),
        phases: styler.phases,
    }
}

fn place_accents<W: EndpointHost>(
    world: &mut W,
    endpoints: &[Endpoint],
    theme: &EndpointTheme,
    rng: &mut impl Rng,
) -> Vec<EndpointOutcome> {
    let accents = Palette::resolve(&theme.accents, &*world);
    if accents.is_empty() {
        return vec![EndpointOutcome::Skipped; endpoints.len()];
    }

    let size = world.map_size();
    endpoints
        .iter()
        .map(|ep| {
            let Some(at) = first_in_bounds_neighbour(ep.at, size, rng) else {
                return EndpointOutcome::Skipped;
            };
            let Some(object) = accents.pick(rng) else {
                return EndpointOutcome::Skipped;
            };
            let elevation = world.tile(at).map_or(0, |t| t.surface_z());
            match world.place_object(object, at, elevation, Rotation::ZERO) {
                Ok(()) => EndpointOutcome::AccentPlaced,
                Err(_) => EndpointOutcome::Skipped,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::EndpointKind;
    use crate::grid::{GridCoord, MapSize};
    use crate::grid_world::GridWorld;
    use crate::rides::RideId;
    use crate::tile::TileElement;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn theme() -> EndpointTheme {
        EndpointTheme {
            entrance_object: ObjectId::from("ride_entrance.pirate_1"),
            entrance_type: 2,
            accents: vec![ObjectId::from("scenery_small.torch_1")],
        }
    }

    fn setup() -> (GridWorld, Vec<Endpoint>) {
        let mut w = GridWorld::flat(MapSize::new(10, 10), 14);
        w.push_element(GridCoord::new(2, 2), TileElement::RideEntrance { ride: RideId(0) });
        w.push_element(GridCoord::new(7, 7), TileElement::RideExit { ride: RideId(0) });
        w.load_object("scenery_small.torch_1");
        let eps = vec![
            Endpoint { ride: RideId(0), at: GridCoord::new(2, 2), kind: EndpointKind::Entrance },
            Endpoint { ride: RideId(0), at: GridCoord::new(7, 7), kind: EndpointKind::Exit },
        ];
        (w, eps)
    }

    #[test]
    fn one_direct_success_suppresses_fallback_everywhere() {
        let (mut w, eps) = setup();
        w.set_capability(eps[0].at, StyleCapability::Supported(StyleMode::EntranceType));
        let report = style_endpoints(&mut w, &eps, &theme(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(
            report.outcomes(),
            vec![EndpointOutcome::DirectRestyled, EndpointOutcome::Skipped]
        );
        assert!(!report.used_fallback());
        assert!(w.placements().is_empty());
        assert_eq!(w.endpoint_style(eps[0].at), Some(EndpointStyle::EntranceType(2)));
    }

    #[test]
    fn no_capability_falls_back_to_accents() {
        let (mut w, eps) = setup();
        let report = style_endpoints(&mut w, &eps, &theme(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(report.count(EndpointOutcome::AccentPlaced), 2);
        assert_eq!(
            report.phases,
            vec![
                StylerPhase::Unstyled,
                StylerPhase::DirectAttempted,
                StylerPhase::FallbackAttempted,
                StylerPhase::Done
            ]
        );
        for (ep, placed) in eps.iter().zip(w.placements()) {
            assert_eq!(ep.at.distance_sq(placed.at), 1);
            assert_eq!(placed.rotation, Rotation::ZERO);
        }
    }

    #[test]
    fn unresolved_entrance_object_counts_as_failure() {
        let (mut w, eps) = setup();
        w.set_capability(eps[0].at, StyleCapability::Supported(StyleMode::ObjectSwap));
        let report = style_endpoints(&mut w, &eps, &theme(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(report.endpoints[0].1, DirectResult::ObjectUnresolved);
        assert!(report.used_fallback());
    }

    #[test]
    fn object_swap_uses_resolved_handle() {
        let (mut w, eps) = setup();
        let handle = w.load_object("ride_entrance.pirate_1");
        w.set_capability(eps[1].at, StyleCapability::Supported(StyleMode::ObjectSwap));
        let report = style_endpoints(&mut w, &eps, &theme(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(report.outcomes()[1], EndpointOutcome::DirectRestyled);
        assert_eq!(w.endpoint_style(eps[1].at), Some(EndpointStyle::Object(handle)));
    }

    #[test]
    fn no_accents_loaded_skips_all() {
        let (mut w, eps) = setup();
        let mut t = theme();
        t.accents = vec![ObjectId::from("scenery_small.missing")];
        let report = style_endpoints(&mut w, &eps, &t, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(report.count(EndpointOutcome::Skipped), 2);
        assert!(w.placements().is_empty());
    }

    #[test]
    fn rejected_accent_is_skipped() {
        let mut w = GridWorld::flat(MapSize::new(1, 2), 14);
        w.load_object("scenery_small.torch_1");
        w.reject_placement(GridCoord::new(0, 1));
        let eps = vec![Endpoint {
            ride: RideId(0),
            at: GridCoord::new(0, 0),
            kind: EndpointKind::Entrance,
        }];
        let report = style_endpoints(&mut w, &eps, &theme(), &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(report.outcomes(), vec![EndpointOutcome::Skipped]);
    }

    #[test]
    fn no_endpoints_goes_straight_to_done() {
        let (mut w, _) = setup();
        let report = style_endpoints(&mut w, &[], &theme(), &mut ChaCha8Rng::seed_from_u64(1));
        assert!(report.endpoints.is_empty());
        assert_eq!(report.phases, vec![StylerPhase::Unstyled, StylerPhase::Done]);
    }
}
