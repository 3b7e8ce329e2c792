//! Ride anchor collection: station tiles and entrance/exit tiles.
//!
//! Both collectors walk the whole map (x outer, y inner) and read every
//! tile. A tile that cannot be read is skipped.

use serde::{Deserialize, Serialize};

use crate::grid::GridCoord;
use crate::ports::WorldQuery;
use crate::rides::RideId;
use crate::tile::TileElement;

/// Where an anchor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorOrigin {
    Station,
    Endpoint,
}

/// Centre of a scenery radius scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub at: GridCoord,
    pub origin: AnchorOrigin,
}

impl Anchor {
    pub fn station(at: GridCoord) -> Self {
        Self {
            at,
            origin: AnchorOrigin::Station,
        }
    }

    pub fn endpoint(at: GridCoord) -> Self {
        Self {
            at,
            origin: AnchorOrigin::Endpoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointKind {
    Entrance,
    Exit,
}

/// A ride entrance or exit element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub ride: RideId,
    pub at: GridCoord,
    pub kind: EndpointKind,
}

/// Track tiles of `ride` flagged as station.
pub fn find_station_tiles(world: &impl WorldQuery, ride: RideId) -> Vec<GridCoord> {
    let mut out = Vec::new();
    for at in world.map_size().coords() {
        let Ok(tile) = world.tile(at) else { continue };
        for el in &tile.elements {
            if let TileElement::Track {
                ride: r,
                is_station: true,
            } = el
            {
                if *r == ride {
                    out.push(at);
                }
            }
        }
    }
    out
}

/// Entrance and exit elements owned by `ride`, one entry per element.
pub fn find_ride_endpoints(world: &impl WorldQuery, ride: RideId) -> Vec<Endpoint> {
    let mut out = Vec::new();
    for at in world.map_size().coords() {
        let Ok(tile) = world.tile(at) else { continue };
        for el in &tile.elements {
            let kind = match el {
                TileElement::RideEntrance { ride: r } if *r == ride => EndpointKind::Entrance,
                TileElement::RideExit { ride: r } if *r == ride => EndpointKind::Exit,
                _ => continue,
            };
            out.push(Endpoint { ride, at, kind });
        }
    }
    out
}

/// Scenery anchors for a ride: stations first, then entrances and exits.
pub fn collect_anchors(stations: &[GridCoord], endpoints: &[Endpoint]) -> Vec<Anchor> {
    stations
        .iter()
        .map(|&at| Anchor::station(at))
        .chain(endpoints.iter().map(|e| Anchor::endpoint(e.at)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MapSize;
    use crate::grid_world::GridWorld;

    fn track(ride: u32, is_station: bool) -> TileElement {
        TileElement::Track {
            ride: RideId(ride),
            is_station,
        }
    }

    fn ride_world() -> GridWorld {
        let mut w = GridWorld::flat(MapSize::new(8, 8), 14);
        w.push_element(GridCoord::new(3, 2), track(1, true));
        w.push_element(GridCoord::new(3, 3), track(1, true));
        w.push_element(GridCoord::new(3, 4), track(1, false));
        w.push_element(GridCoord::new(5, 5), track(2, true));
        w.push_element(GridCoord::new(2, 2), TileElement::RideEntrance { ride: RideId(1) });
        w.push_element(GridCoord::new(4, 3), TileElement::RideExit { ride: RideId(1) });
        w.push_element(GridCoord::new(6, 5), TileElement::RideExit { ride: RideId(2) });
        w
    }

    #[test]
    fn stations_belong_to_the_ride() {
        let w = ride_world();
        assert_eq!(
            find_station_tiles(&w, RideId(1)),
            vec![GridCoord::new(3, 2), GridCoord::new(3, 3)]
        );
    }

    #[test]
    fn endpoints_in_map_order() {
        let w = ride_world();
        let eps = find_ride_endpoints(&w, RideId(1));
        assert_eq!(eps.len(), 2);
        assert_eq!(eps[0].at, GridCoord::new(2, 2));
        assert_eq!(eps[0].kind, EndpointKind::Entrance);
        assert_eq!(eps[1].kind, EndpointKind::Exit);
    }

    #[test]
    fn unreadable_tiles_are_skipped() {
        let mut w = ride_world();
        w.fail_query(GridCoord::new(3, 2));
        assert_eq!(find_station_tiles(&w, RideId(1)), vec![GridCoord::new(3, 3)]);
    }

    #[test]
    fn anchors_put_stations_first() {
        let w = ride_world();
        let anchors = collect_anchors(
            &find_station_tiles(&w, RideId(1)),
            &find_ride_endpoints(&w, RideId(1)),
        );
        let origins: Vec<_> = anchors.iter().map(|a| a.origin).collect();
        assert_eq!(
            origins,
            vec![
                AnchorOrigin::Station,
                AnchorOrigin::Station,
                AnchorOrigin::Endpoint,
                AnchorOrigin::Endpoint
            ]
        );
    }
}
