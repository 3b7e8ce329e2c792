//! Map grid coordinates and the radius scan.
//!
//! The scan order here is load-bearing: when the piece budget runs out
//! mid-scan, whichever tiles were enumerated first are the ones that got
//! decorated. Keep `tiles_in_radius` x-outer, y-inner, both ascending.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Integer tile coordinate on the park map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance in tiles.
    pub fn distance_sq(self, other: GridCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Map dimensions in tiles. Valid coordinates are `[0, x) × [0, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapSize {
    pub x: i32,
    pub y: i32,
}

impl MapSize {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn contains(self, at: GridCoord) -> bool {
        at.x >= 0 && at.y >= 0 && at.x < self.x && at.y < self.y
    }

    pub fn is_empty(self) -> bool {
        self.x <= 0 || self.y <= 0
    }

    /// Every coordinate on the map, x-outer then y-inner.
    pub fn coords(self) -> impl Iterator<Item = GridCoord> {
        let (sx, sy) = (self.x.max(0), self.y.max(0));
        (0..sx).flat_map(move |x| (0..sy).map(move |y| GridCoord::new(x, y)))
    }
}

/// All in-bounds tiles within `radius` of `center`, in scan order.
///
/// Outer loop over x ascending from `max(0, cx - r)` to `min(size.x - 1, cx + r)`,
/// inner loop over y likewise; a tile is emitted when `dx² + dy² ≤ r²`.
pub fn tiles_in_radius(center: GridCoord, radius: u32, size: MapSize) -> Vec<GridCoord> {
    if size.is_empty() {
        return Vec::new();
    }
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let r2 = u64::from(radius) * u64::from(radius);
    let min_x = center.x.saturating_sub(r).clamp(0, size.x - 1);
    let max_x = center.x.saturating_add(r).clamp(0, size.x - 1);
    let min_y = center.y.saturating_sub(r).clamp(0, size.y - 1);
    let max_y = center.y.saturating_add(r).clamp(0, size.y - 1);

    let mut out = Vec::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            let at = GridCoord::new(x, y);
            if at.distance_sq(center).unsigned_abs() <= r2 {
                out.push(at);
            }
        }
    }
    out
}

/// The four cardinal neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }
}

/// Shuffle the four directions and return the first neighbour that lies on the map.
pub fn first_in_bounds_neighbour(
    center: GridCoord,
    size: MapSize,
    rng: &mut impl Rng,
) -> Option<GridCoord> {
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    dirs.iter()
        .map(|d| {
            let (dx, dy) = d.offset();
            center.offset(dx, dy)
        })
        .find(|&n| size.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn radius_one_is_a_plus_shape_in_scan_order() {
        let tiles = tiles_in_radius(GridCoord::new(5, 5), 1, MapSize::new(32, 32));
        assert_eq!(
            tiles,
            vec![
                GridCoord::new(4, 5),
                GridCoord::new(5, 4),
                GridCoord::new(5, 5),
                GridCoord::new(5, 6),
                GridCoord::new(6, 5),
            ]
        );
    }

    #[test]
    fn radius_scan_clips_to_map_corner() {
        let tiles = tiles_in_radius(GridCoord::new(0, 0), 2, MapSize::new(10, 10));
        assert!(tiles.iter().all(|t| t.x >= 0 && t.y >= 0));
        assert_eq!(tiles.first(), Some(&GridCoord::new(0, 0)));
        // Quarter disk of radius 2: (0,0..2), (1,0..1), (2,0)
        assert_eq!(tiles.len(), 6);
    }

    #[test]
    fn radius_scan_is_within_disk() {
        let center = GridCoord::new(8, 8);
        for t in tiles_in_radius(center, 4, MapSize::new(16, 16)) {
            assert!(t.distance_sq(center) <= 16, "{t} outside radius");
        }
    }

    #[test]
    fn huge_radius_covers_the_map_without_overflow() {
        let size = MapSize::new(8, 8);
        for radius in [40_000, u32::MAX] {
            let tiles = tiles_in_radius(GridCoord::new(3, 3), radius, size);
            assert_eq!(tiles.len(), 64);
            assert_eq!(tiles.first(), Some(&GridCoord::new(0, 0)));
        }
    }

    #[test]
    fn empty_map_yields_nothing() {
        assert!(tiles_in_radius(GridCoord::new(0, 0), 3, MapSize::new(0, 0)).is_empty());
    }

    #[test]
    fn neighbour_is_adjacent_and_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let size = MapSize::new(4, 4);
        for _ in 0..20 {
            let n = first_in_bounds_neighbour(GridCoord::new(0, 0), size, &mut rng).unwrap();
            assert!(size.contains(n));
            assert_eq!(n.distance_sq(GridCoord::new(0, 0)), 1);
        }
    }

    #[test]
    fn single_tile_map_has_no_neighbour() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let n = first_in_bounds_neighbour(GridCoord::new(0, 0), MapSize::new(1, 1), &mut rng);
        assert_eq!(n, None);
    }
}
