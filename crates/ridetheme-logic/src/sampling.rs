//! Random draws: density gate, palette picks, orientation.
//!
//! All randomness comes from the caller's `Rng` so a seeded source gives
//! a reproducible run.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ports::{ObjectHandle, ObjectId, ObjectRegistry, Rotation};

/// Bernoulli trial with success probability `density_percent / 100`.
///
/// 0 never accepts, 100 always does.
pub fn density_roll(density_percent: u32, rng: &mut impl Rng) -> bool {
    rng.gen_range(0..100u32) < density_percent
}

/// Theme objects that are actually loaded, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    objects: Vec<ObjectHandle>,
    unresolved: Vec<ObjectId>,
}

impl Palette {
    /// Resolve every id once; ids the park doesn't have are dropped.
    pub fn resolve(ids: &[ObjectId], registry: &impl ObjectRegistry) -> Self {
        let mut objects = Vec::with_capacity(ids.len());
        let mut unresolved = Vec::new();
        for id in ids {
            match registry.resolve(id) {
                Some(handle) => objects.push(handle),
                None => unresolved.push(id.clone()),
            }
        }
        Self {
            objects,
            unresolved,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> &[ObjectHandle] {
        &self.objects
    }

    /// Ids that failed to resolve.
    pub fn unresolved(&self) -> &[ObjectId] {
        &self.unresolved
    }

    /// Uniform pick; `None` only when empty.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<ObjectHandle> {
        self.objects.choose(rng).copied()
    }
}

/// Uniform quarter turn when randomizing, otherwise 0.
pub fn pick_rotation(rotate_randomly: bool, rng: &mut impl Rng) -> Rotation {
    if rotate_randomly {
        Rotation::new(rng.gen_range(0..4u8))
    } else {
        Rotation::ZERO
    }
}
