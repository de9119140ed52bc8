//! Per-drawable world transforms keyed by [`DrawableId`]

use slotmap::SlotMap;

use crate::foundation::math::Mat4;

slotmap::new_key_type! {
    /// Stable handle to a drawable in a [`Scene`](super::Scene)
    pub struct DrawableId;
}

/// Transform storage shared by the scene and materials that drive transforms
///
/// Removed ids stay invalid even if their slot is reused, so a material
/// holding a stale id cannot write into an unrelated drawable.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: SlotMap<DrawableId, Mat4>,
}

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a transform and return its id
    pub fn insert(&mut self, transform: Mat4) -> DrawableId {
        self.transforms.insert(transform)
    }

    /// Transform of `id`, if it is live
    pub fn get(&self, id: DrawableId) -> Option<&Mat4> {
        self.transforms.get(id)
    }

    /// Overwrite the transform of `id`; returns false if `id` is not live
    pub fn set(&mut self, id: DrawableId, transform: Mat4) -> bool {
        match self.transforms.get_mut(id) {
            Some(slot) => {
                *slot = transform;
                true
            }
            None => false,
        }
    }

    /// Remove `id`, returning its last transform
    pub fn remove(&mut self, id: DrawableId) -> Option<Mat4> {
        self.transforms.remove(id)
    }

    /// Whether `id` is live
    pub fn contains(&self, id: DrawableId) -> bool {
        self.transforms.contains_key(id)
    }

    /// Number of live transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}
