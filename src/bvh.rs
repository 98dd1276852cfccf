//! Bounding Volume Hierarchies
//!
//! For optimizing computations

use log::debug;
use rand::{Rng, RngCore};

use crate::aabb::Aabb;
use crate::error::BvhError;
use crate::objects::{HitRecord, Hittable, HittableList, HittableObj};
use crate::Ray;

/// Bounding Volume Hierarchy
///
/// Tree structure. Each node exclusively owns its children.
pub struct BvhNode {
    left: HittableObj,
    // A single remaining object lives in `left` only, so nothing has to be shared
    right: Option<HittableObj>,
    bbox: Aabb,
}
impl BvhNode {
    /// Build a tree over `list` for rays cast in `[time0, time1]`
    ///
    /// Every object must have a bounding box over that interval.
    pub fn new(
        list: HittableList,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BvhError> {
        if list.is_empty() {
            return Err(BvhError::EmptyList);
        }
        let count = list.len();
        let objects = list
            .0
            .into_iter()
            .enumerate()
            .map(|(index, obj)| match obj.try_bounding_box(time0, time1) {
                Some(bbox) => Ok((bbox, obj)),
                None => Err(BvhError::MissingBoundingBox { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let node = Self::split_tree(objects, rng);
        debug!(
            "built bvh over {count} objects, bounds {:?} to {:?}",
            node.bbox.min.as_slice(),
            node.bbox.max.as_slice()
        );
        Ok(node)
    }

    /// Split the tree
    ///
    /// Randomly choose an axis, sort the primitives, put half in each subtree
    fn split_tree(mut objects: Vec<(Aabb, HittableObj)>, rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        objects.sort_by(|(a, _), (b, _)| a.min[axis].total_cmp(&b.min[axis]));

        if objects.len() <= 2 {
            let mut objects = objects.into_iter();
            // Callers never pass an empty partition
            let (left_box, left) = objects.next().expect("non-empty partition");
            return match objects.next() {
                Some((right_box, right)) => Self {
                    left,
                    right: Some(right),
                    bbox: left_box.surrounding_box(&right_box),
                },
                None => Self {
                    left,
                    right: None,
                    bbox: left_box,
                },
            };
        }

        // There are many objects, split at the midpoint and recurse
        let mid = objects.len() / 2;
        let right_half = objects.split_off(mid);
        let left = Self::split_tree(objects, rng);
        let right = Self::split_tree(right_half, rng);
        let bbox = left.bbox.surrounding_box(&right.bbox);
        Self {
            left: Box::new(left),
            right: Some(Box::new(right)),
            bbox,
        }
    }
}
impl Hittable for BvhNode {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, t_min, t_max) {
            return None;
        }
        let left = self.left.try_hit(ray, t_min, t_max, rng);
        let right = self
            .right
            .as_ref()
            .and_then(|right| right.try_hit(ray, t_min, t_max, rng));

        match (left, right) {
            (Some(l), Some(r)) => Some(if r.t < l.t { r } else { l }),
            (l, r) => l.or(r),
        }
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox.clone())
    }
}
