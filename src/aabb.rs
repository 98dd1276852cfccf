//! Axis-Aligned Bounding Boxes
//!
//! Cheap conservative rejection for the bounding volume hierarchy

use crate::{Point, Ray};

/// Axis-Aligned Bounding Box
///
/// A data structure to bound many objects to speed up computations
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}
impl Aabb {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Whether the box is hit by a ray between the parametric range
    ///
    /// A zero direction component yields infinite slab distances, which either reject the ray
    /// or leave that axis unconstrained depending on whether the origin lies inside the slab.
    pub fn hit(&self, r: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        for a in 0..3 {
            let t_near = (self.min[a] - r.orig[a]) / r.dir[a];
            let t_far = (self.max[a] - r.orig[a]) / r.dir[a];
            let t0 = t_near.min(t_far);
            let t1 = t_near.max(t_far);

            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    /// Compute the surrounding AABB between this and another
    pub fn surrounding_box(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Whether `other` lies entirely inside this box
    pub fn contains(&self, other: &Aabb) -> bool {
        (0..3).all(|a| self.min[a] <= other.min[a] && other.max[a] <= self.max[a])
    }
}
