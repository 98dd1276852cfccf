//! Objects
use std::f64::consts::PI;

use rand::{Rng, RngCore};

use crate::{aabb::Aabb, materials::Scatterable, onb::Onb, utils, Material, Point, Ray, Vec3};

pub type HittableObj = Box<dyn Hittable>;

/// Anything a ray can intersect
///
/// `pdf_value` and `random` let a shape act as an importance-sampling target. Media and
/// bounding volume nodes keep the defaults, which contribute no density.
pub trait Hittable: Send + Sync {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>>;

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb>;

    /// Density, with respect to solid angle at `origin`, of sampling `direction` toward this shape
    fn pdf_value(&self, _origin: &Point, _direction: &Vec3, _rng: &mut dyn RngCore) -> f64 {
        0.0
    }

    /// A direction from `origin` toward a random point on this shape
    fn random(&self, _origin: &Point, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }
}

/// Ordered collection of objects, intersected by linear scan
#[derive(Default)]
pub struct HittableList(pub Vec<HittableObj>);
impl HittableList {
    pub fn add(&mut self, boxed_obj: HittableObj) {
        self.0.push(boxed_obj)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<Vec<HittableObj>> for HittableList {
    fn from(objects: Vec<HittableObj>) -> Self {
        Self(objects)
    }
}
impl Hittable for HittableList {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for obj in &self.0 {
            if let Some(hr) = obj.try_hit(ray, t_min, closest_so_far, rng) {
                closest_so_far = hr.t;
                hr_final = Some(hr)
            }
        }
        hr_final
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let mut output_box: Option<Aabb> = None;

        for obj in &self.0 {
            let tmp_box = obj.try_bounding_box(time0, time1)?;
            output_box = match output_box {
                Some(output_box) => Some(output_box.surrounding_box(&tmp_box)),
                None => Some(tmp_box),
            };
        }
        output_box
    }

    fn pdf_value(&self, origin: &Point, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.0.len() as f64;
        self.0
            .iter()
            .map(|obj| weight * obj.pdf_value(origin, direction, rng))
            .sum()
    }

    fn random(&self, origin: &Point, rng: &mut dyn RngCore) -> Vec3 {
        if self.0.is_empty() {
            return Vec3::new(1.0, 0.0, 0.0);
        }
        let index = rng.gen_range(0..self.0.len());
        self.0[index].random(origin, rng)
    }
}

/// Represents a hit
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point,
    /// Outward surface normal
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Material at the hit point
    pub material: &'a dyn Scatterable,
    /// U,V surface coordinates
    pub u: f64,
    /// U,V surface coordinates
    pub v: f64,
}
impl<'a> HitRecord<'a> {
    pub fn new(
        p: Point,
        t: f64,
        outward_normal: Vec3,
        material: &'a dyn Scatterable,
        u: f64,
        v: f64,
    ) -> Self {
        Self {
            p,
            normal: outward_normal,
            t,
            material,
            u,
            v,
        }
    }

    /// Whether the ray arrived on the side the normal points toward
    pub fn front_face(&self, ray: &Ray) -> bool {
        ray.dir.dot(&self.normal) < 0.0
    }
}

/// A sphere, optionally moving linearly between two centers across a time interval
pub struct Sphere {
    initial_center: Point,
    final_center: Point,
    initial_time: f64,
    final_time: f64,
    radius: f64,
    material: Material,
}
impl Sphere {
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Self::moving(center, center, 0.0, 1.0, radius, material)
    }

    pub fn moving(
        initial_center: Point,
        final_center: Point,
        initial_time: f64,
        final_time: f64,
        radius: f64,
        material: Material,
    ) -> Self {
        Self {
            initial_center,
            final_center,
            initial_time,
            final_time,
            radius,
            material,
        }
    }

    /// Center at `time`; a zero-length interval leaves the sphere at its initial center
    pub fn center(&self, time: f64) -> Point {
        if self.initial_center == self.final_center || self.final_time == self.initial_time {
            return self.initial_center;
        }
        self.initial_center
            + ((time - self.initial_time) / (self.final_time - self.initial_time))
                * (self.final_center - self.initial_center)
    }

    /// Spherical texture coordinates of a point on the unit sphere
    ///
    /// u runs around the Y axis, v from the south pole (0) to the north pole (1).
    pub fn get_uv(p: &Point) -> (f64, f64) {
        let phi = p[2].atan2(p[0]);
        let theta = p[1].clamp(-1.0, 1.0).asin();
        let u = 1.0 - (phi + PI) / (2.0 * PI);
        let v = (theta + PI / 2.0) / PI;
        (u, v)
    }

    fn bounds_at(&self, time: f64) -> Aabb {
        let r = self.radius.abs();
        let v = Vec3::new(r, r, r);
        let center = self.center(time);
        Aabb::new(center - v, center + v)
    }
}
impl Hittable for Sphere {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let center = self.center(ray.time);
        let oc = ray.orig - center;
        let a = ray.dir.norm_squared();
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Find the nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root < t_min || t_max < root {
            root = (-half_b + sqrtd) / a;
            if root < t_min || t_max < root {
                return None;
            }
        }
        let p = ray.get(root);
        let outward_normal = (p - center) / self.radius;
        let (u, v) = Self::get_uv(&((p - center) / self.radius.abs()));
        Some(HitRecord::new(
            p,
            root,
            outward_normal,
            &*self.material,
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let box0 = self.bounds_at(time0);
        if self.initial_center == self.final_center {
            return Some(box0);
        }
        Some(box0.surrounding_box(&self.bounds_at(time1)))
    }

    fn pdf_value(&self, origin: &Point, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        let ray = Ray::new(*origin, *direction, self.initial_time);
        if self.try_hit(&ray, 0.001, f64::INFINITY, rng).is_none() {
            return 0.0;
        }
        let distance_squared = (self.center(self.initial_time) - origin).norm_squared();
        let cos_theta_max = (1.0 - self.radius.powi(2) / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn random(&self, origin: &Point, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center(self.initial_time) - origin;
        let distance_squared = direction.norm_squared();
        let uvw = Onb::from_w(&direction);
        uvw.local(&utils::random_to_sphere(rng, self.radius, distance_squared))
    }
}
