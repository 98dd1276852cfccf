//! Axis-aligned rectangles and boxes built from them

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    aabb::Aabb,
    objects::{HitRecord, Hittable, HittableList},
    transrot::FlipNormals,
    Material, Point, Ray, Vec3,
};

/// Half thickness given to rectangles so their bounding boxes are never flat
const THICKNESS: f64 = 0.0001;

/// The plane a rectangle lies in, named by its two in-plane axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}
impl Plane {
    /// Indices of the first in-plane axis, the second in-plane axis and the normal axis
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }

    pub fn normal(self) -> Vec3 {
        let mut n = Vec3::zeros();
        n[self.axes().2] = 1.0;
        n
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` on the plane `normal axis = k`
pub struct Rectangle {
    plane: Plane,
    a0: f64,
    a1: f64,
    b0: f64,
    b1: f64,
    k: f64,
    material: Material,
}
impl Rectangle {
    pub fn new(
        plane: Plane,
        a0: f64,
        a1: f64,
        b0: f64,
        b1: f64,
        k: f64,
        material: Material,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    pub fn area(&self) -> f64 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }
}
impl Hittable for Rectangle {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let (a, b, n) = self.plane.axes();
        let t = (self.k - ray.orig[n]) / ray.dir[n];
        // NaN never lies inside the range
        if !(t_min..=t_max).contains(&t) {
            return None;
        }
        let x = ray.orig[a] + t * ray.dir[a];
        let y = ray.orig[b] + t * ray.dir[b];
        if x < self.a0 || x > self.a1 || y < self.b0 || y > self.b1 {
            return None;
        }
        let u = (x - self.a0) / (self.a1 - self.a0);
        let v = (y - self.b0) / (self.b1 - self.b0);
        Some(HitRecord::new(
            ray.get(t),
            t,
            self.plane.normal(),
            &*self.material,
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        let (a, b, n) = self.plane.axes();
        let mut min = Point::zeros();
        let mut max = Point::zeros();
        min[a] = self.a0;
        max[a] = self.a1;
        min[b] = self.b0;
        max[b] = self.b1;
        min[n] = self.k - THICKNESS;
        max[n] = self.k + THICKNESS;
        Some(Aabb::new(min, max))
    }

    fn pdf_value(&self, origin: &Point, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        let ray = Ray::new(*origin, *direction, 0.0);
        match self.try_hit(&ray, 0.001, f64::INFINITY, rng) {
            Some(rec) => {
                let distance_squared = rec.t.powi(2) * direction.norm_squared();
                let cosine = (direction.dot(&rec.normal) / direction.norm()).abs();
                distance_squared / (cosine * self.area())
            }
            None => 0.0,
        }
    }

    fn random(&self, origin: &Point, rng: &mut dyn RngCore) -> Vec3 {
        let (a, b, n) = self.plane.axes();
        let mut on_light = Point::zeros();
        on_light[a] = self.a0 + rng.gen::<f64>() * (self.a1 - self.a0);
        on_light[b] = self.b0 + rng.gen::<f64>() * (self.b1 - self.b0);
        on_light[n] = self.k;
        on_light - origin
    }
}

/// A closed axis-aligned box made of six rectangles with outward normals
pub struct Cuboid {
    p_min: Point,
    p_max: Point,
    sides: HittableList,
}
impl Cuboid {
    pub fn new(p0: Point, p1: Point, material: Material) -> Self {
        let mut sides = HittableList::default();

        sides.add(Box::new(Rectangle::new(
            Plane::Xy,
            p0[0],
            p1[0],
            p0[1],
            p1[1],
            p1[2],
            material.clone(),
        )));
        sides.add(Box::new(FlipNormals::new(Box::new(Rectangle::new(
            Plane::Xy,
            p0[0],
            p1[0],
            p0[1],
            p1[1],
            p0[2],
            material.clone(),
        )))));

        sides.add(Box::new(Rectangle::new(
            Plane::Xz,
            p0[0],
            p1[0],
            p0[2],
            p1[2],
            p1[1],
            material.clone(),
        )));
        sides.add(Box::new(FlipNormals::new(Box::new(Rectangle::new(
            Plane::Xz,
            p0[0],
            p1[0],
            p0[2],
            p1[2],
            p0[1],
            material.clone(),
        )))));

        sides.add(Box::new(Rectangle::new(
            Plane::Yz,
            p0[1],
            p1[1],
            p0[2],
            p1[2],
            p1[0],
            material.clone(),
        )));
        sides.add(Box::new(FlipNormals::new(Box::new(Rectangle::new(
            Plane::Yz,
            p0[1],
            p1[1],
            p0[2],
            p1[2],
            p0[0],
            material,
        )))));

        Self {
            p_min: p0,
            p_max: p1,
            sides,
        }
    }
}
impl Hittable for Cuboid {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        self.sides.try_hit(ray, t_min, t_max, rng)
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(Aabb::new(self.p_min, self.p_max))
    }
}
