//! Translation, rotation and normal flipping wrappers

use rand::RngCore;

use crate::{
    aabb::Aabb,
    objects::{HitRecord, Hittable, HittableObj},
    Point, Ray, Vec3,
};

/// Translate an object
pub struct Translate {
    obj: HittableObj,
    offset: Vec3,
}
impl Translate {
    pub fn new(obj: HittableObj, offset: Vec3) -> Self {
        Self { obj, offset }
    }
}
impl Hittable for Translate {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let moved_ray = Ray::new(ray.orig - self.offset, ray.dir, ray.time);

        self.obj
            .try_hit(&moved_ray, t_min, t_max, rng)
            .map(|mut hr| {
                hr.p += self.offset;
                hr
            })
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.obj
            .try_bounding_box(time0, time1)
            .map(|output_box| Aabb::new(output_box.min + self.offset, output_box.max + self.offset))
    }

    fn pdf_value(&self, origin: &Point, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        self.obj.pdf_value(&(origin - self.offset), direction, rng)
    }

    fn random(&self, origin: &Point, rng: &mut dyn RngCore) -> Vec3 {
        self.obj.random(&(origin - self.offset), rng)
    }
}

/// Rotate an object about the Y axis
pub struct RotateY {
    obj: HittableObj,
    sin_theta: f64,
    cos_theta: f64,
}
impl RotateY {
    pub fn new(obj: HittableObj, angle_deg: f64) -> Self {
        let radians = angle_deg.to_radians();
        Self {
            obj,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
        }
    }

    /// World space to object space
    fn to_object(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v[0] - self.sin_theta * v[2],
            v[1],
            self.sin_theta * v[0] + self.cos_theta * v[2],
        )
    }

    /// Object space to world space
    fn to_world(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v[0] + self.sin_theta * v[2],
            v[1],
            -self.sin_theta * v[0] + self.cos_theta * v[2],
        )
    }
}
impl Hittable for RotateY {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let rotated_r = Ray::new(self.to_object(&ray.orig), self.to_object(&ray.dir), ray.time);

        self.obj
            .try_hit(&rotated_r, t_min, t_max, rng)
            .map(|mut rec| {
                rec.p = self.to_world(&rec.p);
                rec.normal = self.to_world(&rec.normal);
                rec
            })
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let bbox = self.obj.try_bounding_box(time0, time1)?;

        let mut min = Point::repeat(f64::INFINITY);
        let mut max = Point::repeat(f64::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = i as f64 * bbox.max[0] + (1 - i) as f64 * bbox.min[0];
                    let y = j as f64 * bbox.max[1] + (1 - j) as f64 * bbox.min[1];
                    let z = k as f64 * bbox.max[2] + (1 - k) as f64 * bbox.min[2];

                    let tester = self.to_world(&Vec3::new(x, y, z));
                    min = min.inf(&tester);
                    max = max.sup(&tester);
                }
            }
        }
        Some(Aabb::new(min, max))
    }

    fn pdf_value(&self, origin: &Point, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        self.obj
            .pdf_value(&self.to_object(origin), &self.to_object(direction), rng)
    }

    fn random(&self, origin: &Point, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(&self.obj.random(&self.to_object(origin), rng))
    }
}

/// Reverse the normal of an object
pub struct FlipNormals {
    obj: HittableObj,
}
impl FlipNormals {
    pub fn new(obj: HittableObj) -> Self {
        Self { obj }
    }
}
impl Hittable for FlipNormals {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        self.obj.try_hit(ray, t_min, t_max, rng).map(|mut rec| {
            rec.normal = -rec.normal;
            rec
        })
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.obj.try_bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: &Point, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        self.obj.pdf_value(origin, direction, rng)
    }

    fn random(&self, origin: &Point, rng: &mut dyn RngCore) -> Vec3 {
        self.obj.random(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::tests::grey;
    use crate::objects::Sphere;
    use crate::rectangles::{Cuboid, Plane, Rectangle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_translate_moves_hit_and_box() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Box::new(Sphere::new(Point::zeros(), 1.0, grey()));
        let moved = Translate::new(sphere, Vec3::new(10.0, 0.0, 0.0));

        let ray = Ray::new(Point::new(10.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = moved.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-9);
        assert!((hr.p - Point::new(10.0, 0.0, 1.0)).norm() < 1e-9);

        let miss = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(moved.try_hit(&miss, 0.001, f64::INFINITY, &mut rng).is_none());

        let bbox = moved.try_bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min, Point::new(9.0, -1.0, -1.0));
        assert_eq!(bbox.max, Point::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let mut rng = StdRng::seed_from_u64(0);
        // Thin slab along x, rotated 90 degrees so it lies along z
        let slab = Box::new(Cuboid::new(
            Point::new(0.0, -1.0, -0.1),
            Point::new(4.0, 1.0, 0.1),
            grey(),
        ));
        let rotated = RotateY::new(slab, 90.0);

        let bbox = rotated.try_bounding_box(0.0, 1.0).unwrap();
        assert!((bbox.min[2] - -4.0).abs() < 1e-9);
        assert!((bbox.max[2] - 0.0).abs() < 1e-9);
        assert!((bbox.min[0] - -0.1).abs() < 1e-9);
        assert!((bbox.max[0] - 0.1).abs() < 1e-9);

        // Comes in along -x toward the slab now sitting at z in [-4, 0]
        let ray = Ray::new(Point::new(5.0, 0.0, -2.0), Vec3::new(-1.0, 0.0, 0.0), 0.0);
        let hr = rotated.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 4.9).abs() < 1e-9);
        assert!((hr.p - Point::new(0.1, 0.0, -2.0)).norm() < 1e-9);
        assert!((hr.normal - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_rotate_without_box_has_no_box() {
        struct Unbounded;
        impl Hittable for Unbounded {
            fn try_hit(
                &self,
                _ray: &Ray,
                _t_min: f64,
                _t_max: f64,
                _rng: &mut dyn RngCore,
            ) -> Option<HitRecord<'_>> {
                None
            }
            fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
                None
            }
        }
        let rotated = RotateY::new(Box::new(Unbounded), 30.0);
        assert!(rotated.try_bounding_box(0.0, 1.0).is_none());
    }

    #[test]
    fn test_flip_normals() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = Box::new(Rectangle::new(Plane::Xz, -1.0, 1.0, -1.0, 1.0, 2.0, grey()));
        let flipped = FlipNormals::new(rect);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.0);
        let hr = flipped.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert_eq!(hr.normal, Vec3::new(0.0, -1.0, 0.0));
        assert!(hr.front_face(&ray));
        assert!((flipped.pdf_value(&Point::zeros(), &ray.dir, &mut rng) - 1.0).abs() < 1e-12);
    }
}
