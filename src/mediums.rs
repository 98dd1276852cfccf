//! Mediums

use rand::{Rng, RngCore};

use crate::{
    aabb::Aabb,
    materials::Isotropic,
    objects::{HitRecord, Hittable, HittableObj},
    textures::{SolidColor, Texture},
    Color, Material, Ray, Vec3,
};

/// Homogeneous participating medium (smoke, fog) filling a boundary shape
///
/// Free path lengths are exponentially distributed with rate `density`.
pub struct ConstantMedium {
    boundary: HittableObj,
    phase_function: Material,
    neg_inv_density: f64,
}
impl ConstantMedium {
    pub fn new(b: HittableObj, d: f64, a: Texture) -> Self {
        Self {
            boundary: b,
            phase_function: Box::new(Isotropic::new(a)),
            neg_inv_density: -1.0 / d,
        }
    }

    pub fn from_color(b: HittableObj, d: f64, c: Color) -> Self {
        let t = Box::new(SolidColor::new(c));
        Self::new(b, d, t)
    }
}
impl Hittable for ConstantMedium {
    fn try_hit(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let entry = self
            .boundary
            .try_hit(ray, f64::NEG_INFINITY, f64::INFINITY, rng)?;
        let exit = self
            .boundary
            .try_hit(ray, entry.t + 0.0001, f64::INFINITY, rng)?;

        let mut t_entry = entry.t.max(t_min);
        let t_exit = exit.t.min(t_max);
        if t_entry >= t_exit {
            return None;
        }
        if t_entry < 0.0 {
            t_entry = 0.0;
        }

        let ray_length = ray.dir.norm();
        let distance_inside_boundary = (t_exit - t_entry) * ray_length;
        let hit_distance = self.neg_inv_density * rng.gen::<f64>().ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }
        let t = t_entry + hit_distance / ray_length;
        // Normal and surface coordinates are meaningless inside a volume
        Some(HitRecord::new(
            ray.get(t),
            t,
            Vec3::new(1.0, 0.0, 0.0),
            &*self.phase_function,
            entry.u,
            entry.v,
        ))
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.boundary.try_bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::tests::grey;
    use crate::objects::Sphere;
    use crate::rectangles::Cuboid;
    use crate::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fog(density: f64) -> ConstantMedium {
        let boundary = Box::new(Sphere::new(Point::zeros(), 1.0, grey()));
        ConstantMedium::from_color(boundary, density, Color::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_vanishing_density_never_scatters() {
        let mut rng = StdRng::seed_from_u64(21);
        let medium = fog(1e-12);
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        for _ in 0..10_000 {
            assert!(medium
                .try_hit(&ray, 0.001, f64::INFINITY, &mut rng)
                .is_none());
        }
    }

    #[test]
    fn test_huge_density_scatters_at_entry() {
        let mut rng = StdRng::seed_from_u64(22);
        let medium = fog(1e12);
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        for _ in 0..1000 {
            let hr = medium
                .try_hit(&ray, 0.001, f64::INFINITY, &mut rng)
                .unwrap();
            assert!((hr.t - 4.0).abs() < 1e-6, "t = {}", hr.t);
        }
    }

    #[test]
    fn test_scatter_points_stay_inside_boundary() {
        let mut rng = StdRng::seed_from_u64(23);
        let medium = fog(0.5);
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0), 0.0);
        let mut scattered = 0;
        for _ in 0..5000 {
            if let Some(hr) = medium.try_hit(&ray, 0.001, f64::INFINITY, &mut rng) {
                assert!(hr.p.norm() <= 1.0 + 1e-9);
                scattered += 1;
            }
        }
        // P(scatter) = 1 - exp(-density * 2)
        let fraction = scattered as f64 / 5000.0;
        let expected = 1.0 - (-1.0_f64).exp();
        assert!((fraction - expected).abs() < 0.03, "fraction = {fraction}");
    }

    #[test]
    fn test_origin_inside_medium() {
        let mut rng = StdRng::seed_from_u64(24);
        let boundary = Box::new(Cuboid::new(
            Point::new(-1.0, -1.0, -1.0),
            Point::new(1.0, 1.0, 1.0),
            grey(),
        ));
        let medium = ConstantMedium::from_color(boundary, 1e12, Color::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point::zeros(), Vec3::new(1.0, 0.0, 0.0), 0.0);
        let hr = medium
            .try_hit(&ray, 0.001, f64::INFINITY, &mut rng)
            .unwrap();
        assert!(hr.t < 0.01);
    }

    #[test]
    fn test_miss_and_bounding_box() {
        let mut rng = StdRng::seed_from_u64(25);
        let medium = fog(1e12);
        let ray = Ray::new(Point::new(0.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(medium
            .try_hit(&ray, 0.001, f64::INFINITY, &mut rng)
            .is_none());
        assert!(medium.try_bounding_box(0.0, 1.0).is_some());
    }
}
