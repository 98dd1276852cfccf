//! Utils

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::Vec3;

/// Compute a random vector inside the unit sphere
///
/// Randomly generate vectors in the enclosing cube. If the squared norm is < 1, it is inside.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = gen_random(rng, Some(-1.0), Some(1.0));
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// A uniformly distributed direction on the unit sphere
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.norm_squared();
        if len_sq > 1e-160 {
            return p / len_sq.sqrt();
        }
    }
}

/// Generate a random vector inside a unit disk on the xy plane
///
/// This simulates defocus blur
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction around +z
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1: f64 = rng.gen();
    let r2: f64 = rng.gen();
    let z = (1.0 - r2).sqrt();
    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    Vec3::new(x, y, z)
}

/// Uniform direction inside the cone around +z that subtends a sphere of `radius`
/// seen from `distance_squared` away
pub fn random_to_sphere(rng: &mut dyn RngCore, radius: f64, distance_squared: f64) -> Vec3 {
    let r1: f64 = rng.gen();
    let r2: f64 = rng.gen();
    let z = 1.0 + r2 * ((1.0 - radius * radius / distance_squared).sqrt() - 1.0);
    let phi = 2.0 * PI * r1;
    let x = phi.cos() * (1.0 - z * z).sqrt();
    let y = phi.sin() * (1.0 - z * z).sqrt();
    Vec3::new(x, y, z)
}

/// Mirror `v` about `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    *v - 2.0 * v.dot(n) * *n
}

/// Snell's law on the unit direction of `v`
///
/// Returns `None` on total internal reflection.
pub fn refract(v: &Vec3, n: &Vec3, ni_over_nt: f64) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt.powi(2) * (1.0 - dt.powi(2));
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - *n * dt) - *n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
pub fn schlick(cosine: f64, ref_idx: f64) -> f64 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Generate a random vector, each component in `[min, max)` or `[0, 1)` if unbounded
pub fn gen_random(rng: &mut dyn RngCore, min: Option<f64>, max: Option<f64>) -> Vec3 {
    Vec3::from_fn(|_, _| match (min, max) {
        (Some(min), Some(max)) => rng.gen_range(min..max),
        _ => rng.gen(),
    })
}

/// Plain three-element array for config files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerdeVector(pub [f64; 3]);
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.0[0], v.0[1], v.0[2])
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        SerdeVector([v[0], v[1], v[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_in_unit_sphere_is_inside() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).norm() < 1.0);
        }
    }

    #[test]
    fn test_random_cosine_direction_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let d = random_cosine_direction(&mut rng);
            assert!(d[2] >= 0.0);
            assert!((d.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(reflect(&v, &n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_head_on_passes_straight() {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let refracted = refract(&Vec3::new(0.0, 0.0, -3.0), &n, 1.0 / 1.5).unwrap();
        assert!((refracted - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_total_internal_reflection() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        // Grazing ray leaving glass
        let v = Vec3::new(1.0, -0.1, 0.0);
        assert!(refract(&v, &n, 1.5).is_none());
    }

    #[test]
    fn test_schlick_normal_incidence() {
        let r = schlick(1.0, 1.5);
        assert!((r - 0.04).abs() < 1e-12, "r = {r}");
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-12);
    }
}
