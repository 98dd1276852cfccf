//! Orthonormal basis

use crate::Vec3;

/// Orthonormal basis built around a single axis `w`
#[derive(Debug, Clone)]
pub struct Onb {
    axis: [Vec3; 3],
}
impl Onb {
    pub fn from_w(n: &Vec3) -> Self {
        let w = n.normalize();
        let a = if w[0].abs() > 0.9 {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            Vec3::new(1.0, 0.0, 0.0)
        };
        let v = w.cross(&a).normalize();
        let u = w.cross(&v);
        Self { axis: [u, v, w] }
    }

    pub fn u(&self) -> &Vec3 {
        &self.axis[0]
    }

    pub fn v(&self) -> &Vec3 {
        &self.axis[1]
    }

    pub fn w(&self) -> &Vec3 {
        &self.axis[2]
    }

    /// Express local coordinates `a` in world space
    pub fn local(&self, a: &Vec3) -> Vec3 {
        a[0] * self.u() + a[1] * self.v() + a[2] * self.w()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthonormal() {
        for n in [
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-0.3, 0.8, 0.1),
        ] {
            let onb = Onb::from_w(&n);
            assert!((onb.u().norm() - 1.0).abs() < 1e-12);
            assert!((onb.v().norm() - 1.0).abs() < 1e-12);
            assert!((onb.w().norm() - 1.0).abs() < 1e-12);
            assert!(onb.u().dot(onb.v()).abs() < 1e-12);
            assert!(onb.u().dot(onb.w()).abs() < 1e-12);
            assert!(onb.v().dot(onb.w()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_local_z_maps_to_w() {
        let onb = Onb::from_w(&Vec3::new(0.0, 2.0, 0.0));
        let world = onb.local(&Vec3::new(0.0, 0.0, 1.0));
        assert!((world - Vec3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }
}
