//! Probability density functions over directions
//!
//! Used to importance sample scattered rays toward lights and along material lobes.

use std::f64::consts::PI;

use rand::{Rng, RngCore};

use crate::{objects::Hittable, onb::Onb, utils, Point, Vec3};

/// Samples directions and evaluates the density of sampling a given direction
pub trait Pdf {
    fn value(&self, direction: &Vec3, rng: &mut dyn RngCore) -> f64;

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a normal
#[derive(Debug, Clone)]
pub struct CosinePdf {
    uvw: Onb,
}
impl CosinePdf {
    pub fn new(w: &Vec3) -> Self {
        Self {
            uvw: Onb::from_w(w),
        }
    }
}
impl Pdf for CosinePdf {
    fn value(&self, direction: &Vec3, _rng: &mut dyn RngCore) -> f64 {
        let cosine = direction.normalize().dot(self.uvw.w());
        if cosine > 0.0 {
            cosine / PI
        } else {
            0.0
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(&utils::random_cosine_direction(rng))
    }
}

/// Directions from `origin` toward a shape, weighted by the solid angle it subtends
pub struct HittablePdf<'a> {
    hittable: &'a dyn Hittable,
    origin: Point,
}
impl<'a> HittablePdf<'a> {
    pub fn new(hittable: &'a dyn Hittable, origin: Point) -> Self {
        Self { hittable, origin }
    }
}
impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        self.hittable.pdf_value(&self.origin, direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.hittable.random(&self.origin, rng)
    }
}

/// Even mixture of two densities
pub struct MixturePdf<'a> {
    pdfs: [&'a dyn Pdf; 2],
}
impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { pdfs: [p0, p1] }
    }
}
impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: &Vec3, rng: &mut dyn RngCore) -> f64 {
        0.5 * self.pdfs[0].value(direction, rng) + 0.5 * self.pdfs[1].value(direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if rng.gen::<f64>() < 0.5 {
            self.pdfs[0].generate(rng)
        } else {
            self.pdfs[1].generate(rng)
        }
    }
}
