//! Path Tracing Library
//!
//! A Monte-Carlo path tracer: bounding volume hierarchies over a small set of
//! primitives, textured materials and importance sampling toward lights.

use nalgebra::Vector3;

pub mod aabb;
pub mod bvh;
pub mod cameras;
pub mod config;
pub mod error;
pub mod integrator;
pub mod materials;
pub mod mediums;
pub mod objects;
pub mod onb;
pub mod output;
pub mod pdf;
pub mod rectangles;
pub mod render;
pub mod scenes;
pub mod textures;
pub mod transrot;
pub mod utils;

use materials::Scatterable;

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;
pub type Material = Box<dyn Scatterable + Send + Sync>;

/// Prelude
pub mod prelude {
    pub use crate::aabb::Aabb;
    pub use crate::bvh::BvhNode;
    pub use crate::cameras::Camera;
    pub use crate::integrator::{radiance, Background};
    pub use crate::materials::{
        Dielectric, DiffuseLight, Isotropic, Lambertian, Metal, NullMaterial, Scatterable,
    };
    pub use crate::mediums::ConstantMedium;
    pub use crate::objects::{HitRecord, Hittable, HittableList, HittableObj, Sphere};
    pub use crate::rectangles::{Cuboid, Plane, Rectangle};
    pub use crate::scenes::Scene;
    pub use crate::textures::{Checker, ImageTexture, Noise, SolidColor, Texture, Textured};
    pub use crate::transrot::{FlipNormals, RotateY, Translate};
    pub use crate::{Color, Material, Point, Ray, Vec3};
}

/// The ray in ray tracing
///
/// `time` is the instant within the shutter interval the ray was cast at, used
/// for motion blur.
#[derive(Debug, Clone)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
    pub time: f64,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3, time: f64) -> Self {
        Self { orig, dir, time }
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }
}
