//! Radiance estimation along a camera ray

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{
    materials::ScatterRecord,
    objects::Hittable,
    pdf::{HittablePdf, MixturePdf, Pdf},
    utils::SerdeVector,
    Color, Ray,
};

/// Bounce cap used when a configuration does not name one
pub const MAX_DEPTH: u32 = 50;

/// Rays starting closer than this to a surface ignore it, avoiding self-intersection
pub const T_MIN: f64 = 0.001;

/// Radiance returned by rays that leave the scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    #[default]
    Black,
    Solid {
        color: SerdeVector,
    },
    /// Vertical gradient from white at the horizon to light blue overhead
    Sky,
}
impl Background {
    pub fn value(&self, ray: &Ray) -> Color {
        match self {
            Background::Black => Color::zeros(),
            Background::Solid { color } => (*color).into(),
            Background::Sky => {
                let unit_direction = ray.dir.normalize();
                let t = 0.5 * (unit_direction[1] + 1.0);
                (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
            }
        }
    }
}

/// Estimate the radiance arriving along `ray`
///
/// Diffuse bounces sample an even mixture of the material lobe and `lights`, or
/// the material lobe alone when there are no lights. Emission is collected at
/// every hit; scattering stops after `max_depth` bounces.
pub fn radiance(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    background: &Background,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut color = Color::zeros();
    let mut throughput = Color::new(1.0, 1.0, 1.0);
    let mut ray = ray.clone();

    for depth in 0.. {
        let hit_record = match world.try_hit(&ray, T_MIN, f64::INFINITY, rng) {
            Some(hit_record) => hit_record,
            None => return color + throughput.component_mul(&background.value(&ray)),
        };

        let emitted = hit_record.material.emitted(
            &ray,
            &hit_record,
            hit_record.u,
            hit_record.v,
            &hit_record.p,
        );
        color += throughput.component_mul(&emitted);
        if depth >= max_depth {
            break;
        }

        let next = match hit_record.material.try_scatter(&ray, &hit_record, rng) {
            None => break,
            Some(ScatterRecord::Specular {
                attenuation,
                ray: specular,
            }) => {
                throughput = throughput.component_mul(&attenuation);
                specular
            }
            Some(ScatterRecord::Diffuse { attenuation, pdf }) => {
                let (scattered, pdf_value) = match lights {
                    Some(lights) => {
                        let light_pdf = HittablePdf::new(lights, hit_record.p);
                        let mixture = MixturePdf::new(&light_pdf, pdf.as_ref());
                        let scattered = Ray::new(hit_record.p, mixture.generate(rng), ray.time);
                        let pdf_value = mixture.value(&scattered.dir, rng);
                        (scattered, pdf_value)
                    }
                    None => {
                        let scattered = Ray::new(hit_record.p, pdf.generate(rng), ray.time);
                        let pdf_value = pdf.value(&scattered.dir, rng);
                        (scattered, pdf_value)
                    }
                };
                let scattering_pdf = hit_record
                    .material
                    .scattering_pdf(&ray, &hit_record, &scattered);
                throughput = throughput.component_mul(&attenuation) * scattering_pdf / pdf_value;
                scattered
            }
        };
        ray = next;
    }
    color
}
