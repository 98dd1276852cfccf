//! Cameras and configs for cameras
use crate::utils::{self, SerdeVector};
use crate::{Point, Ray, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    #[serde(default = "default_v_up")]
    pub v_up: SerdeVector,
    pub vertical_fov_deg: f64,
    #[serde(default)]
    pub aperture: f64,
    /// Distance to the plane in perfect focus; the look-at distance when absent
    #[serde(default)]
    pub focus_distance: Option<f64>,
    #[serde(default)]
    pub shutter_open: f64,
    #[serde(default = "default_shutter_close")]
    pub shutter_close: f64,
}

fn default_v_up() -> SerdeVector {
    SerdeVector([0.0, 1.0, 0.0])
}

fn default_shutter_close() -> f64 {
    1.0
}

/// Camera and related tasks
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point,
    lower_left_corner: Point,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
    time0: f64,
    time1: f64,
}
impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        look_from: Point,
        look_at: Point,
        v_up: Vec3,
        vertical_fov_deg: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
        time0: f64,
        time1: f64,
    ) -> Self {
        // Establish the viewport
        let theta = vertical_fov_deg.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate the viewing vectors
        let w = (look_from - look_at).normalize();
        let u = (v_up.cross(&w)).normalize();
        let v = w.cross(&u);

        let origin = look_from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: aperture / 2.0,
            time0,
            time1,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect_ratio: f64) -> Self {
        let look_from: Point = config.look_from.into();
        let look_at: Point = config.look_at.into();
        let focus_dist = config
            .focus_distance
            .unwrap_or_else(|| (look_from - look_at).norm());
        Self::new(
            look_from,
            look_at,
            config.v_up.into(),
            config.vertical_fov_deg,
            aspect_ratio,
            config.aperture,
            focus_dist,
            config.shutter_open,
            config.shutter_close,
        )
    }

    /// Ray through normalized image-plane coordinates `(s, t)`, `t = 0` at the bottom
    ///
    /// The origin is jittered across the lens and the time drawn from the shutter interval.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * utils::random_in_unit_disk(rng);
        let offset = self.u * rd[0] + self.v * rd[1];
        let time = self.time0 + rng.gen::<f64>() * (self.time1 - self.time0);

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
            time,
        )
    }
}
