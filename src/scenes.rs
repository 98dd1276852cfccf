//! Scene assembly: built-in presets and object lists read from config

use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    bvh::BvhNode,
    cameras::CameraConfig,
    error::SceneError,
    integrator::Background,
    materials::{
        Dielectric, DiffuseLight, Generator, Lambertian, MaterialConfig, Metal, NullMaterial,
    },
    mediums::ConstantMedium,
    objects::{HittableList, HittableObj, Sphere},
    rectangles::{Cuboid, Plane, Rectangle},
    textures::{self, Checker, ImageTexture, Noise, TextureConfig},
    transrot::{FlipNormals, RotateY, Translate},
    utils::{self, SerdeVector},
    Color, Material, Point, Vec3,
};

/// A render-ready scene, immutable once built
pub struct Scene {
    pub world: HittableObj,
    /// Shapes diffuse bounces are steered toward
    pub lights: Option<HittableObj>,
    pub background: Background,
}

/// Scene Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneConfig {
    CornellBox,
    CornellSmoke,
    RandomSpheres,
    TwoPerlinSpheres,
    SimpleLight,
    Earth {
        path: PathBuf,
    },
    Custom {
        #[serde(default)]
        background: Background,
        objects: Vec<ObjectConfig>,
    },
}

/// One object in a custom scene
///
/// Wrappers apply in the order flip, rotate, translate. A `medium` fills the
/// resulting shape with fog and replaces `material`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub shape: ShapeConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub flip_normals: bool,
    #[serde(default)]
    pub rotate_y: Option<f64>,
    #[serde(default)]
    pub translate: Option<SerdeVector>,
    #[serde(default)]
    pub medium: Option<MediumConfig>,
    /// Importance sample this object as a light
    #[serde(default)]
    pub light: bool,
}

/// Shape Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    Sphere {
        center: SerdeVector,
        radius: f64,
    },
    MovingSphere {
        center0: SerdeVector,
        center1: SerdeVector,
        time0: f64,
        time1: f64,
        radius: f64,
    },
    Rect {
        plane: Plane,
        a: [f64; 2],
        b: [f64; 2],
        k: f64,
    },
    Cuboid {
        min: SerdeVector,
        max: SerdeVector,
    },
}

/// Medium Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediumConfig {
    pub density: f64,
    pub albedo: TextureConfig,
}

impl ShapeConfig {
    fn build(&self, material: Material) -> HittableObj {
        match self {
            ShapeConfig::Sphere { center, radius } => {
                Box::new(Sphere::new((*center).into(), *radius, material))
            }
            ShapeConfig::MovingSphere {
                center0,
                center1,
                time0,
                time1,
                radius,
            } => Box::new(Sphere::moving(
                (*center0).into(),
                (*center1).into(),
                *time0,
                *time1,
                *radius,
                material,
            )),
            ShapeConfig::Rect { plane, a, b, k } => {
                Box::new(Rectangle::new(*plane, a[0], a[1], b[0], b[1], *k, material))
            }
            ShapeConfig::Cuboid { min, max } => {
                Box::new(Cuboid::new((*min).into(), (*max).into(), material))
            }
        }
    }
}

impl ObjectConfig {
    /// The shape with its wrappers applied, but no medium
    fn build_shape(&self, material: Material) -> HittableObj {
        let mut obj = self.shape.build(material);
        if self.flip_normals {
            obj = Box::new(FlipNormals::new(obj));
        }
        if let Some(angle) = self.rotate_y {
            obj = Box::new(RotateY::new(obj, angle));
        }
        if let Some(offset) = self.translate {
            obj = Box::new(Translate::new(obj, offset.into()));
        }
        obj
    }

    /// Reject settings that would put NaN or negative distances into the render
    pub fn validate(&self, index: usize) -> Result<(), SceneError> {
        let invalid = |reason: String| -> Result<(), SceneError> {
            Err(SceneError::InvalidObject { index, reason })
        };
        if let ShapeConfig::MovingSphere {
            center0,
            center1,
            time0,
            time1,
            ..
        } = &self.shape
        {
            if center0 != center1 && !(time1 > time0) {
                return invalid(format!(
                    "moving sphere needs time1 after time0, got [{time0}, {time1}]"
                ));
            }
        }
        if let Some(medium) = &self.medium {
            if !(medium.density.is_finite() && medium.density > 0.0) {
                return invalid(format!(
                    "medium density must be positive, got {}",
                    medium.density
                ));
            }
        }
        Ok(())
    }

    pub fn build(&self, rng: &mut dyn RngCore) -> Result<HittableObj, SceneError> {
        Ok(match &self.medium {
            Some(medium) => Box::new(ConstantMedium::new(
                self.build_shape(Box::new(NullMaterial)),
                medium.density,
                textures::from_config(medium.albedo.clone(), rng)?,
            )),
            None => self.build_shape(Generator::from_config(self.material.clone(), rng)?),
        })
    }

    /// Stand-in shape for light sampling
    fn build_light(&self) -> HittableObj {
        if self.medium.is_some() {
            warn!(
                "light {:?} is a medium and cannot be sampled directly",
                self.shape
            );
        }
        self.build_shape(Box::new(NullMaterial))
    }
}

impl SceneConfig {
    /// Build the scene for rays cast in `[time0, time1]`
    ///
    /// Random layouts and noise textures draw from `rng`.
    pub fn build(
        &self,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Scene, SceneError> {
        let (objects, lights, background) = match self {
            SceneConfig::CornellBox => cornell_box(),
            SceneConfig::CornellSmoke => cornell_smoke(),
            SceneConfig::RandomSpheres => random_spheres(rng),
            SceneConfig::TwoPerlinSpheres => two_perlin_spheres(rng),
            SceneConfig::SimpleLight => simple_light(rng),
            SceneConfig::Earth { path } => earth(path)?,
            SceneConfig::Custom {
                background,
                objects,
            } => {
                let mut world = HittableList::default();
                let mut lights = HittableList::default();
                for (index, object) in objects.iter().enumerate() {
                    object.validate(index)?;
                    world.add(object.build(rng)?);
                    if object.light {
                        lights.add(object.build_light());
                    }
                }
                (world, lights, background.clone())
            }
        };
        if objects.is_empty() {
            return Err(SceneError::Empty);
        }

        let count = objects.len();
        let world = BvhNode::new(objects, time0, time1, rng)?;
        let lights: Option<HittableObj> = if lights.is_empty() {
            None
        } else {
            Some(Box::new(lights))
        };
        info!(
            "built scene with {count} objects, light sampling {}",
            if lights.is_some() { "on" } else { "off" }
        );

        Ok(Scene {
            world: Box::new(world),
            lights,
            background,
        })
    }

    /// Viewpoint the scene was laid out for
    pub fn default_camera(&self) -> CameraConfig {
        let camera = |look_from: [f64; 3], look_at: [f64; 3], fov: f64| CameraConfig {
            look_from: SerdeVector(look_from),
            look_at: SerdeVector(look_at),
            v_up: SerdeVector([0.0, 1.0, 0.0]),
            vertical_fov_deg: fov,
            aperture: 0.0,
            focus_distance: None,
            shutter_open: 0.0,
            shutter_close: 1.0,
        };
        match self {
            SceneConfig::CornellBox | SceneConfig::CornellSmoke => {
                camera([278.0, 278.0, -800.0], [278.0, 278.0, 0.0], 40.0)
            }
            SceneConfig::RandomSpheres => CameraConfig {
                aperture: 0.1,
                focus_distance: Some(10.0),
                ..camera([13.0, 2.0, 3.0], [0.0, 0.0, 0.0], 20.0)
            },
            SceneConfig::TwoPerlinSpheres | SceneConfig::Earth { .. } => {
                camera([13.0, 2.0, 3.0], [0.0, 0.0, 0.0], 20.0)
            }
            SceneConfig::SimpleLight => camera([26.0, 3.0, 6.0], [0.0, 2.0, 0.0], 20.0),
            SceneConfig::Custom { .. } => camera([0.0, 0.0, 0.0], [0.0, 0.0, -1.0], 90.0),
        }
    }
}

type Layout = (HittableList, HittableList, Background);

fn lambertian(r: f64, g: f64, b: f64) -> Material {
    Box::new(Lambertian::new(Color::new(r, g, b)))
}

fn light(intensity: f64) -> Material {
    Box::new(DiffuseLight::from_color(Color::new(
        intensity, intensity, intensity,
    )))
}

/// Walls of the 555-unit Cornell box, all facing inward
fn cornell_walls(objects: &mut HittableList) {
    let red = lambertian(0.65, 0.05, 0.05);
    let white = lambertian(0.73, 0.73, 0.73);
    let green = lambertian(0.12, 0.45, 0.15);

    objects.add(Box::new(FlipNormals::new(Box::new(Rectangle::new(
        Plane::Yz,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        green,
    )))));
    objects.add(Box::new(Rectangle::new(
        Plane::Yz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        red,
    )));
    objects.add(Box::new(FlipNormals::new(Box::new(Rectangle::new(
        Plane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white.clone(),
    )))));
    objects.add(Box::new(Rectangle::new(
        Plane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        white.clone(),
    )));
    objects.add(Box::new(FlipNormals::new(Box::new(Rectangle::new(
        Plane::Xy,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white,
    )))));
}

/// Ceiling panel light facing down, plus its sampling stand-in
fn ceiling_light(
    objects: &mut HittableList,
    lights: &mut HittableList,
    x: (f64, f64),
    z: (f64, f64),
    intensity: f64,
) {
    let panel = |material: Material| {
        Box::new(FlipNormals::new(Box::new(Rectangle::new(
            Plane::Xz,
            x.0,
            x.1,
            z.0,
            z.1,
            554.0,
            material,
        ))))
    };
    objects.add(panel(light(intensity)));
    lights.add(panel(Box::new(NullMaterial)));
}

/// The two blocks standing in the Cornell box
fn cornell_blocks(material: Material) -> (HittableObj, HittableObj) {
    let tall = Translate::new(
        Box::new(RotateY::new(
            Box::new(Cuboid::new(
                Point::zeros(),
                Point::new(165.0, 330.0, 165.0),
                material.clone(),
            )),
            15.0,
        )),
        Vec3::new(265.0, 0.0, 295.0),
    );
    let short = Translate::new(
        Box::new(RotateY::new(
            Box::new(Cuboid::new(
                Point::zeros(),
                Point::new(165.0, 165.0, 165.0),
                material,
            )),
            -18.0,
        )),
        Vec3::new(130.0, 0.0, 65.0),
    );
    (Box::new(tall), Box::new(short))
}

fn cornell_box() -> Layout {
    let mut objects = HittableList::default();
    let mut lights = HittableList::default();
    cornell_walls(&mut objects);
    ceiling_light(&mut objects, &mut lights, (213.0, 343.0), (227.0, 332.0), 15.0);

    let (tall, short) = cornell_blocks(lambertian(0.73, 0.73, 0.73));
    objects.add(tall);
    objects.add(short);
    (objects, lights, Background::Black)
}

fn cornell_smoke() -> Layout {
    let mut objects = HittableList::default();
    let mut lights = HittableList::default();
    cornell_walls(&mut objects);
    ceiling_light(&mut objects, &mut lights, (113.0, 443.0), (127.0, 432.0), 7.0);

    let (tall, short) = cornell_blocks(Box::new(NullMaterial));
    objects.add(Box::new(ConstantMedium::from_color(
        tall,
        0.01,
        Color::zeros(),
    )));
    objects.add(Box::new(ConstantMedium::from_color(
        short,
        0.01,
        Color::new(1.0, 1.0, 1.0),
    )));
    (objects, lights, Background::Black)
}

fn random_spheres(rng: &mut dyn RngCore) -> Layout {
    let mut objects = HittableList::default();

    let checker = Checker::from_solid_colors(Color::new(0.9, 0.9, 0.9), Color::new(0.2, 0.3, 0.1));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        Box::new(Lambertian::from_texture(Box::new(checker))),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Point::new(4.0, 0.2, 0.0)).norm() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = utils::gen_random(rng, None, None)
                    .component_mul(&utils::gen_random(rng, None, None));
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                objects.add(Box::new(Sphere::moving(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    Box::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.95 {
                let albedo = utils::gen_random(rng, Some(0.5), Some(1.0));
                let fuzz = rng.gen_range(0.0..0.5);
                objects.add(Box::new(Sphere::new(center, 0.2, Box::new(Metal::new(albedo, fuzz)))));
            } else {
                objects.add(Box::new(Sphere::new(center, 0.2, Box::new(Dielectric::new(1.5)))));
            }
        }
    }

    objects.add(Box::new(Sphere::new(
        Point::new(0.0, 1.0, 0.0),
        1.0,
        Box::new(Dielectric::new(1.5)),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(0.4, 0.2, 0.1),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(4.0, 1.0, 0.0),
        1.0,
        Box::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    (objects, HittableList::default(), Background::Sky)
}

/// Ground and a sphere sharing one marble texture
fn marble_spheres(rng: &mut dyn RngCore) -> HittableList {
    let marble: Material = Box::new(Lambertian::from_texture(Box::new(Noise::marble(4.0, rng))));
    let mut objects = HittableList::default();
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    )));
    objects.add(Box::new(Sphere::new(Point::new(0.0, 2.0, 0.0), 2.0, marble)));
    objects
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> Layout {
    (marble_spheres(rng), HittableList::default(), Background::Sky)
}

fn simple_light(rng: &mut dyn RngCore) -> Layout {
    let mut objects = marble_spheres(rng);
    let mut lights = HittableList::default();

    let panel = |material: Material| Rectangle::new(Plane::Xy, 3.0, 5.0, 1.0, 3.0, -2.0, material);
    objects.add(Box::new(panel(light(4.0))));
    lights.add(Box::new(panel(Box::new(NullMaterial))));

    let globe = |material: Material| Sphere::new(Point::new(0.0, 7.0, 0.0), 2.0, material);
    objects.add(Box::new(globe(light(4.0))));
    lights.add(Box::new(globe(Box::new(NullMaterial))));

    (objects, lights, Background::Black)
}

fn earth(path: &Path) -> Result<Layout, SceneError> {
    let texture = ImageTexture::open(path)?;
    let mut objects = HittableList::default();
    objects.add(Box::new(Sphere::new(
        Point::zeros(),
        2.0,
        Box::new(Lambertian::from_texture(Box::new(texture))),
    )));
    Ok((objects, HittableList::default(), Background::Sky))
}
