//! Implementation of materials

use crate::{
    error::SceneError,
    objects::HitRecord,
    pdf::{CosinePdf, Pdf},
    textures::{self, SolidColor, Texture, TextureConfig},
    utils::{self, SerdeVector},
    Color, Material, Point, Ray,
};
use dyn_clone::DynClone;
use log::warn;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Material
pub trait Scatterable: DynClone + Send + Sync {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Density of scattering `ray_in` into `scattered`
    fn scattering_pdf(&self, _ray_in: &Ray, _hit_record: &HitRecord, _scattered: &Ray) -> f64 {
        0.0
    }

    fn emitted(
        &self,
        _ray_in: &Ray,
        _hit_record: &HitRecord,
        _u: f64,
        _v: f64,
        _p: &Point,
    ) -> Color {
        Color::zeros()
    }
}
dyn_clone::clone_trait_object!(Scatterable);

/// Scatter Result
pub enum ScatterRecord {
    /// A single deterministic continuation that bypasses importance sampling
    Specular { attenuation: Color, ray: Ray },
    /// A lobe to be importance sampled
    Diffuse { attenuation: Color, pdf: Box<dyn Pdf> },
}

/// Config for materials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialConfig {
    Lambertian(LambertianConfig),
    Metal(MetalConfig),
    Dielectric(DielectricConfig),
    DiffuseLight(DiffuseLightConfig),
    Isotropic(LambertianConfig),
    #[default]
    Null,
}

/// Generator from config
pub struct Generator;
impl Generator {
    pub fn from_config(
        config: MaterialConfig,
        rng: &mut dyn RngCore,
    ) -> Result<Material, SceneError> {
        Ok(match config {
            MaterialConfig::Lambertian(c) => {
                Box::new(Lambertian::from_texture(textures::from_config(c.albedo, rng)?))
            }
            MaterialConfig::Metal(c) => Box::new(Metal::from_config(c)),
            MaterialConfig::Dielectric(c) => Box::new(Dielectric::from_config(c)),
            MaterialConfig::DiffuseLight(c) => {
                Box::new(DiffuseLight::new(textures::from_config(c.emit, rng)?))
            }
            MaterialConfig::Isotropic(c) => {
                Box::new(Isotropic::new(textures::from_config(c.albedo, rng)?))
            }
            MaterialConfig::Null => Box::new(NullMaterial),
        })
    }
}

/// Lambertian Scatterer
#[derive(Clone)]
pub struct Lambertian {
    albedo: Texture,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo: Box::new(SolidColor::new(albedo)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { albedo: texture }
    }
}
impl Scatterable for Lambertian {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        hit_record: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let attenuation = self.albedo.value(hit_record.u, hit_record.v, &hit_record.p);
        Some(ScatterRecord::Diffuse {
            attenuation,
            pdf: Box::new(CosinePdf::new(&hit_record.normal)),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, hit_record: &HitRecord, scattered: &Ray) -> f64 {
        let cosine = hit_record.normal.dot(&scattered.dir.normalize());
        cosine.max(0.0) / PI
    }
}

/// Lambertian Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertianConfig {
    pub albedo: TextureConfig,
}

/// Metal Scatterer
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        if !(0.0..=1.0).contains(&fuzz) {
            warn!("metal fuzz {fuzz} clamped to [0, 1]");
        }
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: MetalConfig) -> Self {
        Self::new(config.albedo.into(), config.fuzz)
    }
}
impl Scatterable for Metal {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let direction = reflected + self.fuzz * utils::random_in_unit_sphere(rng);
        if direction.dot(&hit_record.normal) > 0.0 {
            Some(ScatterRecord::Specular {
                attenuation: self.albedo,
                ray: Ray::new(hit_record.p, direction, ray_in.time),
            })
        } else {
            None
        }
    }
}

/// Metal Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalConfig {
    pub albedo: SerdeVector,
    #[serde(default)]
    pub fuzz: f64,
}

/// A Dielectric is a refractive material, such as glass
#[derive(Debug, Clone)]
pub struct Dielectric {
    ir: f64,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self { ir }
    }

    pub fn from_config(config: DielectricConfig) -> Self {
        Self { ir: config.ir }
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        utils::schlick(cosine, ref_idx)
    }
}
impl Scatterable for Dielectric {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let attenuation = Color::new(1.0, 1.0, 1.0);
        let (outward_normal, ni_over_nt) = if hit_record.front_face(ray_in) {
            (hit_record.normal, 1.0 / self.ir)
        } else {
            (-hit_record.normal, self.ir)
        };

        let unit_direction = ray_in.dir.normalize();
        let cos_theta = (-unit_direction.dot(&outward_normal)).min(1.0);

        let direction = match utils::refract(&unit_direction, &outward_normal, ni_over_nt) {
            Some(refracted) if rng.gen::<f64>() >= Self::reflectance(cos_theta, self.ir) => {
                refracted
            }
            // Total internal reflection, or Fresnel chose the reflected path
            _ => utils::reflect(&unit_direction, &outward_normal),
        };

        Some(ScatterRecord::Specular {
            attenuation,
            ray: Ray::new(hit_record.p, direction, ray_in.time),
        })
    }
}

/// Dielectric Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DielectricConfig {
    pub ir: f64,
}

/// Emitter; lights only the side its normal points toward
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Texture,
}
impl DiffuseLight {
    pub fn new(emit: Texture) -> Self {
        Self { emit }
    }

    pub fn from_color(color: Color) -> Self {
        Self::new(Box::new(SolidColor::new(color)))
    }
}
impl Scatterable for DiffuseLight {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        _hit_record: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, ray_in: &Ray, hit_record: &HitRecord, u: f64, v: f64, p: &Point) -> Color {
        if hit_record.normal.dot(&ray_in.dir) < 0.0 {
            self.emit.value(u, v, p)
        } else {
            Color::zeros()
        }
    }
}

/// Diffuse Light Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffuseLightConfig {
    pub emit: TextureConfig,
}

/// Phase function of a participating medium: scatters uniformly in all directions
#[derive(Clone)]
pub struct Isotropic {
    albedo: Texture,
}
impl Isotropic {
    pub fn new(albedo: Texture) -> Self {
        Self { albedo }
    }

    pub fn from_color(color: Color) -> Self {
        Self::new(Box::new(SolidColor::new(color)))
    }
}
impl Scatterable for Isotropic {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Specular {
            attenuation: self.albedo.value(hit_record.u, hit_record.v, &hit_record.p),
            ray: Ray::new(
                hit_record.p,
                utils::random_in_unit_sphere(rng),
                ray_in.time,
            ),
        })
    }
}

/// Neither scatters nor emits
///
/// Stand-in for shapes that only steer importance sampling toward a light.
#[derive(Debug, Clone, Default)]
pub struct NullMaterial;
impl Scatterable for NullMaterial {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        _hit_record: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at_origin<'a>(normal: Vec3, material: &'a dyn Scatterable) -> HitRecord<'a> {
        HitRecord::new(Point::zeros(), 1.0, normal, material, 0.0, 0.0)
    }

    #[test]
    fn test_schlick_normal_incidence_glass() {
        let r = Dielectric::reflectance(1.0, 1.5);
        assert!((r - ((1.0 - 1.5) / (1.0 + 1.5_f64)).powi(2)).abs() < 1e-12);
        assert!((r - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let mut rng = StdRng::seed_from_u64(3);
        let glass = Dielectric::new(1.5);
        let hr = hit_at_origin(Vec3::new(0.0, 0.0, 1.0), &glass);
        let ray_in = Ray::new(Point::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let n = 20_000;
        let mut reflections = 0;
        for _ in 0..n {
            match glass.try_scatter(&ray_in, &hr, &mut rng) {
                Some(ScatterRecord::Specular { attenuation, ray }) => {
                    assert_eq!(attenuation, Color::new(1.0, 1.0, 1.0));
                    if ray.dir[2] > 0.0 {
                        reflections += 1;
                    } else {
                        assert!((ray.dir - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-9);
                    }
                }
                _ => panic!("dielectric must scatter specularly"),
            }
        }
        let fraction = reflections as f64 / n as f64;
        assert!((fraction - 0.04).abs() < 0.01, "fraction = {fraction}");
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(4);
        let glass = Dielectric::new(1.5);
        // Ray travelling inside the glass, grazing the surface from within
        let hr = hit_at_origin(Vec3::new(0.0, 1.0, 0.0), &glass);
        let ray_in = Ray::new(Point::new(-1.0, -0.1, 0.0), Vec3::new(1.0, 0.1, 0.0), 0.0);
        for _ in 0..100 {
            match glass.try_scatter(&ray_in, &hr, &mut rng) {
                Some(ScatterRecord::Specular { ray, .. }) => assert!(ray.dir[1] < 0.0),
                _ => panic!("dielectric must scatter specularly"),
            }
        }
    }

    #[test]
    fn test_metal_reflects_and_rejects_below_surface() {
        let mut rng = StdRng::seed_from_u64(5);
        let mirror = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let hr = hit_at_origin(Vec3::new(0.0, 1.0, 0.0), &mirror);
        let ray_in = Ray::new(Point::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        match mirror.try_scatter(&ray_in, &hr, &mut rng) {
            Some(ScatterRecord::Specular { ray, attenuation }) => {
                assert!((ray.dir - Vec3::new(1.0, 1.0, 0.0).normalize()).norm() < 1e-12);
                assert_eq!(attenuation, Color::new(0.8, 0.8, 0.8));
            }
            _ => panic!("mirror must reflect"),
        }

        // Arriving from below the surface reflects downward and is absorbed
        let from_below = Ray::new(Point::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), 0.0);
        assert!(mirror.try_scatter(&from_below, &hr, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        let metal = Metal::new(Color::new(1.0, 1.0, 1.0), 4.0);
        assert_eq!(metal.fuzz, 1.0);
    }

    #[test]
    fn test_lambertian_scattering_pdf() {
        let lambertian = Lambertian::new(Color::new(0.5, 0.5, 0.5));
        let hr = hit_at_origin(Vec3::new(0.0, 1.0, 0.0), &lambertian);
        let ray_in = Ray::new(Point::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        let up = Ray::new(Point::zeros(), Vec3::new(0.0, 3.0, 0.0), 0.0);
        let down = Ray::new(Point::zeros(), Vec3::new(0.0, -1.0, 0.0), 0.0);
        assert!((lambertian.scattering_pdf(&ray_in, &hr, &up) - 1.0 / PI).abs() < 1e-12);
        assert_eq!(lambertian.scattering_pdf(&ray_in, &hr, &down), 0.0);
    }

    #[test]
    fn test_lambertian_is_diffuse() {
        let mut rng = StdRng::seed_from_u64(6);
        let lambertian = Lambertian::new(Color::new(0.25, 0.5, 0.75));
        let hr = hit_at_origin(Vec3::new(0.0, 1.0, 0.0), &lambertian);
        let ray_in = Ray::new(Point::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        match lambertian.try_scatter(&ray_in, &hr, &mut rng) {
            Some(ScatterRecord::Diffuse { attenuation, pdf }) => {
                assert_eq!(attenuation, Color::new(0.25, 0.5, 0.75));
                let dir = pdf.generate(&mut rng);
                assert!(dir[1] >= 0.0);
            }
            _ => panic!("lambertian must scatter diffusely"),
        }
    }

    #[test]
    fn test_diffuse_light_is_one_sided() {
        let light = DiffuseLight::from_color(Color::new(4.0, 4.0, 4.0));
        let hr = hit_at_origin(Vec3::new(0.0, -1.0, 0.0), &light);
        let from_below = Ray::new(Point::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.0);
        let from_above = Ray::new(Point::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        let p = Point::zeros();
        assert_eq!(
            light.emitted(&from_below, &hr, 0.0, 0.0, &p),
            Color::new(4.0, 4.0, 4.0)
        );
        assert_eq!(light.emitted(&from_above, &hr, 0.0, 0.0, &p), Color::zeros());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(light.try_scatter(&from_below, &hr, &mut rng).is_none());
    }

    #[test]
    fn test_null_material_is_inert() {
        let mut rng = StdRng::seed_from_u64(0);
        let null = NullMaterial;
        let hr = hit_at_origin(Vec3::new(0.0, 1.0, 0.0), &null);
        let ray = Ray::new(Point::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        assert!(null.try_scatter(&ray, &hr, &mut rng).is_none());
        assert_eq!(null.emitted(&ray, &hr, 0.0, 0.0, &hr.p), Color::zeros());
    }

    #[test]
    fn test_material_config_yaml() {
        let yaml = "type: metal\nalbedo: [0.7, 0.6, 0.5]\nfuzz: 0.1\n";
        let config: MaterialConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config, MaterialConfig::Metal(MetalConfig { fuzz, .. }) if fuzz == 0.1));
    }
}
