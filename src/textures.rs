//! Textures/colors

use std::path::PathBuf;
use std::sync::Arc;

use dyn_clone::DynClone;
use image::RgbImage;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{error::SceneError, utils, utils::SerdeVector, Color, Point, Vec3};

pub type Texture = Box<dyn Textured + Send + Sync>;

pub trait Textured: DynClone {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color;
}
dyn_clone::clone_trait_object!(Textured);

/// Texture Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureConfig {
    Solid {
        color: SerdeVector,
    },
    Checker {
        even: Box<TextureConfig>,
        odd: Box<TextureConfig>,
    },
    Noise {
        scale: f64,
        #[serde(default)]
        pattern: NoisePattern,
    },
    Image {
        path: PathBuf,
    },
}

/// Build a texture from its config
///
/// Noise textures draw their permutation tables from `rng`.
pub fn from_config(config: TextureConfig, rng: &mut dyn RngCore) -> Result<Texture, SceneError> {
    Ok(match config {
        TextureConfig::Solid { color } => Box::new(SolidColor::new(color.into())),
        TextureConfig::Checker { even, odd } => Box::new(Checker::new(
            from_config(*even, rng)?,
            from_config(*odd, rng)?,
        )),
        TextureConfig::Noise { scale, pattern } => Box::new(Noise::new(scale, pattern, rng)),
        TextureConfig::Image { path } => Box::new(ImageTexture::open(&path)?),
    })
}

/// Solid Color
#[derive(Debug, Clone)]
pub struct SolidColor {
    color_value: Color,
}
impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color_value: color }
    }
}
impl Textured for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        self.color_value
    }
}

/// Checker Texture
#[derive(Clone)]
pub struct Checker {
    odd: Texture,
    even: Texture,
}
impl Checker {
    pub fn new(even: Texture, odd: Texture) -> Self {
        Self { odd, even }
    }

    pub fn from_solid_colors(c1: Color, c2: Color) -> Self {
        Self {
            even: Box::new(SolidColor::new(c1)),
            odd: Box::new(SolidColor::new(c2)),
        }
    }
}
impl Textured for Checker {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color {
        let sines = (10.0 * p[0]).sin() * (10.0 * p[1]).sin() * (10.0 * p[2]).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// How a noise texture turns the Perlin field into a grey level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoisePattern {
    Smooth,
    Turbulence,
    #[default]
    Marble,
}

/// Noise Texture
#[derive(Clone)]
pub struct Noise {
    noise: Perlin,
    scale: f64,
    pattern: NoisePattern,
}
impl Noise {
    pub fn new(scale: f64, pattern: NoisePattern, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            pattern,
        }
    }

    pub fn marble(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self::new(scale, NoisePattern::Marble, rng)
    }
}
impl Textured for Noise {
    fn value(&self, _u: f64, _v: f64, p: &Point) -> Color {
        let scaled = self.scale * *p;
        let grey = match self.pattern {
            NoisePattern::Smooth => 0.5 * (1.0 + self.noise.noise(&scaled)),
            NoisePattern::Turbulence => self.noise.turbulence(&scaled, None),
            NoisePattern::Marble => {
                0.5 * (1.0 + (scaled[2] + 10.0 * self.noise.turbulence(&scaled, None)).sin())
            }
        };
        Color::new(1.0, 1.0, 1.0) * grey
    }
}

/// Perlin gradient noise
#[derive(Debug, Clone)]
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}
impl Perlin {
    const POINT_COUNT: usize = 256;

    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..Self::POINT_COUNT)
            .map(|_| utils::gen_random(rng, Some(-1.0), Some(1.0)).normalize())
            .collect();

        let perm_x = Self::perlin_generate_perm(rng);
        let perm_y = Self::perlin_generate_perm(rng);
        let perm_z = Self::perlin_generate_perm(rng);

        Self {
            ranvec,
            perm_x,
            perm_y,
            perm_z,
        }
    }

    /// Sum of octaves with halving weight
    pub fn turbulence(&self, p: &Point, depth: Option<u32>) -> f64 {
        let depth = depth.unwrap_or(7);
        let mut accum = 0.0;
        let mut temp_p = *p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(&temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }
        accum.abs()
    }

    /// Noise in `[-1, 1]`
    pub fn noise(&self, p: &Point) -> f64 {
        let u = p[0] - p[0].floor();
        let v = p[1] - p[1].floor();
        let w = p[2] - p[2].floor();

        let i = p[0].floor() as i64;
        let j = p[1].floor() as i64;
        let k = p[2].floor() as i64;

        let mut c: [[[Vec3; 2]; 2]; 2] = [[[Vec3::zeros(); 2]; 2]; 2];
        for (di, c0) in c.iter_mut().enumerate() {
            for (dj, c1) in c0.iter_mut().enumerate() {
                for (dk, c2) in c1.iter_mut().enumerate() {
                    *c2 = self.ranvec[self.perm_x[((i + di as i64) & 255) as usize]
                        ^ self.perm_y[((j + dj as i64) & 255) as usize]
                        ^ self.perm_z[((k + dk as i64) & 255) as usize]]
                }
            }
        }

        Self::perlin_interp(c, u, v, w)
    }

    fn perlin_generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut p: Vec<usize> = (0..Self::POINT_COUNT).collect();
        // Fisher-Yates
        for i in (1..p.len()).rev() {
            let target = rng.gen_range(0..=i);
            p.swap(i, target);
        }
        p
    }

    fn perlin_interp(c: [[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
        // Hermitian Smoothing
        let uu = u.powi(2) * (3.0 - 2.0 * u);
        let vv = v.powi(2) * (3.0 - 2.0 * v);
        let ww = w.powi(2) * (3.0 - 2.0 * w);

        let mut accum = 0.0;

        for (i, ci) in c.iter().enumerate() {
            let fi = i as f64;
            for (j, cj) in ci.iter().enumerate() {
                let fj = j as f64;
                for (k, ck) in cj.iter().enumerate() {
                    let fk = k as f64;
                    let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * ck.dot(&weight_v);
                }
            }
        }
        accum
    }
}

/// Image-mapped texture, looked up by surface coordinates
#[derive(Clone)]
pub struct ImageTexture {
    image: Arc<RgbImage>,
}
impl ImageTexture {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn open(path: &std::path::Path) -> Result<Self, SceneError> {
        let image = image::open(path)
            .map_err(|source| SceneError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        Ok(Self::new(image))
    }
}
impl Textured for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: &Point) -> Color {
        let (width, height) = self.image.dimensions();
        // Debugging aid for a missing image
        if width == 0 || height == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = u.clamp(0.0, 1.0);
        // Image rows run top to bottom
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * width as f64) as u32).min(width - 1);
        let j = ((v * height as f64) as u32).min(height - 1);

        let pixel = self.image.get_pixel(i, j);
        let scale = 1.0 / 255.0;
        Color::new(
            scale * pixel[0] as f64,
            scale * pixel[1] as f64,
            scale * pixel[2] as f64,
        )
    }
}
