//! Sampling loop: fans rows out over rayon and averages samples per pixel

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::{
    cameras::Camera, config::ImageConfig, integrator, output::Framebuffer, scenes::Scene, Color,
};

/// Render `scene` through `camera`
///
/// Every row draws from its own `StdRng`, seeded from `seed`, so a fixed seed
/// reproduces the image regardless of thread count. Without a seed one is drawn
/// from the thread-local generator and logged.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    image: &ImageConfig,
    seed: Option<u64>,
) -> Framebuffer {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(
        "rendering {}x{} at {} samples per pixel, max depth {}, seed {seed}",
        image.width, image.height, image.samples_per_pixel, image.max_depth
    );

    let mut master = StdRng::seed_from_u64(seed);
    let row_seeds: Vec<u64> = (0..image.height).map(|_| master.gen()).collect();

    let bar = ProgressBar::new(image.height as u64);
    let template = "{elapsed_precise} [{wide_bar}] {pos}/{len} rows";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }

    let rows: Vec<(Vec<Color>, usize)> = row_seeds
        .into_par_iter()
        .enumerate()
        .map(|(y, row_seed)| {
            let mut rng = StdRng::seed_from_u64(row_seed);
            let row = render_row(scene, camera, image, y as u32, &mut rng);
            bar.inc(1);
            row
        })
        .collect();
    bar.finish_and_clear();

    let non_finite: usize = rows.iter().map(|(_, count)| count).sum();
    if non_finite > 0 {
        warn!("discarded non-finite components of {non_finite} samples");
    }
    info!("render finished in {:.2?}", bar.elapsed());

    Framebuffer::from_rows(image.width, rows.into_iter().map(|(row, _)| row).collect())
}

/// One row of averaged pixels, `y` counted from the top, plus the number of
/// samples that had a non-finite component
fn render_row(
    scene: &Scene,
    camera: &Camera,
    image: &ImageConfig,
    y: u32,
    rng: &mut dyn RngCore,
) -> (Vec<Color>, usize) {
    let mut non_finite = 0;
    let pixels = (0..image.width)
        .map(|x| {
            let (color, bad) = render_pixel(scene, camera, image, x, y, rng);
            non_finite += bad;
            color
        })
        .collect();
    (pixels, non_finite)
}

/// Average of `samples_per_pixel` jittered samples for one pixel
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    image: &ImageConfig,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> (Color, usize) {
    let lights = scene.lights.as_deref();
    let mut pixel_color = Color::zeros();
    let mut non_finite = 0;

    for _ in 0..image.samples_per_pixel {
        // Image rows run top down, camera t runs bottom up
        let s = (x as f64 + rng.gen::<f64>()) / image.width as f64;
        let t = ((image.height - 1 - y) as f64 + rng.gen::<f64>()) / image.height as f64;
        let ray = camera.get_ray(s, t, rng);
        let sample = integrator::radiance(
            &ray,
            scene.world.as_ref(),
            lights,
            &scene.background,
            image.max_depth,
            rng,
        );
        let (sample, discarded) = discard_non_finite(sample);
        if discarded {
            non_finite += 1;
        }
        pixel_color += sample;
    }

    (pixel_color / image.samples_per_pixel as f64, non_finite)
}

/// Zero every NaN or infinite component so one bad sample cannot poison a pixel
fn discard_non_finite(sample: Color) -> (Color, bool) {
    if sample.iter().all(|c| c.is_finite()) {
        (sample, false)
    } else {
        (sample.map(|c| if c.is_finite() { c } else { 0.0 }), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::Background;
    use crate::materials::DiffuseLight;
    use crate::objects::{HittableList, Sphere};
    use crate::utils::SerdeVector;
    use crate::{Point, Vec3};

    fn glowing_scene(background: Background) -> Scene {
        let mut world = HittableList::default();
        world.add(Box::new(Sphere::new(
            Point::new(0.0, 0.0, -1.0),
            0.5,
            Box::new(DiffuseLight::from_color(Color::new(1.0, 0.5, 0.25))),
        )));
        Scene {
            world: Box::new(world),
            lights: None,
            background,
        }
    }

    fn camera() -> Camera {
        Camera::new(
            Point::zeros(),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            1.0,
            0.0,
            1.0,
        )
    }

    fn image(size: u32, samples: u32) -> ImageConfig {
        ImageConfig {
            width: size,
            height: size,
            samples_per_pixel: samples,
            max_depth: 50,
        }
    }

    #[test]
    fn test_discard_non_finite() {
        let (clean, discarded) = discard_non_finite(Color::new(f64::NAN, 0.5, f64::INFINITY));
        assert!(discarded);
        assert_eq!(clean, Color::new(0.0, 0.5, 0.0));

        let (same, discarded) = discard_non_finite(Color::new(0.1, 0.2, 0.3));
        assert!(!discarded);
        assert_eq!(same, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_render_center_and_corner() {
        let background = Background::Solid {
            color: SerdeVector([0.0, 0.0, 1.0]),
        };
        let scene = glowing_scene(background);
        let fb = render(&scene, &camera(), &image(9, 4), Some(5));
        assert_eq!((fb.width(), fb.height()), (9, 9));
        // The sphere fills the middle of the frame, the corners see background
        assert_eq!(*fb.get(4, 4), Color::new(1.0, 0.5, 0.25));
        assert_eq!(*fb.get(0, 0), Color::new(0.0, 0.0, 1.0));
        assert_eq!(*fb.get(8, 8), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let scene = glowing_scene(Background::Sky);
        let first = render(&scene, &camera(), &image(12, 3), Some(99));
        let second = render(&scene, &camera(), &image(12, 3), Some(99));
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_row_looks_up() {
        let scene = Scene {
            world: Box::new(HittableList::default()),
            lights: None,
            background: Background::Sky,
        };
        let fb = render(&scene, &camera(), &image(5, 1), Some(1));
        // Sky is bluer overhead, so the top row has less red than the bottom row
        assert!(fb.get(2, 0)[0] < fb.get(2, 4)[0]);
    }
}
