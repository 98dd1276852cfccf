use std::path::{Path, PathBuf};

use path_tracing::cameras::Camera;
use path_tracing::config::{ImageConfig, RenderConfig};
use path_tracing::output::Framebuffer;
use path_tracing::render::render;
use path_tracing::scenes::SceneConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn config_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

fn render_small(config: &RenderConfig, size: u32, samples: u32) -> Framebuffer {
    let image = ImageConfig {
        width: size,
        height: size,
        samples_per_pixel: samples,
        max_depth: config.image.max_depth,
    };
    let camera_config = config.camera();
    let camera = Camera::from_config(&camera_config, image.aspect_ratio());
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
    let scene = config
        .scene
        .build(
            camera_config.shutter_open,
            camera_config.shutter_close,
            &mut rng,
        )
        .unwrap();
    render(&scene, &camera, &image, config.seed)
}

#[test]
fn test_shipped_configs_load() {
    for name in ["cornell_box.yaml", "glass_and_fog.yaml"] {
        let config = RenderConfig::load(&config_path(name)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let camera = config.camera();
        let scene = config
            .scene
            .build(camera.shutter_open, camera.shutter_close, &mut rng)
            .unwrap();
        assert!(scene.lights.is_some(), "{name} has no lights");
    }
}

#[test]
fn test_cornell_box_end_to_end() {
    let config = RenderConfig::load(&config_path("cornell_box.yaml")).unwrap();
    let first = render_small(&config, 16, 16);
    let second = render_small(&config, 16, 16);
    assert_eq!(first, second);

    assert!(first.pixels().iter().all(|c| c.iter().all(|v| v.is_finite())));
    // Third row from the top, center column, looks straight at the ceiling light
    let light = first.get(8, 2);
    assert!(light[0] > 1.0, "{light:?}");

    let name = format!("path-tracing-cornell-{}.ppm", std::process::id());
    let path = std::env::temp_dir().join(name);
    first.save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("P3\n16 16\n255\n"));
    assert_eq!(text.lines().count(), 3 + 16 * 16);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_preset_without_config_file() {
    let mut config = RenderConfig::for_scene(SceneConfig::TwoPerlinSpheres);
    config.seed = Some(3);
    config.validate().unwrap();
    let fb = render_small(&config, 8, 2);
    // Sky fills the top row
    let sky = fb.get(0, 0);
    assert!(sky[2] > 0.5);
}
