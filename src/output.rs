//! Framebuffer and image writers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{Rgb, RgbImage};
use log::info;

use crate::error::OutputError;
use crate::Color;

/// Linear colors, row-major with the top row first
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}
impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::zeros(); (width * height) as usize],
        }
    }

    /// Assemble a framebuffer from rows listed top to bottom
    pub fn from_rows(width: u32, rows: Vec<Vec<Color>>) -> Self {
        let height = rows.len() as u32;
        let pixels: Vec<Color> = rows.into_iter().flatten().collect();
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y` counted from the top
    pub fn get(&self, x: u32, y: u32) -> &Color {
        &self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(to_rgb8(self.get(x, y))))
    }

    /// Plain-text PPM (`P3`)
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> Result<(), OutputError> {
        writeln!(writer, "P3\n{} {}\n255", self.width, self.height)?;
        for color in &self.pixels {
            let [r, g, b] = to_rgb8(color);
            writeln!(writer, "{r} {g} {b}")?;
        }
        Ok(())
    }

    /// Write to `path`, as text PPM for a `.ppm` extension and otherwise in
    /// whatever format `image` picks from the extension
    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        let is_ppm = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));
        if is_ppm {
            let mut writer = BufWriter::new(File::create(path)?);
            self.write_ppm(&mut writer)?;
            writer.flush()?;
        } else {
            self.to_rgb_image().save(path)?;
        }
        info!("wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Gamma correct (gamma 2) and quantize a linear color
pub fn to_rgb8(color: &Color) -> [u8; 3] {
    let quantize = |c: f64| (256.0 * c.sqrt().clamp(0.0, 0.999)) as u8;
    [quantize(color[0]), quantize(color[1]), quantize(color[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize() {
        assert_eq!(to_rgb8(&Color::new(0.0, 1.0, 0.25)), [0, 255, 128]);
        // Out of range and non-finite values clamp instead of wrapping
        assert_eq!(to_rgb8(&Color::new(4.0, -1.0, f64::NAN)), [255, 0, 0]);
    }

    #[test]
    fn test_rows_are_top_first() {
        let rows = vec![
            vec![Color::new(1.0, 1.0, 1.0), Color::zeros()],
            vec![Color::zeros(), Color::new(0.25, 0.25, 0.25)],
        ];
        let fb = Framebuffer::from_rows(2, rows);
        assert_eq!(fb.height(), 2);
        let image = fb.to_rgb_image();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([128, 128, 128]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_write_ppm() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set(1, 0, Color::new(1.0, 0.0, 0.25));
        let mut buffer = Vec::new();
        fb.write_ppm(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n0 0 0\n255 0 128\n");
    }

    #[test]
    fn test_save_by_extension() {
        let dir = std::env::temp_dir().join(format!("path-tracing-output-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut fb = Framebuffer::new(3, 2);
        fb.set(2, 1, Color::new(1.0, 1.0, 1.0));

        let ppm = dir.join("out.ppm");
        fb.save(&ppm).unwrap();
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n3 2\n255\n"));

        let png = dir.join("out.png");
        fb.save(&png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1), &Rgb([255, 255, 255]));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
