//! PNG encode/decode glue between a rendered [`ColorBuffer`] and the
//! `image` crate, plus a golden-image diff used to compare a freshly
//! rendered scene against a checked-in reference PNG.

use std::fmt;
use std::path::Path;

use gs_twin::ColorBuffer;
use gs_twin_core::ColorTarget;
use image::{ImageFormat, RgbaImage};

/// Render a [`ColorBuffer`] to an in-memory RGBA image, one pixel per
/// tile pixel.
#[must_use]
pub fn to_image(buf: &ColorBuffer) -> RgbaImage {
    RgbaImage::from_fn(buf.width(), buf.height(), |x, y| {
        let p = buf.read_pixel(x, y);
        image::Rgba([p.r, p.g, p.b, p.a])
    })
}

/// Encode a [`ColorBuffer`] as a PNG file at `path`.
///
/// # Errors
/// Returns an error if the image cannot be encoded or the file cannot be
/// written.
pub fn save_color_buffer(path: &Path, buf: &ColorBuffer) -> anyhow::Result<()> {
    to_image(buf).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// The outcome of comparing two PNGs pixel-by-pixel.
#[derive(Debug)]
pub struct DiffReport {
    pub width: u32,
    pub height: u32,
    pub tolerance: u8,
    pub mismatched_pixels: u32,
    pub max_channel_delta: u8,
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} image, tolerance {}: {} of {} pixels differ, max channel delta {}",
            self.width,
            self.height,
            self.tolerance,
            self.mismatched_pixels,
            self.width * self.height,
            self.max_channel_delta
        )
    }
}

/// Load two PNGs and compare them channel-by-channel. A pixel counts as
/// mismatched if any of its four channels differs from its counterpart
/// by more than `tolerance`.
///
/// # Errors
/// Returns an error if either file fails to decode, or if the two images
/// have different dimensions.
pub fn diff(a_path: &Path, b_path: &Path, tolerance: u8) -> anyhow::Result<DiffReport> {
    let a = image::open(a_path)?.to_rgba8();
    let b = image::open(b_path)?.to_rgba8();
    anyhow::ensure!(
        a.dimensions() == b.dimensions(),
        "dimension mismatch: {:?} ({}) vs {:?} ({})",
        a.dimensions(),
        a_path.display(),
        b.dimensions(),
        b_path.display()
    );

    let mut mismatched_pixels = 0u32;
    let mut max_channel_delta = 0u8;
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        let mut worst = 0u8;
        for c in 0..4 {
            let delta = pa.0[c].abs_diff(pb.0[c]);
            worst = worst.max(delta);
        }
        max_channel_delta = max_channel_delta.max(worst);
        if worst > tolerance {
            mismatched_pixels += 1;
        }
    }

    let (width, height) = a.dimensions();
    Ok(DiffReport { width, height, tolerance, mismatched_pixels, max_channel_delta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_twin_core::Rgba8888;

    #[test]
    fn to_image_reads_every_tile_pixel() {
        let mut buf = ColorBuffer::new();
        buf.write_pixel(3, 4, Rgba8888::new(10, 20, 30, 40));
        let img = to_image(&buf);
        assert_eq!(img.get_pixel(3, 4).0, [10, 20, 30, 40]);
        assert_eq!(img.dimensions(), (32, 32));
    }
}
