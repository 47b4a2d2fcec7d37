use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::warn;

/// Icon edge lengths for the 1x, 2x and 3x densities.
pub const ICON_SIZES: [u32; 3] = [29, 58, 87];

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render a black square with a white disc inset by 15% on every side.
///
/// Never fails: if no raster can be produced the result is an empty vector.
pub fn circle_icon_png(size: u32) -> Vec<u8> {
    if size == 0 {
        warn!("icon size 0 requested, returning empty image");
        return Vec::new();
    }

    let edge = size as f64;
    let inset = edge * 0.15;
    let radius = (edge - inset * 2.0) / 2.0;
    let center = edge / 2.0;

    let image = RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f64 + 0.5 - center;
        let dy = y as f64 + 0.5 - center;
        if dx * dx + dy * dy <= radius * radius {
            WHITE
        } else {
            BLACK
        }
    });

    let mut png = Vec::new();
    match image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png) {
        Ok(()) => png,
        Err(e) => {
            warn!(size, error = %e, "icon encoding failed, returning empty image");
            Vec::new()
        }
    }
}
