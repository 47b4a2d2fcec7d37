use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

/// Edge length of the thumbnail barcode, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 220;

/// Light modules drawn around the symbol on every side.
const QUIET_ZONE: usize = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("QR encoder is unavailable for this message")]
    Unavailable,
    #[error("QR generation failed: {0}")]
    Failed(String),
}

/// Encode `message` as a QR code (error correction M) and rasterize it to a
/// `size` x `size` greyscale PNG.
pub fn generate_png(message: &str, size: u32) -> Result<Vec<u8>, RenderError> {
    let code = QrCode::with_error_correction_level(message.as_bytes(), EcLevel::M)
        .map_err(|e| match e {
            QrError::DataTooLong => RenderError::Failed(e.to_string()),
            _ => RenderError::Unavailable,
        })?;

    let raster = rasterize(&code, size)?;

    let mut png = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RenderError::Failed(e.to_string()))?;
    Ok(png)
}

/// Nearest-neighbour scale of the module grid (plus quiet zone) onto the
/// requested pixel square.
fn rasterize(code: &QrCode, size: u32) -> Result<GrayImage, RenderError> {
    let width = code.width();
    let total = width + 2 * QUIET_ZONE;
    if (size as usize) < total {
        return Err(RenderError::Failed(format!(
            "{size}px cannot hold a {total}-module symbol"
        )));
    }

    let colors = code.to_colors();
    let scale = |px: u32| px as usize * total / size as usize;

    Ok(GrayImage::from_fn(size, size, |x, y| {
        let (mx, my) = (scale(x), scale(y));
        let inside = (QUIET_ZONE..QUIET_ZONE + width).contains(&mx)
            && (QUIET_ZONE..QUIET_ZONE + width).contains(&my);
        if inside && colors[(my - QUIET_ZONE) * width + (mx - QUIET_ZONE)] == Color::Dark {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    }))
}
