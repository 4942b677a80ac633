//! QR code rendering for the login URL

use crate::{Error, Result};
use image::{ImageFormat, Luma};
use qrcode::render::unicode::Dense1x2;
use qrcode::{EcLevel, QrCode};
use std::path::Path;

fn encode(data: &str) -> Result<QrCode> {
    QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| Error::qrcode(format!("cannot encode login URL: {}", e)))
}

/// Write `data` as a PNG QR code of at least `size` x `size` pixels
pub fn write_png(data: &str, path: &Path, size: u32) -> Result<()> {
    let code = encode(data)?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(size, size)
        .build();

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| Error::qrcode(format!("cannot write {}: {}", path.display(), e)))?;

    tracing::info!("QR code written to {}", path.display());
    Ok(())
}

/// Render `data` with half-height block characters for a terminal.
///
/// Colors are inverted so the code scans on dark terminal themes.
pub fn render_terminal(data: &str) -> Result<String> {
    let code = encode(data)?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
