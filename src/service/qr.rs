use crate::error::AppError;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Public path encoded into the QR symbol.
pub const FEEDBACK_PATH: &str = "/feedback";

/// Rendered pixels per QR module.
const MODULE_PIXELS: u32 = 10;

/// Encode `<base_url>/feedback` as a black-on-white PNG QR symbol at
/// error-correction level L with the standard 4-module quiet zone.
/// Output is byte-deterministic for a given URL.
pub fn feedback_qr_png(base_url: &str) -> Result<Vec<u8>, AppError> {
    let target = format!("{}{}", base_url.trim_end_matches('/'), FEEDBACK_PATH);
    let code = QrCode::with_error_correction_level(target.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::Qr(format!("{e:?}")))?;
    let symbol = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(symbol).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
