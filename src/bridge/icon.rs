use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::utils::{AppError, AppResult};

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Placeholder tiles are square; matches the icon size the UI renders at.
const TILE_SIZE: u32 = 96;

/// Raw icon pixels as handed over by a device provider: tightly packed RGBA,
/// row-major, preserving the drawable's intrinsic dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Encode a bitmap as a PNG base64 data URI.
pub fn encode_data_uri(bitmap: &IconBitmap) -> AppResult<String> {
    let image: image::RgbaImage =
        image::ImageBuffer::from_raw(bitmap.width, bitmap.height, bitmap.rgba.clone())
            .ok_or_else(|| {
                AppError::Platform(format!(
                    "icon buffer length {} does not match {}x{}",
                    bitmap.rgba.len(),
                    bitmap.width,
                    bitmap.height
                ))
            })?;

    let mut png = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;

    Ok(format!("{}{}", DATA_URI_PREFIX, BASE64.encode(&png)))
}

/// Deterministic solid-color tile for packages whose icon the backend cannot
/// rasterize. The hue is derived from the package id, so the same package
/// always gets the same tile.
pub fn placeholder_tile(package: &str) -> IconBitmap {
    // FNV-1a over the package id picks the color.
    let mut hash: u32 = 0x811c_9dc5;
    for byte in package.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }

    // Keep the channels away from the extremes so the tile reads on both
    // light and dark backgrounds.
    let r = 64 + (hash & 0x7f) as u8;
    let g = 64 + ((hash >> 8) & 0x7f) as u8;
    let b = 64 + ((hash >> 16) & 0x7f) as u8;

    let mut rgba = Vec::with_capacity((TILE_SIZE * TILE_SIZE * 4) as usize);
    for _ in 0..TILE_SIZE * TILE_SIZE {
        rgba.extend_from_slice(&[r, g, b, 0xff]);
    }

    IconBitmap {
        width: TILE_SIZE,
        height: TILE_SIZE,
        rgba,
    }
}
