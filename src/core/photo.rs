use std::{io::Cursor, path::Path};

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use image::{DynamicImage, ImageFormat, ImageReader, imageops::FilterType};

/// Edge length of a stored profile photo, in pixels.
pub const PHOTO_SIZE: u32 = 256;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Load an image file and turn it into a profile photo data URI.
pub fn encode_profile_photo<P: AsRef<Path>>(path: P) -> anyhow::Result<String> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .with_context(|| format!("Failed to open photo {:?}", path))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read photo {:?}", path))?
        .decode()
        .with_context(|| format!("Failed to decode photo {:?}", path))?;
    photo_data_uri(&img)
}

/// Crop the centred square of `img`, scale it to `PHOTO_SIZE` and encode it
/// as a base64 PNG data URI.
pub fn photo_data_uri(img: &DynamicImage) -> anyhow::Result<String> {
    let side = img.width().min(img.height());
    anyhow::ensure!(side > 0, "Photo has no pixels");
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;
    let square = img
        .crop_imm(x, y, side, side)
        .resize_exact(PHOTO_SIZE, PHOTO_SIZE, FilterType::Triangle);

    let mut png = Vec::new();
    square
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to encode photo as PNG")?;
    Ok(format!("{PNG_DATA_URI_PREFIX}{}", B64.encode(&png)))
}

/// Decode a photo previously produced by [`photo_data_uri`].
pub fn decode_profile_photo(data_uri: &str) -> anyhow::Result<DynamicImage> {
    let payload = data_uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .context("Photo is not a base64 PNG data URI")?;
    let bytes = B64.decode(payload).context("Photo payload is not valid base64")?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .context("Photo payload is not a valid PNG")?;
    Ok(img)
}
