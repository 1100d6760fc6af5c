use image::{DynamicImage, ImageFormat, ImageReader};
use std::{fs::File, io::BufWriter, path::Path};

use crate::error::{Error, Result};

/// Decode any format `image` understands.
///
/// Palette matching works on stored sRGB values, no color space conversion
/// happens here.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "decoded image"
    );
    Ok(image)
}

/// Encode to the format implied by the file extension (PNG when unknown).
pub fn write_image<P: AsRef<Path>>(image: &DynamicImage, path: P) -> Result {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let mut file = BufWriter::new(File::create(path)?);
    image
        .write_to(&mut file, format)
        .map_err(Error::ImageEncode)?;
    Ok(())
}
