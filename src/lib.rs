use image::{DynamicImage, imageops::FilterType};

use crate::{
    config::ProcessConfig,
    error::Result,
    machines::MachineTransform,
    texture::Texture,
    transform::prelude::*,
};

pub mod color_palette;
pub mod config;
pub mod dithering;
pub mod error;
pub mod machines;
pub mod texture;
pub mod transform;
pub mod utils;


pub mod prelude {
    pub use crate::{
        color_palette::Palette,
        config::ProcessConfig,
        dithering::{Dither, DitherConfig, DitherEngine, Parallelism},
        error::{Error, Result},
        machines::{Machine, MachineSettings, MachineTransform},
        texture::prelude::*,
        transform::prelude::*,
        utils::prelude::*,
    };
}

pub fn run(config: ProcessConfig, original_img: DynamicImage) -> Result<DynamicImage> {
    run_with_progress(config, original_img, &Progress::none())
}

/// Resize, convert through the configured machine, then upscale.
///
/// The machine is built, and its parameters validated, before any pixel is
/// touched.
pub fn run_with_progress(
    config: ProcessConfig,
    original_img: DynamicImage,
    progress: &Progress,
) -> Result<DynamicImage> {
    let transform = MachineTransform::new(config.machine, &config.settings)?;

    let image = match (config.processing_width, config.processing_height) {
        (None, None) => original_img,
        (width, height) => original_img.resize(
            width.unwrap_or(u32::MAX),
            height.unwrap_or(u32::MAX),
            FilterType::Gaussian,
        ),
    };
    tracing::info!(
        machine = %config.machine,
        width = image.width(),
        height = image.height(),
        "processing"
    );

    let mut texture = Texture::from_dynamic(&image);
    drop(image);
    transform.once(texture.as_texture_mut_slice(), progress);

    let new_image = texture.into_dynamic()?;
    let new_image = match config.output_scale {
        0 | 1 => new_image,
        scale => new_image.resize_exact(
            new_image.width() * scale,
            new_image.height() * scale,
            FilterType::Nearest,
        ),
    };

    Ok(new_image)
}
