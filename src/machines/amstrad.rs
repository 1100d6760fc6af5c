//! Amstrad CPC mode 3 style output: four colors per image out of the 27
//! color hardware palette, on double width pixels.

use crate::{
    color_palette::{Palette, reducer},
    dithering::{DitherConfig, DitherEngine, Parallelism},
    texture::{Shape, TextureMutSlice},
    transform::prelude::*,
    utils::{num::floor_div, pixel::RGB},
};

const LEVELS: [u8; 3] = [0x00, 0x7F, 0xFF];
pub const COLORS: usize = 4;
/// Hardware pixels cover two raster columns.
pub const PIXEL_WIDTH: usize = 2;

/// The 27 hardware colors, blue varying fastest, green slowest.
pub fn master_palette() -> Palette {
    let colors: [RGB; 27] = std::array::from_fn(|idx| {
        RGB::new(
            LEVELS[floor_div(idx, 3) % 3],
            LEVELS[floor_div(idx, 9)],
            LEVELS[idx % 3],
        )
    });
    Palette::from_array(colors)
}

pub struct AmstradCpc {
    master: Palette,
    config: DitherConfig,
    parallelism: Parallelism,
    engine: Option<DitherEngine>,
}

impl AmstradCpc {
    /// `config` must carry a pixel width of [PIXEL_WIDTH].
    pub fn new(config: DitherConfig) -> Self {
        debug_assert_eq!(config.pixel_width(), PIXEL_WIDTH);
        Self {
            master: master_palette(),
            config,
            parallelism: Parallelism::Auto,
            engine: None,
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Palette picked by the last run.
    pub fn palette(&self) -> Option<&Palette> {
        self.engine.as_ref().map(DitherEngine::palette)
    }
}

impl TextureTransform for AmstradCpc {
    fn apply<'t>(
        &mut self,
        texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        // the master palette has 27 entries and the stride is non zero
        let palette = match reducer::reduce(&texture, &self.master, COLORS, PIXEL_WIDTH) {
            Ok(palette) => palette,
            Err(err) => {
                tracing::warn!(%err, "palette reduction failed");
                return texture;
            }
        };

        let engine = self.engine.insert(
            DitherEngine::new(palette, self.config).with_parallelism(self.parallelism),
        );
        engine.apply(texture, progress)
    }

    fn prepare(&mut self, _shape: Shape) {}
}
