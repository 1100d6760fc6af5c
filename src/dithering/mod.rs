//! Palette mapping strategies: flat nearest match, ordered threshold maps
//! and error diffusion.
//!
//! All three work on cells of `pixel_width` raster columns, one cell per
//! addressable hardware pixel. The left pixel of a cell is sampled and the
//! match is written to every pixel of the cell.

pub mod error_diffusion;
pub mod halftone;
pub mod threshold;

use std::{fmt::Display, str::FromStr};

use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};

use crate::{
    color_palette::Palette,
    dithering::{
        error_diffusion::{DiffusionKernel, DiffusionPlane, KernelWeights},
        threshold::ThresholdMap,
    },
    error::{Error, Result},
    texture::{Shape, Shape2D, TextureMutSlice, TextureRef},
    transform::{progress::Progress, traits::TextureTransform},
    utils::pixel::RGB,
};

/// Pixel mapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    #[default]
    None,
    Ordered(ThresholdMap),
    Diffusion(DiffusionKernel),
}

impl Dither {
    /// Selector index: 0 none, 1..=4 ordered maps, 5..=14 diffusion kernels.
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Dither::None),
            1..=4 => Ok(Dither::Ordered(ThresholdMap::ALL[index as usize - 1])),
            5..=14 => Ok(Dither::Diffusion(DiffusionKernel::ALL[index as usize - 5])),
            other => Err(Error::invalid("dither", other)),
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Dither::None => 0,
            Dither::Ordered(ThresholdMap::Ordered2x2) => 1,
            Dither::Ordered(ThresholdMap::Ordered3x3) => 2,
            Dither::Ordered(ThresholdMap::Ordered4x4) => 3,
            Dither::Ordered(ThresholdMap::Ordered8x8) => 4,
            Dither::Diffusion(DiffusionKernel::FalseFloydSteinberg) => 5,
            Dither::Diffusion(DiffusionKernel::FloydSteinberg) => 6,
            Dither::Diffusion(DiffusionKernel::Stucki) => 7,
            Dither::Diffusion(DiffusionKernel::Burkes) => 8,
            Dither::Diffusion(DiffusionKernel::JarvisJudiceNinke) => 9,
            Dither::Diffusion(DiffusionKernel::Sierra3) => 10,
            Dither::Diffusion(DiffusionKernel::Sierra2) => 11,
            Dither::Diffusion(DiffusionKernel::Sierra24A) => 12,
            Dither::Diffusion(DiffusionKernel::Fan) => 13,
            Dither::Diffusion(DiffusionKernel::ShiauFan) => 14,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dither::None => "none",
            Dither::Ordered(map) => map.name(),
            Dither::Diffusion(kernel) => kernel.name(),
        }
    }
}

impl FromStr for Dither {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        (0..=14)
            .filter_map(|idx| Dither::from_index(idx).ok())
            .find(|dither| dither.name() == s)
            .ok_or_else(|| Error::invalid("dither", s))
    }
}

impl Display for Dither {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Row scheduling for transforms that allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Auto,
    Seq,
    Par,
}

impl Parallelism {
    /// Detect best-fit strategy
    pub fn auto(shape_hint: Shape2D) -> Self {
        let (width, height) = shape_hint;
        let count = width * height;

        if width < 450 || count < 202500 {
            return Parallelism::Seq;
        }
        Parallelism::Par
    }

    /// Resolve [Parallelism::Auto] for a raster, keep forced choices.
    pub fn resolve(self, shape_hint: Shape2D) -> Self {
        match self {
            Parallelism::Auto => Self::auto(shape_hint),
            forced => forced,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Parallelism::Auto => "auto",
            Parallelism::Seq => "seq",
            Parallelism::Par => "par",
        }
    }
}

impl FromStr for Parallelism {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Parallelism::Auto),
            "seq" => Ok(Parallelism::Seq),
            "par" => Ok(Parallelism::Par),
            other => Err(Error::invalid("parallelism", other)),
        }
    }
}

/// Validated [DitherEngine] parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DitherConfig {
    dither: Dither,
    /// 0..=100
    strength: u8,
    serpentine: bool,
    /// raster columns per hardware pixel, 1 or 2
    pixel_width: usize,
}

impl DitherConfig {
    pub fn new(dither: Dither, strength: u8, serpentine: bool, pixel_width: usize) -> Result<Self> {
        if strength > 100 {
            return Err(Error::invalid("strength", strength));
        }
        if pixel_width != 1 && pixel_width != 2 {
            return Err(Error::invalid("pixel_width", pixel_width));
        }
        Ok(Self {
            dither,
            strength,
            serpentine,
            pixel_width,
        })
    }

    pub fn dither(&self) -> Dither {
        self.dither
    }

    pub fn strength(&self) -> u8 {
        self.strength
    }

    pub fn serpentine(&self) -> bool {
        self.serpentine
    }

    pub fn pixel_width(&self) -> usize {
        self.pixel_width
    }
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            dither: Dither::None,
            strength: 100,
            serpentine: true,
            pixel_width: 1,
        }
    }
}

/// Maps every cell of a raster onto a palette.
#[derive(Debug, Clone)]
pub struct DitherEngine {
    palette: Palette,
    config: DitherConfig,
    parallelism: Parallelism,
    /// prepared for this shape
    shape: Option<Shape>,
    strategy: Parallelism,
    offsets: Vec<f32>,
    weights: Option<KernelWeights>,
}

impl DitherEngine {
    pub fn new(palette: Palette, config: DitherConfig) -> Self {
        Self {
            palette,
            config,
            parallelism: Parallelism::Auto,
            shape: None,
            strategy: Parallelism::Seq,
            offsets: Vec::new(),
            weights: None,
        }
    }

    /// Force a row strategy. Error diffusion ignores it.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self.shape = None;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &DitherConfig {
        &self.config
    }

    fn cells(&self, width: usize) -> usize {
        width.div_ceil(self.config.pixel_width)
    }

    fn quantize_rows(&self, texture: &mut TextureMutSlice<'_, u8>, progress: &Progress) {
        let (width, height, planes) = texture.shape();
        let stride = texture.row_stride();
        if stride == 0 || height == 0 {
            return;
        }
        let cells = self.cells(width);
        let map_rows = match self.config.dither {
            Dither::Ordered(map) => map.size(),
            _ => 0,
        };
        let ticker = progress.ticker(height);

        let row_fn = |(y, row): (usize, &mut [u8])| {
            let offsets = match map_rows {
                0 => None,
                rows => {
                    let start = (y % rows) * cells;
                    Some(&self.offsets[start..start + cells])
                }
            };
            quantize_row(row, planes, self.config.pixel_width, &self.palette, offsets);
            ticker.tick();
        };

        match self.strategy {
            Parallelism::Par => texture
                .as_mut()
                .par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(&row_fn),
            _ => texture
                .as_mut()
                .chunks_exact_mut(stride)
                .enumerate()
                .for_each(&row_fn),
        }
    }

    fn diffuse(
        &self,
        texture: &mut TextureMutSlice<'_, u8>,
        weights: &KernelWeights,
        progress: &Progress,
    ) {
        let (width, height, planes) = texture.shape();
        let stride = texture.row_stride();
        if stride == 0 || height == 0 {
            return;
        }
        let pixel_width = self.config.pixel_width;
        let cells = self.cells(width);
        let cell_bytes = planes * pixel_width;

        let seeds = texture
            .as_ref()
            .chunks_exact(stride)
            .flat_map(|row| row.chunks(cell_bytes))
            .map(|cell| RGB::from_slice(cell).to_f32())
            .collect();
        let mut plane = DiffusionPlane::new(cells, height, seeds);

        let ticker = progress.ticker(height);
        let indices = error_diffusion::diffuse(
            &mut plane,
            &self.palette,
            weights,
            self.config.serpentine,
            |_| ticker.tick(),
        );

        texture
            .as_mut()
            .chunks_exact_mut(stride)
            .flat_map(|row| row.chunks_mut(cell_bytes))
            .zip(indices)
            .for_each(|(cell, idx)| {
                let color = self.palette.color(idx);
                cell.chunks_exact_mut(planes)
                    .for_each(|pixel| color.write_to(pixel));
            });
    }
}

impl TextureTransform for DitherEngine {
    fn apply<'t>(
        &mut self,
        mut texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        if self.shape != Some(texture.shape()) {
            self.prepare(texture.shape());
        }
        match (self.config.dither, &self.weights) {
            (Dither::Diffusion(_), Some(weights)) => {
                self.diffuse(&mut texture, weights, progress)
            }
            _ => self.quantize_rows(&mut texture, progress),
        }
        texture
    }

    fn prepare(&mut self, shape: Shape) {
        let (width, height, _) = shape;
        let cells = self.cells(width);
        self.strategy = self.parallelism.resolve((width, height));
        self.offsets = match self.config.dither {
            Dither::Ordered(map) => map.tiled_offsets(cells, self.config.strength),
            _ => Vec::new(),
        };
        self.weights = match self.config.dither {
            Dither::Diffusion(kernel) => Some(kernel.weights(self.config.strength)),
            _ => None,
        };
        self.shape = Some(shape);
        tracing::debug!(
            dither = %self.config.dither,
            strength = self.config.strength,
            strategy = self.strategy.name(),
            colors = self.palette.len(),
            "prepared dither engine"
        );
    }
}

/// Flat or ordered mapping of one raster row.
#[inline]
fn quantize_row(
    row: &mut [u8],
    planes: usize,
    pixel_width: usize,
    palette: &Palette,
    offsets: Option<&[f32]>,
) {
    for (cell_x, cell) in row.chunks_mut(planes * pixel_width).enumerate() {
        let mut value = RGB::from_slice(cell).to_f32();
        if let Some(offsets) = offsets {
            let offset = offsets[cell_x];
            value.iter_mut().for_each(|channel| *channel += offset);
        }
        let color = palette.nearest_color(value);
        cell.chunks_exact_mut(planes)
            .for_each(|pixel| color.write_to(pixel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{RgbTexture, Texture};

    fn gradient(width: u32, height: u32, planes: u32) -> Texture<u8> {
        let mut texture = Texture::new(width, height, planes);
        texture
            .as_mut()
            .chunks_exact_mut(planes as usize)
            .enumerate()
            .for_each(|(idx, pixel)| {
                pixel[0] = (idx * 7 % 256) as u8;
                pixel[1] = (idx * 13 % 256) as u8;
                pixel[2] = (idx * 3 % 256) as u8;
                if planes == 4 {
                    pixel[3] = idx as u8;
                }
            });
        texture
    }

    fn engine(dither: Dither, strength: u8, pixel_width: usize) -> DitherEngine {
        let palette = Palette::from_u32(&[0x000000, 0xFF0000, 0x00FF00, 0xFFFFFF]).unwrap();
        DitherEngine::new(
            palette,
            DitherConfig::new(dither, strength, true, pixel_width).unwrap(),
        )
    }

    #[test]
    fn test_selector_indices() {
        for idx in 0..=14 {
            let dither = Dither::from_index(idx).unwrap();
            assert_eq!(dither.index(), idx);
            assert_eq!(dither.name().parse::<Dither>().unwrap(), dither);
        }
        assert!(Dither::from_index(15).is_err());
        assert!("blue_noise".parse::<Dither>().is_err());
        assert_eq!(
            Dither::from_index(6).unwrap(),
            Dither::Diffusion(DiffusionKernel::FloydSteinberg)
        );
    }

    #[test]
    fn test_config_ranges() {
        assert!(DitherConfig::new(Dither::None, 101, false, 1).is_err());
        assert!(DitherConfig::new(Dither::None, 100, false, 3).is_err());
        assert!(DitherConfig::new(Dither::None, 0, false, 2).is_ok());
    }

    #[test]
    fn test_flat_mid_gray() {
        let palette = Palette::new(vec![RGB::BLACK, RGB::WHITE]).unwrap();
        let mut texture = Texture::filled(16, 16, 3, RGB::new(128, 128, 128));
        DitherEngine::new(palette, DitherConfig::default())
            .once(texture.as_texture_mut_slice(), &Progress::none());
        assert!(texture.as_ref().iter().all(|v| *v == 255));
    }

    #[test]
    fn test_cells_share_left_pixel_match() {
        let mut texture = Texture::filled(3, 1, 3, RGB::BLACK);
        texture.as_mut()[3..6].copy_from_slice(&[255, 255, 255]);
        texture.as_mut()[6..9].copy_from_slice(&[250, 0, 0]);

        engine(Dither::None, 100, 2).once(texture.as_texture_mut_slice(), &Progress::none());

        assert_eq!(texture.rgb(0, 0), Some(RGB::BLACK));
        assert_eq!(texture.rgb(1, 0), Some(RGB::BLACK));
        // trailing half cell
        assert_eq!(texture.rgb(2, 0), Some(RGB::new(255, 0, 0)));
    }

    #[test]
    fn test_strength_zero_matches_flat() {
        let source = gradient(21, 9, 4);
        let mut flat = source.clone();
        engine(Dither::None, 100, 2).once(flat.as_texture_mut_slice(), &Progress::none());

        for idx in 1..=14 {
            let mut texture = source.clone();
            engine(Dither::from_index(idx).unwrap(), 0, 2)
                .once(texture.as_texture_mut_slice(), &Progress::none());
            assert_eq!(texture, flat, "{}", Dither::from_index(idx).unwrap());
        }
    }

    #[test]
    fn test_output_stays_in_palette_and_keeps_alpha() {
        let source = gradient(17, 11, 4);
        for idx in 0..=14 {
            let engine = engine(Dither::from_index(idx).unwrap(), 100, 1);
            let palette = engine.palette().clone();
            let mut texture = source.clone();
            engine.once(texture.as_texture_mut_slice(), &Progress::none());

            for (pixel, original) in texture
                .as_ref()
                .chunks_exact(4)
                .zip(source.as_ref().chunks_exact(4))
            {
                assert!(palette.contains(&RGB::from_slice(pixel)));
                assert_eq!(pixel[3], original[3]);
            }
        }
    }

    #[test]
    fn test_seq_and_par_agree() {
        let source = gradient(64, 40, 3);
        for idx in 0..=4 {
            let dither = Dither::from_index(idx).unwrap();
            let mut seq = source.clone();
            let mut par = source.clone();
            engine(dither, 70, 2)
                .with_parallelism(Parallelism::Seq)
                .once(seq.as_texture_mut_slice(), &Progress::none());
            engine(dither, 70, 2)
                .with_parallelism(Parallelism::Par)
                .once(par.as_texture_mut_slice(), &Progress::none());
            assert_eq!(seq, par, "{}", dither);
        }
    }

    #[test]
    fn test_ordered_offsets_shift_matches() {
        // 2x2 map offsets are -77, 25, 76 and -26, so a mid gray splits
        let palette = Palette::new(vec![RGB::BLACK, RGB::WHITE]).unwrap();
        let mut texture = Texture::filled(2, 2, 3, RGB::new(128, 128, 128));
        let config = DitherConfig::new(Dither::Ordered(ThresholdMap::Ordered2x2), 100, false, 1);
        DitherEngine::new(palette, config.unwrap())
            .once(texture.as_texture_mut_slice(), &Progress::none());

        assert_eq!(texture.rgb(0, 0), Some(RGB::BLACK));
        assert_eq!(texture.rgb(1, 0), Some(RGB::WHITE));
        assert_eq!(texture.rgb(0, 1), Some(RGB::WHITE));
        assert_eq!(texture.rgb(1, 1), Some(RGB::BLACK));
    }

    #[test]
    fn test_parallelism_auto() {
        assert_eq!(Parallelism::auto((300, 2000)), Parallelism::Seq);
        assert_eq!(Parallelism::auto((1000, 1000)), Parallelism::Par);
        assert_eq!(Parallelism::Seq.resolve((1000, 1000)), Parallelism::Seq);
    }
}
