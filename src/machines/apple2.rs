//! Apple II hi-res color, approximated from composite video artifacts.
//!
//! Each row is first encoded into a line of lit/unlit dots plus a high bit
//! per 7 pixel group, then rebuilt from the artifact colors those dots
//! produce. Rows are independent but processed in order.

use crate::{
    dithering::halftone::HalftoneCluster,
    texture::{Shape, TextureMutSlice, TextureRef},
    transform::prelude::*,
    utils::{num::whole_cells, pixel::RGB},
};

const MAGENTA: RGB = RGB::new(0xFF, 0x00, 0xFF);
const GREEN: RGB = RGB::new(0x00, 0xFF, 0x00);
const BLUE: RGB = RGB::new(0x00, 0x00, 0xFF);
const ORANGE: RGB = RGB::new(0xFF, 0x7F, 0x00);

/// Indexed by `b + 2 r + 4 g`.
const DOT_COLORS: [RGB; 8] = [
    RGB::BLACK,
    RGB::new(0x00, 0x00, 0xFF),
    RGB::new(0xFF, 0x00, 0x00),
    RGB::new(0xFF, 0x00, 0xFF),
    RGB::new(0x00, 0xFF, 0x00),
    RGB::new(0x00, 0xFF, 0xFF),
    RGB::new(0xFF, 0xFF, 0x00),
    RGB::WHITE,
];

/// (artifact phase, fill weight) per primary `4 g + 2 r + b`.
const PRIMARIES: [(u8, u32); 8] = [
    (0, 1),
    (1, 2),
    (2, 2),
    (1, 0),
    (2, 0),
    (1, 2),
    (2, 2),
    (3, 1),
];

const GROUP: usize = 7;
/// Groups whose fill weight reaches this are drawn with the high palette.
const HIGH_FILL: u32 = 8;

/// Per-pixel reduction to the eight binary RGB colors.
#[derive(Debug, Clone, Copy)]
pub struct HalftonePass {
    cluster: HalftoneCluster,
}

impl HalftonePass {
    pub fn new(cluster: HalftoneCluster) -> Self {
        Self { cluster }
    }
}

impl TextureTransform for HalftonePass {
    fn apply<'t>(
        &mut self,
        mut texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        let (_, height, planes) = texture.shape();
        let stride = texture.row_stride();
        if stride == 0 {
            return texture;
        }
        let ticker = progress.ticker(height);
        for (y, row) in texture.as_mut().chunks_exact_mut(stride).enumerate() {
            for (x, pixel) in row.chunks_exact_mut(planes).enumerate() {
                let threshold = self.cluster.value(x, y);
                let bit = |channel: u8| (channel as i32 > threshold) as usize;
                let index = bit(pixel[2]) + 2 * bit(pixel[0]) + 4 * bit(pixel[1]);
                DOT_COLORS[index].write_to(pixel);
            }
            ticker.tick();
        }
        texture
    }

    fn prepare(&mut self, _shape: Shape) {}
}

/// Scanline state shared by the encode and reconstruct passes.
#[derive(Debug, Clone)]
pub struct CompositeContext {
    width: usize,
    planes: usize,
    groups: usize,
    dots: Vec<bool>,
    high: Vec<bool>,
}

impl CompositeContext {
    pub fn new(shape: Shape) -> Self {
        let (width, _, planes) = shape;
        let groups = whole_cells(width, GROUP) + 2;
        Self {
            width,
            planes,
            groups,
            dots: vec![true; width],
            high: vec![false; groups],
        }
    }

    pub fn groups(&self) -> usize {
        self.groups
    }

    fn reset(&mut self) {
        self.dots.fill(true);
        self.high.fill(false);
    }

    #[inline]
    fn lit(&self, x: usize) -> bool {
        self.dots.get(x).copied().unwrap_or(false)
    }

    #[inline]
    fn clear(&mut self, x: usize) {
        if let Some(dot) = self.dots.get_mut(x) {
            *dot = false;
        }
    }

    #[inline]
    fn pixel(&self, row: &[u8], x: usize) -> RGB {
        if x < self.width {
            RGB::from_slice(&row[x * self.planes..])
        } else {
            RGB::BLACK
        }
    }

    #[inline]
    fn set_pixel(&self, row: &mut [u8], x: usize, color: RGB) {
        if x < self.width {
            color.write_to(&mut row[x * self.planes..]);
        }
    }

    /// Encodes one raster row into the dot line and group high bits.
    pub fn encode(&mut self, row: &[u8]) {
        self.reset();
        for group in 0..self.groups {
            let mut fill = 0;
            for x in group * GROUP..(group + 1) * GROUP {
                let color = self.pixel(row, x);
                let primary = (color.g >= 128) as usize * 4
                    + (color.r >= 128) as usize * 2
                    + (color.b >= 128) as usize;
                let (phase, weight) = PRIMARIES[primary];
                if x % 2 == 0 {
                    if phase == 0 || phase == 2 {
                        self.clear(x);
                    }
                    if phase == 0 || phase == 1 {
                        self.clear(x + 1);
                    }
                }
                fill += weight;
            }
            // the flag line is only as wide as the raster
            self.high[group] = fill >= HIGH_FILL && group < self.width;
        }
    }

    /// Rebuilds one raster row from the encoded dots. Alpha is kept.
    pub fn reconstruct(&self, row: &mut [u8]) {
        let width = self.width;
        for x in 0..width {
            self.set_pixel(row, x, RGB::BLACK);
        }

        for x in 0..width {
            if self.lit(x) {
                let phase = if x % 2 == 0 { MAGENTA } else { GREEN };
                self.set_pixel(row, x, phase);
            }
        }
        // a lit pair two apart fills the gap with the left dot's phase
        for x in (0..width.saturating_sub(2)).step_by(2) {
            if self.lit(x) && self.lit(x + 2) {
                self.set_pixel(row, x + 1, MAGENTA);
            }
        }
        for x in (1..width.saturating_sub(2)).step_by(2) {
            if self.lit(x) && self.lit(x + 2) {
                self.set_pixel(row, x + 1, GREEN);
            }
        }
        for x in 1..width.saturating_sub(1) {
            if self.lit(x) && self.lit(x + 1) {
                self.set_pixel(row, x, RGB::WHITE);
                self.set_pixel(row, x + 1, RGB::WHITE);
            }
        }
        for x in 1..width.saturating_sub(2) {
            if self.pixel(row, x) == RGB::WHITE
                && self.pixel(row, x + 2) == RGB::WHITE
                && self.pixel(row, x + 1) != RGB::WHITE
            {
                self.set_pixel(row, x + 1, RGB::BLACK);
            }
        }

        for group in (0..self.groups).filter(|group| self.high[*group]) {
            for x in group * GROUP..((group + 1) * GROUP).min(width) {
                match self.pixel(row, x) {
                    MAGENTA => self.set_pixel(row, x, BLUE),
                    GREEN => self.set_pixel(row, x, ORANGE),
                    _ => {}
                }
            }
        }
    }
}

/// Composite artifact pass. Strictly sequential by row.
#[derive(Debug, Default)]
pub struct CompositeTransform {
    context: Option<CompositeContext>,
}

impl CompositeTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextureTransform for CompositeTransform {
    fn apply<'t>(
        &mut self,
        mut texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        let shape = texture.shape();
        let stride = texture.row_stride();
        if stride == 0 {
            return texture;
        }
        let stale = self
            .context
            .as_ref()
            .is_none_or(|context| context.width != shape.0 || context.planes != shape.2);
        if stale {
            self.prepare(shape);
        }
        let Some(context) = self.context.as_mut() else {
            return texture;
        };

        let ticker = progress.ticker(shape.1);
        for (y, row) in texture.as_mut().chunks_exact_mut(stride).enumerate() {
            context.encode(row);
            context.reconstruct(row);
            tracing::trace!(y, "composite row");
            ticker.tick();
        }
        texture
    }

    fn prepare(&mut self, shape: Shape) {
        self.context = Some(CompositeContext::new(shape));
        tracing::debug!(
            width = shape.0,
            groups = whole_cells(shape.0, GROUP) + 2,
            "prepared composite context"
        );
    }
}

/// The full Apple II filter, with or without the binary dot pass.
pub enum Apple2Transform {
    Composite(CompositeTransform),
    Halftoned(Pipeline<HalftonePass, CompositeTransform>),
}

impl Apple2Transform {
    pub fn new(halftone: Option<HalftoneCluster>) -> Self {
        match halftone {
            Some(cluster) => {
                Apple2Transform::Halftoned(HalftonePass::new(cluster).pipe(CompositeTransform::new()))
            }
            None => Apple2Transform::Composite(CompositeTransform::new()),
        }
    }
}

impl TextureTransform for Apple2Transform {
    fn apply<'t>(
        &mut self,
        texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        match self {
            Apple2Transform::Composite(t) => t.apply(texture, progress),
            Apple2Transform::Halftoned(t) => t.apply(texture, progress),
        }
    }

    fn prepare(&mut self, shape: Shape) {
        match self {
            Apple2Transform::Composite(t) => t.prepare(shape),
            Apple2Transform::Halftoned(t) => t.prepare(shape),
        }
    }
}
