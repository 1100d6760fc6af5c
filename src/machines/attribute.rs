//! Attribute cell machines.
//!
//! The raster is cut into a grid of whole cells, each cell is rendered with
//! a handful of colors picked for that cell alone. Cells never read their
//! neighbors, so bands of cell rows can be rendered in parallel.

use itertools::Itertools;
use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};

use crate::{
    dithering::Parallelism,
    texture::{Shape, TextureMutSlice, TextureRef, TextureSlice},
    transform::{progress::Progress, traits::TextureTransform},
    utils::{
        num::{floor_div, whole_cells},
        pixel::RGB,
    },
};

/// Cell size in raster pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellShape {
    pub width: usize,
    pub height: usize,
}

impl CellShape {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Whole cells fitting in a raster. Pixels right of or below the grid are
/// never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub columns: usize,
    pub rows: usize,
    pub cell: CellShape,
}

impl CellGrid {
    pub fn new(width: usize, height: usize, cell: CellShape) -> Self {
        Self {
            columns: whole_cells(width, cell.width),
            rows: whole_cells(height, cell.height),
            cell,
        }
    }

    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raster coordinates of the top left pixel of cell (column, row).
    pub fn origin(&self, column: usize, row: usize) -> (usize, usize) {
        (column * self.cell.width, row * self.cell.height)
    }
}

/// Mutable view of one cell inside a band of full raster rows.
pub struct CellMut<'a> {
    band: &'a mut [u8],
    stride: usize,
    planes: usize,
    column: usize,
    row: usize,
    cell: CellShape,
}

impl<'a> CellMut<'a> {
    fn new(
        band: &'a mut [u8],
        stride: usize,
        planes: usize,
        column: usize,
        row: usize,
        cell: CellShape,
    ) -> Self {
        debug_assert!(band.len() >= stride * cell.height);
        debug_assert!((column + 1) * cell.width * planes <= stride);
        Self {
            band,
            stride,
            planes,
            column,
            row,
            cell,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn shape(&self) -> CellShape {
        self.cell
    }

    /// Raster coordinates of local pixel (x, y).
    #[inline]
    pub fn raster_xy(&self, x: usize, y: usize) -> (usize, usize) {
        (
            self.column * self.cell.width + x,
            self.row * self.cell.height + y,
        )
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.cell.width && y < self.cell.height);
        y * self.stride + (self.column * self.cell.width + x) * self.planes
    }

    /// Color of local pixel (x, y), inside the cell by construction.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> RGB {
        RGB::from_slice(&self.band[self.offset(x, y)..])
    }

    #[inline]
    pub fn set_rgb(&mut self, x: usize, y: usize, color: RGB) {
        let offset = self.offset(x, y);
        color.write_to(&mut self.band[offset..]);
    }

    /// Channel sums over local rows `ys` and every column of the cell, then
    /// floored to the mean.
    pub fn average(&self, ys: std::ops::Range<usize>) -> [i32; 3] {
        let count = (ys.len() * self.cell.width) as i32;
        let mut sum = [0i32; 3];
        for y in ys {
            for x in 0..self.cell.width {
                let color = self.rgb(x, y).to_i32();
                sum.iter_mut().zip(color).for_each(|(s, c)| *s += c);
            }
        }
        sum.map(|s| floor_div(s, count.max(1)))
    }
}

/// Per machine behavior plugged into [AttributeTransform].
pub trait AttributeMachine: Sync {
    fn name(&self) -> &'static str;

    fn cell(&self) -> CellShape;

    /// Image wide pre-pass run once before any cell is rendered.
    fn survey(&mut self, _texture: TextureSlice<'_, u8>, _grid: &CellGrid) {}

    /// Render one cell in place.
    fn render_cell(&self, cell: &mut CellMut<'_>);
}

/// Runs an [AttributeMachine] over every whole cell of a raster.
pub struct AttributeTransform<M: AttributeMachine> {
    machine: M,
    parallelism: Parallelism,
    strategy: Parallelism,
}

impl<M: AttributeMachine> AttributeTransform<M> {
    pub fn new(machine: M) -> Self {
        Self {
            machine,
            parallelism: Parallelism::Auto,
            strategy: Parallelism::Seq,
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }
}

impl<M: AttributeMachine> TextureTransform for AttributeTransform<M> {
    fn apply<'t>(
        &mut self,
        mut texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        let (width, height, planes) = texture.shape();
        let grid = CellGrid::new(width, height, self.machine.cell());
        if grid.is_empty() {
            tracing::debug!(machine = self.machine.name(), "raster smaller than one cell");
            return texture;
        }

        self.machine.survey(texture.as_texture_slice(), &grid);

        let stride = texture.row_stride();
        let band_bytes = stride * grid.cell.height;
        let machine = &self.machine;
        let ticker = progress.ticker(grid.rows);

        let band_fn = |(row, band): (usize, &mut [u8])| {
            for column in 0..grid.columns {
                let mut cell = CellMut::new(&mut *band, stride, planes, column, row, grid.cell);
                machine.render_cell(&mut cell);
            }
            tracing::trace!(row, "rendered cell band");
            ticker.tick();
        };

        let bands = &mut texture.as_mut()[..grid.rows * band_bytes];
        match self.strategy {
            Parallelism::Par => bands
                .par_chunks_exact_mut(band_bytes)
                .enumerate()
                .for_each(&band_fn),
            _ => bands
                .chunks_exact_mut(band_bytes)
                .enumerate()
                .for_each(&band_fn),
        }
        texture
    }

    fn prepare(&mut self, shape: Shape) {
        let (width, height, _) = shape;
        self.strategy = self.parallelism.resolve((width, height));
        tracing::debug!(
            machine = self.machine.name(),
            strategy = self.strategy.name(),
            "prepared attribute transform"
        );
    }
}

/// A (paper, ink) pair with the luminances used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkPaper {
    pub paper: usize,
    pub ink: usize,
    pub paper_lum: i32,
    pub ink_lum: i32,
}

impl InkPaper {
    /// Pair rendering every pixel as ink, for blocks no pair brackets.
    ///
    /// Both luminances sit below any pixel luma, so the threshold is always
    /// exceeded.
    pub fn ink_only(paper: usize, ink: usize) -> Self {
        Self {
            paper,
            ink,
            paper_lum: -1,
            ink_lum: -1,
        }
    }

    /// `paper_lum + cluster * (ink_lum - paper_lum) / 255`
    #[inline]
    pub fn threshold(&self, cluster: i32) -> i32 {
        self.paper_lum + floor_div(cluster * (self.ink_lum - self.paper_lum), 255)
    }

    /// Ink when `lum` reaches the halftone threshold, paper otherwise.
    ///
    /// A pixel at the ink luminance is ink under every cluster entry,
    /// including the top entry where the threshold equals `ink_lum`.
    #[inline]
    pub fn pick(&self, lum: i32, cluster: i32) -> usize {
        if lum >= self.threshold(cluster) {
            self.ink
        } else {
            self.paper
        }
    }
}

/// Candidate produced by [search_ink_paper].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub pair: InkPaper,
    pub distance: i32,
}

/// Exhaustive paper/ink search over one luminance ordered palette tier.
///
/// Only pairs whose luminances bracket `gray` (`lum(paper) <= gray <
/// lum(ink)`) qualify. Each pair blends ink over paper at the ratio `gray`
/// sits between them and is scored by squared distance to `average`. Pairs
/// are visited as `paper = 0..n-1, ink = paper+1..n`; the first minimum wins.
/// `offset` is added to the returned indices.
pub fn search_ink_paper(
    colors: &[RGB],
    lums: &[i32],
    average: [i32; 3],
    gray: i32,
    offset: usize,
) -> Option<Candidate> {
    debug_assert_eq!(colors.len(), lums.len());
    let mut best: Option<Candidate> = None;
    for (paper, ink) in (0..colors.len()).tuple_combinations() {
        let (paper_lum, ink_lum) = (lums[paper], lums[ink]);
        if !(paper_lum <= gray && gray < ink_lum) {
            continue;
        }
        let ratio = floor_div((gray - paper_lum) * 255, ink_lum - paper_lum);
        let blend = blend(colors[paper], colors[ink], ratio);
        let distance = blend
            .iter()
            .zip(average)
            .map(|(b, a)| (b - a) * (b - a))
            .sum();
        if best.is_none_or(|best| distance < best.distance) {
            best = Some(Candidate {
                pair: InkPaper {
                    paper: paper + offset,
                    ink: ink + offset,
                    paper_lum,
                    ink_lum,
                },
                distance,
            });
        }
    }
    best
}

/// `(ink * ratio + paper * (255 - ratio)) / 255` per channel.
#[inline]
pub fn blend(paper: RGB, ink: RGB, ratio: i32) -> [i32; 3] {
    let (paper, ink) = (paper.to_i32(), ink.to_i32());
    [0, 1, 2].map(|c| floor_div(ink[c] * ratio + paper[c] * (255 - ratio), 255))
}
