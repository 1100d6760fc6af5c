pub mod matrices;

use std::fmt::Display;

use crate::{
    color_palette::Palette,
    dithering::error_diffusion::matrices::{
        BURKES, FALSE_FLOYD_STEINBERG, FAN, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE, SHIAU_FAN,
        SIERRA_2_4A, SIERRA2, SIERRA3, STUCKI,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffusionKernel {
    FalseFloydSteinberg,
    FloydSteinberg,
    Stucki,
    Burkes,
    JarvisJudiceNinke,
    Sierra3,
    Sierra2,
    Sierra24A,
    Fan,
    ShiauFan,
}

impl DiffusionKernel {
    pub const ALL: [DiffusionKernel; 10] = [
        DiffusionKernel::FalseFloydSteinberg,
        DiffusionKernel::FloydSteinberg,
        DiffusionKernel::Stucki,
        DiffusionKernel::Burkes,
        DiffusionKernel::JarvisJudiceNinke,
        DiffusionKernel::Sierra3,
        DiffusionKernel::Sierra2,
        DiffusionKernel::Sierra24A,
        DiffusionKernel::Fan,
        DiffusionKernel::ShiauFan,
    ];

    /// Raw integer weights, row 0 holds the current cell.
    pub fn matrix(&self) -> &'static [&'static [u8]] {
        match self {
            DiffusionKernel::FalseFloydSteinberg => &FALSE_FLOYD_STEINBERG,
            DiffusionKernel::FloydSteinberg => &FLOYD_STEINBERG,
            DiffusionKernel::Stucki => &STUCKI,
            DiffusionKernel::Burkes => &BURKES,
            DiffusionKernel::JarvisJudiceNinke => &JARVIS_JUDICE_NINKE,
            DiffusionKernel::Sierra3 => &SIERRA3,
            DiffusionKernel::Sierra2 => &SIERRA2,
            DiffusionKernel::Sierra24A => &SIERRA_2_4A,
            DiffusionKernel::Fan => &FAN,
            DiffusionKernel::ShiauFan => &SHIAU_FAN,
        }
    }

    /// Column of the current cell in row 0.
    pub fn origin(&self) -> usize {
        self.matrix()[0].len() / 2
    }

    /// Sum of all weights.
    pub fn divisor(&self) -> u32 {
        self.matrix()
            .iter()
            .flat_map(|row| row.iter())
            .map(|w| *w as u32)
            .sum()
    }

    /// `(weight / divisor) * strength / 100` for every entry.
    pub fn weights(&self, strength: u8) -> KernelWeights {
        let matrix = self.matrix();
        let width = matrix[0].len();
        let divisor = self.divisor();
        let scale = strength as f32 / 100.0;
        let weights = matrix
            .iter()
            .flat_map(|row| row.iter())
            .map(|w| match divisor {
                0 => 0.0,
                divisor => (*w as f32 / divisor as f32) * scale,
            })
            .collect();
        KernelWeights {
            width,
            height: matrix.len(),
            origin: self.origin(),
            weights,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiffusionKernel::FalseFloydSteinberg => "false_floyd_steinberg",
            DiffusionKernel::FloydSteinberg => "floyd_steinberg",
            DiffusionKernel::Stucki => "stucki",
            DiffusionKernel::Burkes => "burkes",
            DiffusionKernel::JarvisJudiceNinke => "jarvis_judice_ninke",
            DiffusionKernel::Sierra3 => "sierra3",
            DiffusionKernel::Sierra2 => "sierra2",
            DiffusionKernel::Sierra24A => "sierra_2_4a",
            DiffusionKernel::Fan => "fan",
            DiffusionKernel::ShiauFan => "shiau_fan",
        }
    }
}

impl Display for DiffusionKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Normalized kernel, ready to spread error.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelWeights {
    width: usize,
    height: usize,
    origin: usize,
    weights: Vec<f32>,
}

impl KernelWeights {
    /// Weight for kernel entry (qx, qy). Right-to-left rows read the kernel
    /// mirrored.
    #[inline]
    pub fn weight(&self, qx: usize, qy: usize, mirrored: bool) -> f32 {
        let qx = if mirrored { self.width - 1 - qx } else { qx };
        self.weights[qy * self.width + qx]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// One working value per cell, row major, `f32` per channel.
#[derive(Debug, Clone)]
pub struct DiffusionPlane {
    cells: usize,
    rows: usize,
    values: Vec<[f32; 3]>,
}

impl DiffusionPlane {
    pub fn new(cells: usize, rows: usize, values: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(values.len(), cells * rows);
        Self {
            cells,
            rows,
            values,
        }
    }

    #[inline]
    pub fn get(&self, cell: usize, row: usize) -> [f32; 3] {
        self.values[row * self.cells + cell]
    }

    pub fn values(&self) -> &[[f32; 3]] {
        &self.values
    }

    /// Add `error * weight` to a cell, clamping each channel to [0, 255].
    /// Cells outside the plane are skipped.
    #[inline]
    fn spread(&mut self, cell: isize, row: usize, error: [f32; 3], weight: f32) {
        if cell < 0 || cell as usize >= self.cells || row >= self.rows {
            return;
        }
        let value = &mut self.values[row * self.cells + cell as usize];
        for (channel, error) in value.iter_mut().zip(error) {
            *channel = (*channel + error * weight).clamp(0.0, 255.0);
        }
    }
}

/// Error diffusion over a whole plane, visiting rows top to bottom.
///
/// With `serpentine`, odd rows run right to left. Returns the palette index
/// of every cell, row major; `row_done` is called after each row.
pub fn diffuse(
    plane: &mut DiffusionPlane,
    palette: &Palette,
    weights: &KernelWeights,
    serpentine: bool,
    row_done: impl FnMut(usize),
) -> Vec<usize> {
    diffuse_from(plane, palette, weights, serpentine, false, row_done)
}

/// [diffuse] where row 0 may already run right to left.
pub(crate) fn diffuse_from(
    plane: &mut DiffusionPlane,
    palette: &Palette,
    weights: &KernelWeights,
    serpentine: bool,
    start_reversed: bool,
    mut row_done: impl FnMut(usize),
) -> Vec<usize> {
    let (cells, rows) = (plane.cells, plane.rows);
    let origin = weights.origin() as isize;
    let mut indices = vec![0; cells * rows];

    for y in 0..rows {
        let reversed = serpentine && ((y % 2 == 1) != start_reversed);
        for step in 0..cells {
            let cell = if reversed { cells - 1 - step } else { step };
            let value = plane.get(cell, y);
            let idx = palette.nearest(value);
            indices[y * cells + cell] = idx;

            let matched = palette.color(idx).to_f32();
            let error = [
                value[0] - matched[0],
                value[1] - matched[1],
                value[2] - matched[2],
            ];

            for qy in 0..weights.height() {
                for qx in 0..weights.width() {
                    let weight = weights.weight(qx, qy, reversed);
                    if weight == 0.0 {
                        continue;
                    }
                    let target = cell as isize + qx as isize - origin;
                    plane.spread(target, y + qy, error, weight);
                }
            }
        }
        row_done(y);
    }

    indices
}
