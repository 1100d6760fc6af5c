//! Commodore 64 multicolor low resolution.
//!
//! Hardware pixels are two raster pixels wide, cells are 4x8 hardware
//! pixels. Every cell shares one image wide background color and picks
//! three more of its own.

use crate::{
    color_palette::Palette,
    machines::attribute::{AttributeMachine, CellGrid, CellMut, CellShape},
    texture::{RgbTexture, TextureSlice},
    utils::{num::floor_div, pixel::RGB},
};

/// 4 bit per channel `0xRGB` colors, in hardware order.
const COLOUR_IDS: [u16; 16] = [
    0x000, 0xFFF, 0x931, 0x5BD, 0x93C, 0x4A1, 0x32C, 0xBD3, 0x950, 0x440, 0xC64, 0x444, 0x777,
    0x8E5, 0x75F, 0x999,
];

const CELL: CellShape = CellShape::new(8, 8);
const DEFAULT_BACKGROUND: usize = 15;
/// Cells with at least this many colors vote for the background.
const CROWDED_CELL: usize = 4;

type Histogram = [u32; 16];

fn nibbles(id: u16) -> [i32; 3] {
    [(id >> 8) as i32 & 15, (id >> 4) as i32 & 15, id as i32 & 15]
}

pub struct C64 {
    palette: Palette,
    /// same colors in 4 bit space, used for classification
    nibble_palette: Palette,
    lums: [i32; 16],
    background: usize,
    columns: usize,
    cell_palettes: Vec<[usize; 4]>,
}

impl C64 {
    pub fn new() -> Self {
        let colors = COLOUR_IDS.map(|id| {
            let [r, g, b] = nibbles(id);
            RGB::new((r * 17) as u8, (g * 17) as u8, (b * 17) as u8)
        });
        let nibble_colors = COLOUR_IDS.map(|id| {
            let [r, g, b] = nibbles(id);
            RGB::new(r as u8, g as u8, b as u8)
        });
        let lums = COLOUR_IDS.map(|id| {
            let [r, g, b] = nibbles(id);
            floor_div(b * 11 + g * 59 + r * 30, 15)
        });
        Self {
            palette: Palette::from_array(colors),
            nibble_palette: Palette::from_array(nibble_colors),
            lums,
            background: DEFAULT_BACKGROUND,
            columns: 0,
            cell_palettes: Vec::new(),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Image wide background chosen by the last survey.
    pub fn background(&self) -> usize {
        self.background
    }

    pub fn cell_palette(&self, column: usize, row: usize) -> [usize; 4] {
        self.cell_palettes[row * self.columns + column]
    }

    /// Nearest hardware color in 4 bit per channel space.
    #[inline]
    pub fn classify(&self, color: RGB) -> usize {
        self.nibble_palette.nearest([
            (color.r >> 4) as f32,
            (color.g >> 4) as f32,
            (color.b >> 4) as f32,
        ])
    }

    fn histogram(&self, texture: &TextureSlice<'_, u8>, grid: &CellGrid, column: usize, row: usize) -> Histogram {
        let (x0, y0) = grid.origin(column, row);
        let mut histogram = [0; 16];
        for y in 0..CELL.height {
            for x in (0..CELL.width).step_by(2) {
                let color = texture.rgb_or_black((x0 + x) as isize, (y0 + y) as isize);
                histogram[self.classify(color)] += 1;
            }
        }
        histogram
    }
}

impl Default for C64 {
    fn default() -> Self {
        Self::new()
    }
}

/// Color present in the most crowded cells. Ties go to the highest index,
/// no crowded cell at all gives [DEFAULT_BACKGROUND].
pub fn select_background(histograms: &[Histogram]) -> usize {
    let mut votes = [0u32; 16];
    for histogram in histograms {
        let distinct = histogram.iter().filter(|count| **count > 0).count();
        if distinct >= CROWDED_CELL {
            histogram
                .iter()
                .zip(votes.iter_mut())
                .filter(|(count, _)| **count > 0)
                .for_each(|(_, vote)| *vote += 1);
        }
    }

    let mut background = DEFAULT_BACKGROUND;
    let mut best = 0;
    for color in (0..16).rev() {
        if votes[color] > best {
            best = votes[color];
            background = color;
        }
    }
    background
}

/// Background first, then the three most frequent other colors (ties to
/// the lowest index). Slots with nothing left repeat the background.
pub fn select_cell_palette(histogram: &Histogram, background: usize) -> [usize; 4] {
    let mut counts = *histogram;
    counts[background] = 0;
    // unfilled slots could be black as well, a repeated background never
    // wins the first-on-ties luminance pick
    let mut slots = [background; 4];
    for slot in slots.iter_mut().skip(1) {
        let mut best = 0;
        for (color, count) in counts.iter().enumerate() {
            if *count > best {
                best = *count;
                *slot = color;
            }
        }
        if best == 0 {
            break;
        }
        counts[*slot] = 0;
    }
    slots
}

impl AttributeMachine for C64 {
    fn name(&self) -> &'static str {
        "c64"
    }

    fn cell(&self) -> CellShape {
        CELL
    }

    fn survey(&mut self, texture: TextureSlice<'_, u8>, grid: &CellGrid) {
        let histograms: Vec<Histogram> = (0..grid.rows)
            .flat_map(|row| (0..grid.columns).map(move |column| (column, row)))
            .map(|(column, row)| self.histogram(&texture, grid, column, row))
            .collect();

        self.background = select_background(&histograms);
        self.columns = grid.columns;
        self.cell_palettes = histograms
            .iter()
            .map(|histogram| select_cell_palette(histogram, self.background))
            .collect();
        tracing::debug!(
            background = self.background,
            color = %self.palette.color(self.background),
            cells = histograms.len(),
            "c64 background"
        );
    }

    fn render_cell(&self, cell: &mut CellMut<'_>) {
        let slots = self.cell_palette(cell.column(), cell.row());
        let slot_lums = slots.map(|color| self.lums[color]);
        for y in 0..CELL.height {
            for x in (0..CELL.width).step_by(2) {
                let lum = self.lums[self.classify(cell.rgb(x, y))];
                let mut slot = 0;
                let mut best = i32::MAX;
                for (idx, slot_lum) in slot_lums.iter().enumerate() {
                    let diff = (lum - slot_lum).abs();
                    if diff < best {
                        best = diff;
                        slot = idx;
                    }
                }
                let color = self.palette.color(slots[slot]);
                cell.set_rgb(x, y, color);
                cell.set_rgb(x + 1, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(pairs: &[(usize, u32)]) -> Histogram {
        let mut histogram = [0; 16];
        pairs.iter().for_each(|(color, count)| histogram[*color] = *count);
        histogram
    }

    #[test]
    fn test_palette_and_luminance() {
        let c64 = C64::new();
        assert_eq!(c64.palette().color(0), RGB::BLACK);
        assert_eq!(c64.palette().color(1), RGB::WHITE);
        assert_eq!(c64.palette().color(2), RGB::new(153, 51, 17));
        assert_eq!(c64.lums[1], 100);
        // 0x931: (1 * 11 + 3 * 59 + 9 * 30) / 15
        assert_eq!(c64.lums[2], 30);
    }

    #[test]
    fn test_classify_in_nibble_space() {
        let c64 = C64::new();
        assert_eq!(c64.classify(RGB::new(0x0F, 0x0F, 0x0F)), 0);
        assert_eq!(c64.classify(RGB::WHITE), 1);
        // 0x777 and 0x444 are both gray, 0x70 lands on 0x777
        assert_eq!(c64.classify(RGB::new(0x70, 0x70, 0x70)), 12);
    }

    #[test]
    fn test_background_needs_crowded_cells() {
        let sparse = histogram(&[(3, 10), (5, 22)]);
        assert_eq!(select_background(&[sparse]), DEFAULT_BACKGROUND);

        let crowded = histogram(&[(0, 8), (2, 8), (6, 8), (9, 8)]);
        let other = histogram(&[(2, 1), (6, 1), (9, 1), (11, 29)]);
        // 2, 6 and 9 tie on two cells each, the highest index wins
        assert_eq!(select_background(&[crowded, other, sparse]), 9);
    }

    #[test]
    fn test_cell_palette_slots() {
        let cell = histogram(&[(0, 5), (4, 12), (7, 5), (9, 10)]);
        assert_eq!(select_cell_palette(&cell, 9), [9, 4, 0, 7]);

        let plain = histogram(&[(6, 32)]);
        assert_eq!(select_cell_palette(&plain, 1), [1, 6, 1, 1]);
        assert_eq!(select_cell_palette(&plain, 6), [6, 6, 6, 6]);
    }
}
