//! MSX1 Screen 2: two colors per 8x1 attribute span.

use crate::{
    color_palette::Palette,
    dithering::halftone::HalftoneCluster,
    machines::attribute::{AttributeMachine, CellMut, CellShape, InkPaper, search_ink_paper},
    utils::{num::floor_div, pixel::RGB},
};

const CELL: CellShape = CellShape::new(8, 8);

/// TMS9918 colors 1..=15 as 3 bit levels, sorted by luminance.
const LEVELS: [(u8, u8, u8); 15] = [
    (0, 0, 0),
    (1, 1, 7),
    (5, 1, 1),
    (1, 4, 1),
    (7, 1, 1),
    (2, 3, 7),
    (6, 2, 5),
    (1, 6, 1),
    (7, 3, 3),
    (2, 6, 7),
    (5, 5, 5),
    (3, 7, 3),
    (6, 6, 1),
    (6, 6, 4),
    (7, 7, 7),
];

const LUMS: [i32; 15] = [0, 60, 80, 100, 102, 114, 128, 143, 153, 178, 182, 195, 198, 210, 255];

/// `(11 b + 30 r + 59 g) / 100`
#[inline]
pub fn luma([r, g, b]: [i32; 3]) -> i32 {
    floor_div(11 * b + 30 * r + 59 * g, 100)
}

fn level(v: u8) -> u8 {
    floor_div(v as u32 * 255, 7) as u8
}

pub struct Msx {
    palette: Palette,
    cluster: HalftoneCluster,
}

impl Msx {
    pub fn new(cluster: HalftoneCluster) -> Self {
        Self {
            palette: Palette::from_array(LEVELS.map(|(r, g, b)| RGB::new(level(r), level(g), level(b)))),
            cluster,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Paper/ink pair for one span with the given average color.
    pub fn select(&self, average: [i32; 3]) -> InkPaper {
        let gray = luma(average);
        match search_ink_paper(self.palette.colors(), &LUMS, average, gray, 0) {
            Some(candidate) => candidate.pair,
            None => InkPaper::ink_only(0, LUMS.len() - 1),
        }
    }
}

impl AttributeMachine for Msx {
    fn name(&self) -> &'static str {
        "msx"
    }

    fn cell(&self) -> CellShape {
        CELL
    }

    fn render_cell(&self, cell: &mut CellMut<'_>) {
        for y in 0..CELL.height {
            let pair = self.select(cell.average(y..y + 1));
            for x in 0..CELL.width {
                let lum = luma(cell.rgb(x, y).to_i32());
                let (rx, ry) = cell.raster_xy(x, y);
                let index = pair.pick(lum, self.cluster.value(rx, ry));
                cell.set_rgb(x, y, self.palette.color(index));
            }
        }
    }
}
