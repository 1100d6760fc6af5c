//! ZX Spectrum: one paper/ink pair and a bright flag per 8x8 cell.
//!
//! Palette indices carry the hardware attribute bits (blue = 1, red = 2,
//! green = 4), indices 8..16 are the bright tier.

use std::{fmt::Display, str::FromStr};

use crate::{
    color_palette::Palette,
    dithering::halftone::HalftoneCluster,
    error::{Error, Result},
    machines::attribute::{AttributeMachine, CellMut, CellShape, InkPaper, search_ink_paper},
    utils::{num::floor_div, pixel::RGB},
};

const CELL: CellShape = CellShape::new(8, 8);
const NORMAL: u8 = 0xB4;
const BRIGHT: u8 = 0xFF;

pub const DEFAULT_BRIGHT_EDGE: u8 = 180;
pub const DEFAULT_SATURATION: u8 = 30;

/// `(b + 3 r + 6 g) / 10`
#[inline]
pub fn luma([r, g, b]: [i32; 3]) -> i32 {
    floor_div(b + 3 * r + 6 * g, 10)
}

fn tier(level: u8) -> [RGB; 8] {
    std::array::from_fn(|attr| {
        let on = |bit: usize| if attr & bit != 0 { level } else { 0 };
        RGB::new(on(2), on(4), on(1))
    })
}

/// How a cell picks its attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZxSelector {
    #[default]
    /// Exhaustive paper/ink search inside each brightness tier.
    Search,
    /// Closed form pick from the mirrored cell average.
    Saturation { bright_edge: u8, saturation: u8 },
}

impl ZxSelector {
    pub fn saturation(bright_edge: u8, saturation: u8) -> Self {
        ZxSelector::Saturation {
            bright_edge,
            saturation,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZxSelector::Search => "search",
            ZxSelector::Saturation { .. } => "saturation",
        }
    }
}

impl FromStr for ZxSelector {
    type Err = Error;

    /// Saturation parameters start at their defaults.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "search" => Ok(ZxSelector::Search),
            "saturation" => Ok(ZxSelector::saturation(
                DEFAULT_BRIGHT_EDGE,
                DEFAULT_SATURATION,
            )),
            other => Err(Error::invalid("zx_selector", other)),
        }
    }
}

impl Display for ZxSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub struct ZxSpectrum {
    palette: Palette,
    lums: [i32; 16],
    cluster: HalftoneCluster,
    selector: ZxSelector,
}

impl ZxSpectrum {
    pub fn new(cluster: HalftoneCluster, selector: ZxSelector) -> Self {
        let (normal, bright) = (tier(NORMAL), tier(BRIGHT));
        let mut colors = [RGB::BLACK; 16];
        colors[..8].copy_from_slice(&normal);
        colors[8..].copy_from_slice(&bright);
        Self {
            palette: Palette::from_array(colors),
            lums: colors.map(|color| luma(color.to_i32())),
            cluster,
            selector,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn selector(&self) -> ZxSelector {
        self.selector
    }

    /// Cell attribute for the given cell average.
    pub fn select(&self, average: [i32; 3]) -> InkPaper {
        match self.selector {
            ZxSelector::Search => self.search(average),
            ZxSelector::Saturation {
                bright_edge,
                saturation,
            } => saturation_select(average, bright_edge, saturation),
        }
    }

    // the bright flag is per cell, so pairs come from a single tier
    fn search(&self, average: [i32; 3]) -> InkPaper {
        let gray = luma(average);
        let colors = self.palette.colors();
        let normal = search_ink_paper(&colors[..8], &self.lums[..8], average, gray, 0);
        let bright = search_ink_paper(&colors[8..], &self.lums[8..], average, gray, 8);
        let best = match (normal, bright) {
            (Some(normal), Some(bright)) if bright.distance < normal.distance => Some(bright),
            (Some(normal), _) => Some(normal),
            (None, bright) => bright,
        };
        match best {
            Some(candidate) => candidate.pair,
            None => InkPaper::ink_only(8, 15),
        }
    }
}

/// Attribute lum as the hardware ramps it: `(v + (v & 6) / 2) * 255 / 10`.
fn attribute_lum(attr: usize, half_bright: bool, bright_edge: i32) -> i32 {
    let v = attr as i32;
    let lum = floor_div((v + floor_div(v & 6, 2)) * 255, 10);
    if half_bright {
        floor_div(lum * bright_edge, 255)
    } else {
        lum
    }
}

/// Closed form attribute pick.
///
/// Channels above half the amplitude are mirrored and flagged in an
/// inversion mask; the ink hue comes from comparing the mirrored channels
/// against `saturation` percent of each other.
pub fn saturation_select(average: [i32; 3], bright_edge: u8, saturation: u8) -> InkPaper {
    let [mut r, mut g, mut b] = average;
    let edge = bright_edge as i32;
    let half_bright = r < edge && g < edge && b < edge;
    let amplitude = if half_bright { edge } else { 255 };
    let half = floor_div(amplitude, 2);

    let mut mask = 0usize;
    for (channel, bit) in [(&mut b, 1), (&mut r, 2), (&mut g, 4)] {
        if *channel > half {
            *channel = amplitude - *channel;
            mask |= bit;
        }
    }

    let sat = saturation as i32;
    let (hr, hg, hb) = (
        floor_div(r * sat, 100),
        floor_div(g * sat, 100),
        floor_div(b * sat, 100),
    );

    // later rules override earlier ones
    let mut hue = 7;
    if (r > hb && g <= hb) || (b <= hr && g <= hr) {
        hue = 3;
    }
    if (g > hb && r <= hb) || (b <= hg && r <= hg) {
        hue = 5;
    }
    if (g > hr && b <= hr) || (r <= hg && b <= hg) {
        hue = 6;
    }
    if r <= hb && g <= hb {
        hue = 1;
    }
    if b <= hr && g <= hr {
        hue = 2;
    }
    if b <= hg && r <= hg {
        hue = 4;
    }

    let (mut ink, mut paper) = (hue ^ mask, mask);
    if ink < paper {
        std::mem::swap(&mut ink, &mut paper);
    }
    let tier = if half_bright { 0 } else { 8 };
    InkPaper {
        paper: paper + tier,
        ink: ink + tier,
        paper_lum: attribute_lum(paper, half_bright, edge),
        ink_lum: attribute_lum(ink, half_bright, edge),
    }
}

impl AttributeMachine for ZxSpectrum {
    fn name(&self) -> &'static str {
        "zx_spectrum"
    }

    fn cell(&self) -> CellShape {
        CELL
    }

    fn render_cell(&self, cell: &mut CellMut<'_>) {
        let pair = self.select(cell.average(0..CELL.height));
        for y in 0..CELL.height {
            for x in 0..CELL.width {
                let lum = luma(cell.rgb(x, y).to_i32());
                let (rx, ry) = cell.raster_xy(x, y);
                let index = pair.pick(lum, self.cluster.value(rx, ry));
                cell.set_rgb(x, y, self.palette.color(index));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        machines::attribute::AttributeTransform,
        texture::{RgbTexture, RgbTextureMut, Texture},
        transform::prelude::*,
    };

    fn search() -> ZxSpectrum {
        ZxSpectrum::new(HalftoneCluster::One, ZxSelector::Search)
    }

    #[test]
    fn test_palette_attribute_bits() {
        let zx = search();
        assert_eq!(zx.palette().color(1), RGB::new(0, 0, 0xB4));
        assert_eq!(zx.palette().color(2), RGB::new(0xB4, 0, 0));
        assert_eq!(zx.palette().color(4), RGB::new(0, 0xB4, 0));
        assert_eq!(zx.palette().color(14), RGB::new(0xFF, 0xFF, 0));
        assert_eq!(zx.lums[..8], [0, 18, 54, 72, 108, 126, 162, 180]);
        assert_eq!(zx.lums[8..], [0, 25, 76, 102, 153, 178, 229, 255]);
    }

    #[test]
    fn test_search_picks_exact_bright_blue() {
        let pair = search().select([0, 0, 255]);
        assert_eq!((pair.paper, pair.ink), (9, 10));
    }

    #[test]
    fn test_search_never_mixes_tiers() {
        let zx = search();
        for average in [[200, 10, 10], [90, 180, 30], [12, 12, 12], [250, 250, 10]] {
            let pair = zx.select(average);
            assert_eq!(pair.paper / 8, pair.ink / 8, "{average:?}");
            assert!(pair.paper_lum < pair.ink_lum);
        }
    }

    #[test]
    fn test_search_falls_back_to_bright_black_white() {
        let pair = search().select([255, 255, 255]);
        assert_eq!((pair.paper, pair.ink), (8, 15));
        for cluster in [HalftoneCluster::One, HalftoneCluster::Two] {
            for (x, y) in [(0, 0), (3, 0), (1, 2)] {
                assert_eq!(pair.pick(255, cluster.value(x, y)), 15, "{cluster}");
            }
        }
    }

    #[test]
    fn test_saturation_black_cell() {
        let pair = saturation_select([0, 0, 0], 180, 30);
        assert_eq!((pair.paper, pair.ink), (0, 4));
        // green ramps to 153, scaled down for half bright
        assert_eq!((pair.paper_lum, pair.ink_lum), (0, 108));
    }

    #[test]
    fn test_saturation_white_cell() {
        let pair = saturation_select([255, 255, 255], 180, 30);
        assert_eq!((pair.paper, pair.ink), (11, 15));
        assert_eq!((pair.paper_lum, pair.ink_lum), (102, 255));
    }

    #[test]
    fn test_flat_cells_render_their_color() {
        for selector in [ZxSelector::Search, ZxSelector::saturation(180, 30)] {
            let mut texture = Texture::filled(16, 8, 4, RGB::WHITE);
            for y in 0..8 {
                for x in 8..16 {
                    texture.set_rgb(x, y, RGB::BLACK);
                }
            }
            AttributeTransform::new(ZxSpectrum::new(HalftoneCluster::One, selector))
                .once(texture.as_texture_mut_slice(), &Progress::none());
            assert_eq!(texture.rgb(3, 3), Some(RGB::WHITE), "{selector}");
            assert_eq!(texture.rgb(12, 5), Some(RGB::BLACK), "{selector}");
        }
    }

    #[test]
    fn test_selector_names() {
        assert_eq!("search".parse::<ZxSelector>().unwrap(), ZxSelector::Search);
        assert_eq!(
            "saturation".parse::<ZxSelector>().unwrap(),
            ZxSelector::saturation(180, 30)
        );
        assert!("bright".parse::<ZxSelector>().is_err());
    }
}
