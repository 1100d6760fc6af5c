pub mod matrices;

use std::fmt::Display;

use crate::{
    dithering::threshold::matrices::{
        ORDERED_2X2, ORDERED_2X2_DIV, ORDERED_3X3, ORDERED_3X3_DIV, ORDERED_4X4, ORDERED_4X4_DIV,
        ORDERED_8X8, ORDERED_8X8_DIV,
    },
    utils::transform::tile_rows,
};

/// Ordered dither threshold map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMap {
    Ordered2x2,
    Ordered3x3,
    Ordered4x4,
    Ordered8x8,
}

impl ThresholdMap {
    pub const ALL: [ThresholdMap; 4] = [
        ThresholdMap::Ordered2x2,
        ThresholdMap::Ordered3x3,
        ThresholdMap::Ordered4x4,
        ThresholdMap::Ordered8x8,
    ];

    /// Side length of the (square) map.
    pub fn size(&self) -> usize {
        match self {
            ThresholdMap::Ordered2x2 => 2,
            ThresholdMap::Ordered3x3 => 3,
            ThresholdMap::Ordered4x4 => 4,
            ThresholdMap::Ordered8x8 => 8,
        }
    }

    pub fn divisor(&self) -> f32 {
        match self {
            ThresholdMap::Ordered2x2 => ORDERED_2X2_DIV,
            ThresholdMap::Ordered3x3 => ORDERED_3X3_DIV,
            ThresholdMap::Ordered4x4 => ORDERED_4X4_DIV,
            ThresholdMap::Ordered8x8 => ORDERED_8X8_DIV,
        }
    }

    /// Raw table entry, `x` and `y` inside the map.
    pub fn raw(&self, x: usize, y: usize) -> u8 {
        match self {
            ThresholdMap::Ordered2x2 => ORDERED_2X2[y][x],
            ThresholdMap::Ordered3x3 => ORDERED_3X3[y][x],
            ThresholdMap::Ordered4x4 => ORDERED_4X4[y][x],
            ThresholdMap::Ordered8x8 => ORDERED_8X8[y][x],
        }
    }

    /// Signed channel offset for map cell (x, y), in [-128, 127].
    pub fn normalized(&self, x: usize, y: usize) -> f32 {
        normalize(self.raw(x, y), self.divisor())
    }

    /// Offsets for every cell column of each map row, scaled by
    /// `strength / 100`.
    ///
    /// Row `y` of the raster reads `offsets[(y % size) * cells..][..cells]`.
    pub fn tiled_offsets(&self, cells: usize, strength: u8) -> Vec<f32> {
        let size = self.size();
        let scale = strength as f32 / 100.0;
        tile_rows(size, cells, |x, y| self.normalized(x % size, y) * scale)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThresholdMap::Ordered2x2 => "ordered_2x2",
            ThresholdMap::Ordered3x3 => "ordered_3x3",
            ThresholdMap::Ordered4x4 => "ordered_4x4",
            ThresholdMap::Ordered8x8 => "ordered_8x8",
        }
    }
}

impl Display for ThresholdMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `(value / divisor) * 255 - 128`
#[inline]
pub fn normalize(value: u8, divisor: f32) -> f32 {
    (value as f32 / divisor) * 255.0 - 128.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_range() {
        for map in ThresholdMap::ALL {
            for y in 0..map.size() {
                for x in 0..map.size() {
                    let value = map.normalized(x, y);
                    assert!(
                        (-128.0..=127.0).contains(&value),
                        "{} ({}, {}) = {}",
                        map,
                        x,
                        y,
                        value
                    );
                }
            }
        }
    }

    #[test]
    fn test_maps_are_permutations() {
        for map in ThresholdMap::ALL {
            let size = map.size();
            let mut values: Vec<u8> = (0..size * size)
                .map(|idx| map.raw(idx % size, idx / size))
                .collect();
            values.sort();
            let expected: Vec<u8> = (1..=(size * size) as u8).collect();
            assert_eq!(values, expected, "{}", map);
            assert_eq!(map.divisor(), (size * size + 1) as f32);
        }
    }

    #[test]
    fn test_normalize() {
        assert!((normalize(1, 5.0) + 77.0).abs() < 1e-4);
        assert!((normalize(4, 5.0) - 76.0).abs() < 1e-4);
        assert!((normalize(64, 65.0) - 123.076_92).abs() < 1e-3);
    }

    #[test]
    fn test_tiled_offsets() {
        let offsets = ThresholdMap::Ordered2x2.tiled_offsets(3, 100);
        assert_eq!(offsets.len(), 6);
        assert_eq!(offsets[0], offsets[2]);
        assert_eq!(offsets[3], normalize(4, 5.0));

        let zero = ThresholdMap::Ordered8x8.tiled_offsets(5, 0);
        assert!(zero.iter().all(|v| *v == 0.0));
    }
}
