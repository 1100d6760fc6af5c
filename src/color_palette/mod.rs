//! Ordered palettes and nearest-color matching.
//!
//! Palette order is significant: it is the tie-break priority of every
//! lookup, and downstream histograms and error terms depend on it.

pub mod reducer;

use std::fmt::Display;

use retropunker_macros::simd_targets;

use crate::{
    error::{Error, Result},
    utils::pixel::RGB,
};

/// Ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<RGB>,
    points: Vec<[f32; 3]>,
}

impl Palette {
    pub fn new(colors: Vec<RGB>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::invalid("palette", "empty"));
        }
        let points = colors.iter().map(RGB::to_f32).collect();
        Ok(Self { colors, points })
    }

    /// Palette from a fixed, non-empty hardware table.
    pub(crate) fn from_array<const N: usize>(colors: [RGB; N]) -> Self {
        const { assert!(N > 0) };
        let points = colors.iter().map(RGB::to_f32).collect();
        Self {
            colors: colors.to_vec(),
            points,
        }
    }

    /// Palette from `0xRRGGBB` literals.
    pub fn from_u32(colors: &[u32]) -> Result<Self> {
        Self::new(colors.iter().map(|c| RGB::from_u32(*c)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[RGB] {
        &self.colors
    }

    #[inline]
    pub fn color(&self, index: usize) -> RGB {
        self.colors[index]
    }

    pub fn contains(&self, color: &RGB) -> bool {
        self.colors.contains(color)
    }

    /// Index of the entry closest to `color` by Euclidean distance.
    ///
    /// The first entry reaching the minimum wins. `color` may be fractional
    /// or outside `[0, 255]` (dithered working values).
    #[inline]
    pub fn nearest(&self, color: [f32; 3]) -> usize {
        nearest_index(&self.points, color)
    }

    #[inline]
    pub fn nearest_rgb(&self, color: RGB) -> usize {
        self.nearest(color.to_f32())
    }

    #[inline]
    pub fn nearest_color(&self, color: [f32; 3]) -> RGB {
        self.colors[self.nearest(color)]
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (idx, color) in self.colors.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", color)?;
        }
        write!(f, "]")
    }
}

// squared distances share the argmin, and are exact for 8-bit inputs
#[simd_targets]
fn nearest_index(points: &[[f32; 3]], color: [f32; 3]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (idx, point) in points.iter().enumerate() {
        let dr = color[0] - point[0];
        let dg = color[1] - point[1];
        let db = color[2] - point[2];
        let distance = dr * dr + dg * dg + db * db;
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best
}
