use std::fmt::Display;

use crate::{
    error::{Error, Result},
    utils::num::scale_floor,
};

#[rustfmt::skip]
const CLUSTER_ONE: [[u8; 4]; 4] = [
    [0, 6, 8, 14],
    [2, 12, 4, 10],
    [8, 14, 0, 6],
    [4, 10, 2, 12],
];

#[rustfmt::skip]
const CLUSTER_TWO: [[u8; 4]; 4] = [
    [0, 12, 3, 15],
    [8, 4, 11, 7],
    [2, 14, 1, 13],
    [10, 6, 9, 5],
];

/// 4x4 halftone cluster shared by the two-color and Apple II models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HalftoneCluster {
    #[default]
    One,
    Two,
}

impl HalftoneCluster {
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(HalftoneCluster::One),
            1 => Ok(HalftoneCluster::Two),
            other => Err(Error::invalid("halftone", other)),
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "one" => Ok(HalftoneCluster::One),
            "two" => Ok(HalftoneCluster::Two),
            other => Err(Error::invalid("halftone", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HalftoneCluster::One => "one",
            HalftoneCluster::Two => "two",
        }
    }

    #[inline]
    fn raw(&self, x: usize, y: usize) -> u8 {
        match self {
            HalftoneCluster::One => CLUSTER_ONE[y % 4][x % 4],
            HalftoneCluster::Two => CLUSTER_TWO[y % 4][x % 4],
        }
    }

    /// `((c + 1) * 255) / 16` for the entry under raster pixel (x, y), in
    /// 15..=255.
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> i32 {
        scale_floor(self.raw(x, y) as i32 + 1, 255, 16)
    }
}

impl Display for HalftoneCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
