//! Explicit integer rounding for the hardware luminance and ratio formulas.
//!
//! Every division in the machine models goes through these helpers so the
//! rounding mode is visible at the call site. All of them floor, i.e. round
//! toward negative infinity, for a positive divisor.

use num_traits::{Euclid, PrimInt};

/// `floor(n / d)` for a positive divisor.
#[inline]
pub fn floor_div<Integral>(n: Integral, d: Integral) -> Integral
where
    Integral: PrimInt + Euclid,
{
    debug_assert!(d > Integral::zero(), "floor_div needs a positive divisor");
    n.div_euclid(&d)
}

/// `floor(value * num / den)`, the "scale by ratio" step used by blends and
/// halftone thresholds.
#[inline]
pub fn scale_floor<Integral>(value: Integral, num: Integral, den: Integral) -> Integral
where
    Integral: PrimInt + Euclid,
{
    floor_div(value * num, den)
}

/// Number of whole `cell` sized blocks fitting in `extent`.
#[inline]
pub fn whole_cells(extent: usize, cell: usize) -> usize {
    floor_div(extent, cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_div_positive() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(8u32, 2), 4);
        assert_eq!(floor_div(0i32, 5), 0);
    }

    #[test]
    fn test_floor_div_negative_rounds_down() {
        // truncation would give -1
        assert_eq!(floor_div(-15i32, 255), -1);
        assert_eq!(floor_div(-7i32, 2), -4);
    }

    #[test]
    fn test_scale_floor() {
        // halftone cluster entry 0 -> (0 + 1) * 255 / 16
        assert_eq!(scale_floor(1, 255, 16), 15);
        assert_eq!(scale_floor(16, 255, 16), 255);
        // msx grey level 237 / 1000
        assert_eq!(scale_floor(237, 255, 1000), 60);
    }

    #[test]
    fn test_whole_cells_floors() {
        assert_eq!(whole_cells(17, 8), 2);
        assert_eq!(whole_cells(7, 8), 0);
        assert_eq!(whole_cells(16, 8), 2);
    }
}
