use std::fmt::{Debug, Display};

/// 8-bit per channel color. Raster alpha bytes never pass through this type.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
pub struct RGB {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGB {
    pub const BLACK: RGB = RGB::new(0x00, 0x00, 0x00);
    pub const WHITE: RGB = RGB::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> RGB {
        RGB { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn from_u32(rgb: u32) -> RGB {
        RGB {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    pub fn from_slice(pixel: &[u8]) -> RGB {
        RGB {
            r: pixel[0],
            g: pixel[1],
            b: pixel[2],
        }
    }

    /// Writes the color channels, leaving any trailing plane untouched.
    #[inline]
    pub fn write_to(&self, pixel: &mut [u8]) {
        pixel[0] = self.r;
        pixel[1] = self.g;
        pixel[2] = self.b;
    }

    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_f32(&self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    #[inline]
    pub fn to_i32(&self) -> [i32; 3] {
        [self.r as i32, self.g as i32, self.b as i32]
    }
}

impl Display for RGB {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u32_channel_order() {
        assert_eq!(RGB::from_u32(0xFF7F00), RGB::new(255, 127, 0));
    }

    #[test]
    fn test_hex_display() {
        let color = RGB::new(0x0A, 0x7F, 0xFF);
        assert_eq!(color.to_hex(), "0A7FFF");
        assert_eq!(color.to_string(), "#0A7FFF");
    }

    #[test]
    fn test_write_keeps_alpha() {
        let mut pixel = [1, 2, 3, 42];
        RGB::new(9, 8, 7).write_to(&mut pixel);
        assert_eq!(pixel, [9, 8, 7, 42]);
    }
}
