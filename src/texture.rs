use image::{DynamicImage, ImageBuffer};

use crate::{
    error::{Error, Result},
    utils::pixel::RGB,
};

/// (width, height, planes)
pub type Shape = (usize, usize, usize);
/// (width, height)
pub type Shape2D = (usize, usize);

/// Trait defining ops available on Textures with
/// lendable inner buffer
pub trait TextureRef: AsRef<[Self::Inner]> {
    type Inner;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Values per pixel.
    fn planes(&self) -> u32;

    #[inline]
    fn shape(&self) -> Shape {
        (
            self.width() as usize,
            self.height() as usize,
            self.planes() as usize,
        )
    }

    #[inline]
    fn row_stride(&self) -> usize {
        (self.width() * self.planes()) as usize
    }

    /// Offset of pixel (x, y) in the buffer, `None` outside the texture.
    #[inline]
    fn pixel_offset(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width() as isize || y >= self.height() as isize {
            return None;
        }
        Some(y as usize * self.row_stride() + x as usize * self.planes() as usize)
    }
}

/// Trait defining ops available on mutable
/// Textures
pub trait TextureMut: TextureRef + AsMut<[Self::Inner]> {}

/// Color access on 8-bit textures.
///
/// Neighbor lookups near the edges are routine, so reads outside the texture
/// resolve to black and writes outside are dropped.
pub trait RgbTexture: TextureRef<Inner = u8> {
    #[inline]
    fn rgb(&self, x: isize, y: isize) -> Option<RGB> {
        let offset = self.pixel_offset(x, y)?;
        Some(RGB::from_slice(&self.as_ref()[offset..]))
    }

    #[inline]
    fn rgb_or_black(&self, x: isize, y: isize) -> RGB {
        self.rgb(x, y).unwrap_or(RGB::BLACK)
    }
}

impl<T: TextureRef<Inner = u8>> RgbTexture for T {}

pub trait RgbTextureMut: TextureMut<Inner = u8> {
    #[inline]
    fn set_rgb(&mut self, x: isize, y: isize, color: RGB) {
        if let Some(offset) = self.pixel_offset(x, y) {
            color.write_to(&mut self.as_mut()[offset..]);
        }
    }

    fn fill_row(&mut self, y: usize, color: RGB) {
        let stride = self.row_stride();
        let planes = self.planes() as usize;
        let start = y * stride;
        self.as_mut()[start..start + stride]
            .chunks_exact_mut(planes)
            .for_each(|pixel| color.write_to(pixel));
    }
}

impl<T: TextureMut<Inner = u8>> RgbTextureMut for T {}

/// Texture with owned buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture<T> {
    width: u32,
    height: u32,
    planes: u32,
    buffer: Vec<T>,
}

impl<T> AsRef<[T]> for Texture<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.buffer
    }
}

impl<T> AsMut<[T]> for Texture<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.buffer
    }
}

impl<T> TextureRef for Texture<T> {
    type Inner = T;

    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn planes(&self) -> u32 {
        self.planes
    }
}

impl<T> TextureMut for Texture<T> {}

impl<T> Texture<T> {
    pub fn as_texture_slice<'s>(&'s self) -> TextureSlice<'s, T> {
        TextureSlice {
            width: self.width,
            height: self.height,
            planes: self.planes,
            buffer: &self.buffer,
        }
    }

    pub fn as_texture_mut_slice<'s>(&'s mut self) -> TextureMutSlice<'s, T> {
        TextureMutSlice {
            width: self.width,
            height: self.height,
            planes: self.planes,
            buffer: &mut self.buffer,
        }
    }

    pub fn into_raw(self) -> Vec<T> {
        self.buffer
    }
}

impl<T: std::clone::Clone> Texture<T> {
    pub fn from_slice(width: u32, height: u32, planes: u32, slice: &[T]) -> Self {
        assert_eq!(
            slice.len(),
            (width * height * planes) as usize,
            "buffers don't match sizes"
        );
        Texture {
            width,
            height,
            planes,
            buffer: slice.to_owned(),
        }
    }
}

impl<T: Default + Copy> Texture<T> {
    pub fn new(width: u32, height: u32, planes: u32) -> Self {
        Self {
            width,
            height,
            planes,
            buffer: vec![T::default(); (width * height * planes) as usize],
        }
    }
}

impl Texture<u8> {
    /// Texture of `planes` bytes per pixel filled with one color
    /// (alpha, when present, is opaque).
    pub fn filled(width: u32, height: u32, planes: u32, color: RGB) -> Self {
        let mut texture = Self::new(width, height, planes);
        texture
            .buffer
            .chunks_exact_mut(planes as usize)
            .for_each(|pixel| {
                color.write_to(pixel);
                if pixel.len() == 4 {
                    pixel[3] = 0xFF;
                }
            });
        texture
    }

    /// Copies any decoded image into an RGBA texture.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Texture {
            width,
            height,
            planes: 4,
            buffer: rgba.into_raw(),
        }
    }

    pub fn into_dynamic(self) -> Result<DynamicImage> {
        let (width, height, planes) = (self.width, self.height, self.planes);
        let image = match planes {
            4 => ImageBuffer::from_raw(width, height, self.buffer).map(DynamicImage::ImageRgba8),
            3 => ImageBuffer::from_raw(width, height, self.buffer).map(DynamicImage::ImageRgb8),
            _ => None,
        };
        image.ok_or_else(|| Error::invalid("planes", planes))
    }
}

/// Texture with borrowed internal buffer
#[derive(Debug, Copy, Clone)]
pub struct TextureSlice<'a, T> {
    width: u32,
    height: u32,
    planes: u32,
    buffer: &'a [T],
}

impl<T> AsRef<[T]> for TextureSlice<'_, T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.buffer
    }
}

impl<T> TextureRef for TextureSlice<'_, T> {
    type Inner = T;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn planes(&self) -> u32 {
        self.planes
    }
}

impl<'a, T> TextureSlice<'a, T> {
    pub fn new(width: u32, height: u32, planes: u32, buffer: &'a [T]) -> Self {
        debug_assert_eq!(buffer.len(), (width * height * planes) as usize);
        Self {
            width,
            height,
            planes,
            buffer,
        }
    }
}

/// Mutable view over a raster owned by someone else.
///
/// This is the engine's working type: transforms receive one, mutate it in
/// place and hand it back.
#[derive(Debug)]
pub struct TextureMutSlice<'a, T> {
    width: u32,
    height: u32,
    planes: u32,
    buffer: &'a mut [T],
}

impl<T> AsRef<[T]> for TextureMutSlice<'_, T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.buffer
    }
}

impl<T> AsMut<[T]> for TextureMutSlice<'_, T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.buffer
    }
}

impl<T> TextureRef for TextureMutSlice<'_, T> {
    type Inner = T;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn planes(&self) -> u32 {
        self.planes
    }
}

impl<T> TextureMut for TextureMutSlice<'_, T> {}

impl<'a, T> TextureMutSlice<'a, T> {
    pub fn new(width: u32, height: u32, planes: u32, buffer: &'a mut [T]) -> Self {
        debug_assert_eq!(buffer.len(), (width * height * planes) as usize);
        Self {
            width,
            height,
            planes,
            buffer,
        }
    }

    /// Validating constructor for rasters handed over by a host.
    ///
    /// Accepts 3 (RGB) or 4 (RGB + opaque extra byte) planes.
    pub fn try_new(width: u32, height: u32, planes: u32, buffer: &'a mut [T]) -> Result<Self> {
        if planes != 3 && planes != 4 {
            return Err(Error::invalid("planes", planes));
        }
        let expected = width as usize * height as usize * planes as usize;
        if buffer.len() != expected {
            return Err(Error::invalid(
                "buffer length",
                format!("{} (expected {})", buffer.len(), expected),
            ));
        }
        Ok(Self::new(width, height, planes, buffer))
    }

    /// Reborrow as an immutable slice.
    pub fn as_texture_slice(&self) -> TextureSlice<'_, T> {
        TextureSlice {
            width: self.width,
            height: self.height,
            planes: self.planes,
            buffer: self.buffer,
        }
    }
}

pub mod prelude {
    pub use super::{
        RgbTexture, RgbTextureMut, Shape, Texture, TextureMut, TextureMutSlice, TextureRef,
        TextureSlice,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_outside_are_black() {
        let texture = Texture::filled(2, 2, 3, RGB::WHITE);
        assert_eq!(texture.rgb(1, 1), Some(RGB::WHITE));
        assert_eq!(texture.rgb(-1, 0), None);
        assert_eq!(texture.rgb_or_black(2, 0), RGB::BLACK);
        assert_eq!(texture.rgb_or_black(0, 2), RGB::BLACK);
    }

    #[test]
    fn test_writes_outside_are_dropped() {
        let mut texture = Texture::filled(2, 2, 4, RGB::WHITE);
        let before = texture.clone();
        texture.set_rgb(2, 0, RGB::BLACK);
        texture.set_rgb(0, -1, RGB::BLACK);
        assert_eq!(texture, before);

        texture.set_rgb(1, 0, RGB::new(1, 2, 3));
        assert_eq!(&texture.as_ref()[4..8], &[1, 2, 3, 0xFF]);
    }

    #[test]
    fn test_try_new_validates_planes_and_length() {
        let mut buf = vec![0u8; 2 * 2 * 4];
        assert!(TextureMutSlice::try_new(2, 2, 4, &mut buf).is_ok());
        assert!(TextureMutSlice::try_new(2, 2, 3, &mut buf).is_err());
        assert!(TextureMutSlice::try_new(4, 1, 2, &mut buf[..8]).is_err());
    }

    #[test]
    fn test_dynamic_round_trip_keeps_alpha() {
        let mut texture = Texture::filled(3, 2, 4, RGB::new(10, 20, 30));
        texture.as_mut()[3] = 7;
        let image = texture.clone().into_dynamic().unwrap();
        assert_eq!(Texture::from_dynamic(&image), texture);
    }
}
