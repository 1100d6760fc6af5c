use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{color_palette::Palette, texture::Texture, utils::pixel::RGB};

pub const BENCH_IMAGE_SIZE: usize = 300;

/// Fixed seed, every test run sees the same rasters.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn rand_rgb(rng: &mut StdRng) -> RGB {
    RGB::new(rng.random(), rng.random(), rng.random())
}

/// Random raster, alpha (when present) random as well.
pub fn gen_random_texture(width: u32, height: u32, planes: u32, seed: u64) -> Texture<u8> {
    let mut rng = seeded(seed);
    let len = (width * height * planes) as usize;
    let buffer: Vec<u8> = (0..len).map(|_| rng.random()).collect();
    Texture::from_slice(width, height, planes, &buffer)
}

/// Smooth diagonal gradient with some noise, closer to a photo than pure
/// noise.
pub fn gen_gradient_texture(width: u32, height: u32, planes: u32, seed: u64) -> Texture<u8> {
    let mut rng = seeded(seed);
    let mut texture = Texture::new(width, height, planes);
    let (w, h) = (width.max(1) as usize, height.max(1) as usize);
    texture
        .as_mut()
        .chunks_exact_mut(planes as usize)
        .enumerate()
        .for_each(|(idx, pixel)| {
            let (x, y) = (idx % w, idx / w);
            let noise: i32 = rng.random_range(-12..=12);
            let channel = |v: usize| (v as i32 + noise).clamp(0, 255) as u8;
            pixel[0] = channel(x * 255 / w);
            pixel[1] = channel(y * 255 / h);
            pixel[2] = channel((x + y) * 255 / (w + h));
            if planes == 4 {
                pixel[3] = 0xFF;
            }
        });
    texture
}

pub fn random_palette(size: usize, seed: u64) -> Palette {
    let mut rng = seeded(seed);
    let colors = (0..size.max(1)).map(|_| rand_rgb(&mut rng)).collect();
    match Palette::new(colors) {
        Ok(palette) => palette,
        Err(err) => panic!("{err}"),
    }
}

/// Alpha bytes of a four plane raster.
pub fn alpha(texture: &Texture<u8>) -> Vec<u8> {
    texture.as_ref().chunks_exact(4).map(|pixel| pixel[3]).collect()
}
