#![allow(dead_code)]

use std::hint::black_box;

use criterion::{BenchmarkGroup, BenchmarkId, measurement::WallTime};
use rand::{Rng, SeedableRng, rngs::StdRng};
use retropunker::prelude::*;

pub const BENCH_IMAGE_SIZE: u32 = 300;

/// Noisy gradient, closer to a photo than pure noise.
pub fn gen_test_texture(width: u32, height: u32) -> Texture<u8> {
    let mut rng = StdRng::seed_from_u64(0xC64);
    let mut texture = Texture::new(width, height, 4);
    let (w, h) = (width as usize, height as usize);
    texture
        .as_mut()
        .chunks_exact_mut(4)
        .enumerate()
        .for_each(|(idx, pixel)| {
            let (x, y) = (idx % w, idx / w);
            let noise: i32 = rng.random_range(-16..=16);
            let channel = |v: usize| (v as i32 + noise).clamp(0, 255) as u8;
            pixel[0] = channel(x * 255 / w);
            pixel[1] = channel(y * 255 / h);
            pixel[2] = channel((x + y) * 255 / (w + h));
            pixel[3] = 0xFF;
        });
    texture
}

pub fn random_palette(size: usize) -> Palette {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let colors = (0..size)
        .map(|_| RGB::new(rng.random(), rng.random(), rng.random()))
        .collect();
    Palette::new(colors).expect("non empty palette")
}

/// Times `transform` on fresh copies of `input`.
pub fn bench_transform(
    group: &mut BenchmarkGroup<'_, WallTime>,
    id: BenchmarkId,
    transform: &mut impl TextureTransform,
    input: &Texture<u8>,
) {
    transform.prepare(input.shape());
    group.bench_function(id, |b| {
        b.iter_batched_ref(
            || input.clone(),
            |texture| {
                let res = transform.apply(texture.as_texture_mut_slice(), &Progress::none());
                black_box(res);
            },
            criterion::BatchSize::LargeInput,
        );
    });
}
