// Error diffusion kernels. The current cell sits at column `width / 2` of
// row 0, every entry at or left of it on that row is zero.

#[rustfmt::skip]
pub const FALSE_FLOYD_STEINBERG: [&[u8]; 2] = [
    &[0, 0, 3],
    &[0, 3, 2],
];

#[rustfmt::skip]
pub const FLOYD_STEINBERG: [&[u8]; 2] = [
    &[0, 0, 7],
    &[3, 5, 1],
];

#[rustfmt::skip]
pub const STUCKI: [&[u8]; 3] = [
    &[0, 0, 0, 8, 4],
    &[2, 4, 8, 4, 2],
    &[1, 2, 4, 2, 1],
];

#[rustfmt::skip]
pub const BURKES: [&[u8]; 2] = [
    &[0, 0, 0, 8, 4],
    &[2, 4, 8, 4, 2],
];

#[rustfmt::skip]
pub const JARVIS_JUDICE_NINKE: [&[u8]; 3] = [
    &[0, 0, 0, 7, 5],
    &[3, 5, 7, 5, 3],
    &[1, 3, 5, 3, 1],
];

#[rustfmt::skip]
pub const SIERRA3: [&[u8]; 3] = [
    &[0, 0, 0, 5, 3],
    &[2, 4, 5, 4, 2],
    &[0, 2, 3, 2, 0],
];

#[rustfmt::skip]
pub const SIERRA2: [&[u8]; 2] = [
    &[0, 0, 0, 4, 3],
    &[1, 2, 3, 2, 1],
];

#[rustfmt::skip]
pub const SIERRA_2_4A: [&[u8]; 2] = [
    &[0, 0, 2],
    &[0, 1, 1],
];

#[rustfmt::skip]
pub const FAN: [&[u8]; 2] = [
    &[0, 0, 0, 7, 0],
    &[1, 3, 5, 0, 0],
];

#[rustfmt::skip]
pub const SHIAU_FAN: [&[u8]; 2] = [
    &[0, 0, 0, 2, 0],
    &[8, 8, 4, 0, 0],
];
