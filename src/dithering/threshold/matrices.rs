// Ordered dither threshold maps, row major, with their divisors.

#[rustfmt::skip]
pub const ORDERED_2X2: [[u8; 2]; 2] = [
    [1, 3],
    [4, 2],
];
pub const ORDERED_2X2_DIV: f32 = 5.0;

#[rustfmt::skip]
pub const ORDERED_3X3: [[u8; 3]; 3] = [
    [3, 7, 4],
    [6, 1, 9],
    [2, 8, 5],
];
pub const ORDERED_3X3_DIV: f32 = 10.0;

#[rustfmt::skip]
pub const ORDERED_4X4: [[u8; 4]; 4] = [
    [1, 9, 3, 11],
    [13, 5, 15, 7],
    [4, 12, 2, 10],
    [16, 8, 14, 6],
];
pub const ORDERED_4X4_DIV: f32 = 17.0;

#[rustfmt::skip]
pub const ORDERED_8X8: [[u8; 8]; 8] = [
    [1, 49, 13, 61, 4, 52, 16, 64],
    [33, 17, 45, 29, 36, 20, 48, 32],
    [9, 57, 5, 53, 12, 60, 8, 56],
    [41, 25, 37, 21, 44, 28, 40, 24],
    [3, 51, 15, 63, 2, 50, 14, 62],
    [35, 19, 47, 31, 34, 18, 46, 30],
    [11, 59, 7, 55, 10, 58, 6, 54],
    [43, 27, 39, 23, 42, 26, 38, 22],
];
pub const ORDERED_8X8_DIV: f32 = 65.0;
