/// Row-major walk over raster positions yielding `(x, y, sample)`.
///
/// `x` advances by `stride` raster columns, so a double width machine pixel
/// is visited once through its left column. `sample` counts visited
/// positions, not raster pixels.
#[derive(Debug, Clone, Copy)]
pub struct GridIterator {
    width: usize,
    height: usize,
    stride: usize,
    x: usize,
    y: usize,
    sample: usize,
}

impl GridIterator {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self::strided(width, height, 1)
    }

    /// A zero `stride` yields nothing.
    #[inline]
    pub const fn strided(width: usize, height: usize, stride: usize) -> Self {
        Self {
            width,
            height,
            stride,
            x: 0,
            y: 0,
            sample: 0,
        }
    }

    #[inline]
    fn columns(&self) -> usize {
        if self.stride == 0 {
            return 0;
        }
        self.width.div_ceil(self.stride)
    }
}

impl Iterator for GridIterator {
    type Item = (usize, usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.height || self.columns() == 0 {
            return None;
        }

        let item = (self.x, self.y, self.sample);
        self.sample += 1;
        self.x += self.stride;
        if self.x >= self.width {
            self.x = 0;
            self.y += 1;
        }
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIterator {
    #[inline]
    fn len(&self) -> usize {
        self.columns() * self.height - self.sample
    }
}
