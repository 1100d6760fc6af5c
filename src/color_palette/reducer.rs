use crate::{
    color_palette::Palette,
    error::{Error, Result},
    texture::{RgbTexture, TextureRef},
    utils::iterator::GridIterator,
};

/// Pick the `target_size` master colors used most by the raster.
///
/// Every `stride`-th column of every row is classified against `master`.
/// The result holds distinct colors in descending frequency order, ties going
/// to the lowest master index.
pub fn reduce<T>(texture: &T, master: &Palette, target_size: usize, stride: usize) -> Result<Palette>
where
    T: TextureRef<Inner = u8>,
{
    if target_size == 0 || target_size > master.len() {
        return Err(Error::invalid("target_size", target_size));
    }
    if stride == 0 {
        return Err(Error::invalid("stride", stride));
    }

    let mut histogram = histogram(texture, master, stride);
    let mut colors = Vec::with_capacity(target_size);
    for _ in 0..target_size {
        let (best, _) = histogram
            .iter()
            .enumerate()
            .filter_map(|(idx, count)| count.map(|count| (idx, count)))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .ok_or_else(|| Error::invalid("target_size", target_size))?;
        colors.push(master.color(best));
        histogram[best] = None;
    }

    let palette = Palette::new(colors)?;
    tracing::debug!(%palette, "reduced palette");
    Ok(palette)
}

/// Per master index sample count. Picked entries are set to `None` by
/// [reduce] so an all-zero histogram still yields distinct colors.
fn histogram<T>(texture: &T, master: &Palette, stride: usize) -> Vec<Option<usize>>
where
    T: TextureRef<Inner = u8>,
{
    let (width, height, _) = texture.shape();
    let mut histogram = vec![Some(0); master.len()];
    for (x, y, _) in GridIterator::strided(width, height, stride) {
        let color = texture.rgb_or_black(x as isize, y as isize);
        if let Some(count) = &mut histogram[master.nearest_rgb(color)] {
            *count += 1;
        }
    }
    histogram
}
