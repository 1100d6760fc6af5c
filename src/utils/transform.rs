/// Lays out `rows` rows of `row_len` values each, row-major, so a raster row
/// can read its slice of a repeating pattern without index math per pixel.
pub fn tile_rows<T, F>(rows: usize, row_len: usize, value: F) -> Vec<T>
where
    F: Fn(usize, usize) -> T,
{
    (0..rows)
        .flat_map(|y| (0..row_len).map(move |x| (x, y)))
        .map(|(x, y)| value(x, y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tile_rows;

    #[test]
    fn test_row_major_layout() {
        let buf = tile_rows(3, 4, |x, y| (x, y));
        assert_eq!(buf.len(), 12);
        assert_eq!(buf[0], (0, 0));
        assert_eq!(buf[5], (1, 1));
        assert_eq!(buf[11], (3, 2));
    }

    #[test]
    fn test_pattern_repeats_along_rows() {
        let pattern = [[1, 2], [3, 4]];
        let buf = tile_rows(2, 5, |x, y| pattern[y][x % 2]);
        assert_eq!(buf, vec![1, 2, 1, 2, 1, 3, 4, 3, 4, 3]);
    }
}
