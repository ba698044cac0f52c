use synthseg_image::{Image, ImageError, ImageSize};

/// Create a meshgrid of x and y coordinates from a mapping function
///
/// The function receives the destination pixel `(x, y)` and returns the
/// coordinates to sample from.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - The mapping function.
///
/// # Errors
///
/// Any error returned by `f` is propagated.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> Result<(f32, f32), ImageError>,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let (u, v) = f(x, y)?;
            map_x.push(u);
            map_y.push(v);
        }
    }

    let size = ImageSize {
        width: cols,
        height: rows,
    };

    Ok((Image::new(size, map_x)?, Image::new(size, map_y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meshgrid_from_fn_shift() -> Result<(), ImageError> {
        let (map_x, map_y) = meshgrid_from_fn(2, 2, |x, y| Ok((x as f32 + 0.5, y as f32 * 2.0)))?;
        assert_eq!(map_x.as_slice(), &[0.5, 1.5, 0.5, 1.5]);
        assert_eq!(map_y.as_slice(), &[0.0, 0.0, 2.0, 2.0]);
        Ok(())
    }
}
