use synthseg_image::ImageSize;

use crate::error::AugmentError;

/// A 2D point `[x, y]`.
pub type Point = [f64; 2];

/// The corners of a rectangle, in polygon order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom-left corner.
    BottomLeft,
}

impl Corner {
    /// All corners in polygon order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// The position of the corner in a polygon.
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }
}

/// The pixel corners of a `size` rectangle placed at `offset`.
pub fn rectangle_corners(size: ImageSize, offset: (usize, usize)) -> [Point; 4] {
    let (x0, y0) = (offset.0 as f64, offset.1 as f64);
    let (x1, y1) = (x0 + size.width as f64, y0 + size.height as f64);
    [[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
}

/// Four corners of originally rectangular content, in normalized coordinates.
///
/// The corners are kept in the order top-left, top-right, bottom-right,
/// bottom-left. The coordinates were divided by the width and height of
/// `frame`, the image that currently holds the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    corners: [Point; 4],
    frame: ImageSize,
}

impl Polygon {
    /// The polygon covering the whole of `frame`.
    ///
    /// # Example
    ///
    /// ```
    /// use synthseg_augment::Polygon;
    /// use synthseg_image::ImageSize;
    ///
    /// let polygon = Polygon::unit(ImageSize { width: 4, height: 2 });
    /// assert_eq!(polygon.corners()[2], [1.0, 1.0]);
    /// ```
    pub fn unit(frame: ImageSize) -> Self {
        Self {
            corners: [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            frame,
        }
    }

    /// Create a polygon from pixel corners of an image of size `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidParameter`] if the frame has no area
    /// or a corner is not finite.
    pub fn from_pixels(corners: [Point; 4], frame: ImageSize) -> Result<Self, AugmentError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(AugmentError::InvalidParameter(format!(
                "cannot normalize corners by an empty frame {frame}"
            )));
        }

        if corners.iter().flatten().any(|v| !v.is_finite()) {
            return Err(AugmentError::InvalidParameter(format!(
                "polygon corners must be finite, got {corners:?}"
            )));
        }

        let (w, h) = (frame.width as f64, frame.height as f64);
        Ok(Self {
            corners: corners.map(|[x, y]| [x / w, y / h]),
            frame,
        })
    }

    /// The normalized corners, top-left first.
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    /// A single normalized corner.
    pub fn corner(&self, corner: Corner) -> Point {
        self.corners[corner.index()]
    }

    /// The size of the image the corners were normalized by.
    pub fn frame(&self) -> ImageSize {
        self.frame
    }

    /// The corners in pixel coordinates of the frame.
    pub fn to_pixels(&self) -> [Point; 4] {
        let (w, h) = (self.frame.width as f64, self.frame.height as f64);
        self.corners.map(|[x, y]| [x * w, y * h])
    }

    /// Re-express the polygon in the frame of `target`, where the current
    /// frame's top-left pixel sits at `offset`.
    ///
    /// new_x = (x * width + offset.x) / target.width
    /// new_y = (y * height + offset.y) / target.height
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidParameter`] if `target` has no area.
    pub fn remap(&self, offset: (usize, usize), target: ImageSize) -> Result<Self, AugmentError> {
        let (ox, oy) = (offset.0 as f64, offset.1 as f64);
        let shifted = self.to_pixels().map(|[x, y]| [x + ox, y + oy]);
        Polygon::from_pixels(shifted, target)
    }

    /// The eight coordinates `x1 y1 ... x4 y4` in polygon order.
    pub fn flatten(&self) -> [f64; 8] {
        let mut out = [0.0; 8];
        for (i, [x, y]) in self.corners.iter().enumerate() {
            out[2 * i] = *x;
            out[2 * i + 1] = *y;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_normalizes_by_frame() -> Result<(), AugmentError> {
        let frame = ImageSize {
            width: 200,
            height: 100,
        };
        let polygon = Polygon::from_pixels(rectangle_corners(frame, (0, 0)), frame)?;
        assert_eq!(polygon, Polygon::unit(frame));
        assert_eq!(polygon.corner(Corner::TopRight), [1.0, 0.0]);
        assert_eq!(polygon.to_pixels()[2], [200.0, 100.0]);
        Ok(())
    }

    #[test]
    fn polygon_remap_into_larger_frame() -> Result<(), AugmentError> {
        let small = ImageSize {
            width: 100,
            height: 50,
        };
        let large = ImageSize {
            width: 400,
            height: 200,
        };

        let remapped = Polygon::unit(small).remap((100, 50), large)?;

        assert_eq!(remapped.frame(), large);
        assert_eq!(
            remapped.corners(),
            &[[0.25, 0.25], [0.5, 0.25], [0.5, 0.5], [0.25, 0.5]]
        );
        Ok(())
    }

    #[test]
    fn polygon_empty_frame() {
        let frame = ImageSize {
            width: 0,
            height: 10,
        };
        assert!(Polygon::from_pixels([[0.0; 2]; 4], frame).is_err());
    }

    #[test]
    fn polygon_flatten_order() {
        let polygon = Polygon::unit(ImageSize {
            width: 1,
            height: 1,
        });
        assert_eq!(
            polygon.flatten(),
            [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn corner_index_matches_order() {
        for (i, corner) in Corner::ALL.iter().enumerate() {
            assert_eq!(corner.index(), i);
        }
    }
}
