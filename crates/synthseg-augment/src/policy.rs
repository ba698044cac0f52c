//! Every sign-dependent choice of the shear and warp routines is made here:
//! which side of the canvas receives the shear padding, which corners
//! follow that padding, and which edge a perspective warp compresses.

use synthseg_imgproc::padding::Padding2D;

use crate::polygon::{Corner, Point};

/// The axis a shear or warp parameter acts along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Displacement along x.
    Horizontal,
    /// Displacement along y.
    Vertical,
}

impl Axis {
    /// The index of the displaced coordinate in a [`Point`].
    pub fn coordinate(self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }
}

/// One side of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// The top side.
    Top,
    /// The right side.
    Right,
    /// The bottom side.
    Bottom,
    /// The left side.
    Left,
}

impl Edge {
    /// The two corners on this edge, ordered by increasing coordinate along it.
    pub fn corners(self) -> [Corner; 2] {
        match self {
            Edge::Top => [Corner::TopLeft, Corner::TopRight],
            Edge::Right => [Corner::TopRight, Corner::BottomRight],
            Edge::Bottom => [Corner::BottomLeft, Corner::BottomRight],
            Edge::Left => [Corner::TopLeft, Corner::BottomLeft],
        }
    }

    /// The coordinate that varies along this edge.
    pub fn along(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Horizontal,
            Edge::Left | Edge::Right => Axis::Vertical,
        }
    }

    /// Add `amount` pixels of padding on this side.
    pub fn pad(self, padding: &mut Padding2D, amount: usize) {
        match self {
            Edge::Top => padding.top += amount,
            Edge::Right => padding.right += amount,
            Edge::Bottom => padding.bottom += amount,
            Edge::Left => padding.left += amount,
        }
    }
}

/// Where a shear along one axis puts its padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShearRule {
    /// The axis of the shear displacement.
    pub axis: Axis,
    /// The canvas side that receives the padding.
    pub pad: Edge,
    /// The content edge whose corners move by the padding amount.
    pub shifted: Edge,
}

impl ShearRule {
    /// Move the corners of the shifted edge by `amount` along the shear axis.
    pub fn shift_corners(&self, corners: &mut [Point; 4], amount: f64) {
        let coord = self.axis.coordinate();
        for corner in self.shifted.corners() {
            corners[corner.index()][coord] += amount;
        }
    }
}

/// The padding rule for a shear of `angle` degrees along `axis`.
///
/// | axis | angle > 0 | angle <= 0 |
/// |---|---|---|
/// | vertical | pad top, shift left corners down | pad bottom, shift right corners down |
/// | horizontal | pad left, shift top corners right | pad right, shift bottom corners right |
///
/// # Example
///
/// ```
/// use synthseg_augment::policy::{shear_rule, Axis, Edge};
///
/// let rule = shear_rule(Axis::Vertical, 10.0);
/// assert_eq!(rule.pad, Edge::Top);
/// assert_eq!(rule.shifted, Edge::Left);
/// ```
pub fn shear_rule(axis: Axis, angle: f64) -> ShearRule {
    let (pad, shifted) = match (axis, angle > 0.0) {
        (Axis::Vertical, true) => (Edge::Top, Edge::Left),
        (Axis::Vertical, false) => (Edge::Bottom, Edge::Right),
        (Axis::Horizontal, true) => (Edge::Left, Edge::Top),
        (Axis::Horizontal, false) => (Edge::Right, Edge::Bottom),
    };
    ShearRule { axis, pad, shifted }
}

/// The edge a perspective warp of `amount` along `axis` compresses toward
/// the midline.
///
/// | axis | amount > 0 | amount <= 0 |
/// |---|---|---|
/// | vertical | right | left |
/// | horizontal | top | bottom |
pub fn warp_edge(axis: Axis, amount: f64) -> Edge {
    match (axis, amount > 0.0) {
        (Axis::Vertical, true) => Edge::Right,
        (Axis::Vertical, false) => Edge::Left,
        (Axis::Horizontal, true) => Edge::Top,
        (Axis::Horizontal, false) => Edge::Bottom,
    }
}

/// Pull the corners of `edge` toward the midline `mid` of the edge.
///
/// The edge keeps `|amount|` of its length, centered on `mid`.
pub fn compress_edge(corners: &mut [Point; 4], edge: Edge, mid: f64, amount: f64) {
    let coord = edge.along().coordinate();
    let half = mid * amount.abs();
    let [start, end] = edge.corners();
    corners[start.index()][coord] = mid - half;
    corners[end.index()][coord] = mid + half;
}
