//! Planar YUV rescaling interface.
//!
//! Only the boundary lives here: plane views over strided 4:2:0 buffers,
//! the filter selection enum, and the [`PlanarScaler`] trait a rescaler
//! implements. No scaling algorithm ships with this crate; encoders that
//! need prescaled input take any `PlanarScaler` and stay agnostic of where
//! it comes from.

use crate::error::{Error, Result};

/// Filtering applied while scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Point sample. Fastest.
    #[default]
    None,
    /// Filter horizontally only.
    Linear,
    /// Faster than box, but lower quality scaling down.
    Bilinear,
    /// Highest quality.
    Box,
}

/// Read-only view of one image plane.
///
/// `stride` is the distance in bytes between row starts and may exceed the
/// row width when the buffer carries padding or a border.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    pub stride: usize,
}

impl<'a> Plane<'a> {
    /// The first `len` samples of row `y`.
    pub fn row(&self, y: usize, len: usize) -> &'a [u8] {
        &self.data[y * self.stride..y * self.stride + len]
    }
}

/// Mutable view of one image plane.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub data: &'a mut [u8],
    pub stride: usize,
}

impl PlaneMut<'_> {
    /// The first `len` samples of row `y`, writable.
    pub fn row_mut(&mut self, y: usize, len: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..y * self.stride + len]
    }
}

/// Three-plane 4:2:0 source image: full-size Y, quarter-size U and V.
#[derive(Debug, Clone, Copy)]
pub struct I420View<'a> {
    pub y: Plane<'a>,
    pub u: Plane<'a>,
    pub v: Plane<'a>,
    pub width: u32,
    pub height: u32,
}

impl I420View<'_> {
    /// Checks that the planes are large enough for the stated dimensions.
    /// Scaler implementations call this before touching sample data.
    pub fn check(&self) -> Result<()> {
        check_planes(
            self.width,
            self.height,
            [
                (self.y.data.len(), self.y.stride),
                (self.u.data.len(), self.u.stride),
                (self.v.data.len(), self.v.stride),
            ],
        )
    }
}

/// Three-plane 4:2:0 destination image.
#[derive(Debug)]
pub struct I420ViewMut<'a> {
    pub y: PlaneMut<'a>,
    pub u: PlaneMut<'a>,
    pub v: PlaneMut<'a>,
    pub width: u32,
    pub height: u32,
}

impl I420ViewMut<'_> {
    /// Checks that the planes are large enough for the stated dimensions.
    pub fn check(&self) -> Result<()> {
        check_planes(
            self.width,
            self.height,
            [
                (self.y.data.len(), self.y.stride),
                (self.u.data.len(), self.u.stride),
                (self.v.data.len(), self.v.stride),
            ],
        )
    }
}

/// Chroma plane dimensions for a 4:2:0 image, rounding odd sizes up.
pub fn chroma_dimensions(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(2), height.div_ceil(2))
}

fn check_planes(width: u32, height: u32, planes: [(usize, usize); 3]) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let (cw, ch) = chroma_dimensions(width, height);
    let [(y_len, y_stride), (u_len, u_stride), (v_len, v_stride)] = planes;
    for (len, needed) in [
        (y_len, plane_bytes(width, height, y_stride)),
        (u_len, plane_bytes(cw, ch, u_stride)),
        (v_len, plane_bytes(cw, ch, v_stride)),
    ] {
        if len < needed {
            return Err(Error::InvalidDataLength {
                expected: needed,
                actual: len,
            });
        }
    }
    Ok(())
}

/// Bytes a `width x height` plane occupies at `stride`: full rows plus one
/// final row without its padding.
fn plane_bytes(width: u32, height: u32, stride: usize) -> usize {
    (height as usize - 1) * stride + width as usize
}

/// Scales 4:2:0 planar images between arbitrary dimensions.
///
/// Implementations read every plane through its view's stride and must
/// accept any nonzero source and destination sizes; how each
/// [`FilterMode`] degrades on extreme ratios is up to the implementation.
pub trait PlanarScaler {
    fn scale(
        &self,
        src: &I420View<'_>,
        dst: &mut I420ViewMut<'_>,
        filter: FilterMode,
    ) -> Result<()>;
}
