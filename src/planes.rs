//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a window onto the complex plane described by a scale (plane
//! units per pixel) and the complex coordinate of pixel 0,0.
use num::Complex;

use crate::errors::RenderError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The fixed window through which every frame looks at the complex
/// plane.  Once built it never changes: there is no zoom and no pan.
#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    /// The right-lower corner of the integral cartesian plane.  The
    /// left-upper is assumed to be at 0,0.
    pub integral_plane: IntegralPlane,
    /// Plane units covered by one pixel, in both directions.
    pub scale: f64,
    /// The complex coordinate of pixel 0,0.
    pub offset: Complex<f64>,
}

impl Viewport {
    /// Constructor.  The integral plane must contain at least one
    /// pixel, and the scale must be a positive finite number.
    pub fn new(
        width: usize,
        height: usize,
        scale: f64,
        offset: Complex<f64>,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport(width, height));
        }
        if scale <= 0.0 || !scale.is_finite() {
            return Err(RenderError::BadScale(scale));
        }
        Ok(Viewport {
            integral_plane: IntegralPlane(width, height),
            scale,
            offset,
        })
    }

    /// Width of the integral plane, in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the integral plane, in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Always false for a constructed viewport; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number at that location: `(x·s + ox, y·s + oy)`.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            (pixel.0 as f64) * self.scale + self.offset.re,
            (pixel.1 as f64) * self.scale + self.offset.im,
        )
    }

    /// Given a point on the complex plane, return the nearest pixel,
    /// or None if the point falls outside the integral plane.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = ((point.re - self.offset.re) / self.scale).round();
        let top = ((point.im - self.offset.im) / self.scale).round();
        if left < 0.0
            || top < 0.0
            || left >= (self.integral_plane.0 as f64)
            || top >= (self.integral_plane.1 as f64)
        {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }

    /// The linear offset of a pixel from the root of a row-major buffer.
    #[inline]
    pub fn offset_of(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}
