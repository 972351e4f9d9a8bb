//! Pixel grids and grayscale views.
//!
//! `ColorImage` is the owned RGB grid produced by screen capture and template
//! decoding. Matching runs on single-channel planes: `OwnedImage` owns one,
//! `ImageView` borrows one with an explicit stride (elements between row
//! starts, so a stride larger than the width represents padded rows).

use crate::util::{ClickMatchError, ClickMatchResult, InvalidTemplateError};

pub mod gray;
pub mod integral;
#[cfg(feature = "image-io")]
pub mod io;

/// Bytes per pixel in a `ColorImage`.
pub const CHANNELS: usize = 3;

/// Owned color pixel grid, row-major, channel order red-green-blue.
///
/// Zero-sized grids are representable so that an empty template can reach the
/// matcher and be rejected there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ColorImage {
    /// Wraps an RGB buffer of exactly `width * height * 3` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ClickMatchResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or(ClickMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(ClickMatchError::BufferLengthMismatch {
                expected: needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a grid from RGBA bytes, dropping alpha.
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> ClickMatchResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(4))
            .ok_or(ClickMatchError::InvalidDimensions { width, height })?;
        if rgba.len() < needed {
            return Err(ClickMatchError::BufferTooSmall {
                needed,
                got: rgba.len(),
            });
        }
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for px in rgba[..needed].chunks_exact(4) {
            data.extend_from_slice(&px[..CHANNELS]);
        }
        Self::new(data, width, height)
    }

    /// Creates a grid filled with one color.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * 3` overflows `usize`.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let pixels = width
            .checked_mul(height)
            .filter(|n| n.checked_mul(CHANNELS).is_some());
        let Some(pixels) = pixels else {
            panic!("color image {width}x{height} overflows usize");
        };
        Self {
            data: rgb.repeat(pixels),
            width,
            height,
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RGB triple at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * CHANNELS;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgb);
    }

    /// Copies `other` into this grid with its top-left corner at `(x0, y0)`.
    ///
    /// Pixels falling outside this grid are clipped.
    pub fn blit(&mut self, other: &ColorImage, x0: usize, y0: usize) {
        for y in 0..other.height {
            for x in 0..other.width {
                if let Some(px) = other.pixel(x, y) {
                    self.put_pixel(x0 + x, y0 + y, px);
                }
            }
        }
    }

    /// Checks that the grid can serve as a template.
    pub(crate) fn validate_template(&self) -> Result<(), InvalidTemplateError> {
        if self.is_empty() {
            return Err(InvalidTemplateError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Owned single-channel image in contiguous row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous grayscale buffer of `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ClickMatchResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(ClickMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the contiguous pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> ClickMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> ClickMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(ClickMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> ClickMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(ClickMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(ClickMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(ClickMatchError::InvalidDimensions { width, height })
}
