//! Square RGBA pixel buffer.

use crate::color::Color32;
use crate::error::FrameError;

/// Row-major `size × size` frame of opaque colors
///
/// Allocated once per texture size and overwritten in full by every fill.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Color32>,
    size: u32,
}

impl PixelBuffer {
    /// Allocate a black buffer, reporting allocation failure instead of aborting
    pub fn try_new(size: u32) -> Result<Self, FrameError> {
        if size == 0 {
            return Err(FrameError::ZeroSize);
        }

        let side = size as usize;
        let count = side
            .checked_mul(side)
            .ok_or_else(|| allocation_error(usize::MAX))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|source| FrameError::Allocation {
                pixels: count,
                source,
            })?;
        pixels.resize(count, Color32::BLACK);

        Ok(Self { pixels, size })
    }

    /// Side length in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Flat index of a pixel: `row * size + column`
    #[inline]
    pub fn index_of(&self, column: u32, row: u32) -> usize {
        row as usize * self.size as usize + column as usize
    }

    pub fn get(&self, column: u32, row: u32) -> Option<Color32> {
        if column >= self.size || row >= self.size {
            return None;
        }
        Some(self.pixels[self.index_of(column, row)])
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color32] {
        &mut self.pixels
    }

    /// RGBA8 bytes, row-major, ready for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bytes per row of the byte view
    pub fn bytes_per_row(&self) -> u32 {
        self.size * std::mem::size_of::<Color32>() as u32
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}

/// Allocation failure for a size that overflows `usize`
fn allocation_error(pixels: usize) -> FrameError {
    // An impossible reservation yields a genuine TryReserveError (capacity overflow)
    let source = match Vec::<Color32>::new().try_reserve_exact(usize::MAX) {
        Err(err) => err,
        Ok(()) => unreachable!("reserving usize::MAX elements cannot succeed"),
    };
    FrameError::Allocation { pixels, source }
}
