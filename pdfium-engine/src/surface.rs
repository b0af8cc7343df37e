//! Render targets
//!
//! The engine rasterizes into host-owned memory. Two targets are supported:
//! an opaque presentation surface the host controls ([`PageSurface`]) and a
//! plain owned pixel buffer ([`PixelBuffer`]). Pixels are 32-bit BGRA, the
//! engine's native format.

/// Bytes per pixel for all render targets (BGRA).
pub const BYTES_PER_PIXEL: usize = 4;

/// A host-owned surface the engine renders into.
///
/// The host's actual presentation mechanism (window surface, shared texture,
/// ...) stays on the host side; the engine only needs the extent and a way
/// to hand over rasterized rows.
pub trait PageSurface {
    /// Surface extent in device pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Copy rasterized rows into the surface.
    ///
    /// `pixels` holds one or more complete rows of BGRA data, starting at
    /// `top_row`. Rows falling outside the surface are discarded.
    fn write_scanlines(&mut self, top_row: u32, pixels: &[u8]);
}

/// An owned BGRA pixel buffer.
///
/// Rows are tightly packed: `stride() == width * 4`.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zeroed buffer with the given extent.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Raw BGRA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw BGRA bytes, row-major.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl PageSurface for PixelBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_scanlines(&mut self, top_row: u32, pixels: &[u8]) {
        let stride = self.stride();
        if stride == 0 {
            return;
        }
        let rows = pixels.len() / stride;
        for row in 0..rows {
            let dst_row = top_row as usize + row;
            if dst_row >= self.height as usize {
                break;
            }
            let src = &pixels[row * stride..(row + 1) * stride];
            let dst_start = dst_row * stride;
            self.data[dst_start..dst_start + stride].copy_from_slice(src);
        }
    }
}
