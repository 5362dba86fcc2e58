//! Coordinate rotation utilities
//!
//! Maps logical coordinates, as seen by a caller drawing on a rotated
//! canvas, onto the panel's native frame buffer and RAM windows.
//!
//! The native buffer packs 8 horizontal pixels per byte, MSB first, rows of
//! `cols / 8` bytes.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation, pixels packed left-to-right
//! - **Rotate90**: 90° clockwise, width and height swapped
//! - **Rotate180**: 180° rotation, origin at bottom-right
//! - **Rotate270**: 270° clockwise (or 90° counter-clockwise)
//!
//! ## Example
//!
//! ```
//! use epd_ssd1677::{rotation::pixel_location, Dimensions, Rotation};
//!
//! let dims = match Dimensions::new(16, 16) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! // Native origin is byte 0, MSB
//! assert_eq!(pixel_location(0, 0, dims, Rotation::Rotate0), (0, 0x80));
//! // Rotated 90°, the logical origin is the native top-right corner
//! assert_eq!(pixel_location(0, 0, dims, Rotation::Rotate90), (1, 0x01));
//! ```

use crate::config::{Dimensions, Rotation};
use crate::window::Rect;

/// Buffer index and bit mask of a logical pixel
///
/// `(x, y)` must lie inside the rotated dimensions.
pub fn pixel_location(x: u32, y: u32, dims: Dimensions, rotation: Rotation) -> (usize, u8) {
    let width = u32::from(dims.cols);
    let height = u32::from(dims.rows);
    let (px, py) = match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (width - 1 - y, x),
        Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
        Rotation::Rotate270 => (y, height - 1 - x),
    };
    let index = (px / 8 + (width / 8) * py) as usize;
    (index, 0x80 >> (px % 8))
}

/// Native rectangle covering a logical rectangle, as `(x, y, w, h)`
///
/// Computed in `i32` so that any `Rect` maps without overflow. The result is
/// not clipped; callers clip it to the panel.
pub fn rotate_rect(rect: Rect, dims: Dimensions, rotation: Rotation) -> (i32, i32, i32, i32) {
    let width = i32::from(dims.cols);
    let height = i32::from(dims.rows);
    let (x, y) = (i32::from(rect.x), i32::from(rect.y));
    let (w, h) = (i32::from(rect.w), i32::from(rect.h));
    match rotation {
        Rotation::Rotate0 => (x, y, w, h),
        Rotation::Rotate90 => (width - y - h, x, h, w),
        Rotation::Rotate180 => (width - x - w, height - y - h, w, h),
        Rotation::Rotate270 => (y, height - x - w, h, w),
    }
}
