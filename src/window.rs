//! Addressing and clipping
//!
//! Turns a caller's pixel rectangle into a byte-aligned window inside the
//! panel, and maps every byte of that window back to a byte of the source
//! bitmap. Nothing here touches the bus; [`Display`](crate::Display) executes
//! the resulting [`Transfer`].
//!
//! Bitmaps are 1 bit per pixel, MSB first, rows padded to whole bytes.
//!
//! ```
//! use epd_ssd1677::window::{plan_image, Rect, Region};
//! use epd_ssd1677::Dimensions;
//!
//! let dims = match Dimensions::new(480, 800) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! // Hangs 20 pixels off the left edge: the off-panel columns are dropped
//! let transfer = plan_image(Rect::new(-20, 10, 64, 8), dims, false);
//! assert_eq!(transfer.map(|t| t.region), Some(Region::new(0, 10, 40, 8)));
//! ```

use crate::config::{Dimensions, RamXAddressing};
use crate::profile::PanelProfile;

/// Rectangle requested by a caller, in panel pixels
///
/// Signed so that partially off-panel positions can be expressed and clipped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: i16,
    /// Top edge
    pub y: i16,
    /// Width
    pub w: i16,
    /// Height
    pub h: i16,
}

impl Rect {
    /// Create a new rectangle
    #[allow(clippy::many_single_char_names)]
    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self { x, y, w, h }
    }
}

/// Portion of a larger bitmap to transfer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubImage {
    /// Left edge of the portion inside the bitmap
    pub x: i16,
    /// Top edge of the portion inside the bitmap
    pub y: i16,
    /// Full bitmap width in pixels
    pub width: i16,
    /// Full bitmap height in pixels
    pub height: i16,
}

impl SubImage {
    /// Describe the portion starting at `(x, y)` of a `width` x `height` bitmap
    pub const fn new(x: i16, y: i16, width: i16, height: i16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Per-transfer pixel transformations
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WriteOptions {
    /// Complement every byte (swap black and white)
    pub invert: bool,
    /// Read source rows bottom-to-top
    pub mirror_y: bool,
}

impl WriteOptions {
    /// Plain copy
    pub const NONE: Self = Self {
        invert: false,
        mirror_y: false,
    };
}

/// Byte-aligned window inside the panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    /// X coordinate in pixels (multiple of 8)
    pub x: u16,
    /// Y coordinate in pixels
    pub y: u16,
    /// Width in pixels (multiple of 8)
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Region {
    /// Create a new region
    #[allow(clippy::many_single_char_names)]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Region covering the whole panel
    pub const fn full(dims: Dimensions) -> Self {
        Self::new(0, 0, dims.cols, dims.rows)
    }

    /// Bytes per row of this region
    pub fn row_bytes(&self) -> usize {
        self.w as usize / 8
    }
}

/// A clipped window plus the recipe for reading its bytes from the source
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transfer {
    /// Destination window
    pub region: Region,
    /// Byte column in the source of the window's first column
    pub source_col: usize,
    /// Source row of the window's first row (before mirroring)
    pub source_row: usize,
    /// Source bytes per row
    pub stride: usize,
    /// Source height in rows, the pivot for mirroring
    pub source_height: usize,
    /// Read rows bottom-to-top
    pub mirror_y: bool,
}

impl Transfer {
    /// Index into the source for window row `row` and byte column `col`
    pub fn source_index(&self, row: usize, col: usize) -> usize {
        let line = self.source_row + row;
        let line = if self.mirror_y {
            self.source_height - 1 - line
        } else {
            line
        };
        self.source_col + col + self.stride * line
    }

    /// Minimum source length for every index of this transfer to be valid
    pub fn required_len(&self) -> usize {
        let rows = self.region.h as usize;
        let last_row = if self.mirror_y { 0 } else { rows - 1 };
        self.source_index(last_row, self.region.row_bytes() - 1) + 1
    }
}

/// Clip `[x, y, w, h]` to the panel after snapping to byte boundaries
///
/// Returns the clipped window and the `(dx, dy)` cut from the top-left.
fn clip(x: i32, y: i32, w: i32, h: i32, dims: Dimensions) -> Option<(Region, i32, i32)> {
    let width = i32::from(dims.cols);
    let height = i32::from(dims.rows);

    let x = x - x.rem_euclid(8);
    let w = 8 * ((w + 7) / 8);

    let x1 = x.max(0);
    let y1 = y.max(0);
    let mut w1 = if x + w < width { w } else { width - x };
    let mut h1 = if y + h < height { h } else { height - y };
    let dx = x1 - x;
    let dy = y1 - y;
    w1 -= dx;
    h1 -= dy;
    if w1 <= 0 || h1 <= 0 {
        return None;
    }

    Some((
        Region::new(x1 as u16, y1 as u16, w1 as u16, h1 as u16),
        dx,
        dy,
    ))
}

/// Plan a write of a bitmap that is exactly `rect.w` x `rect.h`
///
/// Returns `None` when nothing of the rectangle lands on the panel.
pub fn plan_image(rect: Rect, dims: Dimensions, mirror_y: bool) -> Option<Transfer> {
    if rect.w < 0 || rect.h < 0 {
        return None;
    }
    let (w, h) = (i32::from(rect.w), i32::from(rect.h));
    let stride = (w + 7) / 8;
    let (region, dx, dy) = clip(i32::from(rect.x), i32::from(rect.y), w, h, dims)?;

    Some(Transfer {
        region,
        source_col: (dx / 8) as usize,
        source_row: dy as usize,
        stride: stride as usize,
        source_height: h as usize,
        mirror_y,
    })
}

/// Plan a write of the `rect.w` x `rect.h` portion of a larger bitmap
///
/// The portion starts at `(part.x, part.y)`; `part.x` is snapped down to a
/// byte boundary. Returns `None` for negative sizes, an origin outside the
/// bitmap, or when nothing lands on the panel.
pub fn plan_image_part(
    part: SubImage,
    rect: Rect,
    dims: Dimensions,
    mirror_y: bool,
) -> Option<Transfer> {
    if part.width < 0 || part.height < 0 || rect.w < 0 || rect.h < 0 {
        return None;
    }
    if part.x < 0 || part.x >= part.width || part.y < 0 || part.y >= part.height {
        return None;
    }

    let bitmap_w = i32::from(part.width);
    let bitmap_h = i32::from(part.height);
    let stride = (bitmap_w + 7) / 8;
    let part_x = i32::from(part.x) - i32::from(part.x) % 8;
    let part_y = i32::from(part.y);

    let w = i32::from(rect.w).min(bitmap_w - part_x);
    let h = i32::from(rect.h).min(bitmap_h - part_y);
    let (region, dx, dy) = clip(i32::from(rect.x), i32::from(rect.y), w, h, dims)?;

    Some(Transfer {
        region,
        source_col: ((part_x + dx) / 8) as usize,
        source_row: (part_y + dy) as usize,
        stride: stride as usize,
        source_height: bitmap_h as usize,
        mirror_y,
    })
}

/// Controller RAM coordinates for a window
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RamWindow {
    /// First X address written
    pub x_start: u16,
    /// Last X address written
    pub x_end: u16,
    /// First Y address written
    pub y_start: u16,
    /// Last Y address written
    pub y_end: u16,
}

impl RamWindow {
    /// Argument bytes for the X range command
    pub fn x_range(&self) -> [u8; 4] {
        range_bytes(self.x_start, self.x_end)
    }

    /// Argument bytes for the Y range command
    pub fn y_range(&self) -> [u8; 4] {
        range_bytes(self.y_start, self.y_end)
    }

    /// Argument bytes for the X counter command
    pub fn x_counter(&self) -> [u8; 2] {
        self.x_start.to_le_bytes()
    }

    /// Argument bytes for the Y counter command
    pub fn y_counter(&self) -> [u8; 2] {
        self.y_start.to_le_bytes()
    }
}

fn range_bytes(start: u16, end: u16) -> [u8; 4] {
    let [s0, s1] = start.to_le_bytes();
    let [e0, e1] = end.to_le_bytes();
    [s0, s1, e0, e1]
}

/// Map a panel window onto controller RAM addresses
///
/// Reversed-gate panels address row `y` at `rows - 1 - y`, so the window is
/// re-based to `rows - y - h`. Start and end are swapped on an axis whose entry
/// direction decrements, so the counter starts at the window's first byte.
/// The region must lie inside `dims`.
pub fn ram_window(region: Region, dims: Dimensions, panel: &PanelProfile) -> RamWindow {
    let (x_first, x_last) = match panel.ram_x_addressing {
        RamXAddressing::Pixels => (region.x, region.x + region.w - 1),
        RamXAddressing::Bytes => (region.x / 8, (region.x + region.w - 1) / 8),
    };
    let y_base = if panel.gates_reversed {
        dims.rows - region.y - region.h
    } else {
        region.y
    };
    let (y_first, y_last) = (y_base, y_base + region.h - 1);

    let x_increments = panel.data_entry_mode & 0x01 != 0;
    let y_increments = panel.data_entry_mode & 0x02 != 0;
    let (x_start, x_end) = if x_increments {
        (x_first, x_last)
    } else {
        (x_last, x_first)
    };
    let (y_start, y_end) = if y_increments {
        (y_first, y_last)
    } else {
        (y_last, y_first)
    };

    RamWindow {
        x_start,
        x_end,
        y_start,
        y_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::GDEQ0426T82;

    fn dims() -> Dimensions {
        Dimensions::new(480, 800).unwrap()
    }

    #[test]
    fn test_aligned_rect_inside_panel_is_unchanged() {
        for rect in [
            Rect::new(0, 0, 800, 480),
            Rect::new(8, 3, 16, 1),
            Rect::new(792, 479, 8, 1),
            Rect::new(400, 200, 120, 64),
        ] {
            let transfer = plan_image(rect, dims(), false).unwrap();
            assert_eq!(
                transfer.region,
                Region::new(rect.x as u16, rect.y as u16, rect.w as u16, rect.h as u16)
            );
            assert_eq!(transfer.source_col, 0);
            assert_eq!(transfer.source_row, 0);
        }
    }

    #[test]
    fn test_unaligned_x_snaps_down_and_width_rounds_up() {
        let transfer = plan_image(Rect::new(3, 0, 5, 4), dims(), false).unwrap();
        assert_eq!(transfer.region, Region::new(0, 0, 8, 4));
        assert_eq!(transfer.stride, 1);

        let transfer = plan_image(Rect::new(13, 0, 9, 1), dims(), false).unwrap();
        assert_eq!(transfer.region, Region::new(8, 0, 16, 1));
        assert_eq!(transfer.stride, 2);
    }

    #[test]
    fn test_rect_outside_panel_is_suppressed() {
        for rect in [
            Rect::new(800, 0, 8, 8),
            Rect::new(0, 480, 8, 8),
            Rect::new(-16, 0, 16, 8),
            Rect::new(0, -8, 8, 8),
            Rect::new(1000, 1000, 64, 64),
            Rect::new(0, 0, 0, 8),
            Rect::new(0, 0, 8, 0),
            Rect::new(0, 0, -8, 8),
        ] {
            assert_eq!(plan_image(rect, dims(), false), None, "{rect:?}");
        }
    }

    #[test]
    fn test_negative_origin_clips_source_offsets() {
        let transfer = plan_image(Rect::new(-16, -3, 32, 10), dims(), false).unwrap();
        assert_eq!(transfer.region, Region::new(0, 0, 16, 7));
        assert_eq!(transfer.source_col, 2);
        assert_eq!(transfer.source_row, 3);
        assert_eq!(transfer.source_index(0, 0), 2 + 4 * 3);
    }

    #[test]
    fn test_negative_unaligned_x_snaps_toward_negative_infinity() {
        let transfer = plan_image(Rect::new(-3, 0, 16, 1), dims(), false).unwrap();
        assert_eq!(transfer.region, Region::new(0, 0, 8, 1));
        assert_eq!(transfer.source_col, 1);
    }

    #[test]
    fn test_right_and_bottom_edges_are_clipped() {
        let transfer = plan_image(Rect::new(784, 470, 32, 20), dims(), false).unwrap();
        assert_eq!(transfer.region, Region::new(784, 470, 16, 10));
        assert_eq!(transfer.stride, 4);
        assert_eq!(transfer.required_len(), 2 + 4 * 9);
    }

    #[test]
    fn test_mirror_reads_rows_bottom_up() {
        let transfer = plan_image(Rect::new(0, 0, 16, 4), dims(), true).unwrap();
        assert_eq!(transfer.source_index(0, 0), 6);
        assert_eq!(transfer.source_index(3, 1), 1);
        assert_eq!(transfer.required_len(), 8);
    }

    #[test]
    fn test_mirror_with_top_clip_skips_last_source_rows() {
        // Rows 0 and 1 fall above the panel; window row 0 is source row 2,
        // which mirrored is row 4 - 1 - 2 = 1
        let transfer = plan_image(Rect::new(0, -2, 8, 4), dims(), true).unwrap();
        assert_eq!(transfer.region.h, 2);
        assert_eq!(transfer.source_index(0, 0), 1);
        assert_eq!(transfer.source_index(1, 0), 0);
    }

    #[test]
    fn test_part_rejects_invalid_bitmap_parameters() {
        let rect = Rect::new(0, 0, 8, 8);
        for part in [
            SubImage::new(0, 0, -1, 8),
            SubImage::new(0, 0, 8, -1),
            SubImage::new(-1, 0, 8, 8),
            SubImage::new(8, 0, 8, 8),
            SubImage::new(0, 8, 8, 8),
        ] {
            assert_eq!(plan_image_part(part, rect, dims(), false), None, "{part:?}");
        }
        assert_eq!(
            plan_image_part(SubImage::new(0, 0, 8, 8), Rect::new(0, 0, -8, 8), dims(), false),
            None
        );
    }

    #[test]
    fn test_part_clamps_to_bitmap_extent() {
        // 100x50 bitmap, portion at (80, 40) asked for 64x64
        let transfer = plan_image_part(
            SubImage::new(80, 40, 100, 50),
            Rect::new(200, 100, 64, 64),
            dims(),
            false,
        )
        .unwrap();
        assert_eq!(transfer.region, Region::new(200, 100, 24, 10));
        assert_eq!(transfer.stride, 13);
        assert_eq!(transfer.source_col, 10);
        assert_eq!(transfer.source_row, 40);
        assert_eq!(transfer.required_len(), 13 * 50);
    }

    #[test]
    fn test_part_snaps_source_x_to_byte() {
        let transfer = plan_image_part(
            SubImage::new(13, 0, 64, 8),
            Rect::new(0, 0, 16, 8),
            dims(),
            false,
        )
        .unwrap();
        assert_eq!(transfer.source_col, 1);
    }

    #[test]
    fn test_part_mirror_pivots_on_bitmap_height() {
        let transfer = plan_image_part(
            SubImage::new(0, 2, 16, 10),
            Rect::new(0, 0, 16, 3),
            dims(),
            true,
        )
        .unwrap();
        assert_eq!(transfer.source_index(0, 0), 2 * (10 - 1 - 2));
        assert_eq!(transfer.source_index(2, 1), 1 + 2 * (10 - 1 - 4));
    }

    #[test]
    fn test_ram_window_reverses_gates() {
        let window = ram_window(Region::new(16, 10, 32, 20), dims(), &GDEQ0426T82);
        // y' = 480 - 10 - 20 = 450; Y decrements so it starts at the high row
        assert_eq!(window.x_start, 16);
        assert_eq!(window.x_end, 47);
        assert_eq!(window.y_start, 469);
        assert_eq!(window.y_end, 450);
        assert_eq!(window.x_range(), [16, 0, 47, 0]);
        assert_eq!(window.y_range(), [0xD5, 0x01, 0xC2, 0x01]);
        assert_eq!(window.x_counter(), [16, 0]);
        assert_eq!(window.y_counter(), [0xD5, 0x01]);
    }

    #[test]
    fn test_ram_window_full_panel() {
        let window = ram_window(Region::full(dims()), dims(), &GDEQ0426T82);
        assert_eq!(window.x_range(), [0x00, 0x00, 0x1F, 0x03]);
        assert_eq!(window.y_range(), [0xDF, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_ram_window_byte_addressing_without_reversal() {
        let mut panel = GDEQ0426T82;
        panel.ram_x_addressing = RamXAddressing::Bytes;
        panel.gates_reversed = false;
        panel.data_entry_mode = crate::command::ENTRY_X_INC_Y_INC;
        let window = ram_window(Region::new(16, 10, 32, 20), dims(), &panel);
        assert_eq!((window.x_start, window.x_end), (2, 5));
        assert_eq!((window.y_start, window.y_end), (10, 29));
    }
}
