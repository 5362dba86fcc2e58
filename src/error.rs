//! Error types for the driver
//!
//! Geometry that falls off the panel is not an error: such writes are clipped
//! or skipped silently. Busy timeouts are not errors either; they are logged
//! and the driver carries on. What remains is:
//!
//! - [`BuilderError`] - rejected configuration
//! - [`Error`] - bus failures and bitmaps too short for the requested window
//! - [`InterfaceError`](crate::interface::InterfaceError) - SPI/GPIO failures
//!
//! ## Example
//!
//! ```
//! use epd_ssd1677::{Builder, BuilderError, Dimensions};
//!
//! // No panel profile selected
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingPanel)));
//!
//! // Larger than the controller can drive
//! assert!(Dimensions::new(1000, 800).is_err());
//! ```

use crate::interface::DisplayInterface;

/// Maximum gate outputs (rows) supported by SSD1677 controller
pub const MAX_GATE_OUTPUTS: u16 = 680;

/// Maximum source outputs (columns) supported by SSD1677 controller
pub const MAX_SOURCE_OUTPUTS: u16 = 960;

/// Errors that can occur when driving the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    Interface(I::Error),
    /// Source bitmap is shorter than the window being transferred requires
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// RAM window outside the panel or not byte-aligned
    ///
    /// Writes are clipped before the window is set, so seeing this means a
    /// profile or internal invariant is broken.
    InvalidRamArea {
        /// X coordinate
        x: u16,
        /// Y coordinate
        y: u16,
        /// Width
        w: u16,
        /// Height
        h: u16,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Bitmap too small: required {required} bytes, provided {provided}"
                )
            }
            Self::InvalidRamArea { x, y, w, h } => {
                write!(f, "Invalid RAM area: x={x}, y={y}, w={w}, h={h}")
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// No panel profile was selected
    ///
    /// [`Builder::panel()`](crate::config::Builder::panel) must be called before building.
    MissingPanel,
    /// The profile's dimensions exceed the controller limits
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
    /// A busy-wait timeout of zero would skip waiting for the waveform
    InvalidTimeout,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingPanel => write!(f, "A panel profile must be specified"),
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS}, cols must be multiple of 8)"
            ),
            Self::InvalidTimeout => write!(f, "Refresh timeouts must be non-zero"),
        }
    }
}

impl core::error::Error for BuilderError {}
